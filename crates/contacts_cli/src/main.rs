//! CLI smoke entry point.
//!
//! # Responsibility
//! - Verify `contacts_core` linkage without the Flutter runtime.
//! - Print a small deterministic grouped view.

use contacts_core::ContactBook;

fn main() {
    println!("contacts_core ping={}", contacts_core::ping());
    println!("contacts_core version={}", contacts_core::core_version());

    let mut book = ContactBook::new();
    for (name, phone) in [("bob", "500600700"), ("Alice", ""), ("Ćwiek", "123456789")] {
        if let Err(err) = book.add_contact(name, Some(phone)) {
            eprintln!("contacts_cli add failed: {err}");
            std::process::exit(1);
        }
    }

    match book.snapshot() {
        Ok(snapshot) => {
            for section in snapshot.sections {
                println!("[{}]", section.letter);
                for row in section.contacts {
                    println!("  {}", row.label);
                }
            }
        }
        Err(err) => {
            eprintln!("contacts_cli snapshot failed: {err}");
            std::process::exit(1);
        }
    }
}
