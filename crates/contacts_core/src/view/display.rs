//! Static display options for contact rows.

use crate::model::contact::Contact;

/// Enumerated presentation settings shared by every rendered row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisplayOptions {
    pub favorite_glyph: &'static str,
    pub not_favorite_glyph: &'static str,
    pub label_separator: &'static str,
}

impl DisplayOptions {
    pub const DEFAULT: Self = Self {
        favorite_glyph: "★",
        not_favorite_glyph: "☆",
        label_separator: " - ",
    };

    /// Formats the one-line row label, `name - phone` by default.
    pub fn label(&self, contact: &Contact) -> String {
        format!("{}{}{}", contact.name, self.label_separator, contact.phone)
    }

    pub fn glyph_for(&self, is_favorite: bool) -> &'static str {
        if is_favorite {
            self.favorite_glyph
        } else {
            self.not_favorite_glyph
        }
    }
}

impl Default for DisplayOptions {
    fn default() -> Self {
        Self::DEFAULT
    }
}

#[cfg(test)]
mod tests {
    use super::DisplayOptions;
    use crate::model::contact::Contact;

    #[test]
    fn label_joins_name_and_phone() {
        let contact = Contact::new("Ola", None).unwrap();
        assert_eq!(DisplayOptions::DEFAULT.label(&contact), "Ola - Brak numeru");
    }

    #[test]
    fn custom_options_change_glyphs_and_separator() {
        let options = DisplayOptions {
            favorite_glyph: "*",
            not_favorite_glyph: "-",
            label_separator: ": ",
        };
        let contact = Contact::new("Ola", Some("123456789")).unwrap();
        assert_eq!(options.label(&contact), "Ola: 123456789");
        assert_eq!(options.glyph_for(true), "*");
        assert_eq!(options.glyph_for(false), "-");
    }
}
