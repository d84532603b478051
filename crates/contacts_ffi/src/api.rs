//! FFI intent API for Flutter-facing calls.
//!
//! # Responsibility
//! - Expose presentation intents and the derived screen snapshot to Dart.
//! - Own the process-wide contact book and its SQLite gateway.
//!
//! # Invariants
//! - Exported functions must not panic across the FFI boundary.
//! - Ids cross the boundary as hyphenated UUID strings.
//! - Only `contacts_flush` touches storage after open; intents stay in memory.
//! - Storage I/O never runs while the contact book is locked.
//! - Lock order is gateway, then state; state is never held while waiting on
//!   the gateway.

use contacts_core::{
    core_version as core_version_inner, init_logging as init_logging_inner, ping as ping_inner,
    BookSnapshot, ContactBook, ContactId, ContactRow, CoreConfig, SqliteContactGateway,
};
use log::{info, warn};
use once_cell::sync::Lazy;
use std::path::PathBuf;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use uuid::Uuid;

type SharedGateway = Arc<Mutex<SqliteContactGateway>>;

struct FfiState {
    book: ContactBook,
    gateway: Option<SharedGateway>,
}

static STATE: Lazy<Mutex<FfiState>> = Lazy::new(|| {
    Mutex::new(FfiState {
        book: ContactBook::new(),
        gateway: None,
    })
});

/// Minimal health-check API for FRB smoke integration.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Expose core crate version through FFI.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// Returns an empty string on success and the error message otherwise.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err.to_string(),
    }
}

/// Result envelope for intents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactsActionResponse {
    pub ok: bool,
    /// Affected contact id, when the intent targets or creates one.
    pub contact_id: Option<String>,
    pub message: String,
}

impl ContactsActionResponse {
    fn success(message: impl Into<String>, contact_id: Option<ContactId>) -> Self {
        Self {
            ok: true,
            contact_id: contact_id.map(|id| id.to_string()),
            message: message.into(),
        }
    }

    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            contact_id: None,
            message: message.into(),
        }
    }
}

/// One contact line as rendered by Flutter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactRowItem {
    pub id: String,
    pub name: String,
    pub phone: String,
    pub label: String,
    pub is_favorite: bool,
    pub favorite_glyph: String,
    pub is_editing: bool,
}

/// One letter section of the list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactSectionItem {
    pub letter: String,
    pub rows: Vec<ContactRowItem>,
}

/// Screen snapshot envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactsSnapshotResponse {
    pub ok: bool,
    pub sections: Vec<ContactSectionItem>,
    pub favorites: Vec<ContactRowItem>,
    pub editing_id: Option<String>,
    pub draft_name: String,
    pub draft_phone: String,
    pub search_query: String,
    pub total_contacts: u32,
    pub visible_contacts: u32,
    pub pending_writes: u32,
    pub message: String,
}

/// Flush outcome envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactsFlushResponse {
    pub ok: bool,
    pub written: u32,
    pub retained: u32,
    pub dropped: u32,
    pub message: String,
}

/// Opens the contact database and replaces in-memory state with its content.
///
/// `db_path = None` resolves the path from `CONTACTS_DB_PATH` (or the temp
/// directory default). File logging starts when `CONTACTS_LOG_DIR` is set.
/// Pending writes of the previously opened database are flushed to it first.
#[flutter_rust_bridge::frb(sync)]
pub fn contacts_open(db_path: Option<String>) -> ContactsActionResponse {
    match CoreConfig::from_env() {
        Ok(config) => open_with_config(db_path, config),
        Err(err) => ContactsActionResponse::failure(format!("contacts_open failed: {err}")),
    }
}

fn open_with_config(db_path: Option<String>, config: CoreConfig) -> ContactsActionResponse {
    let mut notes = Vec::new();
    if let Err(err) = config.init_logging() {
        notes.push(format!("logging not started: {err}"));
    }

    let path = match db_path.map(|raw| raw.trim().to_string()) {
        Some(raw) if !raw.is_empty() => PathBuf::from(raw),
        _ => config.db_path,
    };
    let gateway = match SqliteContactGateway::open(&path) {
        Ok(gateway) => gateway,
        Err(err) => return ContactsActionResponse::failure(format!("contacts_open failed: {err}")),
    };
    let mut book = ContactBook::new();
    let report = match book.hydrate(&gateway) {
        Ok(report) => report,
        Err(err) => return ContactsActionResponse::failure(format!("contacts_open failed: {err}")),
    };

    let (previous_book, previous_gateway) = {
        let mut state = lock_state();
        let previous_book = std::mem::replace(&mut state.book, book);
        let previous_gateway = state.gateway.replace(Arc::new(Mutex::new(gateway)));
        (previous_book, previous_gateway)
    };
    if let Some(note) = settle_previous_book(previous_book, previous_gateway) {
        notes.push(note);
    }

    info!(
        "event=ffi_open module=ffi status=ok loaded={} skipped={}",
        report.loaded, report.skipped
    );
    let mut message = format!("Loaded {} contact(s).", report.loaded);
    for note in notes {
        message.push(' ');
        message.push_str(&note);
        message.push('.');
    }
    ContactsActionResponse::success(message, None)
}

/// Writes what the replaced book still had queued; returns a note on loss.
fn settle_previous_book(
    mut book: ContactBook,
    gateway: Option<SharedGateway>,
) -> Option<String> {
    let pending = book.pending_writes().len();
    if pending == 0 {
        return None;
    }
    let Some(gateway) = gateway else {
        warn!("event=ffi_open module=ffi status=discarded pending={pending}");
        return Some(format!("Discarded {pending} change(s) made before open"));
    };

    let report = book.flush(&*lock_gateway(&gateway));
    let lost = report.retained + report.dropped;
    if lost == 0 {
        info!(
            "event=ffi_open module=ffi status=flushed_previous written={}",
            report.written
        );
        return None;
    }
    warn!(
        "event=ffi_open module=ffi status=lost_previous written={} lost={lost}",
        report.written
    );
    Some(format!("Lost {lost} unsaved change(s) of the previous database"))
}

#[flutter_rust_bridge::frb(sync)]
pub fn contacts_add(name: String, phone: String) -> ContactsActionResponse {
    match lock_state().book.add_contact(&name, Some(&phone)) {
        Ok(contact) => ContactsActionResponse::success("Contact added.", Some(contact.id)),
        Err(err) => ContactsActionResponse::failure(format!("contacts_add failed: {err}")),
    }
}

#[flutter_rust_bridge::frb(sync)]
pub fn contacts_toggle_favorite(id: String) -> ContactsActionResponse {
    with_contact_id(&id, "contacts_toggle_favorite", |book, id| {
        book.toggle_favorite(id)
            .map(|favorite| if favorite { "Marked favorite." } else { "Unmarked favorite." })
            .map_err(|err| err.to_string())
    })
}

/// Deletes a contact; unknown ids succeed with no effect.
#[flutter_rust_bridge::frb(sync)]
pub fn contacts_delete(id: String) -> ContactsActionResponse {
    with_contact_id(&id, "contacts_delete", |book, id| {
        Ok(match book.delete_contact(id) {
            Some(_) => "Contact deleted.",
            None => "Contact already absent.",
        })
    })
}

#[flutter_rust_bridge::frb(sync)]
pub fn contacts_start_editing(id: String) -> ContactsActionResponse {
    with_contact_id(&id, "contacts_start_editing", |book, id| {
        book.start_editing(id)
            .map(|()| "Editing started.")
            .map_err(|err| err.to_string())
    })
}

#[flutter_rust_bridge::frb(sync)]
pub fn contacts_update_draft_name(text: String) -> ContactsActionResponse {
    draft_response(lock_state().book.update_draft_name(text))
}

#[flutter_rust_bridge::frb(sync)]
pub fn contacts_update_draft_phone(text: String) -> ContactsActionResponse {
    draft_response(lock_state().book.update_draft_phone(text))
}

#[flutter_rust_bridge::frb(sync)]
pub fn contacts_save(id: String) -> ContactsActionResponse {
    with_contact_id(&id, "contacts_save", |book, id| {
        book.save_contact(id)
            .map(|_| "Contact saved.")
            .map_err(|err| err.to_string())
    })
}

#[flutter_rust_bridge::frb(sync)]
pub fn contacts_cancel_editing() -> ContactsActionResponse {
    match lock_state().book.cancel_editing() {
        Some(draft) => ContactsActionResponse::success("Editing cancelled.", Some(draft.target_id)),
        None => ContactsActionResponse::success("Nothing to cancel.", None),
    }
}

#[flutter_rust_bridge::frb(sync)]
pub fn contacts_set_search_query(text: String) {
    lock_state().book.set_search_query(text);
}

/// Returns the derived screen state.
#[flutter_rust_bridge::frb(sync)]
pub fn contacts_snapshot() -> ContactsSnapshotResponse {
    let state = lock_state();
    match state.book.snapshot() {
        Ok(snapshot) => to_snapshot_response(snapshot),
        Err(err) => {
            warn!("event=ffi_snapshot module=ffi status=error error={err}");
            ContactsSnapshotResponse {
                ok: false,
                sections: Vec::new(),
                favorites: Vec::new(),
                editing_id: None,
                draft_name: String::new(),
                draft_phone: String::new(),
                search_query: state.book.search_query().to_string(),
                total_contacts: count(state.book.store().len()),
                visible_contacts: 0,
                pending_writes: count(state.book.pending_writes().len()),
                message: format!("contacts_snapshot failed: {err}"),
            }
        }
    }
}

/// Pushes pending writes to the database.
///
/// Async on the Dart side so storage latency never blocks the UI isolate. The
/// book is locked only to detach the queue and to requeue leftovers, so
/// intents keep running while SQLite waits on a busy database.
pub fn contacts_flush() -> ContactsFlushResponse {
    let gateway = lock_state().gateway.clone();
    let Some(gateway) = gateway else {
        return ContactsFlushResponse {
            ok: false,
            written: 0,
            retained: count(lock_state().book.pending_writes().len()),
            dropped: 0,
            message: "contacts_flush failed: database not opened".to_string(),
        };
    };

    // Held until leftovers are requeued so concurrent flushes keep journal order.
    let connection = lock_gateway(&gateway);
    let mut detached = lock_state().book.take_pending_writes();
    let report = detached.flush(&*connection);

    let mut state = lock_state();
    let still_open = state
        .gateway
        .as_ref()
        .is_some_and(|current| Arc::ptr_eq(current, &gateway));
    let (retained, dropped) = if still_open {
        let superseded = state.book.restore_pending_writes(detached);
        (report.retained - superseded, report.dropped)
    } else {
        if !detached.is_empty() {
            warn!(
                "event=ffi_flush module=ffi status=lost reason=database_reopened lost={}",
                detached.len()
            );
        }
        (0, report.dropped + detached.len())
    };
    drop(state);
    drop(connection);

    ContactsFlushResponse {
        ok: retained == 0 && dropped == 0,
        written: count(report.written),
        retained: count(retained),
        dropped: count(dropped),
        message: format!(
            "written={} retained={retained} dropped={dropped}",
            report.written
        ),
    }
}

fn lock_state() -> MutexGuard<'static, FfiState> {
    STATE.lock().unwrap_or_else(PoisonError::into_inner)
}

fn lock_gateway(gateway: &SharedGateway) -> MutexGuard<'_, SqliteContactGateway> {
    gateway.lock().unwrap_or_else(PoisonError::into_inner)
}

fn parse_contact_id(raw: &str) -> Result<ContactId, String> {
    Uuid::parse_str(raw.trim()).map_err(|_| format!("invalid contact id `{}`", raw.trim()))
}

fn with_contact_id(
    raw_id: &str,
    operation: &str,
    f: impl FnOnce(&mut ContactBook, ContactId) -> Result<&'static str, String>,
) -> ContactsActionResponse {
    let id = match parse_contact_id(raw_id) {
        Ok(id) => id,
        Err(err) => return ContactsActionResponse::failure(format!("{operation} failed: {err}")),
    };
    match f(&mut lock_state().book, id) {
        Ok(message) => ContactsActionResponse::success(message, Some(id)),
        Err(err) => ContactsActionResponse::failure(format!("{operation} failed: {err}")),
    }
}

fn draft_response(updated: bool) -> ContactsActionResponse {
    if updated {
        ContactsActionResponse::success("Draft updated.", None)
    } else {
        ContactsActionResponse::failure("no contact is being edited")
    }
}

fn to_snapshot_response(snapshot: BookSnapshot) -> ContactsSnapshotResponse {
    let (editing_id, draft_name, draft_phone) = match snapshot.edit {
        Some(draft) => (Some(draft.target_id.to_string()), draft.name, draft.phone),
        None => (None, String::new(), String::new()),
    };
    ContactsSnapshotResponse {
        ok: true,
        sections: snapshot
            .sections
            .into_iter()
            .map(|section| ContactSectionItem {
                letter: section.letter,
                rows: section.contacts.into_iter().map(to_row_item).collect(),
            })
            .collect(),
        favorites: snapshot.favorites.into_iter().map(to_row_item).collect(),
        editing_id,
        draft_name,
        draft_phone,
        search_query: snapshot.search_query,
        total_contacts: count(snapshot.total_contacts),
        visible_contacts: count(snapshot.visible_contacts),
        pending_writes: count(snapshot.pending_writes),
        message: String::new(),
    }
}

fn to_row_item(row: ContactRow) -> ContactRowItem {
    ContactRowItem {
        id: row.id.to_string(),
        name: row.name,
        phone: row.phone,
        label: row.label,
        is_favorite: row.is_favorite,
        favorite_glyph: row.favorite_glyph.to_string(),
        is_editing: row.is_editing,
    }
}

fn count(value: usize) -> u32 {
    u32::try_from(value).unwrap_or(u32::MAX)
}

#[cfg(test)]
mod tests {
    use super::{
        contacts_add, contacts_cancel_editing, contacts_delete, contacts_flush, contacts_open,
        contacts_save, contacts_set_search_query, contacts_snapshot, contacts_start_editing,
        contacts_toggle_favorite, contacts_update_draft_name, contacts_update_draft_phone,
        core_version, init_logging, open_with_config, ping,
    };
    use contacts_core::{logging_status, CoreConfig, SqliteContactGateway};
    use std::path::{Path, PathBuf};
    use std::sync::{Mutex, MutexGuard, PoisonError};
    use std::time::{Duration, Instant};

    // Tests below share the process-wide book.
    static SERIAL: Mutex<()> = Mutex::new(());

    fn serial() -> MutexGuard<'static, ()> {
        SERIAL.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn path_text(path: &Path) -> String {
        path.to_str().expect("utf-8 path").to_string()
    }

    fn row_names() -> Vec<String> {
        contacts_snapshot()
            .sections
            .into_iter()
            .flat_map(|section| section.rows)
            .map(|row| row.name)
            .collect()
    }

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }

    #[test]
    fn init_logging_rejects_bad_input() {
        assert!(!init_logging("info".to_string(), String::new()).is_empty());
        assert!(!init_logging("verbose".to_string(), "/tmp/logs".to_string()).is_empty());
    }

    #[test]
    fn malformed_ids_fail_without_panicking() {
        let response = contacts_toggle_favorite("not-a-uuid".to_string());
        assert!(!response.ok);
        assert!(response.message.contains("invalid contact id"));
    }

    #[test]
    fn intents_flow_through_snapshot_and_persist_across_open() {
        let _serial = serial();
        let dir = tempfile::tempdir().expect("temp dir");
        let db_path = dir.path().join("contacts.sqlite3");
        let db_path_text = db_path.to_str().expect("utf-8 path").to_string();

        let opened = contacts_open(Some(db_path_text.clone()));
        assert!(opened.ok, "{}", opened.message);

        let blank = contacts_add("  ".to_string(), "123456789".to_string());
        assert!(!blank.ok);

        let added = contacts_add("Zuzanna".to_string(), String::new());
        assert!(added.ok, "{}", added.message);
        let id = added.contact_id.expect("created id");

        assert!(contacts_toggle_favorite(id.clone()).ok);
        assert!(contacts_start_editing(id.clone()).ok);
        assert!(contacts_update_draft_phone("123".to_string()).ok);
        let rejected = contacts_save(id.clone());
        assert!(!rejected.ok);
        assert!(rejected.message.contains("at least 9"));

        assert!(contacts_update_draft_name("Zuza".to_string()).ok);
        assert!(contacts_update_draft_phone("600700800".to_string()).ok);
        assert!(contacts_save(id.clone()).ok);
        assert!(!contacts_update_draft_name("late".to_string()).ok);

        contacts_set_search_query("zuz".to_string());
        let snapshot = contacts_snapshot();
        assert!(snapshot.ok, "{}", snapshot.message);
        let row = snapshot
            .sections
            .iter()
            .flat_map(|section| section.rows.iter())
            .find(|row| row.id == id)
            .expect("row visible");
        assert_eq!(row.label, "Zuza - 600700800");
        assert!(row.is_favorite);
        assert!(snapshot.favorites.iter().any(|fav| fav.id == id));

        let flushed = contacts_flush();
        assert!(flushed.ok, "{}", flushed.message);

        let reopened = contacts_open(Some(db_path_text));
        assert!(reopened.ok, "{}", reopened.message);
        let snapshot = contacts_snapshot();
        assert!(snapshot.favorites.is_empty());
        assert!(snapshot
            .sections
            .iter()
            .flat_map(|section| section.rows.iter())
            .any(|row| row.id == id && row.phone == "600700800"));

        assert!(contacts_start_editing(id.clone()).ok);
        assert!(contacts_cancel_editing().ok);
        assert!(contacts_delete(id.clone()).ok);
        assert!(contacts_delete(id).ok);
    }

    #[test]
    fn intents_stay_responsive_while_flush_waits_on_a_locked_database() {
        let _serial = serial();
        let dir = tempfile::tempdir().expect("temp dir");
        let db_path = dir.path().join("contacts.sqlite3");
        assert!(contacts_open(Some(path_text(&db_path))).ok);
        assert!(contacts_add("Blocked".to_string(), String::new()).ok);

        let blocker = SqliteContactGateway::open(&db_path).expect("second connection");
        blocker
            .connection()
            .execute_batch("BEGIN EXCLUSIVE;")
            .expect("exclusive lock");
        let flusher = std::thread::spawn(contacts_flush);
        std::thread::sleep(Duration::from_millis(300));

        let started = Instant::now();
        let snapshot = contacts_snapshot();
        let added = contacts_add("Meanwhile".to_string(), String::new());
        let waited = started.elapsed();

        blocker
            .connection()
            .execute_batch("ROLLBACK;")
            .expect("release lock");
        let flushed = flusher.join().expect("flush thread");

        assert!(snapshot.ok, "{}", snapshot.message);
        assert!(added.ok, "{}", added.message);
        assert!(waited < Duration::from_secs(1), "intents waited {waited:?}");
        assert_eq!(flushed.written, 1, "{}", flushed.message);
        assert_eq!(flushed.retained, 0);
        assert_eq!(contacts_snapshot().pending_writes, 1);
    }

    #[test]
    fn reopening_flushes_pending_writes_of_previous_database() {
        let _serial = serial();
        let first = tempfile::tempdir().expect("temp dir");
        let second = tempfile::tempdir().expect("temp dir");
        let first_db = path_text(&first.path().join("contacts.sqlite3"));
        let second_db = path_text(&second.path().join("contacts.sqlite3"));

        assert!(contacts_open(Some(first_db.clone())).ok);
        assert!(contacts_add("Unflushed".to_string(), "123456789".to_string()).ok);

        let switched = contacts_open(Some(second_db));
        assert!(switched.ok, "{}", switched.message);
        assert!(!switched.message.contains("Lost"), "{}", switched.message);
        assert!(row_names().is_empty());

        assert!(contacts_open(Some(first_db)).ok);
        assert_eq!(row_names(), vec!["Unflushed".to_string()]);
    }

    #[test]
    fn open_starts_logging_from_configured_log_dir() {
        let _serial = serial();
        let dir = tempfile::tempdir().expect("temp dir");
        let log_dir = dir.path().join("logs");
        let config = CoreConfig {
            db_path: dir.path().join("contacts.sqlite3"),
            log_level: "info".to_string(),
            log_dir: Some(log_dir.clone()),
        };

        let opened = open_with_config(None, config);
        assert!(opened.ok, "{}", opened.message);
        assert!(!opened.message.contains("logging not started"), "{}", opened.message);
        assert_eq!(logging_status(), Some(("info", PathBuf::from(&log_dir))));
        assert!(log_dir.is_dir());
    }
}
