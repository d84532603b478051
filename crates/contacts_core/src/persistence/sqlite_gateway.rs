//! SQLite-backed contact gateway.
//!
//! # Invariants
//! - Writes validate the contact before touching SQL.
//! - Reads reject invalid persisted rows instead of masking them.
//! - `save` is an upsert keyed by contact id.

use crate::db::{open_db, open_db_in_memory};
use crate::model::contact::{Contact, ContactId};
use crate::persistence::gateway::{ContactGateway, GatewayError, GatewayResult};
use log::debug;
use rusqlite::{params, Connection, Row};
use std::path::Path;
use uuid::Uuid;

/// Gateway storing one row per contact in the `contacts` table.
pub struct SqliteContactGateway {
    conn: Connection,
}

impl SqliteContactGateway {
    /// Opens or creates the database file at `path`.
    pub fn open(path: impl AsRef<Path>) -> GatewayResult<Self> {
        Ok(Self {
            conn: open_db(path)?,
        })
    }

    /// Opens a private in-memory database.
    pub fn in_memory() -> GatewayResult<Self> {
        Ok(Self {
            conn: open_db_in_memory()?,
        })
    }

    /// Wraps a connection that was already opened through [`crate::db`].
    pub fn from_connection(conn: Connection) -> Self {
        Self { conn }
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }
}

impl ContactGateway for SqliteContactGateway {
    fn save(&self, contact: &Contact) -> GatewayResult<()> {
        contact.validate()?;
        self.conn.execute(
            "INSERT INTO contacts (id, name, phone, updated_at)
             VALUES (?1, ?2, ?3, (strftime('%s', 'now') * 1000))
             ON CONFLICT(id) DO UPDATE SET
                name = excluded.name,
                phone = excluded.phone,
                updated_at = excluded.updated_at;",
            params![contact.id.to_string(), contact.name, contact.phone],
        )?;
        debug!("event=gateway_save module=persistence status=ok id={}", contact.id);
        Ok(())
    }

    fn load_all(&self) -> GatewayResult<Vec<Contact>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, name, phone FROM contacts ORDER BY rowid ASC;")?;
        let mut rows = stmt.query([])?;
        let mut contacts = Vec::new();
        while let Some(row) = rows.next()? {
            contacts.push(parse_contact_row(row)?);
        }
        Ok(contacts)
    }

    fn delete(&self, id: ContactId) -> GatewayResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM contacts WHERE id = ?1;", [id.to_string()])?;
        debug!("event=gateway_delete module=persistence status=ok id={id} changed={changed}");
        Ok(())
    }
}

fn parse_contact_row(row: &Row<'_>) -> GatewayResult<Contact> {
    let id_text: String = row.get("id")?;
    let id = Uuid::parse_str(&id_text).map_err(|_| {
        GatewayError::InvalidData(format!("invalid uuid value `{id_text}` in contacts.id"))
    })?;
    let contact = Contact {
        id,
        name: row.get("name")?,
        phone: row.get("phone")?,
    };
    contact.validate()?;
    Ok(contact)
}
