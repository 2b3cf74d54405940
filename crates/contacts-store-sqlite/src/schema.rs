//! SQL schema for the contacts SQLite store.
//!
//! Executed once at connection startup. There is no migration machinery; the
//! DDL only ever creates what is missing.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;

-- AUTOINCREMENT keeps ids of deleted rows from being handed out again.
CREATE TABLE IF NOT EXISTS contacts (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    first_name  TEXT NOT NULL CHECK (length(trim(first_name)) > 0),
    last_name   TEXT NOT NULL CHECK (length(trim(last_name)) > 0),
    email       TEXT NOT NULL,
    birthday    TEXT NOT NULL,   -- YYYY-MM-DD
    phone       TEXT,
    address     TEXT,
    notes       TEXT
);

CREATE INDEX IF NOT EXISTS contacts_email_idx    ON contacts(email);
CREATE INDEX IF NOT EXISTS contacts_last_name_idx ON contacts(last_name);

PRAGMA user_version = 1;
";

/// Column list shared by every `SELECT` and `RETURNING` clause, in the order
/// [`crate::encode::RawContact::from_row`] reads them.
pub const CONTACT_COLUMNS: &str =
  "id, first_name, last_name, email, birthday, phone, address, notes";
