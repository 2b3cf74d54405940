//! [`SqliteStore`] hands out [`SqliteSession`]s, the SQLite implementation of
//! [`ContactSession`].

use std::{path::Path, sync::Arc, time::Duration};

use contacts_core::{
  birthday::BirthdayWindow,
  contact::{Contact, NewContact},
  store::{ContactQuery, ContactSession, ContactStore},
};
use rusqlite::OptionalExtension as _;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};

use crate::{
  encode::{encode_date, like_pattern, RawContact},
  schema::{CONTACT_COLUMNS, SCHEMA},
  Error, Result,
};

// ─── Options ─────────────────────────────────────────────────────────────────

/// Limits applied when handing out sessions.
#[derive(Debug, Clone, Copy)]
pub struct StoreOptions {
  /// Sessions that may be open at the same time.
  pub max_sessions:    usize,
  /// How long [`SqliteStore::session`] waits for a free slot.
  pub acquire_timeout: Duration,
}

impl Default for StoreOptions {
  fn default() -> Self {
    Self { max_sessions: 16, acquire_timeout: Duration::from_secs(5) }
  }
}

// ─── Store ───────────────────────────────────────────────────────────────────

/// A contact store backed by a single SQLite file.
///
/// Cloning is cheap; the inner connection and session semaphore are
/// reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn:            tokio_rusqlite::Connection,
  sessions:        Arc<Semaphore>,
  acquire_timeout: Duration,
}

impl SqliteStore {
  /// Open (or create) a store at `path` with default [`StoreOptions`].
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    Self::open_with(path, StoreOptions::default()).await
  }

  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open_with(path: impl AsRef<Path>, options: StoreOptions) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    Self::init(conn, options).await
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    Self::open_in_memory_with(StoreOptions::default()).await
  }

  pub async fn open_in_memory_with(options: StoreOptions) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    Self::init(conn, options).await
  }

  async fn init(conn: tokio_rusqlite::Connection, options: StoreOptions) -> Result<Self> {
    conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(Self {
      conn,
      sessions: Arc::new(Semaphore::new(options.max_sessions)),
      acquire_timeout: options.acquire_timeout,
    })
  }

  /// Stop handing out sessions and close the database connection.
  ///
  /// Sessions still alive fail their next call with a closed-connection
  /// error; later calls to [`SqliteStore::session`] fail with
  /// [`Error::Unavailable`].
  pub async fn close(self) -> Result<()> {
    self.sessions.close();
    self.conn.close().await?;
    Ok(())
  }
}

impl ContactStore for SqliteStore {
  type Error = Error;
  type Session = SqliteSession;

  async fn session(&self) -> Result<SqliteSession> {
    let permit = tokio::time::timeout(
      self.acquire_timeout,
      Arc::clone(&self.sessions).acquire_owned(),
    )
    .await
    .map_err(|_| Error::Unavailable("timed out waiting for a free session".into()))?
    .map_err(|_| Error::Unavailable("store is closed".into()))?;

    self
      .conn
      .call(|conn| {
        conn.query_row("SELECT 1", [], |_| Ok(()))?;
        Ok(())
      })
      .await
      .map_err(|e| Error::Unavailable(e.to_string()))?;

    Ok(SqliteSession { conn: self.conn.clone(), _permit: permit })
  }
}

// ─── Session ─────────────────────────────────────────────────────────────────

/// A request-scoped handle on the store. Holds one of the store's session
/// slots until dropped.
pub struct SqliteSession {
  conn:    tokio_rusqlite::Connection,
  _permit: OwnedSemaphorePermit,
}

impl SqliteSession {
  async fn query_many<P>(&self, sql: String, params: P) -> Result<Vec<Contact>>
  where
    P: rusqlite::Params + Send + 'static,
  {
    let raws: Vec<RawContact> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
          .query_map(params, RawContact::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawContact::into_contact).collect()
  }

  async fn query_optional<P>(&self, sql: String, params: P) -> Result<Option<Contact>>
  where
    P: rusqlite::Params + Send + 'static,
  {
    let raw: Option<RawContact> = self
      .conn
      .call(move |conn| Ok(conn.query_row(&sql, params, RawContact::from_row).optional()?))
      .await?;

    raw.map(RawContact::into_contact).transpose()
  }
}

impl ContactSession for SqliteSession {
  type Error = Error;

  async fn create(&self, input: NewContact) -> Result<Contact> {
    input.validate()?;
    let sql = format!(
      "INSERT INTO contacts (first_name, last_name, email, birthday, phone, address, notes)
       VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
       RETURNING {CONTACT_COLUMNS}"
    );
    let params = (
      input.first_name,
      input.last_name,
      input.email,
      encode_date(input.birthday),
      input.phone,
      input.address,
      input.notes,
    );

    // INSERT ... RETURNING always yields exactly one row.
    let raw: RawContact = self
      .conn
      .call(move |conn| Ok(conn.query_row(&sql, params, RawContact::from_row)?))
      .await?;
    raw.into_contact()
  }

  async fn list(&self, skip: u32, limit: u32) -> Result<Vec<Contact>> {
    let sql = format!(
      "SELECT {CONTACT_COLUMNS} FROM contacts ORDER BY id LIMIT ?1 OFFSET ?2"
    );
    self.query_many(sql, (i64::from(limit), i64::from(skip))).await
  }

  async fn get(&self, id: i64) -> Result<Option<Contact>> {
    let sql = format!("SELECT {CONTACT_COLUMNS} FROM contacts WHERE id = ?1");
    self.query_optional(sql, (id,)).await
  }

  async fn update(&self, id: i64, input: NewContact) -> Result<Option<Contact>> {
    input.validate()?;
    let sql = format!(
      "UPDATE contacts
       SET first_name = ?1, last_name = ?2, email = ?3, birthday = ?4,
           phone = ?5, address = ?6, notes = ?7
       WHERE id = ?8
       RETURNING {CONTACT_COLUMNS}"
    );
    let params = (
      input.first_name,
      input.last_name,
      input.email,
      encode_date(input.birthday),
      input.phone,
      input.address,
      input.notes,
      id,
    );
    self.query_optional(sql, params).await
  }

  async fn delete(&self, id: i64) -> Result<Option<Contact>> {
    let sql = format!("DELETE FROM contacts WHERE id = ?1 RETURNING {CONTACT_COLUMNS}");
    self.query_optional(sql, (id,)).await
  }

  async fn search(&self, query: &ContactQuery) -> Result<Vec<Contact>> {
    if query.is_empty() {
      return Ok(Vec::new());
    }
    let name_pattern  = query.name().map(like_pattern);
    let email_pattern = query.email().map(like_pattern);

    let sql = format!(
      r"SELECT {CONTACT_COLUMNS} FROM contacts
        WHERE (?1 IS NOT NULL AND (
                 first_name LIKE ?1 ESCAPE '\'
              OR last_name  LIKE ?1 ESCAPE '\'
              OR (first_name || ' ' || last_name) LIKE ?1 ESCAPE '\'))
           OR (?2 IS NOT NULL AND email LIKE ?2 ESCAPE '\')
        ORDER BY id"
    );
    self.query_many(sql, (name_pattern, email_pattern)).await
  }

  async fn upcoming_birthdays(&self, window: BirthdayWindow) -> Result<Vec<Contact>> {
    let condition = if window.wraps_year() {
      "md >= ?1 OR md <= ?2"
    } else {
      "md BETWEEN ?1 AND ?2"
    };
    // Rows before the start key belong to next January when the window
    // wraps, so they sort after the December ones.
    let sql = format!(
      "SELECT {CONTACT_COLUMNS} FROM (
         SELECT {CONTACT_COLUMNS}, substr(birthday, -5) AS md FROM contacts
       )
       WHERE {condition}
       ORDER BY md < ?1, md, id"
    );
    self
      .query_many(sql, (window.start_key(), window.end_key()))
      .await
  }
}
