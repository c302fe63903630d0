mod migrations;

use tokio_rusqlite::Connection;

use crate::config::config;

use migrations::MIGRATIONS;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error(transparent)]
    TokioRusqlite(tokio_rusqlite::Error),
    #[error(transparent)]
    Rusqlite(rusqlite::Error),
}

impl From<tokio_rusqlite::Error> for Error {
    fn from(error: tokio_rusqlite::Error) -> Self {
        match error {
            tokio_rusqlite::Error::Rusqlite(error) => Self::Rusqlite(error),
            error => Self::TokioRusqlite(error),
        }
    }
}

impl From<rusqlite::Error> for Error {
    fn from(error: rusqlite::Error) -> Self {
        Self::Rusqlite(error)
    }
}

/// One connection for the whole process. `tokio_rusqlite` keeps the
/// actual `rusqlite::Connection` on a single thread and serializes
/// `call`s in submission order, so concurrently arriving requests
/// interleave at statement granularity.
pub type DB = Connection;

pub async fn init_db() -> Result<DB> {
    let conn = tokio_rusqlite::Connection::open(&config().database_url).await?;

    conn.call(|conn| {
        MIGRATIONS.to_latest(conn).unwrap();

        conn.pragma_update(None, "journal_mode", "WAL")?;
        conn.pragma_update(None, "foreign_keys", "ON")?;

        Ok(())
    })
    .await?;

    Ok(conn)
}

#[cfg(test)]
pub async fn init_test_db() -> Result<DB> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;

    conn.call(|conn| {
        MIGRATIONS.to_latest(conn).unwrap();

        Ok(())
    })
    .await?;

    Ok(conn)
}

/// Inserts `count` throwaway rows through the same statement shape the
/// API uses. Runs on every startup, so restarts accumulate rows.
pub async fn seed_dummy_notes(db: &DB, count: usize) -> Result<()> {
    if count == 0 {
        return Ok(());
    }

    db.call(move |conn| {
        let mut stmt = conn.prepare(
            r#"INSERT INTO notes (note, category, created_at, updated_at, completed)
            VALUES (?, 'General', datetime('now'), datetime('now'), ?)"#,
        )?;
        for n in 1..=count {
            stmt.execute(rusqlite::params![format!("dummy note {n}"), n % 2 == 0])?;
        }
        Ok(())
    })
    .await?;

    tracing::debug!("seeded {count} dummy notes");

    Ok(())
}
