use chrono::{DateTime, Utc};
use gamba_models::store_schema::SESSIONS_TABLE_DDL;
use gamba_models::{AggregateTotals, Session, GLOBAL_USER};
use rusqlite::Connection;

use crate::error::StoreError;

/// SQLite-backed session store.
///
/// Rows are immutable once appended; every aggregate below is derived with
/// SQL over the stored rows. Timestamps are persisted at second precision.
pub struct SessionStore {
    conn: Connection,
}

impl SessionStore {
    /// Open (or create) a file-backed store. Enables WAL mode so readers
    /// are not blocked while a session is being appended.
    pub fn open(path: &str) -> Result<Self, StoreError> {
        let conn = Connection::open(path)?;
        conn.execute_batch(SESSIONS_TABLE_DDL)?;
        conn.pragma_update(None, "journal_mode", "WAL")?;
        Ok(Self { conn })
    }

    /// Open an in-memory store for testing.
    pub fn open_in_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch(SESSIONS_TABLE_DDL)?;
        Ok(Self { conn })
    }

    /// Append a session as a new row. A single atomic insert.
    pub fn append(&self, session: &Session) -> Result<(), StoreError> {
        self.conn.execute(
            "INSERT INTO sessions (user, hands, gold, ectoplasm, runes, recorded_at) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            rusqlite::params![
                session.user,
                session.hands,
                session.gold,
                session.ectoplasm,
                session.runes,
                session.recorded_at.timestamp(),
            ],
        )?;
        Ok(())
    }

    /// Totals over all of one user's sessions. None if the user has none.
    pub fn sum_for_user(&self, user: &str) -> Result<Option<AggregateTotals>, StoreError> {
        let mut stmt = self.conn.prepare_cached(
            "SELECT COUNT(*), SUM(hands), SUM(gold), SUM(ectoplasm), SUM(runes), \
                    MAX(recorded_at) \
             FROM sessions WHERE user = ?1",
        )?;
        let totals = stmt.query_row(rusqlite::params![user], |row| {
            let count: u64 = row.get(0)?;
            if count == 0 {
                return Ok(None);
            }
            Ok(Some(AggregateTotals {
                user: user.to_string(),
                hands: row.get(1)?,
                gold: row.get(2)?,
                ectoplasm: row.get(3)?,
                runes: row.get(4)?,
                last_recorded_at: timestamp_from_column(row, 5)?,
            }))
        })?;
        Ok(totals)
    }

    /// Bot-wide totals across every user, reported under [`GLOBAL_USER`].
    /// None when the store is empty.
    pub fn sum_all(&self) -> Result<Option<AggregateTotals>, StoreError> {
        let mut stmt = self.conn.prepare_cached(
            "SELECT COUNT(*), SUM(hands), SUM(gold), SUM(ectoplasm), SUM(runes), \
                    MAX(recorded_at) \
             FROM sessions",
        )?;
        let totals = stmt.query_row([], |row| {
            let count: u64 = row.get(0)?;
            if count == 0 {
                return Ok(None);
            }
            Ok(Some(AggregateTotals {
                user: GLOBAL_USER.to_string(),
                hands: row.get(1)?,
                gold: row.get(2)?,
                ectoplasm: row.get(3)?,
                runes: row.get(4)?,
                last_recorded_at: timestamp_from_column(row, 5)?,
            }))
        })?;
        Ok(totals)
    }

    /// Per-user totals for every user, ordered by first appearance in the
    /// ledger. That ordering is what makes leaderboard tie-breaks
    /// deterministic.
    pub fn sum_grouped_by_user(&self) -> Result<Vec<AggregateTotals>, StoreError> {
        let mut stmt = self.conn.prepare_cached(
            "SELECT user, SUM(hands), SUM(gold), SUM(ectoplasm), SUM(runes), \
                    MAX(recorded_at) \
             FROM sessions GROUP BY user ORDER BY MIN(id)",
        )?;
        let rows = stmt
            .query_map([], |row| {
                Ok(AggregateTotals {
                    user: row.get(0)?,
                    hands: row.get(1)?,
                    gold: row.get(2)?,
                    ectoplasm: row.get(3)?,
                    runes: row.get(4)?,
                    last_recorded_at: timestamp_from_column(row, 5)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    /// The user's latest sessions, newest first.
    pub fn recent_for_user(&self, user: &str, limit: u64) -> Result<Vec<Session>, StoreError> {
        let mut stmt = self.conn.prepare_cached(
            "SELECT user, hands, gold, ectoplasm, runes, recorded_at \
             FROM sessions WHERE user = ?1 \
             ORDER BY recorded_at DESC, id DESC LIMIT ?2",
        )?;
        let rows = stmt
            .query_map(rusqlite::params![user, limit], session_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    /// Remove the single most recently recorded session for a user and
    /// return it. Rows sharing the maximum timestamp tie-break on the
    /// insertion sequence: the later insert goes.
    pub fn delete_most_recent_for_user(&mut self, user: &str) -> Result<Session, StoreError> {
        let tx = self.conn.transaction()?;
        let (id, session) = {
            let mut stmt = tx.prepare_cached(
                "SELECT id, user, hands, gold, ectoplasm, runes, recorded_at \
                 FROM sessions WHERE user = ?1 \
                 ORDER BY recorded_at DESC, id DESC LIMIT 1",
            )?;
            let picked = stmt.query_row(rusqlite::params![user], |row| {
                let id: i64 = row.get(0)?;
                Ok((
                    id,
                    Session {
                        user: row.get(1)?,
                        hands: row.get(2)?,
                        gold: row.get(3)?,
                        ectoplasm: row.get(4)?,
                        runes: row.get(5)?,
                        recorded_at: timestamp_from_column(row, 6)?,
                    },
                ))
            });
            match picked {
                Ok(found) => found,
                Err(rusqlite::Error::QueryReturnedNoRows) => {
                    return Err(StoreError::NothingToDelete(user.to_string()))
                }
                Err(e) => return Err(e.into()),
            }
        };
        tx.execute("DELETE FROM sessions WHERE id = ?1", rusqlite::params![id])?;
        tx.commit()?;
        Ok(session)
    }

    /// Count all stored sessions.
    pub fn count(&self) -> Result<usize, StoreError> {
        let count: usize = self
            .conn
            .query_row("SELECT COUNT(*) FROM sessions", [], |row| row.get(0))?;
        Ok(count)
    }
}

fn session_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Session> {
    Ok(Session {
        user: row.get(0)?,
        hands: row.get(1)?,
        gold: row.get(2)?,
        ectoplasm: row.get(3)?,
        runes: row.get(4)?,
        recorded_at: timestamp_from_column(row, 5)?,
    })
}

fn timestamp_from_column(row: &rusqlite::Row<'_>, idx: usize) -> rusqlite::Result<DateTime<Utc>> {
    let secs: i64 = row.get(idx)?;
    DateTime::from_timestamp(secs, 0).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            idx,
            rusqlite::types::Type::Integer,
            format!("timestamp out of range: {secs}").into(),
        )
    })
}
