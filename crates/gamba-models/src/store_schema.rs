/// The SQLite table the session store writes and the aggregation layer
/// reads.
///
/// ```sql
/// CREATE TABLE IF NOT EXISTS sessions (
///     id          INTEGER PRIMARY KEY AUTOINCREMENT,
///     user        TEXT NOT NULL,
///     hands       INTEGER NOT NULL,
///     gold        INTEGER NOT NULL,
///     ectoplasm   INTEGER NOT NULL,
///     runes       INTEGER NOT NULL,
///     recorded_at INTEGER NOT NULL
/// );
///
/// CREATE INDEX IF NOT EXISTS idx_sessions_user ON sessions(user);
/// CREATE INDEX IF NOT EXISTS idx_sessions_recorded_at ON sessions(recorded_at);
/// ```
///
/// `recorded_at` is stored as unix seconds so MAX() aggregation and
/// newest-first ordering work on plain integers. `id` is the insertion
/// sequence and is the tie-break when two rows share a timestamp.
pub const SESSIONS_TABLE_DDL: &str = "\
CREATE TABLE IF NOT EXISTS sessions (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    user        TEXT NOT NULL,
    hands       INTEGER NOT NULL,
    gold        INTEGER NOT NULL,
    ectoplasm   INTEGER NOT NULL,
    runes       INTEGER NOT NULL,
    recorded_at INTEGER NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_sessions_user ON sessions(user);
CREATE INDEX IF NOT EXISTS idx_sessions_recorded_at ON sessions(recorded_at);
";
