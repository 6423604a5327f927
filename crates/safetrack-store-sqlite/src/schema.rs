//! SQL schema for the SafeTrack SQLite store.
//!
//! Executed once at connection startup. There are no migrations; the
//! `user_version` pragma only records which layout created the file.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;

-- Rows are never deleted; archiving flips is_archived.
CREATE TABLE IF NOT EXISTS incidents (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    location    TEXT    NOT NULL,
    category    TEXT    NOT NULL,
    severity    TEXT    NOT NULL,
    description TEXT    NOT NULL,
    status      TEXT    NOT NULL DEFAULT 'Open',
    reported_by TEXT,
    photo_url   TEXT,
    is_archived INTEGER NOT NULL DEFAULT 0,
    created_at  TEXT    NOT NULL,   -- RFC 3339 UTC; server-assigned
    updated_at  TEXT    NOT NULL,   -- RFC 3339 UTC; refreshed on every write
    resolved_at TEXT                -- RFC 3339 UTC or NULL
);

CREATE INDEX IF NOT EXISTS incidents_archived_idx ON incidents(is_archived);

PRAGMA user_version = 1;
";
