//! SQL schema for the workload SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;

-- User settings for each (entity_type, action_kind) factor. Counts are
-- derived from `activity` at assessment time and never stored here.
CREATE TABLE IF NOT EXISTS factors (
    factor_id   TEXT PRIMARY KEY,
    entity_type TEXT NOT NULL,     -- 'records' | 'jobs' | 'tasks' | ...
    action_kind TEXT NOT NULL,     -- 'create' | 'interaction'
    weight      INTEGER NOT NULL DEFAULT 1 CHECK (weight >= 0),
    threshold   INTEGER NOT NULL DEFAULT 1 CHECK (threshold >= 0),
    alive       INTEGER NOT NULL DEFAULT 1,
    updated_at  TEXT NOT NULL,     -- ISO 8601 UTC
    UNIQUE (entity_type, action_kind)
);

-- One row per activity weight.
CREATE TABLE IF NOT EXISTS thresholds (
    weight        TEXT PRIMARY KEY,  -- 'empty' | 'light' | ... | 'significant'
    value         INTEGER NOT NULL CHECK (value >= 0),
    default_value INTEGER NOT NULL CHECK (default_value >= 0),
    colour        TEXT NOT NULL      -- '#RRGGBB'
);

-- Append-only log of things that happened to tracked entities.
CREATE TABLE IF NOT EXISTS activity (
    activity_id TEXT PRIMARY KEY,
    entity_type TEXT NOT NULL,
    action_kind TEXT NOT NULL,
    entity_id   TEXT NOT NULL,
    occurred_at TEXT NOT NULL,     -- ISO 8601 UTC
    occurred_on TEXT NOT NULL      -- local calendar day, YYYY-MM-DD
);

CREATE INDEX IF NOT EXISTS activity_day_idx
    ON activity(entity_type, action_kind, occurred_on);

PRAGMA user_version = 1;
";
