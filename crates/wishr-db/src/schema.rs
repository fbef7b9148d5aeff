/// SQL statements for creating the wishr database schema.

pub const CREATE_SCHEMA_VERSION: &str = "
CREATE TABLE IF NOT EXISTS schema_version (
    version     INTEGER PRIMARY KEY,
    applied_at  TEXT NOT NULL
)";

pub const CREATE_WISHLIST_ITEMS: &str = "
CREATE TABLE IF NOT EXISTS wishlist_items (
    id              TEXT PRIMARY KEY,
    position        INTEGER NOT NULL UNIQUE,
    name            TEXT NOT NULL,
    description     TEXT,
    url             TEXT,
    date_added      TEXT NOT NULL,
    is_bought       INTEGER NOT NULL DEFAULT 0,
    bought_by       TEXT,
    purchase_date   TEXT,
    CHECK (
        (is_bought = 0 AND bought_by IS NULL AND purchase_date IS NULL)
        OR (is_bought = 1 AND bought_by IS NOT NULL AND purchase_date IS NOT NULL)
    )
)";
