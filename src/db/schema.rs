//! SQL DDL for initializing the database schema.
//! SQLite-first design; can be adapted for other RDBMS.

/// SQLite schema includes:
/// - `owners` table (names are not unique; uniqueness is a caller policy)
/// - `collections` table (`owner_id` NULL means shared/unowned)
/// - `items` table (name is the business key, not enforced unique)
/// - `memberships` table (one row per item <-> collection edge)
pub const SQLITE_INIT: &str = r#"
-- ---------------------------------------------------------------------------
-- Owners
-- ---------------------------------------------------------------------------
CREATE TABLE IF NOT EXISTS owners (
    id INTEGER PRIMARY KEY NOT NULL,
    name TEXT NOT NULL,
    created_at TEXT NOT NULL -- RFC3339
);

CREATE INDEX IF NOT EXISTS idx_owners_name ON owners(name);

-- ---------------------------------------------------------------------------
-- Named collections (deleted together with their owner)
-- ---------------------------------------------------------------------------
CREATE TABLE IF NOT EXISTS collections (
    id INTEGER PRIMARY KEY NOT NULL,
    name TEXT NOT NULL,
    owner_id INTEGER NULL REFERENCES owners(id) ON DELETE CASCADE,
    created_at TEXT NOT NULL -- RFC3339
);

CREATE INDEX IF NOT EXISTS idx_collections_name ON collections(name);
CREATE INDEX IF NOT EXISTS idx_collections_owner ON collections(owner_id);

-- ---------------------------------------------------------------------------
-- Items
-- ---------------------------------------------------------------------------
CREATE TABLE IF NOT EXISTS items (
    id INTEGER PRIMARY KEY NOT NULL,
    name TEXT NOT NULL,
    created_at TEXT NOT NULL -- RFC3339
);

CREATE INDEX IF NOT EXISTS idx_items_name ON items(name);

-- ---------------------------------------------------------------------------
-- Memberships (dropped with either endpoint, endpoints survive each other)
-- ---------------------------------------------------------------------------
CREATE TABLE IF NOT EXISTS memberships (
    id INTEGER PRIMARY KEY NOT NULL,
    collection_id INTEGER NOT NULL REFERENCES collections(id) ON DELETE CASCADE,
    item_id INTEGER NOT NULL REFERENCES items(id) ON DELETE CASCADE,
    created_at TEXT NOT NULL, -- RFC3339
    UNIQUE(collection_id, item_id)
);

CREATE INDEX IF NOT EXISTS idx_memberships_item ON memberships(item_id);
"#;
