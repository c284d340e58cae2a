//! Parameterized queries over the store tables.
//!
//! Every helper takes a bare connection so the actor can run it either on a
//! pooled connection (reads) or inside an open transaction (writes).

use chrono::Utc;
use sqlx::SqliteConnection;

use super::models::{DbCollection, DbItem, DbMembership, DbOwner};

const COLLECTION_COLUMNS: &str = r#"
    SELECT c.id, c.name, c.owner_id, o.name AS owner_name, c.created_at
    FROM collections c
    LEFT JOIN owners o ON o.id = c.owner_id
"#;

// ---------------------------------------------------------------------------
// Owners
// ---------------------------------------------------------------------------

pub(super) async fn fetch_owners(conn: &mut SqliteConnection) -> Result<Vec<DbOwner>, sqlx::Error> {
    sqlx::query_as::<_, DbOwner>(
        r#"
        SELECT id, name, created_at
        FROM owners
        ORDER BY name, id
        "#,
    )
    .fetch_all(conn)
    .await
}

pub(super) async fn find_owners_by_name(
    conn: &mut SqliteConnection,
    name: &str,
) -> Result<Vec<DbOwner>, sqlx::Error> {
    sqlx::query_as::<_, DbOwner>(
        r#"
        SELECT id, name, created_at
        FROM owners
        WHERE name = ?
        ORDER BY id
        "#,
    )
    .bind(name)
    .fetch_all(conn)
    .await
}

pub(super) async fn insert_owner(conn: &mut SqliteConnection, name: &str) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar(
        r#"
        INSERT INTO owners (name, created_at)
        VALUES (?, ?)
        RETURNING id
        "#,
    )
    .bind(name)
    .bind(Utc::now())
    .fetch_one(conn)
    .await
}

/// Deletes owners named `name`, their collections and those collections' edges.
/// Returns the number of owners removed.
pub(super) async fn delete_owners_named(
    conn: &mut SqliteConnection,
    name: &str,
) -> Result<u64, sqlx::Error> {
    sqlx::query(
        r#"
        DELETE FROM memberships
        WHERE collection_id IN (
            SELECT c.id FROM collections c
            JOIN owners o ON o.id = c.owner_id
            WHERE o.name = ?
        )
        "#,
    )
    .bind(name)
    .execute(&mut *conn)
    .await?;

    sqlx::query(
        r#"
        DELETE FROM collections
        WHERE owner_id IN (SELECT id FROM owners WHERE name = ?)
        "#,
    )
    .bind(name)
    .execute(&mut *conn)
    .await?;

    let res = sqlx::query("DELETE FROM owners WHERE name = ?")
        .bind(name)
        .execute(&mut *conn)
        .await?;
    Ok(res.rows_affected())
}

// ---------------------------------------------------------------------------
// Collections
// ---------------------------------------------------------------------------

pub(super) async fn find_all_collections(
    conn: &mut SqliteConnection,
) -> Result<Vec<DbCollection>, sqlx::Error> {
    sqlx::query_as::<_, DbCollection>(&format!("{COLLECTION_COLUMNS} ORDER BY c.name, c.id"))
        .fetch_all(conn)
        .await
}

pub(super) async fn find_owned_collections(
    conn: &mut SqliteConnection,
) -> Result<Vec<DbCollection>, sqlx::Error> {
    sqlx::query_as::<_, DbCollection>(&format!(
        "{COLLECTION_COLUMNS} WHERE c.owner_id IS NOT NULL ORDER BY c.name, c.id"
    ))
    .fetch_all(conn)
    .await
}

pub(super) async fn find_collections_by_owner(
    conn: &mut SqliteConnection,
    owner_name: &str,
) -> Result<Vec<DbCollection>, sqlx::Error> {
    sqlx::query_as::<_, DbCollection>(&format!(
        "{COLLECTION_COLUMNS} WHERE o.name = ? ORDER BY c.name, c.id"
    ))
    .bind(owner_name)
    .fetch_all(conn)
    .await
}

pub(super) async fn find_unowned_collections(
    conn: &mut SqliteConnection,
) -> Result<Vec<DbCollection>, sqlx::Error> {
    sqlx::query_as::<_, DbCollection>(&format!(
        "{COLLECTION_COLUMNS} WHERE c.owner_id IS NULL ORDER BY c.name, c.id"
    ))
    .fetch_all(conn)
    .await
}

/// Earliest-created first.
pub(super) async fn find_collections_by_name(
    conn: &mut SqliteConnection,
    name: &str,
) -> Result<Vec<DbCollection>, sqlx::Error> {
    sqlx::query_as::<_, DbCollection>(&format!(
        "{COLLECTION_COLUMNS} WHERE c.name = ? ORDER BY c.id"
    ))
    .bind(name)
    .fetch_all(conn)
    .await
}

pub(super) async fn insert_collection(
    conn: &mut SqliteConnection,
    name: &str,
    owner_id: Option<i64>,
) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar(
        r#"
        INSERT INTO collections (name, owner_id, created_at)
        VALUES (?, ?, ?)
        RETURNING id
        "#,
    )
    .bind(name)
    .bind(owner_id)
    .bind(Utc::now())
    .fetch_one(conn)
    .await
}

/// Deletes collections named `name` and their edges; member items are kept.
pub(super) async fn delete_collections_named(
    conn: &mut SqliteConnection,
    name: &str,
) -> Result<u64, sqlx::Error> {
    sqlx::query(
        r#"
        DELETE FROM memberships
        WHERE collection_id IN (SELECT id FROM collections WHERE name = ?)
        "#,
    )
    .bind(name)
    .execute(&mut *conn)
    .await?;

    let res = sqlx::query("DELETE FROM collections WHERE name = ?")
        .bind(name)
        .execute(&mut *conn)
        .await?;
    Ok(res.rows_affected())
}

// ---------------------------------------------------------------------------
// Items
// ---------------------------------------------------------------------------

pub(super) async fn fetch_items(conn: &mut SqliteConnection) -> Result<Vec<DbItem>, sqlx::Error> {
    sqlx::query_as::<_, DbItem>(
        r#"
        SELECT id, name, created_at
        FROM items
        ORDER BY name, id
        "#,
    )
    .fetch_all(conn)
    .await
}

/// Earliest-created first.
pub(super) async fn find_items_by_name(
    conn: &mut SqliteConnection,
    name: &str,
) -> Result<Vec<DbItem>, sqlx::Error> {
    sqlx::query_as::<_, DbItem>(
        r#"
        SELECT id, name, created_at
        FROM items
        WHERE name = ?
        ORDER BY id
        "#,
    )
    .bind(name)
    .fetch_all(conn)
    .await
}

pub(super) async fn insert_item(conn: &mut SqliteConnection, name: &str) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar(
        r#"
        INSERT INTO items (name, created_at)
        VALUES (?, ?)
        RETURNING id
        "#,
    )
    .bind(name)
    .bind(Utc::now())
    .fetch_one(conn)
    .await
}

/// Deletes every item named `name` together with its edges.
pub(super) async fn delete_items_named(
    conn: &mut SqliteConnection,
    name: &str,
) -> Result<u64, sqlx::Error> {
    sqlx::query(
        r#"
        DELETE FROM memberships
        WHERE item_id IN (SELECT id FROM items WHERE name = ?)
        "#,
    )
    .bind(name)
    .execute(&mut *conn)
    .await?;

    let res = sqlx::query("DELETE FROM items WHERE name = ?")
        .bind(name)
        .execute(&mut *conn)
        .await?;
    Ok(res.rows_affected())
}

// ---------------------------------------------------------------------------
// Memberships
// ---------------------------------------------------------------------------

/// All edges in creation order.
pub(super) async fn fetch_memberships(
    conn: &mut SqliteConnection,
) -> Result<Vec<DbMembership>, sqlx::Error> {
    sqlx::query_as::<_, DbMembership>(
        r#"
        SELECT m.collection_id, c.name AS collection_name, m.item_id, i.name AS item_name
        FROM memberships m
        JOIN collections c ON c.id = m.collection_id
        JOIN items i ON i.id = m.item_id
        ORDER BY m.id
        "#,
    )
    .fetch_all(conn)
    .await
}

/// Whether the collection already holds an item with this name.
pub(super) async fn has_member_named(
    conn: &mut SqliteConnection,
    collection_id: i64,
    item_name: &str,
) -> Result<bool, sqlx::Error> {
    sqlx::query_scalar(
        r#"
        SELECT EXISTS(
            SELECT 1 FROM memberships m
            JOIN items i ON i.id = m.item_id
            WHERE m.collection_id = ? AND i.name = ?
        )
        "#,
    )
    .bind(collection_id)
    .bind(item_name)
    .fetch_one(conn)
    .await
}

pub(super) async fn insert_membership(
    conn: &mut SqliteConnection,
    collection_id: i64,
    item_id: i64,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO memberships (collection_id, item_id, created_at)
        VALUES (?, ?, ?)
        ON CONFLICT(collection_id, item_id) DO NOTHING
        "#,
    )
    .bind(collection_id)
    .bind(item_id)
    .bind(Utc::now())
    .execute(conn)
    .await?;
    Ok(())
}

/// Removes every edge between the collection and items named `item_name`.
pub(super) async fn delete_members_named(
    conn: &mut SqliteConnection,
    collection_id: i64,
    item_name: &str,
) -> Result<u64, sqlx::Error> {
    let res = sqlx::query(
        r#"
        DELETE FROM memberships
        WHERE collection_id = ?
          AND item_id IN (SELECT id FROM items WHERE name = ?)
        "#,
    )
    .bind(collection_id)
    .bind(item_name)
    .execute(conn)
    .await?;
    Ok(res.rows_affected())
}
