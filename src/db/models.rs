use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, FromRow)]
pub struct DbOwner {
    pub id: i64,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

/// Collection row joined with its owner's name.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, FromRow)]
pub struct DbCollection {
    pub id: i64,
    pub name: String,
    pub owner_id: Option<i64>,
    pub owner_name: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, FromRow)]
pub struct DbItem {
    pub id: i64,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

/// One item <-> collection edge with both endpoint names resolved.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, FromRow)]
pub struct DbMembership {
    pub collection_id: i64,
    pub collection_name: String,
    pub item_id: i64,
    pub item_name: String,
}
