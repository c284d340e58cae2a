//! Storage layer: one serialized actor over a SQLite pool.
//!
//! Layout:
//! - `actor.rs`: `StoreActor` and its cloneable `StoreHandle`
//! - `models.rs`: Rust structs mirroring DB rows
//! - `queries.rs`: parameterized fetch/insert/delete helpers, run inside actor transactions
//! - `schema.rs`: SQL DDL for initializing the database (SQLite-first)

pub mod actor;
pub mod models;
pub mod schema;

mod queries;

pub use actor::{OwnerFilter, StoreHandle, spawn};
pub use models::{DbCollection, DbItem, DbMembership, DbOwner};
pub use schema::SQLITE_INIT;
