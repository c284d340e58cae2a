pub mod config;
pub mod db;
pub mod error;
pub mod matcher;
pub mod search;
pub mod service;
pub mod snapshot;

mod utils;

pub use db::{OwnerFilter, StoreHandle};
pub use error::{ErrorClass, IsRetryable, MixologyError};
pub use search::SearchClient;
pub use service::{Mixology, Overview};
pub use snapshot::{CollectionSnapshot, ItemSnapshot, OwnerSnapshot};
