//! Remote name lookup with a locally cached catalog for near-miss matching.

mod api;
mod client;

pub use api::CocktailDbApi;
pub use client::SearchClient;
