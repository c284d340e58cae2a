pub mod cocktaildb;

pub use cocktaildb::{DrinkName, DrinksEnvelope};
