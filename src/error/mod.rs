mod mixology;

pub use mixology::{ErrorClass, MixologyError};

pub trait IsRetryable {
    fn is_retryable(&self) -> bool;
}
