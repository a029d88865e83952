//! Cache inspection tools.

pub mod get;

pub use get::{CacheGetParams, get_impl};
