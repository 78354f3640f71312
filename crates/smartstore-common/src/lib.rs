//! SmartStore Common
//!
//! Shared error types and small utilities used by the SmartStore catalog and
//! recommendation crates.

pub mod error;

pub use error::{Result, SmartStoreError};
