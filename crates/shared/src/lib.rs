//! searchgate shared types and errors
//!
//! Search domain types used by the API server and by anything that talks to
//! the search backend.

pub mod error;
pub mod types;

pub use error::*;
pub use types::*;
