//! searchgate API library
//!
//! Token issuance, request authorization, and the search proxy that sits
//! behind them.

pub mod auth;
pub mod config;
pub mod error;
pub mod routes;
pub mod search;
pub mod state;

pub use config::Config;
pub use error::{ApiError, ApiResult};
pub use state::AppState;
