//! services/api/src/web/state.rs
//!
//! Defines the application state shared by every handler.

use crate::config::Config;
use crate::credentials::TokenIssuer;
use chrono::Duration;
use mentorsphere_core::{Repositories, TieredStore};
use std::sync::Arc;

//=========================================================================================
// AppState (Shared Across All Requests)
//=========================================================================================

/// The shared application state, created once at startup and passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    pub repos: Repositories,
    pub tokens: TokenIssuer,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(config: Arc<Config>, store: Arc<TieredStore>) -> Self {
        Self {
            repos: Repositories::new(store),
            tokens: TokenIssuer::new(&config.jwt_secret, Duration::hours(config.token_ttl_hours)),
            config,
        }
    }
}
