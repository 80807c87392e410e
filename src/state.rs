//! Shared application state.
//!
//! DESIGN
//! ======
//! `AppState` is injected into Axum handlers via the `State` extractor.
//! It holds the database pool and the provider router. Both are built once
//! at startup; the router is immutable afterwards, so handlers share it
//! through an `Arc` without locking.

use std::sync::Arc;

use sqlx::PgPool;

use crate::llm::ProviderRouter;

/// Shared application state, injected into Axum handlers via State extractor.
#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub router: Arc<ProviderRouter>,
}

impl AppState {
    #[must_use]
    pub fn new(pool: PgPool, router: ProviderRouter) -> Self {
        Self { pool, router: Arc::new(router) }
    }
}
