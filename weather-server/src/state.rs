use crate::{password::Hasher, store::Store};
use axum::extract::FromRef;

/// Shared state needed by requests.
#[derive(Clone, FromRef)]
pub struct State {
    /// Where accounts live.
    store: Store,

    /// How passwords get hashed and checked.
    hasher: Hasher,
}

impl State {
    /// Create a new state.
    pub fn new(store: Store, hasher: Hasher) -> Self {
        Self { store, hasher }
    }
}
