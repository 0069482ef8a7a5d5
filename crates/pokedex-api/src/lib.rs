//! JSON REST API for the Pokédex.
//!
//! Exposes an axum [`Router`] backed by any [`PokedexStore`] plus a
//! [`PokemonSource`] to ingest from. Auth, TLS, and transport concerns are the
//! caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .merge(pokedex_api::api_router(store.clone(), source.clone()))
//! ```

pub mod error;
pub mod ingest;
pub mod pokemon;
pub mod stats;
pub mod types;

use std::sync::Arc;

use axum::{
  Router,
  routing::{get, post},
};
use pokedex_core::{source::PokemonSource, store::PokedexStore};

pub use error::ApiError;

/// Shared handler state: the store plus the remote source ingestion reads from.
pub struct ApiState<S, P> {
  pub store:  Arc<S>,
  pub source: Arc<P>,
}

// Manual impl; deriving would require `S: Clone + P: Clone`.
impl<S, P> Clone for ApiState<S, P> {
  fn clone(&self) -> Self {
    Self {
      store:  Arc::clone(&self.store),
      source: Arc::clone(&self.source),
    }
  }
}

/// Build a fully-materialised API router for `store` and `source`.
///
/// The returned `Router<()>` can be merged into any parent router regardless
/// of its own state type.
pub fn api_router<S, P>(store: Arc<S>, source: Arc<P>) -> Router<()>
where
  S: PokedexStore + 'static,
  P: PokemonSource + 'static,
{
  Router::new()
    // Ingestion
    .route("/pokemon/collect", post(pokemon::collect::<S, P>))
    .route("/pokemon/pokemon", post(pokemon::collect::<S, P>))
    // Queries
    .route("/pokemon", get(pokemon::by_type::<S, P>))
    .route("/pokemon/top", get(pokemon::top::<S, P>))
    .route("/pokemon/with-species", get(pokemon::with_species::<S, P>))
    .route("/types/pokemon-count", get(types::pokemon_count::<S, P>))
    .route("/stats/hp/average", get(stats::hp_average::<S, P>))
    .with_state(ApiState { store, source })
}
