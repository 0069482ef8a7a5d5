//! Handler for `GET /types/pokemon-count`.

use axum::{Json, extract::State};
use pokedex_core::{query::TypeCount, source::PokemonSource, store::PokedexStore};

use crate::{ApiState, error::ApiError};

/// `GET /types/pokemon-count`: `[{"type_name": .., "total_pokemons": ..}]`
pub async fn pokemon_count<S, P>(
  State(state): State<ApiState<S, P>>,
) -> Result<Json<Vec<TypeCount>>, ApiError>
where
  S: PokedexStore,
  P: PokemonSource,
{
  let counts = state
    .store
    .pokemon_count_by_type()
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok(Json(counts))
}
