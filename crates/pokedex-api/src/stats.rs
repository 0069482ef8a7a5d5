//! Handler for `GET /stats/hp/average`.

use axum::{Json, extract::State};
use pokedex_core::{source::PokemonSource, store::PokedexStore};
use serde::Serialize;

use crate::{ApiState, error::ApiError};

#[derive(Debug, Serialize)]
pub struct HpAverage {
  /// `null` when no Pokémon with an `hp` stat is stored.
  pub average_hp: Option<f64>,
}

/// `GET /stats/hp/average`: a single-element array, `[{"average_hp": ..}]`.
pub async fn hp_average<S, P>(
  State(state): State<ApiState<S, P>>,
) -> Result<Json<Vec<HpAverage>>, ApiError>
where
  S: PokedexStore,
  P: PokemonSource,
{
  let average_hp = state
    .store
    .average_stat("hp")
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok(Json(vec![HpAverage { average_hp }]))
}
