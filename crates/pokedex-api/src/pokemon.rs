//! Handlers for `/pokemon` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `POST` | `/pokemon/collect`, `/pokemon/pokemon` | Body: `{"pokemon":["pikachu", "25"]}` |
//! | `GET`  | `/pokemon` | Required `?type=<name>`, 400 without it |
//! | `GET`  | `/pokemon/top` | Optional `?limit=<n>&order_by=base_experience_desc\|base_experience_asc` |
//! | `GET`  | `/pokemon/with-species` | |

use axum::{
  Json,
  extract::{Query, State, rejection::JsonRejection},
};
use pokedex_core::{
  query::{DEFAULT_TOP_LIMIT, Pokemon, PokemonWithSpecies, TopOrder},
  source::PokemonSource,
  store::PokedexStore,
};
use serde::Deserialize;

use crate::{
  ApiState,
  error::ApiError,
  ingest::{CollectOutcome, ingest_batch},
};

// ─── Collect ─────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct CollectBody {
  pub pokemon: Vec<String>,
}

/// `POST /pokemon/collect`: always answers 200 with one outcome per identifier.
pub async fn collect<S, P>(
  State(state): State<ApiState<S, P>>,
  body: Result<Json<CollectBody>, JsonRejection>,
) -> Result<Json<Vec<CollectOutcome>>, ApiError>
where
  S: PokedexStore,
  P: PokemonSource,
{
  let Json(body) = body.map_err(|e| ApiError::BadRequest(e.body_text()))?;
  let outcomes = ingest_batch(&*state.store, &*state.source, &body.pokemon).await;
  Ok(Json(outcomes))
}

// ─── By type ─────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct TypeParams {
  #[serde(rename = "type")]
  pub type_name: Option<String>,
}

/// `GET /pokemon?type=<name>`
pub async fn by_type<S, P>(
  State(state): State<ApiState<S, P>>,
  Query(params): Query<TypeParams>,
) -> Result<Json<Vec<Pokemon>>, ApiError>
where
  S: PokedexStore,
  P: PokemonSource,
{
  let type_name = params
    .type_name
    .ok_or_else(|| ApiError::BadRequest("missing 'type' query parameter".into()))?;
  let pokemon = state
    .store
    .pokemon_by_type(&type_name)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok(Json(pokemon))
}

// ─── Top ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize, Default)]
pub struct TopParams {
  pub limit:    Option<u32>,
  pub order_by: Option<String>,
}

/// `GET /pokemon/top[?limit=<n>][&order_by=<key>]`
pub async fn top<S, P>(
  State(state): State<ApiState<S, P>>,
  Query(params): Query<TopParams>,
) -> Result<Json<Vec<Pokemon>>, ApiError>
where
  S: PokedexStore,
  P: PokemonSource,
{
  let limit = params.limit.unwrap_or(DEFAULT_TOP_LIMIT);
  let order = TopOrder::from_param(params.order_by.as_deref());
  let pokemon = state
    .store
    .top_pokemon(limit, order)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok(Json(pokemon))
}

// ─── With species ────────────────────────────────────────────────────────────

/// `GET /pokemon/with-species`
pub async fn with_species<S, P>(
  State(state): State<ApiState<S, P>>,
) -> Result<Json<Vec<PokemonWithSpecies>>, ApiError>
where
  S: PokedexStore,
  P: PokemonSource,
{
  let pokemon = state
    .store
    .pokemon_with_species()
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok(Json(pokemon))
}
