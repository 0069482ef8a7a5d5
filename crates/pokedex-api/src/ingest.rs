//! Batch ingestion: fetch, normalize, persist, one identifier at a time.
//!
//! Every item yields its own `Result`; a failure at any stage is recorded for
//! that item and the loop moves on to the next one.

use pokedex_core::{plan::WrittenIds, source::PokemonSource, store::PokedexStore};
use serde::{Deserialize, Serialize};
use thiserror::Error;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Why a single identifier could not be ingested.
#[derive(Debug, Error)]
pub enum IngestError {
  #[error("fetch failed: {0}")]
  Fetch(#[source] BoxError),

  #[error("document has no usable pokemon id or name")]
  Incomplete,

  #[error("persist failed: {0}")]
  Persist(#[source] BoxError),
}

impl IngestError {
  pub fn kind(&self) -> &'static str {
    match self {
      Self::Fetch(_) => "fetch",
      Self::Incomplete => "incomplete",
      Self::Persist(_) => "persist",
    }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CollectStatus {
  Ingested,
  Error,
}

/// Wire outcome for one requested identifier, echoed as submitted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectOutcome {
  pub pokemon: String,
  pub status:  CollectStatus,
}

/// Fetch, normalize and persist a single Pokémon.
pub async fn ingest_one<S, P>(
  store: &S,
  source: &P,
  identifier: &str,
) -> Result<WrittenIds, IngestError>
where
  S: PokedexStore,
  P: PokemonSource,
{
  let key = identifier.trim().to_lowercase();
  let raw = source
    .fetch(&key)
    .await
    .map_err(|e| IngestError::Fetch(Box::new(e)))?;

  let rows = pokedex_normalize::normalize(&raw);
  if rows.pokemon.is_none() {
    return Err(IngestError::Incomplete);
  }

  store
    .ingest(rows)
    .await
    .map_err(|e| IngestError::Persist(Box::new(e)))
}

/// Ingest every identifier in order; the outcome list mirrors the input.
pub async fn ingest_batch<S, P>(
  store: &S,
  source: &P,
  identifiers: &[String],
) -> Vec<CollectOutcome>
where
  S: PokedexStore,
  P: PokemonSource,
{
  let mut outcomes = Vec::with_capacity(identifiers.len());

  for identifier in identifiers {
    let status = match ingest_one(store, source, identifier).await {
      Ok(ids) => {
        tracing::debug!(pokemon = %identifier, pokemon_id = ?ids.pokemon_id, "ingested");
        CollectStatus::Ingested
      }
      Err(e) => {
        tracing::warn!(pokemon = %identifier, kind = e.kind(), error = %e, "ingestion failed");
        CollectStatus::Error
      }
    };
    outcomes.push(CollectOutcome { pokemon: identifier.clone(), status });
  }

  outcomes
}
