//! The `PokedexStore` trait.
//!
//! Implemented by storage backends (e.g. `pokedex-store-sqlite`). The API and
//! server crates depend on this abstraction, not on a concrete backend.

use std::future::Future;

use uuid::Uuid;

use crate::{
  plan::WrittenIds,
  query::{Pokemon, PokemonWithSpecies, TopOrder, TypeCount},
  rows::NormalizedPokemon,
  user::User,
};

/// Abstraction over a Pokédex store backend.
///
/// Writes are upserts: ingesting the same Pokémon twice overwrites scalar
/// attributes and never duplicates lookup or join rows. Nothing is deleted.
///
/// All methods return `Send` futures so the trait can be used from axum
/// handlers on a multi-threaded runtime.
pub trait PokedexStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Ingestion ─────────────────────────────────────────────────────────

  /// Persist every row-set of one normalized Pokémon following
  /// [`crate::plan::WRITE_PLAN`], inside a single storage scope.
  ///
  /// Returns the identifiers written. Fails with the backend's equivalent of
  /// [`crate::Error::MissingPokemon`] when `data.pokemon` is `None`.
  fn ingest(
    &self,
    data: NormalizedPokemon,
  ) -> impl Future<Output = Result<WrittenIds, Self::Error>> + Send + '_;

  // ── Queries ───────────────────────────────────────────────────────────

  /// Pokémon having a type whose name equals `type_name` exactly.
  fn pokemon_by_type<'a>(
    &'a self,
    type_name: &'a str,
  ) -> impl Future<Output = Result<Vec<Pokemon>, Self::Error>> + Send + 'a;

  /// At most `limit` Pokémon in the requested order.
  fn top_pokemon(
    &self,
    limit: u32,
    order: TopOrder,
  ) -> impl Future<Output = Result<Vec<Pokemon>, Self::Error>> + Send + '_;

  /// Every Pokémon that has a stored species, with the species name.
  fn pokemon_with_species(
    &self,
  ) -> impl Future<Output = Result<Vec<PokemonWithSpecies>, Self::Error>> + Send + '_;

  /// Number of Pokémon per type name.
  fn pokemon_count_by_type(
    &self,
  ) -> impl Future<Output = Result<Vec<TypeCount>, Self::Error>> + Send + '_;

  /// Mean `base_stat` of the named stat across stored Pokémon; `None` when
  /// no Pokémon has that stat.
  fn average_stat<'a>(
    &'a self,
    stat_name: &'a str,
  ) -> impl Future<Output = Result<Option<f64>, Self::Error>> + Send + 'a;

  // ── Users ─────────────────────────────────────────────────────────────

  /// Create a user. Returns `None`, leaving the existing row untouched, when
  /// the username is already taken.
  fn create_user(
    &self,
    username: String,
    password_hash: String,
  ) -> impl Future<Output = Result<Option<User>, Self::Error>> + Send + '_;

  /// Look a user up by username.
  fn find_user<'a>(
    &'a self,
    username: &'a str,
  ) -> impl Future<Output = Result<Option<User>, Self::Error>> + Send + 'a;

  /// Look a user up by id.
  fn get_user(
    &self,
    user_id: Uuid,
  ) -> impl Future<Output = Result<Option<User>, Self::Error>> + Send + '_;
}
