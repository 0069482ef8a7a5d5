//! The `PokemonSource` trait: where raw Pokémon documents come from.
//!
//! The production implementation talks to PokeAPI over HTTP; tests use a
//! fixture-backed source.

use std::future::Future;

/// A remote catalogue that serves one raw JSON document per Pokémon.
pub trait PokemonSource: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Fetch the raw document for a Pokémon name or numeric id.
  ///
  /// Fails when the resource cannot be retrieved or the remote answers with a
  /// non-success status.
  fn fetch<'a>(
    &'a self,
    identifier: &'a str,
  ) -> impl Future<Output = Result<serde_json::Value, Self::Error>> + Send + 'a;
}
