//! PokeAPI document normalizer for the Pokédex backend.
//!
//! Decomposes one nested `/pokemon/{id}` document into the flat typed
//! row-sets of [`pokedex_core::rows`]. Pure synchronous; no HTTP or database
//! dependencies, and no failure mode: a missing or malformed section simply
//! yields an empty row-set.
//!
//! # Quick start
//!
//! ```no_run
//! use pokedex_normalize::normalize;
//!
//! let doc = serde_json::json!({ "id": 25, "name": "pikachu" });
//! let rows = normalize(&doc);
//! println!("pokemon={:?}, {} abilities", rows.pokemon, rows.abilities.len());
//! ```

mod resource;
mod sections;

pub use resource::extract_id;
use pokedex_core::rows::NormalizedPokemon;

/// Normalize one raw Pokémon document.
pub fn normalize(doc: &serde_json::Value) -> NormalizedPokemon {
  let (abilities, pokemon_abilities) = sections::abilities(doc);
  let (types, pokemon_types) = sections::types(doc);
  let (stats, pokemon_stats) = sections::stats(doc);
  let (moves, move_details) = sections::moves(doc);

  NormalizedPokemon {
    pokemon: sections::pokemon(doc),
    species: sections::species(doc),
    abilities,
    pokemon_abilities,
    cries: sections::cries(doc),
    types,
    pokemon_types,
    stats,
    pokemon_stats,
    forms: sections::forms(doc),
    moves,
    move_details,
    sprites: sections::sprites(doc),
  }
}
