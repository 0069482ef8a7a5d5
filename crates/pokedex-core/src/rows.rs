//! Row types: the flat, typed records the normalizer produces and the store
//! persists.
//!
//! One struct per entity. Identifiers pulled from PokeAPI resource URLs are
//! `Option<i64>` because a URL without a trailing numeric segment yields no id;
//! writers skip rows (and the join rows depending on them) whose id is `None`.

use serde::{Deserialize, Serialize};

// ─── Pokémon ─────────────────────────────────────────────────────────────────

/// Scalar attributes of a single Pokémon. `id` is PokeAPI's own identifier,
/// never store-assigned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PokemonRow {
  pub id:                       i64,
  pub name:                     String,
  pub base_experience:          Option<i64>,
  pub height:                   Option<i64>,
  pub weight:                   Option<i64>,
  pub order:                    Option<i64>,
  pub is_default:               Option<bool>,
  pub location_area_encounters: Option<String>,
}

/// The species a Pokémon belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpeciesRow {
  pub id:   Option<i64>,
  pub name: String,
  pub url:  Option<String>,
}

// ─── Lookup entities ─────────────────────────────────────────────────────────

/// The shared reference tables a Pokémon points at through join rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LookupKind {
  Ability,
  Type,
  Stat,
  Form,
  Move,
  MoveLearnMethod,
  VersionGroup,
}

impl LookupKind {
  /// The table this kind is persisted to.
  pub fn table(self) -> &'static str {
    match self {
      Self::Ability => "ability",
      Self::Type => "type",
      Self::Stat => "stat",
      Self::Form => "form",
      Self::Move => "move",
      Self::MoveLearnMethod => "move_learn_method",
      Self::VersionGroup => "version_group",
    }
  }
}

/// A named PokeAPI resource (`{"name": .., "url": ..}`) flattened into a row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LookupRow {
  pub id:   Option<i64>,
  pub name: String,
  pub url:  Option<String>,
}

// ─── Join rows ───────────────────────────────────────────────────────────────

/// One entry of the source `abilities` array.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PokemonAbilityRow {
  pub ability_id: Option<i64>,
  pub is_hidden:  bool,
  pub slot:       Option<i64>,
}

/// One entry of the source `types` array.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PokemonTypeRow {
  pub type_id: Option<i64>,
  pub slot:    Option<i64>,
}

/// One entry of the source `stats` array.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PokemonStatRow {
  pub stat_id:   Option<i64>,
  pub base_stat: Option<i64>,
  pub effort:    Option<i64>,
}

/// How and when a Pokémon learns a move in one version group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveDetailRow {
  pub move_id:          Option<i64>,
  pub learn_method:     LookupRow,
  pub version_group:    LookupRow,
  pub level_learned_at: Option<i64>,
}

// ─── Media ───────────────────────────────────────────────────────────────────

/// Cry sound URLs. Cries have no natural key; the store assigns one.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CryRow {
  pub latest: Option<String>,
  pub legacy: Option<String>,
}

impl CryRow {
  pub fn is_empty(&self) -> bool { self.latest.is_none() && self.legacy.is_none() }
}

/// The default and shiny front/back sprite URLs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpriteRow {
  pub front_default: Option<String>,
  pub back_default:  Option<String>,
  pub front_shiny:   Option<String>,
  pub back_shiny:    Option<String>,
}

// ─── NormalizedPokemon ───────────────────────────────────────────────────────

/// Every row-set decomposed from one raw PokeAPI document.
///
/// Lookup row-sets (`abilities`, `types`, ...) hold each referenced resource
/// once; the join row-sets hold one entry per occurrence in the source.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizedPokemon {
  /// `None` when the source has no numeric `id` or no `name`.
  pub pokemon:           Option<PokemonRow>,
  pub species:           Option<SpeciesRow>,
  pub abilities:         Vec<LookupRow>,
  pub pokemon_abilities: Vec<PokemonAbilityRow>,
  pub cries:             Option<CryRow>,
  pub types:             Vec<LookupRow>,
  pub pokemon_types:     Vec<PokemonTypeRow>,
  pub stats:             Vec<LookupRow>,
  pub pokemon_stats:     Vec<PokemonStatRow>,
  pub forms:             Vec<LookupRow>,
  pub moves:             Vec<LookupRow>,
  pub move_details:      Vec<MoveDetailRow>,
  pub sprites:           Option<SpriteRow>,
}
