//! Read models returned by the query side of [`crate::store::PokedexStore`].

use serde::{Deserialize, Serialize};
use strum::EnumString;

/// A stored Pokémon as returned by queries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pokemon {
  pub id:                       i64,
  pub name:                     String,
  pub base_experience:          Option<i64>,
  pub height:                   Option<i64>,
  pub weight:                   Option<i64>,
  pub order:                    Option<i64>,
  pub is_default:               Option<bool>,
  pub location_area_encounters: Option<String>,
  pub species_id:               Option<i64>,
}

/// A Pokémon joined with the name of its species.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PokemonWithSpecies {
  #[serde(flatten)]
  pub pokemon:      Pokemon,
  pub species_name: String,
}

/// Number of stored Pokémon carrying a given type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeCount {
  pub type_name:      String,
  pub total_pokemons: i64,
}

/// Ordering for the top-N query, parsed from the `order_by` parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, EnumString)]
#[strum(serialize_all = "snake_case")]
pub enum TopOrder {
  #[default]
  BaseExperienceDesc,
  BaseExperienceAsc,
  /// Plain limited scan; chosen when the requested key is not recognised.
  #[strum(disabled)]
  Unordered,
}

impl TopOrder {
  /// Resolve an optional `order_by` value: absent means the default
  /// (descending experience), unrecognised means unordered.
  pub fn from_param(param: Option<&str>) -> Self {
    match param {
      None => Self::default(),
      Some(s) => s.parse().unwrap_or(Self::Unordered),
    }
  }
}

/// Default `limit` for the top-N query.
pub const DEFAULT_TOP_LIMIT: u32 = 10;

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn order_param_defaults_to_descending_experience() {
    assert_eq!(TopOrder::from_param(None), TopOrder::BaseExperienceDesc);
  }

  #[test]
  fn order_param_parses_known_keys() {
    assert_eq!(
      TopOrder::from_param(Some("base_experience_asc")),
      TopOrder::BaseExperienceAsc
    );
    assert_eq!(
      TopOrder::from_param(Some("base_experience_desc")),
      TopOrder::BaseExperienceDesc
    );
  }

  #[test]
  fn unknown_order_param_falls_back_to_unordered() {
    assert_eq!(TopOrder::from_param(Some("weight_desc")), TopOrder::Unordered);
    assert_eq!(TopOrder::from_param(Some("unordered")), TopOrder::Unordered);
  }
}
