//! One function per section of the source document.

use pokedex_core::rows::{
  CryRow, LookupRow, MoveDetailRow, PokemonAbilityRow, PokemonRow, PokemonStatRow,
  PokemonTypeRow, SpeciesRow, SpriteRow,
};
use serde_json::Value;

use crate::resource::{array, int, named, push_unique, string};

/// Scalar attributes only; every nested collection is left to its own section.
pub fn pokemon(doc: &Value) -> Option<PokemonRow> {
  Some(PokemonRow {
    id:                       int(doc, "id")?,
    name:                     string(doc, "name")?,
    base_experience:          int(doc, "base_experience"),
    height:                   int(doc, "height"),
    weight:                   int(doc, "weight"),
    order:                    int(doc, "order"),
    is_default:               doc.get("is_default").and_then(Value::as_bool),
    location_area_encounters: string(doc, "location_area_encounters"),
  })
}

pub fn species(doc: &Value) -> Option<SpeciesRow> {
  let res = named(doc.get("species")?)?;
  Some(SpeciesRow { id: res.id, name: res.name, url: res.url })
}

pub fn abilities(doc: &Value) -> (Vec<LookupRow>, Vec<PokemonAbilityRow>) {
  let mut lookups = Vec::new();
  let mut joins = Vec::new();

  for entry in array(doc, "abilities") {
    let Some(ability) = entry.get("ability").and_then(named) else {
      continue;
    };
    joins.push(PokemonAbilityRow {
      ability_id: ability.id,
      is_hidden:  entry
        .get("is_hidden")
        .and_then(Value::as_bool)
        .unwrap_or(false),
      slot:       int(entry, "slot"),
    });
    push_unique(&mut lookups, ability);
  }

  (lookups, joins)
}

pub fn cries(doc: &Value) -> Option<CryRow> {
  let cries = doc.get("cries").filter(|v| v.is_object())?;
  Some(CryRow {
    latest: string(cries, "latest"),
    legacy: string(cries, "legacy"),
  })
}

pub fn types(doc: &Value) -> (Vec<LookupRow>, Vec<PokemonTypeRow>) {
  let mut lookups = Vec::new();
  let mut joins = Vec::new();

  for entry in array(doc, "types") {
    let Some(ty) = entry.get("type").and_then(named) else {
      continue;
    };
    joins.push(PokemonTypeRow { type_id: ty.id, slot: int(entry, "slot") });
    push_unique(&mut lookups, ty);
  }

  (lookups, joins)
}

pub fn stats(doc: &Value) -> (Vec<LookupRow>, Vec<PokemonStatRow>) {
  let mut lookups = Vec::new();
  let mut joins = Vec::new();

  for entry in array(doc, "stats") {
    let Some(stat) = entry.get("stat").and_then(named) else {
      continue;
    };
    joins.push(PokemonStatRow {
      stat_id:   stat.id,
      base_stat: int(entry, "base_stat"),
      effort:    int(entry, "effort"),
    });
    push_unique(&mut lookups, stat);
  }

  (lookups, joins)
}

/// Forms are listed as bare named resources.
pub fn forms(doc: &Value) -> Vec<LookupRow> {
  let mut lookups = Vec::new();
  for form in array(doc, "forms").iter().filter_map(named) {
    push_unique(&mut lookups, form);
  }
  lookups
}

/// Moves plus the flattened `version_group_details` of each move.
pub fn moves(doc: &Value) -> (Vec<LookupRow>, Vec<MoveDetailRow>) {
  let mut lookups = Vec::new();
  let mut details = Vec::new();

  for entry in array(doc, "moves") {
    let Some(mv) = entry.get("move").and_then(named) else {
      continue;
    };

    for detail in array(entry, "version_group_details") {
      let learn_method = detail.get("move_learn_method").and_then(named);
      let version_group = detail.get("version_group").and_then(named);
      if let (Some(learn_method), Some(version_group)) = (learn_method, version_group) {
        details.push(MoveDetailRow {
          move_id: mv.id,
          learn_method,
          version_group,
          level_learned_at: int(detail, "level_learned_at"),
        });
      }
    }

    push_unique(&mut lookups, mv);
  }

  (lookups, details)
}

pub fn sprites(doc: &Value) -> Option<SpriteRow> {
  let sprites = doc.get("sprites").filter(|v| v.is_object())?;
  Some(SpriteRow {
    front_default: string(sprites, "front_default"),
    back_default:  string(sprites, "back_default"),
    front_shiny:   string(sprites, "front_shiny"),
    back_shiny:    string(sprites, "back_shiny"),
  })
}
