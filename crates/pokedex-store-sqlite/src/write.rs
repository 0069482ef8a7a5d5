//! Executes [`WRITE_PLAN`] for one normalized Pokémon.
//!
//! Every writer is an upsert keyed on the entity's natural identifier, so
//! re-ingesting the same document leaves the row count unchanged. Rows whose
//! identifier could not be extracted are skipped along with the join rows
//! that would reference them.

use pokedex_core::{
  plan::{PokemonKey, WRITE_PLAN, WriteContext, WriteStep, WrittenIds},
  rows::{
    CryRow, LookupKind, LookupRow, MoveDetailRow, NormalizedPokemon, PokemonAbilityRow,
    PokemonRow, PokemonStatRow, PokemonTypeRow, SpeciesRow, SpriteRow,
  },
};
use rusqlite::{Connection, params};

use crate::encode::cry_content_hash;

/// Walk the plan against `conn`. The caller owns the surrounding transaction.
pub fn write_plan(
  conn: &Connection,
  data: &NormalizedPokemon,
  pokemon: &PokemonRow,
) -> tokio_rusqlite::Result<WrittenIds> {
  let mut ctx = WriteContext::new();

  for step in WRITE_PLAN {
    ctx.begin(step).map_err(plan_error)?;
    tracing::trace!(?step, pokemon_id = pokemon.id, "write step");

    match step {
      WriteStep::Species => {
        let id = match &data.species {
          Some(species) => upsert_species(conn, species)?,
          None => None,
        };
        ctx.record_species(id);
      }
      WriteStep::Pokemon => {
        upsert_pokemon(conn, pokemon, ctx.species_id())?;
        ctx.record_pokemon(pokemon);
      }
      WriteStep::Abilities => {
        let key = ctx.pokemon_key().map_err(plan_error)?;
        let ids = upsert_lookups(conn, LookupKind::Ability, &data.abilities)?;
        for row in &data.pokemon_abilities {
          upsert_pokemon_ability(conn, key, row, &ids)?;
        }
        ctx.ids_mut().ability_ids = ids;
      }
      WriteStep::Cries => {
        let key = ctx.pokemon_key().map_err(plan_error)?;
        if let Some(cry) = data.cries.as_ref().filter(|c| !c.is_empty()) {
          let id = upsert_cry(conn, key, cry)?;
          ctx.ids_mut().cry_ids.push(id);
        }
      }
      WriteStep::Types => {
        let key = ctx.pokemon_key().map_err(plan_error)?;
        let ids = upsert_lookups(conn, LookupKind::Type, &data.types)?;
        for row in &data.pokemon_types {
          upsert_pokemon_type(conn, key, row, &ids)?;
        }
        ctx.ids_mut().type_ids = ids;
      }
      WriteStep::Stats => {
        let key = ctx.pokemon_key().map_err(plan_error)?;
        let ids = upsert_lookups(conn, LookupKind::Stat, &data.stats)?;
        for row in &data.pokemon_stats {
          upsert_pokemon_stat(conn, key, row, &ids)?;
        }
        ctx.ids_mut().stat_ids = ids;
      }
      WriteStep::Forms => {
        let key = ctx.pokemon_key().map_err(plan_error)?;
        let ids = upsert_lookups(conn, LookupKind::Form, &data.forms)?;
        for &form_id in &ids {
          link(conn, "pokemon_form", "form_id", key, form_id)?;
        }
        ctx.ids_mut().form_ids = ids;
      }
      WriteStep::Moves => {
        let key = ctx.pokemon_key().map_err(plan_error)?;
        let ids = upsert_lookups(conn, LookupKind::Move, &data.moves)?;
        for &move_id in &ids {
          link(conn, "pokemon_move", "move_id", key, move_id)?;
        }
        ctx.ids_mut().move_ids = ids;
      }
      WriteStep::MoveDetails => {
        let key = ctx.pokemon_key().map_err(plan_error)?;
        let move_ids = ctx.ids_mut().move_ids.clone();
        for detail in &data.move_details {
          upsert_move_detail(conn, key, detail, &move_ids)?;
        }
      }
      WriteStep::Sprite => {
        let key = ctx.pokemon_key().map_err(plan_error)?;
        if let Some(sprite) = &data.sprites {
          upsert_sprite(conn, key, sprite)?;
        }
      }
    }

    ctx.finish(step);
  }

  Ok(ctx.into_ids())
}

fn plan_error(e: pokedex_core::Error) -> tokio_rusqlite::Error {
  tokio_rusqlite::Error::Other(Box::new(e))
}

// ─── Entities ────────────────────────────────────────────────────────────────

fn upsert_species(conn: &Connection, row: &SpeciesRow) -> rusqlite::Result<Option<i64>> {
  let Some(id) = row.id else {
    return Ok(None);
  };
  conn.execute(
    "INSERT INTO species (id, name, url) VALUES (?1, ?2, ?3)
     ON CONFLICT(id) DO UPDATE SET name = excluded.name, url = excluded.url",
    params![id, row.name, row.url],
  )?;
  Ok(Some(id))
}

fn upsert_pokemon(
  conn: &Connection,
  row: &PokemonRow,
  species_id: Option<i64>,
) -> rusqlite::Result<()> {
  conn.execute(
    "INSERT INTO pokemon
       (id, name, base_experience, height, weight, sort_order, is_default,
        location_area_encounters, species_id)
     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
     ON CONFLICT(id) DO UPDATE SET
       name                     = excluded.name,
       base_experience          = excluded.base_experience,
       height                   = excluded.height,
       weight                   = excluded.weight,
       sort_order               = excluded.sort_order,
       is_default               = excluded.is_default,
       location_area_encounters = excluded.location_area_encounters,
       species_id               = excluded.species_id",
    params![
      row.id,
      row.name,
      row.base_experience,
      row.height,
      row.weight,
      row.order,
      row.is_default,
      row.location_area_encounters,
      species_id,
    ],
  )?;
  Ok(())
}

/// Upsert every lookup row that has an id; returns the ids written.
fn upsert_lookups(
  conn: &Connection,
  kind: LookupKind,
  rows: &[LookupRow],
) -> rusqlite::Result<Vec<i64>> {
  let sql = format!(
    "INSERT INTO {} (id, name, url) VALUES (?1, ?2, ?3)
     ON CONFLICT(id) DO UPDATE SET name = excluded.name, url = excluded.url",
    kind.table()
  );
  let mut stmt = conn.prepare_cached(&sql)?;

  let mut ids = Vec::with_capacity(rows.len());
  for row in rows {
    let Some(id) = row.id else {
      tracing::debug!(table = kind.table(), name = %row.name, "skipping row without id");
      continue;
    };
    stmt.execute(params![id, row.name, row.url])?;
    ids.push(id);
  }
  Ok(ids)
}

fn upsert_cry(conn: &Connection, key: PokemonKey, cry: &CryRow) -> rusqlite::Result<i64> {
  let hash = cry_content_hash(cry);
  conn.execute(
    "INSERT INTO cry (latest, legacy, content_hash) VALUES (?1, ?2, ?3)
     ON CONFLICT(content_hash) DO NOTHING",
    params![cry.latest, cry.legacy, hash],
  )?;
  let cry_id: i64 = conn.query_row(
    "SELECT id FROM cry WHERE content_hash = ?1",
    params![hash],
    |row| row.get(0),
  )?;
  link(conn, "pokemon_cry", "cry_id", key, cry_id)?;
  Ok(cry_id)
}

fn upsert_sprite(conn: &Connection, key: PokemonKey, row: &SpriteRow) -> rusqlite::Result<()> {
  conn.execute(
    "INSERT INTO sprite (pokemon_id, front_default, back_default, front_shiny, back_shiny)
     VALUES (?1, ?2, ?3, ?4, ?5)
     ON CONFLICT(pokemon_id) DO UPDATE SET
       front_default = excluded.front_default,
       back_default  = excluded.back_default,
       front_shiny   = excluded.front_shiny,
       back_shiny    = excluded.back_shiny",
    params![key.id(), row.front_default, row.back_default, row.front_shiny, row.back_shiny],
  )?;
  Ok(())
}

// ─── Join rows ───────────────────────────────────────────────────────────────

/// Attribute-less join row. `table` and `column` are always literals.
fn link(
  conn: &Connection,
  table: &str,
  column: &str,
  key: PokemonKey,
  target_id: i64,
) -> rusqlite::Result<()> {
  let sql = format!(
    "INSERT INTO {table} (pokemon_id, {column}) VALUES (?1, ?2) ON CONFLICT DO NOTHING"
  );
  conn.prepare_cached(&sql)?.execute(params![key.id(), target_id])?;
  Ok(())
}

fn upsert_pokemon_ability(
  conn: &Connection,
  key: PokemonKey,
  row: &PokemonAbilityRow,
  written: &[i64],
) -> rusqlite::Result<()> {
  let Some(ability_id) = row.ability_id.filter(|id| written.contains(id)) else {
    return Ok(());
  };
  conn
    .prepare_cached(
      "INSERT INTO pokemon_ability (pokemon_id, ability_id, is_hidden, slot)
       VALUES (?1, ?2, ?3, ?4)
       ON CONFLICT(pokemon_id, ability_id) DO UPDATE SET
         is_hidden = excluded.is_hidden,
         slot      = excluded.slot",
    )?
    .execute(params![key.id(), ability_id, row.is_hidden, row.slot])?;
  Ok(())
}

fn upsert_pokemon_type(
  conn: &Connection,
  key: PokemonKey,
  row: &PokemonTypeRow,
  written: &[i64],
) -> rusqlite::Result<()> {
  let Some(type_id) = row.type_id.filter(|id| written.contains(id)) else {
    return Ok(());
  };
  conn
    .prepare_cached(
      "INSERT INTO pokemon_type (pokemon_id, type_id, slot) VALUES (?1, ?2, ?3)
       ON CONFLICT(pokemon_id, type_id) DO UPDATE SET slot = excluded.slot",
    )?
    .execute(params![key.id(), type_id, row.slot])?;
  Ok(())
}

fn upsert_pokemon_stat(
  conn: &Connection,
  key: PokemonKey,
  row: &PokemonStatRow,
  written: &[i64],
) -> rusqlite::Result<()> {
  let Some(stat_id) = row.stat_id.filter(|id| written.contains(id)) else {
    return Ok(());
  };
  conn
    .prepare_cached(
      "INSERT INTO pokemon_stat (pokemon_id, stat_id, base_stat, effort)
       VALUES (?1, ?2, ?3, ?4)
       ON CONFLICT(pokemon_id, stat_id) DO UPDATE SET
         base_stat = excluded.base_stat,
         effort    = excluded.effort",
    )?
    .execute(params![key.id(), stat_id, row.base_stat, row.effort])?;
  Ok(())
}

fn upsert_move_detail(
  conn: &Connection,
  key: PokemonKey,
  row: &MoveDetailRow,
  written_moves: &[i64],
) -> rusqlite::Result<()> {
  let Some(move_id) = row.move_id.filter(|id| written_moves.contains(id)) else {
    return Ok(());
  };
  let learn = upsert_lookups(conn, LookupKind::MoveLearnMethod, std::slice::from_ref(&row.learn_method))?;
  let version = upsert_lookups(conn, LookupKind::VersionGroup, std::slice::from_ref(&row.version_group))?;
  let (Some(&learn_id), Some(&version_id)) = (learn.first(), version.first()) else {
    return Ok(());
  };

  conn
    .prepare_cached(
      "INSERT INTO pokemon_move_detail
         (pokemon_id, move_id, move_learn_method_id, version_group_id, level_learned_at)
       VALUES (?1, ?2, ?3, ?4, ?5)
       ON CONFLICT(pokemon_id, move_id, move_learn_method_id, version_group_id)
       DO UPDATE SET level_learned_at = excluded.level_learned_at",
    )?
    .execute(params![key.id(), move_id, learn_id, version_id, row.level_learned_at])?;
  Ok(())
}
