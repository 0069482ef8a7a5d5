//! The declared write plan for one Pokémon.
//!
//! Foreign keys make the order of writes matter: the species must exist before
//! the Pokémon that references it, and the Pokémon plus each lookup row must
//! exist before any join row referencing them. Rather than relying on call
//! order, each [`WriteStep`] names what it depends on and [`WRITE_PLAN`] lists
//! the steps in an order that satisfies every dependency. Backends execute by
//! walking the plan and thread a [`WriteContext`] through the steps.

use serde::{Deserialize, Serialize};

use crate::{Error, Result, rows::PokemonRow};

// ─── Steps ───────────────────────────────────────────────────────────────────

/// One unit of the ingestion write sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WriteStep {
  Species,
  Pokemon,
  Abilities,
  Cries,
  Types,
  Stats,
  Forms,
  Moves,
  MoveDetails,
  Sprite,
}

impl WriteStep {
  /// Steps that must have completed before this one runs.
  pub fn depends_on(self) -> &'static [WriteStep] {
    match self {
      Self::Species => &[],
      Self::Pokemon => &[Self::Species],
      Self::Abilities
      | Self::Cries
      | Self::Types
      | Self::Stats
      | Self::Forms
      | Self::Moves
      | Self::Sprite => &[Self::Pokemon],
      Self::MoveDetails => &[Self::Pokemon, Self::Moves],
    }
  }
}

/// Execution order. Every step appears after all of its dependencies.
pub const WRITE_PLAN: [WriteStep; 10] = [
  WriteStep::Species,
  WriteStep::Pokemon,
  WriteStep::Abilities,
  WriteStep::Cries,
  WriteStep::Types,
  WriteStep::Stats,
  WriteStep::Forms,
  WriteStep::Moves,
  WriteStep::MoveDetails,
  WriteStep::Sprite,
];

// ─── Keys ────────────────────────────────────────────────────────────────────

/// Proof that the Pokémon row has been written in the current scope.
///
/// Only [`WriteContext::record_pokemon`] creates one, so join-row writers that
/// take a `PokemonKey` cannot run before the Pokémon step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PokemonKey(i64);

impl PokemonKey {
  pub fn id(self) -> i64 { self.0 }
}

// ─── Context ─────────────────────────────────────────────────────────────────

/// Identifiers written so far for one Pokémon; returned to the caller once the
/// plan completes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WrittenIds {
  pub pokemon_id:  Option<i64>,
  pub species_id:  Option<i64>,
  pub ability_ids: Vec<i64>,
  pub cry_ids:     Vec<i64>,
  pub type_ids:    Vec<i64>,
  pub stat_ids:    Vec<i64>,
  pub form_ids:    Vec<i64>,
  pub move_ids:    Vec<i64>,
}

/// Per-ingestion state threaded through each write step.
///
/// One context belongs to exactly one Pokémon; nothing is kept on the store
/// between calls.
#[derive(Debug, Default)]
pub struct WriteContext {
  completed: Vec<WriteStep>,
  pokemon:   Option<PokemonKey>,
  ids:       WrittenIds,
}

impl WriteContext {
  pub fn new() -> Self { Self::default() }

  /// Check that every dependency of `step` has completed.
  pub fn begin(&self, step: WriteStep) -> Result<()> {
    match step
      .depends_on()
      .iter()
      .find(|dep| !self.completed.contains(dep))
    {
      Some(&missing) => Err(Error::StepOutOfOrder { step, missing }),
      None => Ok(()),
    }
  }

  pub fn finish(&mut self, step: WriteStep) { self.completed.push(step); }

  pub fn record_species(&mut self, id: Option<i64>) { self.ids.species_id = id; }

  pub fn species_id(&self) -> Option<i64> { self.ids.species_id }

  /// Register the written Pokémon row and hand out its key.
  pub fn record_pokemon(&mut self, row: &PokemonRow) -> PokemonKey {
    let key = PokemonKey(row.id);
    self.pokemon = Some(key);
    self.ids.pokemon_id = Some(row.id);
    key
  }

  /// The key of the Pokémon written by this context.
  pub fn pokemon_key(&self) -> Result<PokemonKey> {
    self.pokemon.ok_or(Error::StepOutOfOrder {
      step:    WriteStep::Pokemon,
      missing: WriteStep::Pokemon,
    })
  }

  pub fn ids_mut(&mut self) -> &mut WrittenIds { &mut self.ids }

  pub fn into_ids(self) -> WrittenIds { self.ids }
}
