//! Error types for `pokedex-core`.

use thiserror::Error;

use crate::plan::WriteStep;

#[derive(Debug, Error)]
pub enum Error {
  #[error("normalized payload has no pokemon row")]
  MissingPokemon,

  #[error("write step {step:?} attempted before {missing:?}")]
  StepOutOfOrder { step: WriteStep, missing: WriteStep },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
