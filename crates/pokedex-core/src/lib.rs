//! Core types and trait definitions for the Pokédex backend.
//!
//! Row types, the declared write plan, query read models, and the two seams
//! the rest of the workspace is built around: [`store::PokedexStore`] and
//! [`source::PokemonSource`]. No HTTP or database dependencies.

pub mod error;
pub mod plan;
pub mod query;
pub mod rows;
pub mod source;
pub mod store;
pub mod user;

pub use error::{Error, Result};
