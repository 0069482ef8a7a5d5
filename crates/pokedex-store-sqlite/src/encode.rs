//! Encoding and decoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Timestamps are stored as RFC 3339 strings and UUIDs as hyphenated lowercase
//! strings. Cry rows are keyed by a SHA-256 digest of their URLs.

use chrono::{DateTime, Utc};
use pokedex_core::{query::Pokemon, rows::CryRow, user::User};
use sha2::{Digest, Sha256};
use uuid::Uuid;

use crate::{Error, Result};

// ─── Uuid ────────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

pub fn decode_uuid(s: &str) -> Result<Uuid> { Ok(Uuid::parse_str(s)?) }

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── Cry content hash ────────────────────────────────────────────────────────

/// Hex SHA-256 over both URLs. A presence byte precedes each value so that a
/// missing URL and an empty one hash differently.
pub fn cry_content_hash(cry: &CryRow) -> String {
  let mut hasher = Sha256::new();
  for url in [&cry.latest, &cry.legacy] {
    match url {
      Some(u) => {
        hasher.update([1u8]);
        hasher.update(u.as_bytes());
      }
      None => hasher.update([0u8]),
    }
    hasher.update([0x1f]);
  }
  hex::encode(hasher.finalize())
}

// ─── Pokémon rows ────────────────────────────────────────────────────────────

/// Column list matching [`pokemon_from_row`], for a `pokemon` table aliased `p`.
pub const POKEMON_COLUMNS: &str = "p.id, p.name, p.base_experience, p.height, p.weight, \
                                   p.sort_order, p.is_default, p.location_area_encounters, \
                                   p.species_id";

/// Read a [`Pokemon`] from the first nine columns of `row`.
pub fn pokemon_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Pokemon> {
  Ok(Pokemon {
    id:                       row.get(0)?,
    name:                     row.get(1)?,
    base_experience:          row.get(2)?,
    height:                   row.get(3)?,
    weight:                   row.get(4)?,
    order:                    row.get(5)?,
    is_default:               row.get(6)?,
    location_area_encounters: row.get(7)?,
    species_id:               row.get(8)?,
  })
}

// ─── Users ───────────────────────────────────────────────────────────────────

/// Raw strings read directly from a `users` row.
pub struct RawUser {
  pub user_id:       String,
  pub username:      String,
  pub password_hash: String,
  pub created_at:    String,
}

impl RawUser {
  pub const COLUMNS: &'static str = "user_id, username, password_hash, created_at";

  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      user_id:       row.get(0)?,
      username:      row.get(1)?,
      password_hash: row.get(2)?,
      created_at:    row.get(3)?,
    })
  }

  pub fn into_user(self) -> Result<User> {
    Ok(User {
      user_id:       decode_uuid(&self.user_id)?,
      username:      self.username,
      password_hash: self.password_hash,
      created_at:    decode_dt(&self.created_at)?,
    })
  }
}
