//! [`SqliteStore`], the SQLite implementation of [`PokedexStore`].

use std::path::Path;

use chrono::Utc;
use rusqlite::OptionalExtension as _;
use uuid::Uuid;

use pokedex_core::{
  plan::WrittenIds,
  query::{Pokemon, PokemonWithSpecies, TopOrder, TypeCount},
  rows::NormalizedPokemon,
  store::PokedexStore,
  user::User,
};

use crate::{
  Error, Result,
  encode::{POKEMON_COLUMNS, RawUser, encode_dt, encode_uuid, pokemon_from_row},
  schema::SCHEMA,
  write::write_plan,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A Pokédex store backed by a single SQLite file.
///
/// Cloning is cheap; the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store for tests.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  #[cfg(test)]
  pub(crate) async fn count_rows(&self, table: &'static str) -> i64 {
    self
      .conn
      .call(move |conn| {
        Ok(conn.query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |row| {
          row.get(0)
        })?)
      })
      .await
      .expect("count rows")
  }

  #[cfg(test)]
  pub(crate) async fn exec_batch(&self, sql: &'static str) {
    self
      .conn
      .call(move |conn| {
        conn.execute_batch(sql)?;
        Ok(())
      })
      .await
      .expect("exec batch")
  }

  /// Run a `pokemon` select whose only parameter is `?1`.
  async fn query_pokemon<P>(&self, sql: String, param: P) -> Result<Vec<Pokemon>>
  where
    P: rusqlite::ToSql + Send + 'static,
  {
    let rows = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
          .query_map(rusqlite::params![param], pokemon_from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;
    Ok(rows)
  }
}

// ─── PokedexStore impl ───────────────────────────────────────────────────────

impl PokedexStore for SqliteStore {
  type Error = Error;

  // ── Ingestion ─────────────────────────────────────────────────────────────

  async fn ingest(&self, data: NormalizedPokemon) -> Result<WrittenIds> {
    let pokemon = data
      .pokemon
      .clone()
      .ok_or(pokedex_core::Error::MissingPokemon)?;
    let name = pokemon.name.clone();

    let ids = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let ids = write_plan(&tx, &data, &pokemon)?;
        tx.commit()?;
        Ok(ids)
      })
      .await?;

    tracing::info!(
      pokemon = %name,
      pokemon_id = ?ids.pokemon_id,
      abilities = ids.ability_ids.len(),
      types = ids.type_ids.len(),
      moves = ids.move_ids.len(),
      "pokemon persisted"
    );
    Ok(ids)
  }

  // ── Queries ───────────────────────────────────────────────────────────────

  async fn pokemon_by_type(&self, type_name: &str) -> Result<Vec<Pokemon>> {
    let type_name = type_name.to_owned();
    let sql = format!(
      "SELECT {POKEMON_COLUMNS}
       FROM pokemon p
       JOIN pokemon_type pt ON pt.pokemon_id = p.id
       JOIN type t ON t.id = pt.type_id
       WHERE t.name = ?1
       ORDER BY p.id"
    );
    self.query_pokemon(sql, type_name).await
  }

  async fn top_pokemon(&self, limit: u32, order: TopOrder) -> Result<Vec<Pokemon>> {
    // Null experience sorts last in both directions.
    let order_by = match order {
      TopOrder::BaseExperienceDesc => {
        "ORDER BY p.base_experience IS NULL, p.base_experience DESC, p.id"
      }
      TopOrder::BaseExperienceAsc => {
        "ORDER BY p.base_experience IS NULL, p.base_experience ASC, p.id"
      }
      TopOrder::Unordered => "",
    };
    let sql = format!("SELECT {POKEMON_COLUMNS} FROM pokemon p {order_by} LIMIT ?1");
    self.query_pokemon(sql, i64::from(limit)).await
  }

  async fn pokemon_with_species(&self) -> Result<Vec<PokemonWithSpecies>> {
    let sql = format!(
      "SELECT {POKEMON_COLUMNS}, s.name
       FROM pokemon p
       JOIN species s ON s.id = p.species_id
       ORDER BY p.id"
    );

    let rows = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
          .query_map([], |row| {
            Ok(PokemonWithSpecies {
              pokemon:      pokemon_from_row(row)?,
              species_name: row.get(9)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;
    Ok(rows)
  }

  async fn pokemon_count_by_type(&self) -> Result<Vec<TypeCount>> {
    let rows = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(
          "SELECT t.name, COUNT(pt.pokemon_id)
           FROM type t
           JOIN pokemon_type pt ON pt.type_id = t.id
           GROUP BY t.name
           ORDER BY t.name",
        )?;
        let rows = stmt
          .query_map([], |row| {
            Ok(TypeCount {
              type_name:      row.get(0)?,
              total_pokemons: row.get(1)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;
    Ok(rows)
  }

  async fn average_stat(&self, stat_name: &str) -> Result<Option<f64>> {
    let stat_name = stat_name.to_owned();

    let avg = self
      .conn
      .call(move |conn| {
        Ok(conn.query_row(
          "SELECT AVG(ps.base_stat)
           FROM pokemon_stat ps
           JOIN stat s ON s.id = ps.stat_id
           WHERE s.name = ?1",
          rusqlite::params![stat_name],
          |row| row.get::<_, Option<f64>>(0),
        )?)
      })
      .await?;
    Ok(avg)
  }

  // ── Users ─────────────────────────────────────────────────────────────────

  async fn create_user(&self, username: String, password_hash: String) -> Result<Option<User>> {
    let user = User {
      user_id: Uuid::new_v4(),
      username,
      password_hash,
      created_at: Utc::now(),
    };

    let id_str = encode_uuid(user.user_id);
    let at_str = encode_dt(user.created_at);
    let name = user.username.clone();
    let hash = user.password_hash.clone();

    let inserted = self
      .conn
      .call(move |conn| {
        let changed = conn.execute(
          "INSERT INTO users (user_id, username, password_hash, created_at)
           VALUES (?1, ?2, ?3, ?4)
           ON CONFLICT(username) DO NOTHING",
          rusqlite::params![id_str, name, hash, at_str],
        )?;
        Ok(changed == 1)
      })
      .await?;

    if !inserted {
      tracing::debug!(username = %user.username, "username already taken");
      return Ok(None);
    }
    tracing::info!(user_id = %user.user_id, username = %user.username, "user registered");
    Ok(Some(user))
  }

  async fn find_user(&self, username: &str) -> Result<Option<User>> {
    let username = username.to_owned();

    let raw: Option<RawUser> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            &format!("SELECT {} FROM users WHERE username = ?1", RawUser::COLUMNS),
            rusqlite::params![username],
            RawUser::from_row,
          )
          .optional()?)
      })
      .await?;

    raw.map(RawUser::into_user).transpose()
  }

  async fn get_user(&self, user_id: Uuid) -> Result<Option<User>> {
    let id_str = encode_uuid(user_id);

    let raw: Option<RawUser> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            &format!("SELECT {} FROM users WHERE user_id = ?1", RawUser::COLUMNS),
            rusqlite::params![id_str],
            RawUser::from_row,
          )
          .optional()?)
      })
      .await?;

    raw.map(RawUser::into_user).transpose()
  }
}
