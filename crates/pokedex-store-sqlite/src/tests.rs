//! Integration tests for `SqliteStore` against an in-memory database.

use pokedex_core::{
  query::TopOrder,
  rows::{CryRow, NormalizedPokemon},
  store::PokedexStore,
};
use pokedex_normalize::normalize;
use serde_json::{Value, json};
use uuid::Uuid;

use crate::{Error, SqliteStore};

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

fn resource(kind: &str, id: i64, name: &str) -> Value {
  json!({ "name": name, "url": format!("https://pokeapi.co/api/v2/{kind}/{id}/") })
}

/// A minimal PokeAPI document with one type and an `hp` stat.
fn doc(id: i64, name: &str, base_experience: Option<i64>, ty: (i64, &str), hp: i64) -> Value {
  json!({
    "id": id,
    "name": name,
    "base_experience": base_experience,
    "height": 7,
    "weight": 69,
    "order": id,
    "is_default": true,
    "species": resource("pokemon-species", id, name),
    "abilities": [
      { "ability": resource("ability", 65, "overgrow"), "is_hidden": false, "slot": 1 }
    ],
    "types": [{ "slot": 1, "type": resource("type", ty.0, ty.1) }],
    "stats": [
      { "base_stat": hp, "effort": 0, "stat": resource("stat", 1, "hp") },
      { "base_stat": 45, "effort": 1, "stat": resource("stat", 6, "speed") }
    ],
    "forms": [resource("pokemon-form", id, name)],
    "moves": [{
      "move": resource("move", 33, "tackle"),
      "version_group_details": [{
        "level_learned_at": 1,
        "move_learn_method": resource("move-learn-method", 1, "level-up"),
        "version_group": resource("version-group", 1, "red-blue")
      }]
    }],
    "cries": {
      "latest": format!("https://cries.test/latest/{id}.ogg"),
      "legacy": format!("https://cries.test/legacy/{id}.ogg")
    },
    "sprites": { "front_default": format!("https://sprites.test/{id}.png") }
  })
}

fn bulbasaur() -> Value { doc(1, "bulbasaur", Some(64), (12, "grass"), 45) }

fn charizard() -> Value { doc(6, "charizard", Some(267), (10, "fire"), 78) }

const TABLES: [&str; 18] = [
  "species",
  "pokemon",
  "ability",
  "type",
  "stat",
  "form",
  "move",
  "move_learn_method",
  "version_group",
  "cry",
  "pokemon_ability",
  "pokemon_cry",
  "pokemon_type",
  "pokemon_stat",
  "pokemon_form",
  "pokemon_move",
  "pokemon_move_detail",
  "sprite",
];

async fn counts(s: &SqliteStore) -> Vec<i64> {
  let mut out = Vec::new();
  for table in TABLES {
    out.push(s.count_rows(table).await);
  }
  out
}

// ─── Ingestion ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn ingest_writes_every_table() {
  let s = store().await;
  let ids = s.ingest(normalize(&bulbasaur())).await.unwrap();

  assert_eq!(ids.pokemon_id, Some(1));
  assert_eq!(ids.species_id, Some(1));
  assert_eq!(ids.ability_ids, [65]);
  assert_eq!(ids.type_ids, [12]);
  assert_eq!(ids.stat_ids, [1, 6]);
  assert_eq!(ids.move_ids, [33]);
  assert_eq!(ids.cry_ids.len(), 1);

  for (table, n) in TABLES.iter().zip(counts(&s).await) {
    assert!(n >= 1, "{table} is empty");
  }
}

#[tokio::test]
async fn reingest_is_idempotent() {
  let s = store().await;
  s.ingest(normalize(&bulbasaur())).await.unwrap();
  let before = counts(&s).await;

  s.ingest(normalize(&bulbasaur())).await.unwrap();
  assert_eq!(counts(&s).await, before);
}

#[tokio::test]
async fn reingest_overwrites_scalars() {
  let s = store().await;
  s.ingest(normalize(&bulbasaur())).await.unwrap();

  let mut changed = bulbasaur();
  changed["base_experience"] = json!(70);
  s.ingest(normalize(&changed)).await.unwrap();

  let top = s.top_pokemon(10, TopOrder::BaseExperienceDesc).await.unwrap();
  assert_eq!(top.len(), 1);
  assert_eq!(top[0].base_experience, Some(70));
}

#[tokio::test]
async fn shared_lookups_are_not_duplicated() {
  let s = store().await;
  s.ingest(normalize(&bulbasaur())).await.unwrap();
  s.ingest(normalize(&doc(2, "ivysaur", Some(142), (12, "grass"), 60)))
    .await
    .unwrap();

  assert_eq!(s.count_rows("type").await, 1);
  assert_eq!(s.count_rows("ability").await, 1);
  assert_eq!(s.count_rows("pokemon_type").await, 2);
  assert_eq!(s.count_rows("pokemon_move_detail").await, 2);
}

#[tokio::test]
async fn ingest_without_pokemon_row_fails() {
  let s = store().await;
  let err = s.ingest(NormalizedPokemon::default()).await.unwrap_err();
  assert!(matches!(err, Error::Core(pokedex_core::Error::MissingPokemon)));
  assert_eq!(s.count_rows("pokemon").await, 0);
}

#[tokio::test]
async fn failed_step_rolls_back_the_whole_pokemon() {
  let s = store().await;
  // Sprite is the last step, so every earlier row has been written by then.
  s.exec_batch(
    "CREATE TRIGGER reject_sprite BEFORE INSERT ON sprite
     BEGIN SELECT RAISE(ABORT, 'sprite rejected'); END;",
  )
  .await;

  let err = s.ingest(normalize(&bulbasaur())).await.unwrap_err();
  assert!(matches!(err, Error::Database(_)));

  for table in TABLES {
    assert_eq!(s.count_rows(table).await, 0, "{table} kept rows");
  }

  s.exec_batch("DROP TRIGGER reject_sprite;").await;
  s.ingest(normalize(&bulbasaur())).await.unwrap();
  assert_eq!(s.count_rows("pokemon_ability").await, 1);
}

#[tokio::test]
async fn rows_without_ids_are_skipped_with_their_joins() {
  let s = store().await;
  let mut d = bulbasaur();
  d["species"] = json!({ "name": "bulbasaur", "url": "https://x/pokemon-species/bulbasaur/" });
  d["types"] = json!([{ "slot": 1, "type": { "name": "grass", "url": "https://x/type/grass/" } }]);

  let ids = s.ingest(normalize(&d)).await.unwrap();
  assert_eq!(ids.species_id, None);
  assert!(ids.type_ids.is_empty());
  assert_eq!(s.count_rows("species").await, 0);
  assert_eq!(s.count_rows("type").await, 0);
  assert_eq!(s.count_rows("pokemon_type").await, 0);
  assert_eq!(s.count_rows("pokemon").await, 1);
}

#[tokio::test]
async fn identical_cries_share_one_row() {
  let s = store().await;
  let mut a = bulbasaur();
  let mut b = charizard();
  let shared = json!({ "latest": "https://cries.test/same.ogg", "legacy": null });
  a["cries"] = shared.clone();
  b["cries"] = shared;

  let ia = s.ingest(normalize(&a)).await.unwrap();
  let ib = s.ingest(normalize(&b)).await.unwrap();
  assert_eq!(ia.cry_ids, ib.cry_ids);
  assert_eq!(s.count_rows("cry").await, 1);
  assert_eq!(s.count_rows("pokemon_cry").await, 2);
}

#[tokio::test]
async fn empty_cry_is_not_stored() {
  let s = store().await;
  let mut rows = normalize(&bulbasaur());
  rows.cries = Some(CryRow::default());

  let ids = s.ingest(rows).await.unwrap();
  assert!(ids.cry_ids.is_empty());
  assert_eq!(s.count_rows("cry").await, 0);
}

// ─── Queries ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn pokemon_by_type_matches_exact_name() {
  let s = store().await;
  s.ingest(normalize(&bulbasaur())).await.unwrap();
  s.ingest(normalize(&charizard())).await.unwrap();

  let grass = s.pokemon_by_type("grass").await.unwrap();
  assert_eq!(grass.len(), 1);
  assert_eq!(grass[0].name, "bulbasaur");
  assert_eq!(grass[0].species_id, Some(1));

  assert!(s.pokemon_by_type("Grass").await.unwrap().is_empty());
  assert!(s.pokemon_by_type("dragon").await.unwrap().is_empty());
}

#[tokio::test]
async fn top_pokemon_orders_by_experience() {
  let s = store().await;
  s.ingest(normalize(&bulbasaur())).await.unwrap();
  s.ingest(normalize(&doc(150, "mewtwo", Some(300), (14, "psychic"), 106)))
    .await
    .unwrap();
  s.ingest(normalize(&doc(149, "dragonite", Some(265), (16, "dragon"), 91)))
    .await
    .unwrap();
  s.ingest(normalize(&doc(132, "ditto", Some(0), (1, "normal"), 48)))
    .await
    .unwrap();
  s.ingest(normalize(&doc(10001, "unknown", None, (1, "normal"), 50)))
    .await
    .unwrap();

  let top = s.top_pokemon(3, TopOrder::BaseExperienceDesc).await.unwrap();
  let exp: Vec<_> = top.iter().map(|p| p.base_experience).collect();
  assert_eq!(exp, [Some(300), Some(265), Some(64)]);

  let top = s.top_pokemon(4, TopOrder::BaseExperienceDesc).await.unwrap();
  assert_eq!(top[3].base_experience, Some(0));

  let bottom = s.top_pokemon(5, TopOrder::BaseExperienceAsc).await.unwrap();
  let exp: Vec<_> = bottom.iter().map(|p| p.base_experience).collect();
  assert_eq!(exp, [Some(0), Some(64), Some(265), Some(300), None]);

  assert_eq!(s.top_pokemon(2, TopOrder::Unordered).await.unwrap().len(), 2);
}

#[tokio::test]
async fn pokemon_with_species_skips_missing_species() {
  let s = store().await;
  s.ingest(normalize(&bulbasaur())).await.unwrap();
  let mut orphan = charizard();
  orphan.as_object_mut().unwrap().remove("species");
  s.ingest(normalize(&orphan)).await.unwrap();

  let rows = s.pokemon_with_species().await.unwrap();
  assert_eq!(rows.len(), 1);
  assert_eq!(rows[0].pokemon.name, "bulbasaur");
  assert_eq!(rows[0].species_name, "bulbasaur");
}

#[tokio::test]
async fn count_by_type_groups_by_name() {
  let s = store().await;
  s.ingest(normalize(&bulbasaur())).await.unwrap();
  s.ingest(normalize(&doc(2, "ivysaur", Some(142), (12, "grass"), 60)))
    .await
    .unwrap();
  s.ingest(normalize(&charizard())).await.unwrap();

  let counts = s.pokemon_count_by_type().await.unwrap();
  let pairs: Vec<_> = counts
    .iter()
    .map(|c| (c.type_name.as_str(), c.total_pokemons))
    .collect();
  assert_eq!(pairs, [("fire", 1), ("grass", 2)]);
}

#[tokio::test]
async fn average_hp_over_stored_pokemon() {
  let s = store().await;
  assert_eq!(s.average_stat("hp").await.unwrap(), None);

  s.ingest(normalize(&doc(1, "a", Some(1), (1, "normal"), 45))).await.unwrap();
  s.ingest(normalize(&doc(2, "b", Some(1), (1, "normal"), 60))).await.unwrap();
  s.ingest(normalize(&doc(3, "c", Some(1), (1, "normal"), 80))).await.unwrap();

  let avg = s.average_stat("hp").await.unwrap().unwrap();
  assert!((avg - 61.666_666).abs() < 1e-3);
}

// ─── Users ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn create_and_find_user() {
  let s = store().await;
  let user = s
    .create_user("ash".into(), "$argon2id$fake".into())
    .await
    .unwrap()
    .unwrap();

  let found = s.find_user("ash").await.unwrap().unwrap();
  assert_eq!(found.user_id, user.user_id);
  assert_eq!(found.password_hash, "$argon2id$fake");

  let by_id = s.get_user(user.user_id).await.unwrap().unwrap();
  assert_eq!(by_id.username, "ash");
}

#[tokio::test]
async fn duplicate_username_is_rejected() {
  let s = store().await;
  s.create_user("misty".into(), "h1".into()).await.unwrap();

  let taken = s.create_user("misty".into(), "h2".into()).await.unwrap();
  assert!(taken.is_none());
  assert_eq!(s.count_rows("users").await, 1);
  assert_eq!(s.find_user("misty").await.unwrap().unwrap().password_hash, "h1");
}

#[tokio::test]
async fn unknown_user_is_none() {
  let s = store().await;
  assert!(s.find_user("brock").await.unwrap().is_none());
  assert!(s.get_user(Uuid::new_v4()).await.unwrap().is_none());
}
