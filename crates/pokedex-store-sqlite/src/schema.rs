//! SQL schema for the Pokédex SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS species (
    id    INTEGER PRIMARY KEY,
    name  TEXT NOT NULL,
    url   TEXT
);

-- id is PokeAPI's identifier, never assigned here.
CREATE TABLE IF NOT EXISTS pokemon (
    id                        INTEGER PRIMARY KEY,
    name                      TEXT NOT NULL,
    base_experience           INTEGER,
    height                    INTEGER,
    weight                    INTEGER,
    sort_order                INTEGER,   -- PokeAPI `order`
    is_default                INTEGER,
    location_area_encounters  TEXT,
    species_id                INTEGER REFERENCES species(id)
);

-- Lookup tables, shared across Pokémon.
CREATE TABLE IF NOT EXISTS ability (
    id INTEGER PRIMARY KEY, name TEXT NOT NULL, url TEXT
);
CREATE TABLE IF NOT EXISTS type (
    id INTEGER PRIMARY KEY, name TEXT NOT NULL, url TEXT
);
CREATE TABLE IF NOT EXISTS stat (
    id INTEGER PRIMARY KEY, name TEXT NOT NULL, url TEXT
);
CREATE TABLE IF NOT EXISTS form (
    id INTEGER PRIMARY KEY, name TEXT NOT NULL, url TEXT
);
CREATE TABLE IF NOT EXISTS move (
    id INTEGER PRIMARY KEY, name TEXT NOT NULL, url TEXT
);
CREATE TABLE IF NOT EXISTS move_learn_method (
    id INTEGER PRIMARY KEY, name TEXT NOT NULL, url TEXT
);
CREATE TABLE IF NOT EXISTS version_group (
    id INTEGER PRIMARY KEY, name TEXT NOT NULL, url TEXT
);

-- Cries have no natural key: rows are deduplicated by a hash of their URLs.
CREATE TABLE IF NOT EXISTS cry (
    id            INTEGER PRIMARY KEY AUTOINCREMENT,
    latest        TEXT,
    legacy        TEXT,
    content_hash  TEXT NOT NULL UNIQUE
);

-- Join tables.
CREATE TABLE IF NOT EXISTS pokemon_ability (
    pokemon_id  INTEGER NOT NULL REFERENCES pokemon(id),
    ability_id  INTEGER NOT NULL REFERENCES ability(id),
    is_hidden   INTEGER NOT NULL DEFAULT 0,
    slot        INTEGER,
    PRIMARY KEY (pokemon_id, ability_id)
);

CREATE TABLE IF NOT EXISTS pokemon_cry (
    pokemon_id  INTEGER NOT NULL REFERENCES pokemon(id),
    cry_id      INTEGER NOT NULL REFERENCES cry(id),
    PRIMARY KEY (pokemon_id, cry_id)
);

CREATE TABLE IF NOT EXISTS pokemon_type (
    pokemon_id  INTEGER NOT NULL REFERENCES pokemon(id),
    type_id     INTEGER NOT NULL REFERENCES type(id),
    slot        INTEGER,
    PRIMARY KEY (pokemon_id, type_id)
);

CREATE TABLE IF NOT EXISTS pokemon_stat (
    pokemon_id  INTEGER NOT NULL REFERENCES pokemon(id),
    stat_id     INTEGER NOT NULL REFERENCES stat(id),
    base_stat   INTEGER,
    effort      INTEGER,
    PRIMARY KEY (pokemon_id, stat_id)
);

CREATE TABLE IF NOT EXISTS pokemon_form (
    pokemon_id  INTEGER NOT NULL REFERENCES pokemon(id),
    form_id     INTEGER NOT NULL REFERENCES form(id),
    PRIMARY KEY (pokemon_id, form_id)
);

CREATE TABLE IF NOT EXISTS pokemon_move (
    pokemon_id  INTEGER NOT NULL REFERENCES pokemon(id),
    move_id     INTEGER NOT NULL REFERENCES move(id),
    PRIMARY KEY (pokemon_id, move_id)
);

CREATE TABLE IF NOT EXISTS pokemon_move_detail (
    pokemon_id            INTEGER NOT NULL,
    move_id               INTEGER NOT NULL,
    move_learn_method_id  INTEGER NOT NULL REFERENCES move_learn_method(id),
    version_group_id      INTEGER NOT NULL REFERENCES version_group(id),
    level_learned_at      INTEGER,
    PRIMARY KEY (pokemon_id, move_id, move_learn_method_id, version_group_id),
    FOREIGN KEY (pokemon_id, move_id) REFERENCES pokemon_move(pokemon_id, move_id)
);

CREATE TABLE IF NOT EXISTS sprite (
    pokemon_id     INTEGER PRIMARY KEY REFERENCES pokemon(id),
    front_default  TEXT,
    back_default   TEXT,
    front_shiny    TEXT,
    back_shiny     TEXT
);

CREATE TABLE IF NOT EXISTS users (
    user_id        TEXT PRIMARY KEY,
    username       TEXT NOT NULL UNIQUE,
    password_hash  TEXT NOT NULL,   -- argon2 PHC string
    created_at     TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS pokemon_species_idx    ON pokemon(species_id);
CREATE INDEX IF NOT EXISTS pokemon_type_type_idx  ON pokemon_type(type_id);
CREATE INDEX IF NOT EXISTS pokemon_stat_stat_idx  ON pokemon_stat(stat_id);

PRAGMA user_version = 1;
";
