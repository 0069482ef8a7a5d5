//! HTTP server for the Pokédex.
//!
//! Wires the JSON API from `pokedex-api` to a SQLite store and the live
//! PokeAPI, and puts every ingestion and query route behind bearer-token
//! authentication.

pub mod auth;
pub mod error;
pub mod pokeapi;

pub use error::{Error, Result};

use std::{path::{Path, PathBuf}, sync::Arc};

use axum::{
  Router, middleware,
  routing::{get, post},
};
use config::{Config, ConfigBuilder, ConfigError, builder::DefaultState};
use pokedex_core::{source::PokemonSource, store::PokedexStore};
use serde::Deserialize;
use tower_http::trace::TraceLayer;

use auth::TokenKeys;

// ─── Configuration ───────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml` and
/// `POKEDEX_*` environment variables.
#[derive(Deserialize, Clone)]
pub struct ServerConfig {
  #[serde(default = "default_host")]
  pub host:               String,
  #[serde(default = "default_port")]
  pub port:               u16,
  pub store_path:         PathBuf,
  #[serde(default = "default_pokeapi_base_url")]
  pub pokeapi_base_url:   String,
  #[serde(default = "default_fetch_timeout_secs")]
  pub fetch_timeout_secs: u64,
  pub jwt_secret:         String,
  #[serde(default = "default_token_ttl_minutes")]
  pub token_ttl_minutes:  i64,
}

fn default_host() -> String { "127.0.0.1".to_owned() }

fn default_port() -> u16 { 8000 }

fn default_pokeapi_base_url() -> String { "https://pokeapi.co/api/v2/pokemon".to_owned() }

fn default_fetch_timeout_secs() -> u64 { 30 }

fn default_token_ttl_minutes() -> i64 { 60 }

impl ServerConfig {
  /// Layer the optional TOML file at `path` under the environment.
  pub fn load(path: &Path) -> Result<Self, ConfigError> {
    Self::from_builder(
      Config::builder().add_source(config::File::from(path).required(false)),
    )
  }

  fn from_builder(builder: ConfigBuilder<DefaultState>) -> Result<Self, ConfigError> {
    builder
      .add_source(config::Environment::with_prefix("POKEDEX"))
      .build()?
      .try_deserialize()
  }
}

// ─── Application state ───────────────────────────────────────────────────────

/// Shared state threaded through the auth handlers and middleware.
#[derive(Clone)]
pub struct AppState<S: PokedexStore> {
  pub store:  Arc<S>,
  pub config: Arc<ServerConfig>,
  pub tokens: Arc<TokenKeys>,
}

impl<S: PokedexStore> AppState<S> {
  pub fn new(store: S, config: ServerConfig) -> Self {
    let tokens = TokenKeys::new(&config.jwt_secret, config.token_ttl_minutes);
    Self {
      store:  Arc::new(store),
      config: Arc::new(config),
      tokens: Arc::new(tokens),
    }
  }
}

// ─── Router ──────────────────────────────────────────────────────────────────

/// Build the full server router: public auth routes plus the guarded API.
pub fn router<S, P>(state: AppState<S>, source: Arc<P>) -> Router
where
  S: PokedexStore + Clone + 'static,
  P: PokemonSource + 'static,
{
  let guarded = pokedex_api::api_router(state.store.clone(), source).route_layer(
    middleware::from_fn_with_state(state.clone(), auth::require_bearer::<S>),
  );

  Router::new()
    .route("/auth/register",  post(auth::register::<S>))
    .route("/auth/login",     post(auth::login::<S>))
    .route("/auth/protected", get(auth::protected::<S>))
    .with_state(state)
    .merge(guarded)
    .layer(TraceLayer::new_for_http())
}
