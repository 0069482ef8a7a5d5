//! [`PokeApiClient`], the live [`PokemonSource`] backed by PokeAPI.

use std::time::Duration;

use pokedex_core::source::PokemonSource;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FetchError {
  #[error("invalid pokemon identifier: {0:?}")]
  InvalidIdentifier(String),
  #[error("request failed: {0}")]
  Http(#[from] reqwest::Error),
  #[error("{url} answered {status}")]
  Status {
    url:    String,
    status: reqwest::StatusCode,
  },
}

/// Fetches `GET {base_url}/{identifier}` for each requested Pokémon.
#[derive(Clone)]
pub struct PokeApiClient {
  http:     reqwest::Client,
  base_url: String,
}

impl PokeApiClient {
  pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, FetchError> {
    let http = reqwest::Client::builder()
      .timeout(timeout)
      .user_agent(concat!("pokedex/", env!("CARGO_PKG_VERSION")))
      .build()?;
    Ok(Self { http, base_url: base_url.into() })
  }

  /// Identifiers are PokeAPI slugs or numeric ids; anything else would change
  /// the path and is refused before a request is made.
  fn resource_url(&self, identifier: &str) -> Result<String, FetchError> {
    let valid = !identifier.is_empty()
      && identifier
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-');
    if !valid {
      return Err(FetchError::InvalidIdentifier(identifier.to_owned()));
    }
    Ok(format!("{}/{identifier}", self.base_url.trim_end_matches('/')))
  }
}

impl PokemonSource for PokeApiClient {
  type Error = FetchError;

  async fn fetch(&self, identifier: &str) -> Result<serde_json::Value, FetchError> {
    let url = self.resource_url(identifier)?;
    tracing::debug!(%url, "fetching pokemon");

    let resp = self.http.get(&url).send().await?;
    let status = resp.status();
    if !status.is_success() {
      return Err(FetchError::Status { url, status });
    }
    Ok(resp.json().await?)
  }
}
