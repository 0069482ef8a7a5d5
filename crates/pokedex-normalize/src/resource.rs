//! Helpers for PokeAPI named resources (`{"name": .., "url": ..}`).

use pokedex_core::rows::LookupRow;
use serde_json::Value;

/// Extract the numeric id from a PokeAPI resource URL.
///
/// The id is the last path segment, which must be all digits and followed by
/// a trailing `/`: `https://pokeapi.co/api/v2/pokemon-species/25/` yields
/// `Some(25)`. Anything else yields `None`.
pub fn extract_id(url: &str) -> Option<i64> {
  let (_, last) = url.strip_suffix('/')?.rsplit_once('/')?;
  if last.is_empty() || !last.bytes().all(|b| b.is_ascii_digit()) {
    return None;
  }
  last.parse().ok()
}

/// Read a named resource into a [`LookupRow`]. A resource without a `name`
/// is not a resource.
pub fn named(value: &Value) -> Option<LookupRow> {
  let name = value.get("name")?.as_str()?.to_owned();
  let url = string(value, "url");
  let id = url.as_deref().and_then(extract_id);
  Some(LookupRow { id, name, url })
}

/// The array under `key`, or an empty slice when absent or not an array.
pub fn array<'a>(value: &'a Value, key: &str) -> &'a [Value] {
  value
    .get(key)
    .and_then(Value::as_array)
    .map(Vec::as_slice)
    .unwrap_or_default()
}

pub fn int(value: &Value, key: &str) -> Option<i64> { value.get(key)?.as_i64() }

pub fn string(value: &Value, key: &str) -> Option<String> {
  value.get(key)?.as_str().map(str::to_owned)
}

/// Append `row` unless an identical resource is already present.
pub fn push_unique(rows: &mut Vec<LookupRow>, row: LookupRow) {
  if !rows.iter().any(|r| r.id == row.id && r.name == row.name) {
    rows.push(row);
  }
}
