//! Extraction of keys and records from GBIF search responses.

use serde_json::Value;

use fish_common::TaxonKey;

use crate::error::{Endpoint, GbifError, GbifResult};

/// Key of the first species search result.
///
/// A missing, null or empty `results` array means no match.
pub fn parse_taxon_key(body: &Value) -> GbifResult<Option<TaxonKey>> {
    let object = body
        .as_object()
        .ok_or_else(|| GbifError::malformed(Endpoint::Species, "body is not a JSON object"))?;

    let results = match object.get("results") {
        None | Some(Value::Null) => return Ok(None),
        Some(Value::Array(results)) => results,
        Some(_) => {
            return Err(GbifError::malformed(
                Endpoint::Species,
                "results is not an array",
            ))
        }
    };

    let Some(first) = results.first() else {
        return Ok(None);
    };

    first
        .get("key")
        .and_then(Value::as_u64)
        .map(|key| Some(TaxonKey(key)))
        .ok_or_else(|| {
            GbifError::malformed(Endpoint::Species, "first result has no integer key")
        })
}

/// The `results` array of an occurrence search, untouched.
pub fn parse_occurrences(body: Value) -> GbifResult<Vec<Value>> {
    let Value::Object(mut object) = body else {
        return Err(GbifError::malformed(
            Endpoint::Occurrence,
            "body is not a JSON object",
        ));
    };

    match object.remove("results") {
        Some(Value::Array(results)) => Ok(results),
        Some(_) => Err(GbifError::malformed(
            Endpoint::Occurrence,
            "results is not an array",
        )),
        None => Err(GbifError::malformed(
            Endpoint::Occurrence,
            "results is missing",
        )),
    }
}
