//! Breed record decoding
//!
//! Turns one raw record into normalized fields. Records come in two
//! layouts: JSON:API style with fields under `attributes`, or a flat
//! object. Anything else is rejected instead of defaulting fields.

use serde::Deserialize;
use serde_json::Value;

use crate::errors::FetchError;

/// Fallback when the record carries no usable name
pub const UNKNOWN_BREED: &str = "Unknown";
/// Fallback when the record carries no description
pub const NO_DESCRIPTION: &str = "No description available";

/// Field layouts a breed record is known to use
#[derive(Debug)]
pub enum BreedRecord {
    /// Fields under an `attributes` object, bounds nested in `life`
    Nested(BreedAttributes),
    /// Fields at the top level, bounds as `life_min` / `life_max`
    Flat(FlatBreed),
}

#[derive(Debug, Clone, Deserialize)]
pub struct BreedAttributes {
    pub name: Option<String>,
    pub description: Option<String>,
    pub life: Option<LifeBounds>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LifeBounds {
    pub min: Option<i32>,
    pub max: Option<i32>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FlatBreed {
    pub name: Option<String>,
    pub breed: Option<String>,
    pub description: Option<String>,
    pub life_min: Option<i32>,
    pub life_max: Option<i32>,
}

/// Normalized fields for one selected breed
#[derive(Debug, Clone)]
pub struct BreedSummary {
    pub breed_name: String,
    pub description: String,
    pub life_min: Option<i32>,
    pub life_max: Option<i32>,
    pub life_expectancy: String,
}

/// Decode one raw record into a known layout
///
/// A record that is not an object, or whose `attributes` block does
/// not decode, is an error. Missing individual fields are not.
pub fn decode_record(value: &Value) -> Result<BreedRecord, FetchError> {
    let record = value.as_object().ok_or_else(|| {
        FetchError::Payload(format!("breed record is not an object: {}", value))
    })?;

    match record.get("attributes") {
        Some(attributes) => {
            let fields = serde_json::from_value(attributes.clone()).map_err(|e| {
                FetchError::Payload(format!("attributes block did not decode: {}", e))
            })?;
            Ok(BreedRecord::Nested(fields))
        }
        None => {
            let fields = serde_json::from_value(value.clone()).map_err(|e| {
                FetchError::Payload(format!("flat record did not decode: {}", e))
            })?;
            Ok(BreedRecord::Flat(fields))
        }
    }
}

impl BreedRecord {
    /// Normalized fields with the documented fallbacks applied
    pub fn into_summary(self) -> BreedSummary {
        let (name, description, life_min, life_max) = match self {
            BreedRecord::Nested(attrs) => {
                let bounds = attrs.life.unwrap_or_default();
                (attrs.name, attrs.description, bounds.min, bounds.max)
            }
            BreedRecord::Flat(fields) => (
                fields.name.or(fields.breed),
                fields.description,
                fields.life_min,
                fields.life_max,
            ),
        };

        BreedSummary {
            breed_name: name.unwrap_or_else(|| UNKNOWN_BREED.to_string()),
            description: description.unwrap_or_else(|| NO_DESCRIPTION.to_string()),
            life_min,
            life_max,
            life_expectancy: life_expectancy(life_min, life_max),
        }
    }
}

/// Display range for the life bounds
///
/// Both bounds must be present; a partial pair reads as `N/A`.
pub fn life_expectancy(life_min: Option<i32>, life_max: Option<i32>) -> String {
    match (life_min, life_max) {
        (Some(min), Some(max)) => format!("{}-{} years", min, max),
        _ => "N/A".to_string(),
    }
}
