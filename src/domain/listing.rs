// src/domain/listing.rs

use serde::Serialize;
use serde_json::{Map, Value};
use std::fmt;

pub const DEFAULT_NAME: &str = "Unnamed Property";
pub const DEFAULT_ADDRESS: &str = "Address not available";
pub const DEFAULT_AVAILABLE: &str = "Contact for availability";
pub const DEFAULT_IMAGE: &str = "/placeholder-apartment.jpg";

/// Store-assigned document id. The only key used for marker lifecycle.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct ListingId(pub String);

impl ListingId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ListingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ListingId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl LatLng {
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    fn checked(lat: f64, lng: f64) -> Option<Self> {
        let valid = lat.is_finite()
            && lng.is_finite()
            && (-90.0..=90.0).contains(&lat)
            && (-180.0..=180.0).contains(&lng);
        valid.then_some(Self { lat, lng })
    }
}

/// A record as it comes out of the document store: an id plus whatever fields
/// the document happens to carry.
#[derive(Debug, Clone, Default)]
pub struct RawListing {
    pub id: String,
    pub fields: Map<String, Value>,
}

impl RawListing {
    pub fn new(id: impl Into<String>, fields: Map<String, Value>) -> Self {
        Self {
            id: id.into(),
            fields,
        }
    }

    /// Builds a raw record from a JSON object body. Non-object bodies yield a
    /// record with no fields.
    pub fn from_value(id: impl Into<String>, body: Value) -> Self {
        let fields = match body {
            Value::Object(map) => map,
            _ => Map::new(),
        };
        Self::new(id, fields)
    }
}

/// Canonical rental listing. Immutable once normalized; a refetch replaces
/// the whole set.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Listing {
    pub id: ListingId,
    pub name: String,
    pub address: String,
    pub rent: Option<f64>,
    pub bedrooms: Option<u32>,
    pub bathrooms: Option<f64>,
    pub distance: Option<f64>,
    pub rating: Option<f64>,
    pub reviews: u32,
    pub available: String,
    pub image: String,
    pub featured: bool,
    pub amenities: Vec<String>,
    pub coordinates: Option<LatLng>,
}

impl Listing {
    /// Resolves every field of a raw record to its canonical form. Missing or
    /// unusable values fall back to their defaults; this never fails.
    pub fn normalize(raw: RawListing) -> Self {
        let f = &raw.fields;

        Self {
            name: text(f, "name").unwrap_or_else(|| DEFAULT_NAME.to_string()),
            address: text(f, "address").unwrap_or_else(|| DEFAULT_ADDRESS.to_string()),
            rent: non_negative(f, "rent"),
            bedrooms: whole(f, "bedrooms"),
            bathrooms: non_negative(f, "bathrooms"),
            distance: non_negative(f, "distance"),
            rating: non_negative(f, "rating").filter(|r| *r <= 5.0),
            reviews: whole(f, "reviews").unwrap_or(0),
            available: text(f, "available").unwrap_or_else(|| DEFAULT_AVAILABLE.to_string()),
            image: text(f, "image").unwrap_or_else(|| DEFAULT_IMAGE.to_string()),
            featured: f.get("featured").and_then(Value::as_bool).unwrap_or(false),
            amenities: amenities(f),
            coordinates: f.get("coordinates").and_then(coordinates),
            id: ListingId(raw.id),
        }
    }

    pub fn rent_label(&self) -> String {
        match self.rent {
            Some(rent) => format!("${}/month", format_amount(rent)),
            None => "Contact for price".to_string(),
        }
    }

    /// Short label drawn inside the map marker.
    pub fn bedrooms_label(&self) -> String {
        self.bedrooms
            .map(|b| b.to_string())
            .unwrap_or_else(|| "?".to_string())
    }

    pub fn distance_label(&self) -> String {
        match self.distance {
            Some(d) => format!("{d:.1} mi to campus"),
            None => "Distance unknown".to_string(),
        }
    }
}

fn format_amount(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{value:.0}")
    } else {
        format!("{value:.2}")
    }
}

fn text(fields: &Map<String, Value>, key: &str) -> Option<String> {
    fields
        .get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.trim().is_empty())
        .map(str::to_string)
}

fn non_negative(fields: &Map<String, Value>, key: &str) -> Option<f64> {
    fields
        .get(key)
        .and_then(Value::as_f64)
        .filter(|v| v.is_finite() && *v >= 0.0)
}

fn whole(fields: &Map<String, Value>, key: &str) -> Option<u32> {
    non_negative(fields, key)
        .filter(|v| v.fract() == 0.0 && *v <= f64::from(u32::MAX))
        .map(|v| v as u32)
}

fn amenities(fields: &Map<String, Value>) -> Vec<String> {
    match fields.get("amenities") {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(Value::as_str)
            .map(str::to_string)
            .collect(),
        _ => Vec::new(),
    }
}

fn coordinates(value: &Value) -> Option<LatLng> {
    match value {
        Value::Array(pair) if pair.len() == 2 => {
            LatLng::checked(pair[0].as_f64()?, pair[1].as_f64()?)
        }
        Value::Object(obj) => {
            let lat = obj.get("lat").or_else(|| obj.get("latitude"))?.as_f64()?;
            let lng = obj
                .get("lng")
                .or_else(|| obj.get("lon"))
                .or_else(|| obj.get("longitude"))?
                .as_f64()?;
            LatLng::checked(lat, lng)
        }
        _ => None,
    }
}
