// src/source/firestore.rs
//
// Read-only Firestore REST client. Lists every document of a collection,
// following page tokens, and flattens Firestore's typed values into plain JSON.

use super::{FetchError, ListingSource};
use crate::domain::RawListing;
use reqwest::blocking::Client;
use serde::Deserialize;
use serde_json::{Map, Number, Value};
use std::time::Duration;
use tracing::debug;
use url::Url;

const FIRESTORE_BASE: &str = "https://firestore.googleapis.com/v1/";
const PAGE_SIZE: u32 = 300;
const MAX_PAGES: usize = 100;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListDocumentsResponse {
    #[serde(default)]
    documents: Vec<Document>,
    next_page_token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Document {
    name: String,
    #[serde(default)]
    fields: Map<String, Value>,
}

pub struct FirestoreSource {
    client: Client,
    base: Url,
    project_id: String,
    api_key: Option<String>,
}

impl FirestoreSource {
    pub fn new(project_id: impl Into<String>, api_key: Option<String>) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| FetchError::Network(e.to_string()))?;
        let base = Url::parse(FIRESTORE_BASE).map_err(|e| FetchError::Config(e.to_string()))?;

        Ok(Self {
            client,
            base,
            project_id: project_id.into(),
            api_key,
        })
    }

    fn page_url(&self, collection: &str, page_token: Option<&str>) -> Result<Url, FetchError> {
        let path = format!(
            "projects/{}/databases/(default)/documents/{}",
            self.project_id, collection
        );
        let mut url = self
            .base
            .join(&path)
            .map_err(|e| FetchError::Config(format!("bad collection path: {e}")))?;

        {
            let mut q = url.query_pairs_mut();
            q.append_pair("pageSize", &PAGE_SIZE.to_string());
            if let Some(token) = page_token {
                q.append_pair("pageToken", token);
            }
            if let Some(key) = &self.api_key {
                q.append_pair("key", key);
            }
        }
        Ok(url)
    }

    fn fetch_page(&self, url: Url) -> Result<ListDocumentsResponse, FetchError> {
        let resp = self
            .client
            .get(url)
            .send()
            .map_err(|e| FetchError::Network(e.to_string()))?;

        let status = resp.status();
        let text = resp
            .text()
            .map_err(|e| FetchError::Network(e.to_string()))?;

        if !status.is_success() {
            return Err(FetchError::Network(format!("Firestore HTTP {status}: {text}")));
        }

        parse_page(&text)
    }
}

impl ListingSource for FirestoreSource {
    fn fetch_all(&self, collection: &str) -> Result<Vec<RawListing>, FetchError> {
        let mut out = Vec::new();
        let mut token: Option<String> = None;

        for page in 1..=MAX_PAGES {
            let url = self.page_url(collection, token.as_deref())?;
            let resp = self.fetch_page(url)?;
            debug!(page, documents = resp.documents.len(), "fetched Firestore page");

            out.extend(resp.documents.into_iter().map(into_raw));

            match resp.next_page_token {
                Some(next) if !next.is_empty() => token = Some(next),
                _ => return Ok(out),
            }
        }

        Err(FetchError::Malformed(format!(
            "more than {MAX_PAGES} pages in {collection}"
        )))
    }
}

fn parse_page(text: &str) -> Result<ListDocumentsResponse, FetchError> {
    serde_json::from_str(text).map_err(|e| FetchError::Malformed(e.to_string()))
}

fn into_raw(doc: Document) -> RawListing {
    let id = doc.name.rsplit('/').next().unwrap_or_default().to_string();
    let fields = doc
        .fields
        .iter()
        .map(|(k, v)| (k.clone(), decode_value(v)))
        .collect();
    RawListing::new(id, fields)
}

/// Flattens one Firestore typed value (`{"integerValue": "3"}` and friends).
/// Anything unrecognised becomes `null`, which normalization then defaults.
fn decode_value(value: &Value) -> Value {
    let Some(obj) = value.as_object() else {
        return Value::Null;
    };
    let Some((kind, inner)) = obj.iter().next() else {
        return Value::Null;
    };

    match kind.as_str() {
        "stringValue" | "timestampValue" | "referenceValue" => inner.clone(),
        "booleanValue" => inner.clone(),
        "nullValue" => Value::Null,
        "integerValue" => match inner {
            Value::String(s) => s.parse::<i64>().map(Value::from).unwrap_or(Value::Null),
            Value::Number(_) => inner.clone(),
            _ => Value::Null,
        },
        "doubleValue" => inner
            .as_f64()
            .and_then(Number::from_f64)
            .map(Value::Number)
            .unwrap_or(Value::Null),
        "geoPointValue" => {
            let mut point = Map::new();
            point.insert("latitude".into(), inner.get("latitude").cloned().unwrap_or(Value::Null));
            point.insert("longitude".into(), inner.get("longitude").cloned().unwrap_or(Value::Null));
            Value::Object(point)
        }
        "arrayValue" => Value::Array(
            inner
                .get("values")
                .and_then(Value::as_array)
                .map(|vs| vs.iter().map(decode_value).collect())
                .unwrap_or_default(),
        ),
        "mapValue" => Value::Object(
            inner
                .get("fields")
                .and_then(Value::as_object)
                .map(|fs| fs.iter().map(|(k, v)| (k.clone(), decode_value(v))).collect())
                .unwrap_or_default(),
        ),
        _ => Value::Null,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{LatLng, Listing};
    use serde_json::json;

    #[test]
    fn decodes_scalar_values() {
        assert_eq!(decode_value(&json!({ "stringValue": "Beaver Hill" })), json!("Beaver Hill"));
        assert_eq!(decode_value(&json!({ "integerValue": "1150" })), json!(1150));
        assert_eq!(decode_value(&json!({ "doubleValue": 0.4 })), json!(0.4));
        assert_eq!(decode_value(&json!({ "booleanValue": true })), json!(true));
        assert_eq!(decode_value(&json!({ "nullValue": null })), Value::Null);
        assert_eq!(decode_value(&json!({ "integerValue": "lots" })), Value::Null);
        assert_eq!(decode_value(&json!("bare")), Value::Null);
    }

    #[test]
    fn decodes_nested_values() {
        let v = decode_value(&json!({
            "arrayValue": { "values": [
                { "stringValue": "Gym" },
                { "mapValue": { "fields": { "n": { "integerValue": "2" } } } }
            ]}
        }));
        assert_eq!(v, json!(["Gym", { "n": 2 }]));
        assert_eq!(decode_value(&json!({ "arrayValue": {} })), json!([]));
    }

    #[test]
    fn page_documents_normalize_into_listings() {
        let page = parse_page(
            r#"{
              "documents": [{
                "name": "projects/p/databases/(default)/documents/testApartments/abc123",
                "fields": {
                  "name": { "stringValue": "The Legacy" },
                  "rent": { "integerValue": "975" },
                  "bedrooms": { "integerValue": "3" },
                  "coordinates": { "geoPointValue": { "latitude": 40.79, "longitude": -77.85 } }
                }
              }],
              "nextPageToken": "next"
            }"#,
        )
        .unwrap();

        assert_eq!(page.next_page_token.as_deref(), Some("next"));
        let raw = page.documents.into_iter().map(into_raw).next().unwrap();
        assert_eq!(raw.id, "abc123");

        let listing = Listing::normalize(raw);
        assert_eq!(listing.name, "The Legacy");
        assert_eq!(listing.rent, Some(975.0));
        assert_eq!(listing.bedrooms, Some(3));
        assert_eq!(listing.coordinates, Some(LatLng::new(40.79, -77.85)));
    }

    #[test]
    fn empty_collection_page_has_no_documents() {
        let page = parse_page("{}").unwrap();
        assert!(page.documents.is_empty());
        assert!(page.next_page_token.is_none());
    }

    #[test]
    fn page_url_carries_paging_and_key() {
        let src = FirestoreSource::new("sat-demo", Some("k3y".into())).unwrap();
        let url = src.page_url("testApartments", Some("tok")).unwrap();

        assert_eq!(
            url.path(),
            "/v1/projects/sat-demo/databases/(default)/documents/testApartments"
        );
        let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        assert!(pairs.contains(&("pageSize".into(), "300".into())));
        assert!(pairs.contains(&("pageToken".into(), "tok".into())));
        assert!(pairs.contains(&("key".into(), "k3y".into())));
    }
}
