// src/source/documents.rs
//
// SQLite-backed document store: one JSON body per (collection, id).

use super::{FetchError, ListingSource};
use crate::domain::RawListing;
use chrono::Utc;
use rusqlite::{params, Connection};
use serde_json::Value;
use std::cell::RefCell;
use std::fs;
use std::path::Path;
use tracing::{info, warn};

const SCHEMA_SQL: &str = include_str!("../../sql/schema.sql");

// Thread-local connection slot, tagged with the path it was opened for.
thread_local! {
    static DB_CONN: RefCell<Option<(String, Connection)>> = RefCell::new(None);
}

#[derive(Debug, Clone)]
pub struct DocumentStore {
    path: String,
}

impl DocumentStore {
    pub fn new(path: impl Into<String>) -> Self {
        Self { path: path.into() }
    }

    /// Opens the store and applies the schema.
    pub fn open(path: impl Into<String>) -> Result<Self, FetchError> {
        let store = Self::new(path);
        store.with_conn(|conn| {
            conn.execute_batch(SCHEMA_SQL)
                .map_err(|e| FetchError::Database(format!("Failed to apply schema: {e}")))
        })?;
        Ok(store)
    }

    /// Provides this thread's connection to the closure, opening it on first use.
    pub fn with_conn<F, T>(&self, f: F) -> Result<T, FetchError>
    where
        F: FnOnce(&mut Connection) -> Result<T, FetchError>,
    {
        DB_CONN
            .try_with(|cell| {
                let mut slot = cell.borrow_mut();
                let stale = !matches!(slot.as_ref(), Some((path, _)) if *path == self.path);
                if stale {
                    let conn = Connection::open(&self.path)
                        .map_err(|e| FetchError::Database(format!("Open DB failed: {e}")))?;
                    *slot = Some((self.path.clone(), conn));
                }
                match slot.as_mut() {
                    Some((_, conn)) => f(conn),
                    None => Err(FetchError::Database("connection slot empty".into())),
                }
            })
            .map_err(|_| FetchError::Database("thread-local connection unavailable".into()))?
    }

    /// Inserts or replaces one document.
    pub fn put_document(&self, collection: &str, id: &str, body: &Value) -> Result<(), FetchError> {
        let body = serde_json::to_string(body)
            .map_err(|e| FetchError::Malformed(format!("unserializable body: {e}")))?;

        self.with_conn(|conn| {
            conn.execute(
                r#"
                insert into documents (collection, id, body, created_at)
                values (?1, ?2, ?3, ?4)
                on conflict(collection, id) do update set
                    body = excluded.body
                "#,
                params![collection, id, body, Utc::now()],
            )
            .map_err(|e| FetchError::Database(e.to_string()))?;
            Ok(())
        })
    }

    /// Imports a JSON array of documents. Each element carries its own `id`
    /// (string or number); elements without one are skipped.
    pub fn import_documents(&self, collection: &str, docs: &Value) -> Result<usize, FetchError> {
        let items = docs
            .as_array()
            .ok_or_else(|| FetchError::Malformed("expected a JSON array of documents".into()))?;

        let mut imported = 0;
        for item in items {
            let id = match item.get("id") {
                Some(Value::String(s)) if !s.is_empty() => s.clone(),
                Some(Value::Number(n)) => n.to_string(),
                _ => {
                    warn!("Skipping document: missing id");
                    continue;
                }
            };

            let mut body = item.clone();
            if let Value::Object(map) = &mut body {
                map.remove("id");
            }
            self.put_document(collection, &id, &body)?;
            imported += 1;
        }

        Ok(imported)
    }

    pub fn import_file(&self, collection: &str, path: impl AsRef<Path>) -> Result<usize, FetchError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)
            .map_err(|e| FetchError::Config(format!("Failed to read {}: {e}", path.display())))?;
        let docs: Value = serde_json::from_str(&text)
            .map_err(|e| FetchError::Malformed(format!("{}: {e}", path.display())))?;

        let n = self.import_documents(collection, &docs)?;
        info!(collection, count = n, file = %path.display(), "imported documents");
        Ok(n)
    }
}

impl ListingSource for DocumentStore {
    fn fetch_all(&self, collection: &str) -> Result<Vec<RawListing>, FetchError> {
        self.with_conn(|conn| {
            let mut stmt = conn
                .prepare("select id, body from documents where collection = ?1 order by rowid")
                .map_err(|e| FetchError::Database(e.to_string()))?;

            let rows = stmt
                .query_map(params![collection], |row| {
                    Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
                })
                .map_err(|e| FetchError::Database(e.to_string()))?;

            let mut out = Vec::new();
            for r in rows {
                let (id, body) = r.map_err(|e| FetchError::Database(e.to_string()))?;
                match serde_json::from_str::<Value>(&body) {
                    Ok(value) => out.push(RawListing::from_value(id, value)),
                    Err(e) => warn!(collection, id = %id, error = %e, "skipping malformed document"),
                }
            }
            Ok(out)
        })
    }
}
