use crate::config::Config;
use crate::controller::ViewController;
use crate::map::SnapshotMap;
use crate::responses::error_to_response;
use crate::router::{handle, AppState};
use crate::source::{DocumentStore, FetchError, FirestoreSource, ListingSource};
use astra::Server;
use std::sync::Arc;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

mod config;
mod controller;
mod domain;
mod errors;
mod map;
mod responses;
mod router;
mod source;
mod templates;

#[cfg(test)]
mod tests;

fn build_source(config: &Config) -> Result<Box<dyn ListingSource>, FetchError> {
    if let Some(project) = &config.firestore_project_id {
        info!(project = %project, "using Firestore document source");
        let source = FirestoreSource::new(project.clone(), config.firestore_api_key.clone())?;
        return Ok(Box::new(source));
    }

    info!(path = %config.document_db, "using SQLite document store");
    let store = DocumentStore::open(config.document_db.clone())?;
    if let Some(seed) = &config.seed_file {
        if let Err(e) = store.import_file(&config.collection, seed) {
            warn!(error = %e, "seed import failed");
        }
    }
    Ok(Box::new(store))
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = match Config::from_env() {
        Ok(c) => c,
        Err(e) => {
            error!("Configuration error: {e}");
            std::process::exit(1);
        }
    };

    // 1. View state, with the map attached up front so markers appear as
    //    soon as the listings land.
    let mut view = ViewController::new();
    let _ = view.attach_map(SnapshotMap::new());
    let ticket = view.begin_fetch();
    let state = Arc::new(AppState::new(view));

    // 2. Fetch in the background; the pages show "Loading" until it lands.
    match build_source(&config) {
        Ok(source) => {
            let state = Arc::clone(&state);
            let collection = config.collection.clone();
            std::thread::spawn(move || {
                let result = source.fetch_all(&collection);
                match state.view() {
                    Ok(mut view) => {
                        view.complete_fetch(ticket, result);
                    }
                    Err(e) => error!("Could not apply fetch result: {e}"),
                }
            });
        }
        Err(e) => {
            if let Ok(mut view) = state.view() {
                view.complete_fetch(ticket, Err(e));
            }
        }
    }

    // 3. Serve.
    info!("Starting server at http://{}", config.bind_addr);
    let server = Server::bind(&config.bind_addr).max_workers(config.max_workers);

    let result = server.serve(move |req, _info| match handle(req, &state) {
        Ok(resp) => resp,
        Err(err) => error_to_response(err),
    });

    if let Err(e) = result {
        error!("Server ended with error: {e}");
    }

    info!("Server shut down cleanly.");
}
