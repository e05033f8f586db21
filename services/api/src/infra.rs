use metrics_exporter_prometheus::PrometheusHandle;
use propdesk::catalog::{CatalogSeed, InMemoryCatalog};
use propdesk::error::AppError;
use std::path::Path;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tracing::info;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Build the catalog from a seed file, or the built-in demo portfolio.
pub(crate) fn load_catalog(seed_path: Option<&Path>) -> Result<InMemoryCatalog, AppError> {
    let seed = match seed_path {
        Some(path) => {
            info!(path = %path.display(), "loading catalog seed");
            CatalogSeed::from_path(path)?
        }
        None => CatalogSeed::demo(),
    };
    Ok(seed.into_catalog()?)
}
