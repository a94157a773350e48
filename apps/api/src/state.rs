use std::sync::Arc;

use crate::profile::ProfileStore;
use crate::tailoring::pipeline::TailoringPipeline;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub pipeline: Arc<TailoringPipeline>,
    /// Read access for the history endpoint. The same store backs the pipeline.
    pub profiles: Arc<dyn ProfileStore>,
}
