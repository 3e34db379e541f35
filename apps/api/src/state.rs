use std::sync::Arc;

use crate::agent_client::AgentGraph;
use crate::config::Config;

/// Shared application state injected into all route handlers via Axum extractors.
/// Immutable after startup; requests share nothing else.
#[derive(Clone)]
pub struct AppState {
    /// The external agent graph. `HttpAgentGraph` in production, scripted in tests.
    pub agent: Arc<dyn AgentGraph>,
    pub config: Config,
}
