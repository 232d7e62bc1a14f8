//! Application state.

use campusnet_graph::CampusGraph;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub graph: CampusGraph,
}

impl AppState {
    pub fn new(graph: CampusGraph) -> Self {
        Self { graph }
    }
}
