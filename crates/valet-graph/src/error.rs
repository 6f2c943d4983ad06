//! Graph-model error type.
//!
//! Only structural problems are errors: a mutation referencing a missing node
//! or edge, or input that would corrupt a derived graph. "No route exists" is
//! never an error anywhere in the workspace — callers get `None` instead.

use thiserror::Error;

/// Errors produced by `valet-graph` and shared by the crates built on it.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum GraphError {
    #[error("node `{0}` not found in graph")]
    NodeNotFound(String),

    #[error("edge `{start}` -> `{end}` not found in graph")]
    EdgeNotFound { start: String, end: String },

    #[error("edge `{start}` -> `{end}` references a node that does not exist")]
    DanglingEdge { start: String, end: String },

    #[error("edge `{start}` -> `{end}` is missing its geometry or tags; normalize the graph first")]
    MissingGeometry { start: String, end: String },
}

pub type GraphResult<T> = Result<T, GraphError>;
