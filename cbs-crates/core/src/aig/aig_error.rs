use thiserror::Error;

use crate::basic_types::Literal;

/// Errors which can occur while building or simulating an [`Aig`](super::Aig).
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum AigError {
    #[error("The literal {literal} refers to a node which does not exist (the graph has {num_nodes} nodes)")]
    UnknownNode { literal: Literal, num_nodes: usize },
    #[error("Expected values for {expected} inputs but {provided} values were provided")]
    InputCountMismatch { expected: usize, provided: usize },
}
