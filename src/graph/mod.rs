//! Connection invariants and ancestor traversal over the canvas graph.

pub mod invariants;

pub use invariants::*;
