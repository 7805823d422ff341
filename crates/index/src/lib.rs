//! # Schema Index
//!
//! Exact nearest-neighbour search over table summary embeddings.
//!
//! The index is a flat, row-major matrix scanned linearly on every query.
//! Results are exact and reproducible.
//!
//! ## Contract
//!
//! - The dimension is fixed at construction and an index with zero vectors is
//!   always constructible.
//! - [`FlatIndex::build`] replaces all contents; there is no incremental update.
//! - [`FlatIndex::search`] returns up to `k` hits ordered by ascending squared
//!   Euclidean distance. Row `i` of the index is position `i`, so callers can
//!   map hits straight back onto the sequence the vectors were built from.
//! - Searching an empty index is an error ([`IndexError::Empty`]), never an
//!   empty success.
//!
//! ## Example
//!
//! ```
//! use index::FlatIndex;
//!
//! let mut index = FlatIndex::new(2);
//! index.build(vec![vec![0.0, 0.0], vec![1.0, 1.0]]).unwrap();
//!
//! let hits = index.search(&[0.9, 0.9], 1).unwrap();
//! assert_eq!(hits[0].position, 1);
//! ```

mod flat;

pub use flat::{FlatIndex, Neighbor};

use thiserror::Error;

/// Errors surfaced by index construction and search.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum IndexError {
    /// A vector (stored or query) does not match the index dimension.
    #[error("dimension mismatch: expected {expected}, got {got}")]
    DimensionMismatch { expected: usize, got: usize },
    /// The index holds no vectors; callers must check emptiness before searching.
    #[error("index holds no vectors")]
    Empty,
}
