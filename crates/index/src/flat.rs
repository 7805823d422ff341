use ndarray::{Array2, ArrayView1};
use serde::Serialize;

use crate::IndexError;

/// A single search hit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Neighbor {
    /// Row of the matched vector, i.e. its position in the build input.
    pub position: usize,
    /// Squared Euclidean distance to the query (lower = closer).
    pub distance: f32,
}

/// Flat squared-L2 index.
#[derive(Debug, Clone)]
pub struct FlatIndex {
    dimension: usize,
    vectors: Array2<f32>,
}

impl FlatIndex {
    /// Create an empty index for vectors of `dimension` components.
    pub fn new(dimension: usize) -> Self {
        Self {
            dimension,
            vectors: Array2::zeros((0, dimension)),
        }
    }

    /// Create an index and populate it in one step.
    pub fn from_vectors(dimension: usize, vectors: Vec<Vec<f32>>) -> Result<Self, IndexError> {
        let mut index = Self::new(dimension);
        index.build(vectors)?;
        Ok(index)
    }

    /// Replace the index contents with `vectors`.
    ///
    /// On error the previous contents are left untouched.
    pub fn build(&mut self, vectors: Vec<Vec<f32>>) -> Result<(), IndexError> {
        let rows = vectors.len();
        let mut flat = Vec::with_capacity(rows * self.dimension);
        for vector in vectors {
            if vector.len() != self.dimension {
                return Err(IndexError::DimensionMismatch {
                    expected: self.dimension,
                    got: vector.len(),
                });
            }
            flat.extend(vector);
        }

        // Lengths were checked above, so the shape always matches.
        self.vectors = Array2::from_shape_vec((rows, self.dimension), flat).map_err(|_| {
            IndexError::DimensionMismatch {
                expected: self.dimension,
                got: 0,
            }
        })?;

        tracing::debug!(vectors = rows, dimension = self.dimension, "flat index built");
        Ok(())
    }

    /// Return up to `k` nearest rows to `query`, closest first.
    ///
    /// Ties are broken by position so results are fully deterministic.
    pub fn search(&self, query: &[f32], k: usize) -> Result<Vec<Neighbor>, IndexError> {
        if self.is_empty() {
            return Err(IndexError::Empty);
        }
        if query.len() != self.dimension {
            return Err(IndexError::DimensionMismatch {
                expected: self.dimension,
                got: query.len(),
            });
        }

        let mut hits: Vec<Neighbor> = self
            .vectors
            .rows()
            .into_iter()
            .enumerate()
            .map(|(position, row)| Neighbor {
                position,
                distance: squared_l2_view(row, query),
            })
            .collect();

        hits.sort_by(|a, b| {
            a.distance
                .total_cmp(&b.distance)
                .then(a.position.cmp(&b.position))
        });
        hits.truncate(k);
        Ok(hits)
    }

    /// Vector dimension fixed at construction.
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// Number of stored vectors.
    pub fn len(&self) -> usize {
        self.vectors.nrows()
    }

    pub fn is_empty(&self) -> bool {
        self.vectors.nrows() == 0
    }

    /// Stored vector at `position`, if any.
    pub fn vector(&self, position: usize) -> Option<Vec<f32>> {
        (position < self.len()).then(|| self.vectors.row(position).to_vec())
    }
}

/// Squared Euclidean distance between a stored row and a query of the same length.
fn squared_l2_view(row: ArrayView1<'_, f32>, query: &[f32]) -> f32 {
    row.iter()
        .zip(query.iter())
        .map(|(x, y)| {
            let d = x - y;
            d * d
        })
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_index() -> FlatIndex {
        FlatIndex::from_vectors(
            3,
            vec![
                vec![1.0, 0.0, 0.0],
                vec![0.0, 1.0, 0.0],
                vec![0.0, 0.0, 1.0],
                vec![0.9, 0.1, 0.0],
            ],
        )
        .unwrap()
    }

    #[test]
    fn empty_index_is_constructible() {
        let index = FlatIndex::new(384);
        assert!(index.is_empty());
        assert_eq!(index.len(), 0);
        assert_eq!(index.dimension(), 384);
    }

    #[test]
    fn search_on_empty_index_fails() {
        let index = FlatIndex::new(3);
        let err = index.search(&[1.0, 0.0, 0.0], 1).unwrap_err();
        assert_eq!(err, IndexError::Empty);
    }

    #[test]
    fn building_from_nothing_keeps_dimension() {
        let index = FlatIndex::from_vectors(8, Vec::new()).unwrap();
        assert!(index.is_empty());
        assert_eq!(index.dimension(), 8);
    }

    #[test]
    fn search_orders_by_ascending_distance() {
        let index = sample_index();
        let hits = index.search(&[1.0, 0.0, 0.0], 4).unwrap();

        assert_eq!(hits.len(), 4);
        assert_eq!(hits[0].position, 0);
        assert_eq!(hits[0].distance, 0.0);
        assert_eq!(hits[1].position, 3);
        for pair in hits.windows(2) {
            assert!(pair[0].distance <= pair[1].distance);
        }
    }

    #[test]
    fn distances_are_squared_euclidean() {
        let index = FlatIndex::from_vectors(2, vec![vec![3.0, 4.0]]).unwrap();
        let hits = index.search(&[0.0, 0.0], 1).unwrap();
        assert!((hits[0].distance - 25.0).abs() < 1e-6);
    }

    #[test]
    fn search_never_pads_past_corpus() {
        let index = sample_index();
        let hits = index.search(&[0.0, 1.0, 0.0], 10).unwrap();
        assert_eq!(hits.len(), 4);
    }

    #[test]
    fn zero_k_returns_no_hits() {
        let index = sample_index();
        assert!(index.search(&[0.0, 1.0, 0.0], 0).unwrap().is_empty());
    }

    #[test]
    fn ties_break_by_position() {
        let index =
            FlatIndex::from_vectors(2, vec![vec![1.0, 0.0], vec![0.0, 1.0], vec![1.0, 0.0]])
                .unwrap();
        let hits = index.search(&[1.0, 0.0], 3).unwrap();
        assert_eq!(hits[0].position, 0);
        assert_eq!(hits[1].position, 2);
        assert_eq!(hits[2].position, 1);
    }

    #[test]
    fn build_rejects_wrong_dimension() {
        let mut index = sample_index();
        let err = index
            .build(vec![vec![1.0, 0.0, 0.0], vec![1.0, 0.0]])
            .unwrap_err();
        assert_eq!(
            err,
            IndexError::DimensionMismatch {
                expected: 3,
                got: 2
            }
        );
        // Failed build leaves the old contents in place.
        assert_eq!(index.len(), 4);
    }

    #[test]
    fn search_rejects_wrong_query_dimension() {
        let index = sample_index();
        let err = index.search(&[1.0, 0.0], 1).unwrap_err();
        assert!(matches!(err, IndexError::DimensionMismatch { .. }));
    }

    #[test]
    fn build_replaces_contents() {
        let mut index = sample_index();
        index.build(vec![vec![5.0, 5.0, 5.0]]).unwrap();
        assert_eq!(index.len(), 1);
        assert_eq!(index.vector(0), Some(vec![5.0, 5.0, 5.0]));
        assert_eq!(index.vector(1), None);
    }

    #[test]
    fn squared_l2_basics() {
        let row = [1.0, 2.0];
        assert_eq!(squared_l2_view(ArrayView1::from(&row[..]), &[1.0, 2.0]), 0.0);
        let origin = [0.0, 0.0];
        assert_eq!(squared_l2_view(ArrayView1::from(&origin[..]), &[1.0, 1.0]), 2.0);
    }
}
