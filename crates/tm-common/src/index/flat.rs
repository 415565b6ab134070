use super::IndexError;

/// One search result: the vector's slot and its L2 distance to the query.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SearchHit {
    pub slot: usize,
    pub distance: f32,
}

/// Exact nearest-neighbor index over a row-major vector array.
///
/// Append-only: a slot, once assigned, never moves, which is what lets the
/// metadata table key on insertion order alone. There is no removal; shrink
/// means rebuild.
#[derive(Debug, Clone, PartialEq)]
pub struct FlatIndex {
    dimension: usize,
    data: Vec<f32>,
}

impl FlatIndex {
    pub fn new(dimension: usize) -> Self {
        Self {
            dimension: dimension.max(1),
            data: Vec::new(),
        }
    }

    pub fn from_parts(dimension: usize, data: Vec<f32>) -> Result<Self, IndexError> {
        let dimension = dimension.max(1);
        if data.len() % dimension != 0 {
            return Err(IndexError::DimensionMismatch {
                expected: dimension,
                actual: data.len() % dimension,
            });
        }
        Ok(Self { dimension, data })
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }

    pub fn len(&self) -> usize {
        self.data.len() / self.dimension
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn as_flat_slice(&self) -> &[f32] {
        &self.data
    }

    /// Append a vector; the returned slot equals the previous vector count.
    pub fn push(&mut self, vector: &[f32]) -> Result<usize, IndexError> {
        if vector.len() != self.dimension {
            return Err(IndexError::DimensionMismatch {
                expected: self.dimension,
                actual: vector.len(),
            });
        }
        let slot = self.len();
        self.data.extend_from_slice(vector);
        Ok(slot)
    }

    pub fn vector(&self, slot: usize) -> Option<&[f32]> {
        let start = slot.checked_mul(self.dimension)?;
        self.data.get(start..start + self.dimension)
    }

    /// Exact search, ascending by L2 distance, at most `k` hits. `k` larger
    /// than the stored count returns every vector; an empty index returns an
    /// empty list rather than an error so ranking can degrade to "no
    /// matches".
    pub fn search(&self, query: &[f32], k: usize) -> Result<Vec<SearchHit>, IndexError> {
        if query.len() != self.dimension {
            return Err(IndexError::DimensionMismatch {
                expected: self.dimension,
                actual: query.len(),
            });
        }

        let mut hits: Vec<SearchHit> = self
            .data
            .chunks_exact(self.dimension)
            .enumerate()
            .map(|(slot, row)| SearchHit {
                slot,
                distance: l2_distance(query, row),
            })
            .collect();

        // Stable sort keeps equal distances in slot order.
        hits.sort_by(|a, b| a.distance.total_cmp(&b.distance));
        hits.truncate(k);
        Ok(hits)
    }
}

/// Euclidean (L2) distance; lower means more similar.
pub fn l2_distance(a: &[f32], b: &[f32]) -> f32 {
    a.iter()
        .zip(b)
        .map(|(x, y)| {
            let d = x - y;
            d * d
        })
        .sum::<f32>()
        .sqrt()
}
