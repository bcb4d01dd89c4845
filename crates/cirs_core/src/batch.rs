//! Batches of position or position+velocity vectors.

use crate::error::InputError;

/// Number of components per vector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VectorDim {
    /// Position only.
    Three,
    /// Position followed by velocity.
    Six,
}

impl VectorDim {
    pub fn from_len(dim: usize) -> Result<Self, InputError> {
        match dim {
            3 => Ok(Self::Three),
            6 => Ok(Self::Six),
            other => Err(InputError::BadDimension(other)),
        }
    }

    pub fn components(self) -> usize {
        match self {
            Self::Three => 3,
            Self::Six => 6,
        }
    }

    pub fn has_velocity(self) -> bool {
        self == Self::Six
    }
}

/// N vectors of one dimension stored contiguously.
///
/// Vector `i` occupies `data[i * dim .. (i + 1) * dim]`; for 6D vectors
/// the first three values are the position and the last three the
/// velocity.
#[derive(Debug, Clone, PartialEq)]
pub struct VectorBatch {
    dim: VectorDim,
    data: Vec<f64>,
}

impl VectorBatch {
    /// Validate and wrap flat data. An empty batch is allowed.
    pub fn from_flat(dim: usize, data: Vec<f64>) -> Result<Self, InputError> {
        let dim = VectorDim::from_len(dim)?;
        if data.len() % dim.components() != 0 {
            return Err(InputError::RaggedBatch {
                len: data.len(),
                dim: dim.components(),
            });
        }
        Ok(Self { dim, data })
    }

    pub fn from_positions(positions: &[[f64; 3]]) -> Self {
        Self {
            dim: VectorDim::Three,
            data: positions.iter().flatten().copied().collect(),
        }
    }

    pub fn from_states(states: &[[f64; 6]]) -> Self {
        Self {
            dim: VectorDim::Six,
            data: states.iter().flatten().copied().collect(),
        }
    }

    /// An all-zero batch of `count` vectors.
    pub fn zeros(dim: VectorDim, count: usize) -> Self {
        Self {
            dim,
            data: vec![0.0; dim.components() * count],
        }
    }

    pub fn dim(&self) -> VectorDim {
        self.dim
    }

    /// Number of vectors.
    pub fn len(&self) -> usize {
        self.data.len() / self.dim.components()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// The `index`-th vector, or `None` past the end.
    pub fn vector(&self, index: usize) -> Option<&[f64]> {
        let n = self.dim.components();
        let start = index.checked_mul(n)?;
        self.data.get(start..start.checked_add(n)?)
    }

    pub fn iter(&self) -> std::slice::ChunksExact<'_, f64> {
        self.data.chunks_exact(self.dim.components())
    }

    pub fn as_flat(&self) -> &[f64] {
        &self.data
    }

    pub(crate) fn as_flat_mut(&mut self) -> &mut [f64] {
        &mut self.data
    }

    pub fn into_flat(self) -> Vec<f64> {
        self.data
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dimension_must_be_three_or_six() {
        assert_eq!(VectorDim::from_len(3), Ok(VectorDim::Three));
        assert_eq!(VectorDim::from_len(6), Ok(VectorDim::Six));
        assert_eq!(VectorDim::from_len(4), Err(InputError::BadDimension(4)));
        assert_eq!(
            VectorBatch::from_flat(0, vec![]),
            Err(InputError::BadDimension(0))
        );
    }

    #[test]
    fn ragged_data_rejected() {
        assert_eq!(
            VectorBatch::from_flat(6, vec![1.0; 9]),
            Err(InputError::RaggedBatch { len: 9, dim: 6 })
        );
    }

    #[test]
    fn empty_batch_allowed() {
        let batch = VectorBatch::from_flat(3, vec![]).unwrap();
        assert!(batch.is_empty());
        assert_eq!(batch.len(), 0);
        assert!(batch.iter().next().is_none());
    }

    #[test]
    fn vectors_are_contiguous() {
        let batch = VectorBatch::from_states(&[
            [1.0, 2.0, 3.0, 4.0, 5.0, 6.0],
            [7.0, 8.0, 9.0, 10.0, 11.0, 12.0],
        ]);
        assert_eq!(batch.len(), 2);
        assert_eq!(batch.vector(1), Some(&[7.0, 8.0, 9.0, 10.0, 11.0, 12.0][..]));
        assert_eq!(batch.vector(2), None);
        assert!(batch.dim().has_velocity());
    }

    #[test]
    fn huge_index_is_none() {
        let batch = VectorBatch::from_positions(&[[1.0, 2.0, 3.0]]);
        assert_eq!(batch.vector(usize::MAX), None);
        assert_eq!(batch.vector(usize::MAX / 3), None);
        let states = VectorBatch::from_states(&[[0.0; 6]]);
        assert_eq!(states.vector(usize::MAX / 6 + 1), None);
    }

    #[test]
    fn zeros_has_requested_shape() {
        let batch = VectorBatch::zeros(VectorDim::Three, 4);
        assert_eq!(batch.len(), 4);
        assert_eq!(batch.as_flat().len(), 12);
    }
}
