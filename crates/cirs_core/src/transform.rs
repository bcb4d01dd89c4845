//! Applying a rotation to vector batches.
//!
//! Position and velocity are rotated by the same matrix. The term from
//! the motion of the CIP itself (of order 1e-12 relative) is neglected.

use cirs_frames::RotationMatrix;

use crate::batch::VectorBatch;
use crate::error::InputError;

/// `out = R · in` for every 3-vector of `input`, velocity included.
pub fn transform(matrix: &RotationMatrix, input: &VectorBatch) -> VectorBatch {
    let mut output = VectorBatch::zeros(input.dim(), input.len());
    rotate_blocks(matrix, input.as_flat(), output.as_flat_mut());
    output
}

/// Like [`transform`] but writes into a caller buffer, which must have
/// exactly as many values as `input`. Nothing is written on error.
pub fn transform_into(
    matrix: &RotationMatrix,
    input: &VectorBatch,
    output: &mut [f64],
) -> Result<(), InputError> {
    let expected = input.as_flat().len();
    if output.len() != expected {
        return Err(InputError::OutputLength {
            expected,
            actual: output.len(),
        });
    }
    rotate_blocks(matrix, input.as_flat(), output);
    Ok(())
}

// A 6-vector is two consecutive 3-blocks, so both dimensions reduce to
// rotating every 3-block.
fn rotate_blocks(matrix: &RotationMatrix, input: &[f64], output: &mut [f64]) {
    for (src, dst) in input.chunks_exact(3).zip(output.chunks_exact_mut(3)) {
        dst.copy_from_slice(&matrix.apply([src[0], src[1], src[2]]));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::batch::VectorDim;

    fn quarter_turn() -> RotationMatrix {
        // Passive Rz(90°): x̂ → -ŷ, ŷ → x̂.
        RotationMatrix::from_rows([[0.0, 1.0, 0.0], [-1.0, 0.0, 0.0], [0.0, 0.0, 1.0]])
    }

    #[test]
    fn positions_rotate() {
        let batch = VectorBatch::from_positions(&[[1.0, 0.0, 0.0], [0.0, 2.0, 3.0]]);
        let out = transform(&quarter_turn(), &batch);
        assert_eq!(out.as_flat(), &[0.0, -1.0, 0.0, 2.0, 0.0, 3.0]);
    }

    #[test]
    fn velocity_uses_same_matrix() {
        let batch = VectorBatch::from_states(&[[1.0, 0.0, 0.0, 0.0, 5.0, 0.0]]);
        let out = transform(&quarter_turn(), &batch);
        assert_eq!(out.dim(), VectorDim::Six);
        assert_eq!(out.as_flat(), &[0.0, -1.0, 0.0, 5.0, 0.0, 0.0]);
    }

    #[test]
    fn empty_in_empty_out() {
        let batch = VectorBatch::from_flat(6, vec![]).unwrap();
        let out = transform(&quarter_turn(), &batch);
        assert!(out.is_empty());
        assert_eq!(out.dim(), VectorDim::Six);
    }

    #[test]
    fn into_checks_length() {
        let batch = VectorBatch::from_positions(&[[1.0, 2.0, 3.0]]);
        let mut short = [7.0; 2];
        assert_eq!(
            transform_into(&quarter_turn(), &batch, &mut short),
            Err(InputError::OutputLength { expected: 3, actual: 2 })
        );
        assert_eq!(short, [7.0; 2]);

        let mut out = [0.0; 3];
        transform_into(&RotationMatrix::IDENTITY, &batch, &mut out).unwrap();
        assert_eq!(out, [1.0, 2.0, 3.0]);
    }
}
