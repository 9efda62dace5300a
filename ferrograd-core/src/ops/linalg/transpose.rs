use std::sync::Arc;

use crate::autograd::graph::NodeId;
use crate::autograd::BackwardOp;
use crate::error::FerrogradError;
use crate::tensor::Tensor;

/// Transpose of a 2-D tensor, materialized contiguously.
///
/// # Errors
/// Returns [`FerrogradError::UnsupportedOperation`] for tensors that are not
/// 2-D.
pub fn transpose_op(a: &Tensor) -> Result<Tensor, FerrogradError> {
    let shape = a.shape();
    if shape.len() != 2 {
        return Err(FerrogradError::UnsupportedOperation(format!(
            "transpose requires a 2-D tensor, got shape {:?}",
            shape
        )));
    }
    let (rows, cols) = (shape[0], shape[1]);

    let mut output = vec![0.0f32; rows * cols];
    {
        let guard = a.read_data();
        for i in 0..rows {
            for j in 0..cols {
                output[j * rows + i] = guard.data[i * cols + j];
            }
        }
    }

    let result = Tensor::new(output, vec![cols, rows])?;

    if a.requires_grad() {
        result.set_requires_grad(true)?;
        let grad_fn = TransposeBackward { input: a.clone() };
        result.set_grad_fn(Some(Arc::new(grad_fn)))?;
    }
    Ok(result)
}

/// Backward node for transpose: the gradient transposes back.
#[derive(Debug)]
struct TransposeBackward {
    input: Tensor,
}

impl BackwardOp for TransposeBackward {
    fn backward(&self, grad_output: &Tensor) -> Result<Vec<Tensor>, FerrogradError> {
        Ok(vec![transpose_op(grad_output)?])
    }

    fn inputs(&self) -> Vec<NodeId> {
        vec![self.input.node_id()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transpose_forward() {
        let a = Tensor::new(vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0], vec![2, 3]).unwrap();
        let t = transpose_op(&a).unwrap();
        assert_eq!(t.shape(), vec![3, 2]);
        assert_eq!(t.get_data(), vec![1.0, 4.0, 2.0, 5.0, 3.0, 6.0]);
    }

    #[test]
    fn test_transpose_rank_error() {
        let a = Tensor::new(vec![1.0, 2.0], vec![2]).unwrap();
        assert!(matches!(
            transpose_op(&a).unwrap_err(),
            FerrogradError::UnsupportedOperation(_)
        ));
    }

    #[test]
    fn test_transpose_backward() {
        let a = Tensor::new(vec![1.0, 2.0, 3.0, 4.0], vec![2, 2]).unwrap();
        a.set_requires_grad(true).unwrap();
        let t = transpose_op(&a).unwrap();
        let loss = crate::ops::reduction::sum_op(&t).unwrap();
        loss.backward(None).unwrap();
        assert_eq!(a.grad().unwrap().get_data(), vec![1.0; 4]);
    }
}
