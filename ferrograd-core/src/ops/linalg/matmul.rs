use std::sync::Arc;

use crate::autograd::graph::NodeId;
use crate::autograd::BackwardOp;
use crate::error::FerrogradError;
use crate::ops::linalg::transpose::transpose_op;
use crate::tensor::Tensor;

/// Matrix multiplication C = A @ B for 2-D tensors.
///
/// A: [M, K], B: [K, N] -> C: [M, N].
///
/// # Errors
/// Returns [`FerrogradError::IncompatibleShapes`] if either input is not 2-D
/// or the inner dimensions do not match.
pub fn matmul_op(a: &Tensor, b: &Tensor) -> Result<Tensor, FerrogradError> {
    let a_shape = a.shape();
    let b_shape = b.shape();

    if a_shape.len() != 2 || b_shape.len() != 2 || a_shape[1] != b_shape[0] {
        return Err(FerrogradError::IncompatibleShapes {
            shape1: a_shape,
            shape2: b_shape,
            operation: "matmul".to_string(),
        });
    }

    let m = a_shape[0];
    let k = a_shape[1];
    let n = b_shape[1];

    let mut output = vec![0.0f32; m * n];
    {
        let a_guard = a.read_data();
        let b_guard = b.read_data();
        for i in 0..m {
            for j in 0..n {
                let mut sum = 0.0f32;
                for l in 0..k {
                    sum += a_guard.data[i * k + l] * b_guard.data[l * n + j];
                }
                output[i * n + j] = sum;
            }
        }
    }

    let result = Tensor::new(output, vec![m, n])?;

    if a.requires_grad() || b.requires_grad() {
        result.set_requires_grad(true)?;
        let grad_fn = MatmulBackward {
            a: a.clone(),
            b: b.clone(),
        };
        result.set_grad_fn(Some(Arc::new(grad_fn)))?;
    }
    Ok(result)
}

/// Backward node for matrix multiplication:
/// dA = dC @ B^T and dB = A^T @ dC.
#[derive(Debug)]
struct MatmulBackward {
    a: Tensor,
    b: Tensor,
}

impl BackwardOp for MatmulBackward {
    fn backward(&self, grad_output: &Tensor) -> Result<Vec<Tensor>, FerrogradError> {
        let grad_a = matmul_op(grad_output, &transpose_op(&self.b.detach())?)?;
        let grad_b = matmul_op(&transpose_op(&self.a.detach())?, grad_output)?;
        Ok(vec![grad_a, grad_b])
    }

    fn inputs(&self) -> Vec<NodeId> {
        vec![self.a.node_id(), self.b.node_id()]
    }
}
