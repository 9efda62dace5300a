use std::sync::Arc;

use crate::autograd::graph::NodeId;
use crate::autograd::BackwardOp;
use crate::error::FerrogradError;
use crate::tensor::utils::{broadcast_shapes, broadcast_zip, reduce_gradient};
use crate::tensor::Tensor;

/// Element-wise addition with broadcasting.
pub fn add_op(a: &Tensor, b: &Tensor) -> Result<Tensor, FerrogradError> {
    let a_shape = a.shape();
    let b_shape = b.shape();
    let result_shape = broadcast_shapes(&a_shape, &b_shape)?;

    let result_data = {
        let a_guard = a.read_data();
        let b_guard = b.read_data();
        broadcast_zip(&a_guard, &b_guard, &result_shape, |x, y| x + y)
    };

    let result = Tensor::new(result_data, result_shape)?;

    if a.requires_grad() || b.requires_grad() {
        result.set_requires_grad(true)?;
        let grad_fn = AddBackward {
            a: a.clone(),
            b: b.clone(),
            a_shape,
            b_shape,
        };
        result.set_grad_fn(Some(Arc::new(grad_fn)))?;
    }
    Ok(result)
}

/// Backward node for addition. The upstream gradient flows to both inputs,
/// reduced over any broadcasted dimensions.
#[derive(Debug)]
struct AddBackward {
    a: Tensor,
    b: Tensor,
    a_shape: Vec<usize>,
    b_shape: Vec<usize>,
}

impl BackwardOp for AddBackward {
    fn backward(&self, grad_output: &Tensor) -> Result<Vec<Tensor>, FerrogradError> {
        let grad_a = reduce_gradient(grad_output, &self.a_shape)?;
        let grad_b = reduce_gradient(grad_output, &self.b_shape)?;
        Ok(vec![grad_a, grad_b])
    }

    fn inputs(&self) -> Vec<NodeId> {
        vec![self.a.node_id(), self.b.node_id()]
    }
}
