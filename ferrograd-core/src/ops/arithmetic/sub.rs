use std::sync::Arc;

use crate::autograd::graph::NodeId;
use crate::autograd::BackwardOp;
use crate::error::FerrogradError;
use crate::tensor::utils::{broadcast_shapes, broadcast_zip, reduce_gradient};
use crate::tensor::Tensor;

/// Element-wise subtraction with broadcasting.
pub fn sub_op(a: &Tensor, b: &Tensor) -> Result<Tensor, FerrogradError> {
    let a_shape = a.shape();
    let b_shape = b.shape();
    let result_shape = broadcast_shapes(&a_shape, &b_shape)?;

    let result_data = {
        let a_guard = a.read_data();
        let b_guard = b.read_data();
        broadcast_zip(&a_guard, &b_guard, &result_shape, |x, y| x - y)
    };

    let result = Tensor::new(result_data, result_shape)?;

    if a.requires_grad() || b.requires_grad() {
        result.set_requires_grad(true)?;
        let grad_fn = SubBackward {
            a: a.clone(),
            b: b.clone(),
            a_shape,
            b_shape,
        };
        result.set_grad_fn(Some(Arc::new(grad_fn)))?;
    }
    Ok(result)
}

/// Backward node for subtraction: the upstream gradient flows unchanged to
/// the minuend and negated to the subtrahend.
#[derive(Debug)]
struct SubBackward {
    a: Tensor,
    b: Tensor,
    a_shape: Vec<usize>,
    b_shape: Vec<usize>,
}

impl BackwardOp for SubBackward {
    fn backward(&self, grad_output: &Tensor) -> Result<Vec<Tensor>, FerrogradError> {
        let grad_a = reduce_gradient(grad_output, &self.a_shape)?;

        let negated: Vec<f32> = grad_output.read_data().data.iter().map(|g| -g).collect();
        let negated = Tensor::new(negated, grad_output.shape())?;
        let grad_b = reduce_gradient(&negated, &self.b_shape)?;

        Ok(vec![grad_a, grad_b])
    }

    fn inputs(&self) -> Vec<NodeId> {
        vec![self.a.node_id(), self.b.node_id()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tensor_with_grad(data: Vec<f32>, shape: Vec<usize>) -> Tensor {
        let t = Tensor::new(data, shape).unwrap();
        t.set_requires_grad(true).unwrap();
        t
    }

    #[test]
    fn test_sub_forward() {
        let a = Tensor::new(vec![5.0, 6.0, 7.0, 8.0], vec![2, 2]).unwrap();
        let b = Tensor::new(vec![1.0, 2.0, 3.0, 4.0], vec![2, 2]).unwrap();
        let result = sub_op(&a, &b).unwrap();
        assert_eq!(result.get_data(), vec![4.0, 4.0, 4.0, 4.0]);
    }

    #[test]
    fn test_sub_backward() {
        let a = tensor_with_grad(vec![5.0, 6.0], vec![2]);
        let b = tensor_with_grad(vec![1.0, 2.0], vec![2]);
        let result = sub_op(&a, &b).unwrap();
        let loss = crate::ops::reduction::sum_op(&result).unwrap();
        loss.backward(None).unwrap();

        assert_eq!(a.grad().unwrap().get_data(), vec![1.0, 1.0]);
        assert_eq!(b.grad().unwrap().get_data(), vec![-1.0, -1.0]);
    }

    #[test]
    fn test_sub_shape_mismatch() {
        let a = Tensor::new(vec![1.0; 4], vec![2, 2]).unwrap();
        let b = Tensor::new(vec![1.0; 6], vec![2, 3]).unwrap();
        assert!(matches!(
            sub_op(&a, &b).unwrap_err(),
            FerrogradError::BroadcastError { .. }
        ));
    }
}
