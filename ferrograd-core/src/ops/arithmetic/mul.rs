use std::sync::Arc;

use crate::autograd::graph::NodeId;
use crate::autograd::BackwardOp;
use crate::error::FerrogradError;
use crate::tensor::utils::{broadcast_shapes, broadcast_zip, reduce_gradient};
use crate::tensor::Tensor;

/// Element-wise multiplication with broadcasting.
pub fn mul_op(a: &Tensor, b: &Tensor) -> Result<Tensor, FerrogradError> {
    let a_shape = a.shape();
    let b_shape = b.shape();
    let result_shape = broadcast_shapes(&a_shape, &b_shape)?;

    let result_data = {
        let a_guard = a.read_data();
        let b_guard = b.read_data();
        broadcast_zip(&a_guard, &b_guard, &result_shape, |x, y| x * y)
    };

    let result = Tensor::new(result_data, result_shape)?;

    if a.requires_grad() || b.requires_grad() {
        result.set_requires_grad(true)?;
        let grad_fn = MulBackward {
            a: a.clone(),
            b: b.clone(),
            a_shape,
            b_shape,
        };
        result.set_grad_fn(Some(Arc::new(grad_fn)))?;
    }
    Ok(result)
}

/// Backward node for multiplication: d(a*b)/da = b and d(a*b)/db = a, each
/// multiplied by the upstream gradient and reduced over broadcasted
/// dimensions.
#[derive(Debug)]
struct MulBackward {
    a: Tensor,
    b: Tensor,
    a_shape: Vec<usize>,
    b_shape: Vec<usize>,
}

impl BackwardOp for MulBackward {
    fn backward(&self, grad_output: &Tensor) -> Result<Vec<Tensor>, FerrogradError> {
        // Detached inputs so gradient arithmetic does not record a graph.
        let grad_a_full = mul_op(grad_output, &self.b.detach())?;
        let grad_a = reduce_gradient(&grad_a_full, &self.a_shape)?;

        let grad_b_full = mul_op(grad_output, &self.a.detach())?;
        let grad_b = reduce_gradient(&grad_b_full, &self.b_shape)?;

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
    fn test_mul_forward() {
        let a = Tensor::new(vec![1.0, 2.0, 3.0], vec![3]).unwrap();
        let b = Tensor::new(vec![4.0, 5.0, 6.0], vec![3]).unwrap();
        let result = mul_op(&a, &b).unwrap();
        assert_eq!(result.get_data(), vec![4.0, 10.0, 18.0]);
    }

    #[test]
    fn test_mul_scalar_broadcast() {
        let a = Tensor::new(vec![1.0, 2.0, 3.0], vec![3]).unwrap();
        let half = Tensor::new(vec![0.5], vec![]).unwrap();
        let result = mul_op(&a, &half).unwrap();
        assert_eq!(result.get_data(), vec![0.5, 1.0, 1.5]);
        assert_eq!(result.shape(), vec![3]);
    }

    #[test]
    fn test_mul_backward() {
        let a = tensor_with_grad(vec![1.0, 2.0, 3.0], vec![3]);
        let b = tensor_with_grad(vec![4.0, 5.0, 6.0], vec![3]);
        let result = mul_op(&a, &b).unwrap();
        let loss = crate::ops::reduction::sum_op(&result).unwrap();
        loss.backward(None).unwrap();

        assert_eq!(a.grad().unwrap().get_data(), vec![4.0, 5.0, 6.0]);
        assert_eq!(b.grad().unwrap().get_data(), vec![1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_mul_backward_grad_is_detached() {
        let a = tensor_with_grad(vec![2.0], vec![1]);
        let b = tensor_with_grad(vec![3.0], vec![1]);
        let result = mul_op(&a, &b).unwrap();
        result.backward(Some(Tensor::new(vec![1.0], vec![1]).unwrap())).unwrap();
        let grad = a.grad().unwrap();
        assert!(!grad.requires_grad());
        assert!(grad.grad_fn().is_none());
    }
}
