use std::sync::Arc;

use crate::autograd::graph::NodeId;
use crate::autograd::BackwardOp;
use crate::error::FerrogradError;
use crate::tensor::Tensor;

/// Rectified Linear Unit: `relu(x) = max(0, x)`, element-wise.
pub fn relu_op(input: &Tensor) -> Result<Tensor, FerrogradError> {
    let (result_data, shape) = {
        let guard = input.read_data();
        let data: Vec<f32> = guard.data.iter().map(|&x| x.max(0.0)).collect();
        (data, guard.shape.clone())
    };

    let result = Tensor::new(result_data, shape)?;

    if input.requires_grad() {
        result.set_requires_grad(true)?;
        let grad_fn = ReluBackward {
            input: input.clone(),
        };
        result.set_grad_fn(Some(Arc::new(grad_fn)))?;
    }
    Ok(result)
}

/// Backward node for ReLU: the upstream gradient passes where the stored
/// input was positive and is zeroed elsewhere.
#[derive(Debug)]
struct ReluBackward {
    input: Tensor,
}

impl BackwardOp for ReluBackward {
    fn backward(&self, grad_output: &Tensor) -> Result<Vec<Tensor>, FerrogradError> {
        let input_guard = self.input.read_data();
        let grad_guard = grad_output.read_data();
        let grad: Vec<f32> = input_guard
            .data
            .iter()
            .zip(grad_guard.data.iter())
            .map(|(&x, &g)| if x > 0.0 { g } else { 0.0 })
            .collect();
        let shape = input_guard.shape.clone();
        drop(input_guard);
        drop(grad_guard);
        Ok(vec![Tensor::new(grad, shape)?])
    }

    fn inputs(&self) -> Vec<NodeId> {
        vec![self.input.node_id()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relu_forward() {
        let t = Tensor::new(vec![-2.0, -1.0, 0.0, 1.0, 2.0], vec![5]).unwrap();
        let result = relu_op(&t).unwrap();
        assert_eq!(result.get_data(), vec![0.0, 0.0, 0.0, 1.0, 2.0]);
        assert!(!result.requires_grad());
    }

    #[test]
    fn test_relu_backward() {
        let t = Tensor::new(vec![-2.0, -1.0, 0.0, 1.0, 2.0], vec![5]).unwrap();
        t.set_requires_grad(true).unwrap();
        let result = relu_op(&t).unwrap();
        let loss = crate::ops::reduction::sum_op(&result).unwrap();
        loss.backward(None).unwrap();
        assert_eq!(
            t.grad().unwrap().get_data(),
            vec![0.0, 0.0, 0.0, 1.0, 1.0]
        );
    }

    #[test]
    fn test_relu_propagate_requires_grad() {
        let t = Tensor::new(vec![-1.0, 1.0], vec![2]).unwrap();
        t.set_requires_grad(true).unwrap();
        let result = relu_op(&t).unwrap();
        assert!(result.requires_grad());
        assert!(result.grad_fn().is_some());
    }
}
