use std::sync::Arc;

use crate::autograd::graph::NodeId;
use crate::autograd::BackwardOp;
use crate::error::FerrogradError;
use crate::tensor::Tensor;

/// Hyperbolic tangent, element-wise. Output values lie in (-1, 1).
pub fn tanh_op(input: &Tensor) -> Result<Tensor, FerrogradError> {
    let (result_data, shape) = {
        let guard = input.read_data();
        let data: Vec<f32> = guard.data.iter().map(|&x| x.tanh()).collect();
        (data, guard.shape.clone())
    };

    let result = Tensor::new(result_data, shape)?;

    if input.requires_grad() {
        result.set_requires_grad(true)?;
        let grad_fn = TanhBackward {
            input: input.clone(),
        };
        result.set_grad_fn(Some(Arc::new(grad_fn)))?;
    }
    Ok(result)
}

/// Backward node for tanh: d(tanh x)/dx = 1 - tanh(x)^2, recomputed from the
/// stored input.
#[derive(Debug)]
struct TanhBackward {
    input: Tensor,
}

impl BackwardOp for TanhBackward {
    fn backward(&self, grad_output: &Tensor) -> Result<Vec<Tensor>, FerrogradError> {
        let input_guard = self.input.read_data();
        let grad_guard = grad_output.read_data();
        let grad: Vec<f32> = input_guard
            .data
            .iter()
            .zip(grad_guard.data.iter())
            .map(|(&x, &g)| {
                let y = x.tanh();
                g * (1.0 - y * y)
            })
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
    use approx::assert_relative_eq;

    #[test]
    fn test_tanh_forward() {
        let t = Tensor::new(vec![-1.0, 0.0, 1.0], vec![3]).unwrap();
        let result = tanh_op(&t).unwrap();
        let data = result.get_data();
        assert_relative_eq!(data[0], (-1.0f32).tanh());
        assert_eq!(data[1], 0.0);
        assert_relative_eq!(data[2], 1.0f32.tanh());
        assert!(data.iter().all(|&y| y > -1.0 && y < 1.0));
    }

    #[test]
    fn test_tanh_backward() {
        let t = Tensor::new(vec![0.0, 0.5], vec![2]).unwrap();
        t.set_requires_grad(true).unwrap();
        let result = tanh_op(&t).unwrap();
        let loss = crate::ops::reduction::sum_op(&result).unwrap();
        loss.backward(None).unwrap();

        let grad = t.grad().unwrap().get_data();
        // d/dx tanh(0) = 1
        assert_relative_eq!(grad[0], 1.0);
        let y = 0.5f32.tanh();
        assert_relative_eq!(grad[1], 1.0 - y * y, epsilon = 1e-6);
    }
}
