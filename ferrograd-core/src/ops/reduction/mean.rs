use std::sync::Arc;

use crate::autograd::graph::NodeId;
use crate::autograd::BackwardOp;
use crate::error::FerrogradError;
use crate::tensor::Tensor;

/// Averages all elements of a tensor into a scalar tensor (shape `[]`).
///
/// # Errors
/// Returns [`FerrogradError::UnsupportedOperation`] for empty tensors.
pub fn mean_op(input: &Tensor) -> Result<Tensor, FerrogradError> {
    let (total, numel, input_shape) = {
        let guard = input.read_data();
        (guard.data.iter().sum::<f32>(), guard.numel(), guard.shape.clone())
    };
    if numel == 0 {
        return Err(FerrogradError::UnsupportedOperation(
            "mean of an empty tensor".to_string(),
        ));
    }

    let result = Tensor::new(vec![total / numel as f32], vec![])?;

    if input.requires_grad() {
        result.set_requires_grad(true)?;
        let grad_fn = MeanBackward {
            input: input.clone(),
            input_shape,
            n: numel as f32,
        };
        result.set_grad_fn(Some(Arc::new(grad_fn)))?;
    }
    Ok(result)
}

/// Backward node for mean: the upstream scalar gradient scaled by `1/N`
/// broadcasts to every input element.
#[derive(Debug)]
struct MeanBackward {
    input: Tensor,
    input_shape: Vec<usize>,
    n: f32,
}

impl BackwardOp for MeanBackward {
    fn backward(&self, grad_output: &Tensor) -> Result<Vec<Tensor>, FerrogradError> {
        let g = grad_output.item()? / self.n;
        let numel: usize = self.input_shape.iter().product();
        Ok(vec![Tensor::new(vec![g; numel], self.input_shape.clone())?])
    }

    fn inputs(&self) -> Vec<NodeId> {
        vec![self.input.node_id()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mean_forward() {
        let t = Tensor::new(vec![1.0, 2.0, 3.0, 4.0], vec![2, 2]).unwrap();
        let m = mean_op(&t).unwrap();
        assert_eq!(m.shape(), Vec::<usize>::new());
        assert_eq!(m.item().unwrap(), 2.5);
    }

    #[test]
    fn test_mean_backward() {
        let t = Tensor::new(vec![1.0, 2.0, 3.0, 4.0], vec![4]).unwrap();
        t.set_requires_grad(true).unwrap();
        let m = mean_op(&t).unwrap();
        m.backward(None).unwrap();
        assert_eq!(t.grad().unwrap().get_data(), vec![0.25; 4]);
    }

    #[test]
    fn test_mean_empty_tensor() {
        let t = Tensor::new(vec![], vec![0]).unwrap();
        assert!(matches!(
            mean_op(&t).unwrap_err(),
            FerrogradError::UnsupportedOperation(_)
        ));
    }
}
