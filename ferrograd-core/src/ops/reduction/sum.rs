use std::sync::Arc;

use crate::autograd::graph::NodeId;
use crate::autograd::BackwardOp;
use crate::error::FerrogradError;
use crate::tensor::Tensor;

/// Sums all elements of a tensor into a scalar tensor (shape `[]`).
pub fn sum_op(input: &Tensor) -> Result<Tensor, FerrogradError> {
    let (total, input_shape) = {
        let guard = input.read_data();
        (guard.data.iter().sum::<f32>(), guard.shape.clone())
    };

    let result = Tensor::new(vec![total], vec![])?;

    if input.requires_grad() {
        result.set_requires_grad(true)?;
        let grad_fn = SumBackward {
            input: input.clone(),
            input_shape,
        };
        result.set_grad_fn(Some(Arc::new(grad_fn)))?;
    }
    Ok(result)
}

/// Backward node for sum: the upstream scalar gradient broadcasts to every
/// input element.
#[derive(Debug)]
struct SumBackward {
    input: Tensor,
    input_shape: Vec<usize>,
}

impl BackwardOp for SumBackward {
    fn backward(&self, grad_output: &Tensor) -> Result<Vec<Tensor>, FerrogradError> {
        let g = grad_output.item()?;
        let numel: usize = self.input_shape.iter().product();
        Ok(vec![Tensor::new(vec![g; numel], self.input_shape.clone())?])
    }

    fn inputs(&self) -> Vec<NodeId> {
        vec![self.input.node_id()]
    }
}
