use crate::error::FerrogradError;
use crate::ops::activation::{relu_op, tanh_op};
use crate::tensor::Tensor;

/// Activation function applied by a layer after its linear transformation.
///
/// Selected at layer construction; every variant is a pure element-wise
/// mapping, differentiable through the tensor's own graph recording.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Activation {
    /// Identity: passes the linear output through unchanged.
    Linear,
    Relu,
    Tanh,
}

impl Activation {
    pub fn apply(&self, input: &Tensor) -> Result<Tensor, FerrogradError> {
        match self {
            Activation::Linear => Ok(input.clone()),
            Activation::Relu => relu_op(input),
            Activation::Tanh => tanh_op(input),
        }
    }
}
