pub mod mse;

pub use mse::mse_loss;

use crate::error::FerrogradError;
use crate::tensor::Tensor;

/// Loss function reducing a prediction/target pair to a scalar tensor.
///
/// Selected at network construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Loss {
    Mse,
}

impl Loss {
    pub fn compute(
        &self,
        prediction: &Tensor,
        target: &Tensor,
    ) -> Result<Tensor, FerrogradError> {
        match self {
            Loss::Mse => mse_loss(prediction, target),
        }
    }
}
