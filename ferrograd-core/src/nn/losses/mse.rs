use crate::error::FerrogradError;
use crate::ops::arithmetic::{mul_op, sub_op};
use crate::ops::reduction::mean_op;
use crate::tensor::Tensor;

/// Mean squared error: `mean((prediction - target)^2)`.
///
/// Composed from differentiable ops, so the returned scalar carries a
/// recorded subgraph reaching back through the prediction into the network's
/// parameters.
///
/// # Errors
/// Returns [`FerrogradError::ShapeMismatch`] if prediction and target shapes
/// differ.
pub fn mse_loss(prediction: &Tensor, target: &Tensor) -> Result<Tensor, FerrogradError> {
    if prediction.shape() != target.shape() {
        return Err(FerrogradError::ShapeMismatch {
            expected: target.shape(),
            actual: prediction.shape(),
            operation: "mse_loss".to_string(),
        });
    }

    let diff = sub_op(prediction, target)?;
    let squared = mul_op(&diff, &diff)?;
    mean_op(&squared)
}

#[cfg(test)]
#[path = "mse_test.rs"]
mod tests;
