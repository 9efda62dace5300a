use thiserror::Error;

use crate::error::FerrogradError;
use crate::tensor::Tensor;

/// Error type for gradient-checking failures.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GradCheckError {
    #[error("Gradient check failed for input {input_index}, element {element_index}: analytical {analytical:?} != numerical {numerical:?} (difference {difference:?})")]
    GradientMismatch {
        input_index: usize,
        element_index: usize,
        analytical: f32,
        numerical: f32,
        difference: f32,
    },

    #[error("Gradient check requires a single-element (scalar) output, got shape {shape:?}")]
    NonScalarOutput { shape: Vec<usize> },

    #[error("Input {input_index} requires grad but has no gradient after the backward pass.")]
    MissingAnalyticalGrad { input_index: usize },

    #[error("Numerical gradient is not finite for input {input_index}, element {element_index} (loss+: {loss_plus}, loss-: {loss_minus})")]
    NumericalGradNotFinite {
        input_index: usize,
        element_index: usize,
        loss_plus: f32,
        loss_minus: f32,
    },

    #[error("Tensor error during gradient check: {0}")]
    TensorError(FerrogradError),
}

impl From<FerrogradError> for GradCheckError {
    fn from(err: FerrogradError) -> Self {
        GradCheckError::TensorError(err)
    }
}

/// Checks analytical gradients against central finite differences.
///
/// `func` must map `inputs` to a scalar tensor. For every element of every
/// input flagged `requires_grad`, the element is perturbed by `+epsilon` and
/// `-epsilon`, the function re-evaluated, and the resulting numerical
/// gradient `(f(x+eps) - f(x-eps)) / (2*eps)` compared with the gradient
/// produced by the backward pass.
pub fn check_grad<F>(
    func: F,
    inputs: &[Tensor],
    epsilon: f32,
    tolerance: f32,
) -> Result<(), GradCheckError>
where
    F: Fn(&[Tensor]) -> Result<Tensor, FerrogradError>,
{
    // Analytical pass: fresh gradient state, forward, backward.
    for input in inputs {
        input.reset();
    }
    let output = func(inputs)?;
    if output.numel() != 1 {
        return Err(GradCheckError::NonScalarOutput {
            shape: output.shape(),
        });
    }
    output.backward(None)?;

    let mut analytical_grads = Vec::with_capacity(inputs.len());
    for (input_index, input) in inputs.iter().enumerate() {
        if input.requires_grad() {
            let grad = input
                .grad()
                .ok_or(GradCheckError::MissingAnalyticalGrad { input_index })?;
            analytical_grads.push(Some(grad.get_data()));
        } else {
            analytical_grads.push(None);
        }
    }

    // Numerical passes: perturb one element at a time. The perturbation runs
    // through the same forward function, so the recorded graph of the
    // analytical pass is irrelevant here; only data values change.
    for (input_index, input) in inputs.iter().enumerate() {
        let Some(analytical) = analytical_grads[input_index].as_ref() else {
            continue;
        };

        let original = input.get_data();
        for element_index in 0..original.len() {
            let base = original[element_index];

            input.write_data().data[element_index] = base + epsilon;
            let loss_plus = func(inputs)?.item()?;

            input.write_data().data[element_index] = base - epsilon;
            let loss_minus = func(inputs)?.item()?;

            input.write_data().data[element_index] = base;

            if !loss_plus.is_finite() || !loss_minus.is_finite() {
                return Err(GradCheckError::NumericalGradNotFinite {
                    input_index,
                    element_index,
                    loss_plus,
                    loss_minus,
                });
            }

            let numerical = (loss_plus - loss_minus) / (2.0 * epsilon);
            let difference = (analytical[element_index] - numerical).abs();
            if difference > tolerance {
                return Err(GradCheckError::GradientMismatch {
                    input_index,
                    element_index,
                    analytical: analytical[element_index],
                    numerical,
                    difference,
                });
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ops::arithmetic::mul_op;
    use crate::ops::reduction::sum_op;

    #[test]
    fn test_check_grad_simple_product() {
        let x = Tensor::new(vec![1.5, -2.0, 0.5], vec![3]).unwrap();
        x.set_requires_grad(true).unwrap();
        let y = Tensor::new(vec![2.0, 3.0, -1.0], vec![3]).unwrap();

        // loss = sum(x * y); dloss/dx = y exactly.
        let func = |inputs: &[Tensor]| {
            let prod = mul_op(&inputs[0], &inputs[1])?;
            sum_op(&prod)
        };
        check_grad(func, &[x, y], 1e-2, 1e-3).unwrap();
    }

    #[test]
    fn test_check_grad_rejects_non_scalar() {
        let x = Tensor::new(vec![1.0, 2.0], vec![2]).unwrap();
        x.set_requires_grad(true).unwrap();
        let func =
            |inputs: &[Tensor]| -> Result<Tensor, FerrogradError> { Ok(inputs[0].clone()) };
        assert!(matches!(
            check_grad(func, &[x], 1e-2, 1e-3).unwrap_err(),
            GradCheckError::NonScalarOutput { .. }
        ));
    }
}
