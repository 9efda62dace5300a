//! Optimizers.
//!
//! An optimizer converts a layer's current parameters, their accumulated
//! gradients and the layer's position into replacement parameter values. Any
//! internal statistics (velocity, squared-gradient sums) are keyed by the
//! layer index, owned by the optimizer and never stored on the layer, so the
//! same index must always refer to the same logical layer across the whole
//! training run.

pub mod adagrad;
pub mod optimizer_trait;
pub mod sgd;

pub use adagrad::AdaGrad;
pub use optimizer_trait::Optimizer;
pub use sgd::Sgd;

use crate::tensor::Tensor;

/// Accumulated gradient of a parameter as a flat buffer, or zeros when no
/// backward pass has populated one (the caller-discipline contract: updating
/// before backward consumes a zero gradient).
pub(crate) fn gradient_or_zeros(param: &Tensor) -> Vec<f32> {
    match param.grad() {
        Some(grad) => grad.get_data(),
        None => vec![0.0; param.numel()],
    }
}
