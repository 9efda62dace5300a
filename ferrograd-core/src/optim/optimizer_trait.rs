use std::fmt::Debug;

use crate::error::FerrogradError;
use crate::nn::layers::DenseLayer;
use crate::tensor::Tensor;

/// Common interface for all optimizers.
pub trait Optimizer: Debug {
    /// Derives replacement parameter values for one layer.
    ///
    /// Reads the layer's current weights and biases together with their
    /// accumulated gradients and returns `(new_weights, new_biases)` as
    /// fresh tensors; the layer replaces its parameters wholesale rather
    /// than mutating them in place.
    ///
    /// `layer_index` keys any per-layer internal state (momentum buffers,
    /// squared-gradient sums) this optimizer maintains across calls. Updates
    /// for different indices are independent of each other; state for one
    /// index must never be read or written by a call for another.
    fn update(
        &mut self,
        layer: &DenseLayer,
        layer_index: usize,
    ) -> Result<(Tensor, Tensor), FerrogradError>;
}
