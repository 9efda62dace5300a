use rand::distributions::{Distribution, Uniform};

use crate::error::FerrogradError;
use crate::tensor::Tensor;

/// Named weight-initialization schemes.
///
/// Each scheme produces a `[input_size, output_size]` weight matrix whose
/// variance is scaled to the layer's fan, keeping activations in a trainable
/// range at the start of training.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WeightInit {
    /// Uniform in `(-limit, limit)` with `limit = sqrt(6 / (fan_in + fan_out))`.
    XavierUniform,
    /// Uniform in `(-limit, limit)` with `limit = sqrt(6 / fan_in)`.
    HeUniform,
}

impl WeightInit {
    /// Produces an initial weight matrix of shape `[input_size, output_size]`
    /// under this scheme.
    pub fn initialize(
        &self,
        input_size: usize,
        output_size: usize,
    ) -> Result<Tensor, FerrogradError> {
        let limit = match self {
            WeightInit::XavierUniform => (6.0 / (input_size + output_size) as f32).sqrt(),
            WeightInit::HeUniform => (6.0 / input_size as f32).sqrt(),
        };
        let dist = Uniform::new_inclusive(-limit, limit);
        let mut rng = rand::thread_rng();
        let data: Vec<f32> = (0..input_size * output_size)
            .map(|_| dist.sample(&mut rng))
            .collect();
        Tensor::new(data, vec![input_size, output_size])
    }
}

#[cfg(test)]
#[path = "init_test.rs"]
mod tests;
