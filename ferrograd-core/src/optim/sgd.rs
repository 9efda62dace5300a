use std::collections::HashMap;

use log::debug;

use crate::error::FerrogradError;
use crate::nn::layers::DenseLayer;
use crate::optim::gradient_or_zeros;
use crate::optim::optimizer_trait::Optimizer;
use crate::tensor::Tensor;

/// Stochastic gradient descent, with optional classical momentum.
///
/// Without momentum: `w' = w - lr * g`.
/// With momentum: `v = momentum * v + g; w' = w - lr * v`, where the
/// velocity buffers are kept per layer index.
#[derive(Debug)]
pub struct Sgd {
    learning_rate: f32,
    momentum: f32,
    /// Velocity buffers per layer index: (weights, biases).
    velocities: HashMap<usize, (Vec<f32>, Vec<f32>)>,
}

impl Sgd {
    pub fn new(learning_rate: f32) -> Self {
        Sgd {
            learning_rate,
            momentum: 0.0,
            velocities: HashMap::new(),
        }
    }

    pub fn with_momentum(learning_rate: f32, momentum: f32) -> Self {
        Sgd {
            learning_rate,
            momentum,
            velocities: HashMap::new(),
        }
    }
}

impl Optimizer for Sgd {
    fn update(
        &mut self,
        layer: &DenseLayer,
        layer_index: usize,
    ) -> Result<(Tensor, Tensor), FerrogradError> {
        debug!(
            "Sgd: updating layer {} (lr={}, momentum={})",
            layer_index, self.learning_rate, self.momentum
        );

        let weights = layer.weights().get_data();
        let biases = layer.biases().get_data();
        let weight_grad = gradient_or_zeros(layer.weights());
        let bias_grad = gradient_or_zeros(layer.biases());

        let (weight_vel, bias_vel) = self
            .velocities
            .entry(layer_index)
            .or_insert_with(|| (vec![0.0; weights.len()], vec![0.0; biases.len()]));

        let momentum = self.momentum;
        let learning_rate = self.learning_rate;
        let new_weights: Vec<f32> = weights
            .iter()
            .zip(weight_grad.iter())
            .zip(weight_vel.iter_mut())
            .map(|((&w, &g), v)| {
                *v = momentum * *v + g;
                w - learning_rate * *v
            })
            .collect();
        let new_biases: Vec<f32> = biases
            .iter()
            .zip(bias_grad.iter())
            .zip(bias_vel.iter_mut())
            .map(|((&b, &g), v)| {
                *v = momentum * *v + g;
                b - learning_rate * *v
            })
            .collect();

        Ok((
            Tensor::new(new_weights, layer.weights().shape())?,
            Tensor::new(new_biases, layer.biases().shape())?,
        ))
    }
}

#[cfg(test)]
#[path = "sgd_test.rs"]
mod tests;
