use std::collections::HashMap;

use log::debug;

use crate::error::FerrogradError;
use crate::nn::layers::DenseLayer;
use crate::optim::gradient_or_zeros;
use crate::optim::optimizer_trait::Optimizer;
use crate::tensor::Tensor;

const DEFAULT_EPS: f32 = 1e-8;

/// AdaGrad: adaptive per-parameter learning rates.
///
/// Keeps a running sum of squared gradients per parameter and scales each
/// step by its inverse square root:
/// `acc += g^2; w' = w - lr * g / (sqrt(acc) + eps)`.
///
/// The accumulators are keyed by layer index, so the same index must address
/// the same logical layer for the whole run.
#[derive(Debug)]
pub struct AdaGrad {
    learning_rate: f32,
    eps: f32,
    /// Squared-gradient accumulators per layer index: (weights, biases).
    accumulators: HashMap<usize, (Vec<f32>, Vec<f32>)>,
}

impl AdaGrad {
    pub fn new(learning_rate: f32) -> Self {
        AdaGrad {
            learning_rate,
            eps: DEFAULT_EPS,
            accumulators: HashMap::new(),
        }
    }

    pub fn with_eps(learning_rate: f32, eps: f32) -> Self {
        AdaGrad {
            learning_rate,
            eps,
            accumulators: HashMap::new(),
        }
    }
}

fn adagrad_step(
    param: &[f32],
    grad: &[f32],
    acc: &mut [f32],
    learning_rate: f32,
    eps: f32,
) -> Vec<f32> {
    param
        .iter()
        .zip(grad.iter())
        .zip(acc.iter_mut())
        .map(|((&w, &g), a)| {
            *a += g * g;
            w - learning_rate * g / (a.sqrt() + eps)
        })
        .collect()
}

impl Optimizer for AdaGrad {
    fn update(
        &mut self,
        layer: &DenseLayer,
        layer_index: usize,
    ) -> Result<(Tensor, Tensor), FerrogradError> {
        debug!(
            "AdaGrad: updating layer {} (lr={}, eps={})",
            layer_index, self.learning_rate, self.eps
        );

        let weights = layer.weights().get_data();
        let biases = layer.biases().get_data();
        let weight_grad = gradient_or_zeros(layer.weights());
        let bias_grad = gradient_or_zeros(layer.biases());

        let (weight_acc, bias_acc) = self
            .accumulators
            .entry(layer_index)
            .or_insert_with(|| (vec![0.0; weights.len()], vec![0.0; biases.len()]));

        let new_weights = adagrad_step(
            &weights,
            &weight_grad,
            weight_acc,
            self.learning_rate,
            self.eps,
        );
        let new_biases = adagrad_step(
            &biases,
            &bias_grad,
            bias_acc,
            self.learning_rate,
            self.eps,
        );

        Ok((
            Tensor::new(new_weights, layer.weights().shape())?,
            Tensor::new(new_biases, layer.biases().shape())?,
        ))
    }
}

#[cfg(test)]
#[path = "adagrad_test.rs"]
mod tests;
