use crate::error::FerrogradError;
use crate::nn::activation::Activation;
use crate::nn::init::WeightInit;
use crate::ops::arithmetic::add_op;
use crate::ops::linalg::matmul_op;
use crate::optim::Optimizer;
use crate::tensor::create::zeros;
use crate::tensor::Tensor;

/// A standard dense (fully connected) layer:
/// `output = activation(input @ weights + biases)`.
///
/// Owns a `[input_size, output_size]` weight matrix and a
/// `[1, output_size]` bias row, both flagged `requires_grad` so the backward
/// pass accumulates into them.
#[derive(Debug)]
pub struct DenseLayer {
    weights: Tensor,
    biases: Tensor,
    activation: Activation,
    input_size: usize,
    output_size: usize,
}

impl DenseLayer {
    /// Creates a new dense layer. Weights come from `initializer`, biases
    /// start at zero.
    pub fn new(
        input_size: usize,
        output_size: usize,
        activation: Activation,
        initializer: WeightInit,
    ) -> Result<Self, FerrogradError> {
        let weights = initializer.initialize(input_size, output_size)?;
        weights.set_requires_grad(true)?;
        let biases = zeros(&[1, output_size])?;
        biases.set_requires_grad(true)?;
        Ok(DenseLayer {
            weights,
            biases,
            activation,
            input_size,
            output_size,
        })
    }

    /// Forward pass: `activation(input @ weights + biases)`.
    ///
    /// `input` has shape `[batch, input_size]`; the result has shape
    /// `[batch, output_size]` and records its dependence on the input,
    /// weights and biases. No side effects on stored state; shape faults
    /// from the matrix multiply or broadcast add propagate unchanged.
    pub fn forward(&self, input: &Tensor) -> Result<Tensor, FerrogradError> {
        let z = matmul_op(input, &self.weights)?;
        let z = add_op(&z, &self.biases)?;
        self.activation.apply(&z)
    }

    /// Replaces both parameter tensors with the values the optimizer derives
    /// from the current parameters and their accumulated gradients.
    ///
    /// `layer_index` is the optimizer's per-layer state key and must be
    /// stable across the whole training run.
    ///
    /// The caller is responsible for having run a backward pass first:
    /// without one the optimizer consumes whatever gradient state currently
    /// exists (typically zero). That is a caller error, not a detected
    /// fault.
    pub fn update(
        &mut self,
        optimizer: &mut dyn Optimizer,
        layer_index: usize,
    ) -> Result<(), FerrogradError> {
        let (new_weights, new_biases) = optimizer.update(&*self, layer_index)?;
        new_weights.set_requires_grad(true)?;
        new_biases.set_requires_grad(true)?;
        self.weights = new_weights;
        self.biases = new_biases;
        Ok(())
    }

    pub fn weights(&self) -> &Tensor {
        &self.weights
    }

    pub fn biases(&self) -> &Tensor {
        &self.biases
    }

    pub fn activation(&self) -> Activation {
        self.activation
    }

    pub fn input_size(&self) -> usize {
        self.input_size
    }

    pub fn output_size(&self) -> usize {
        self.output_size
    }
}

#[cfg(test)]
#[path = "dense_test.rs"]
mod tests;
