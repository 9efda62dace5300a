use log::debug;

use crate::error::FerrogradError;
use crate::nn::layers::DenseLayer;
use crate::nn::losses::Loss;
use crate::optim::Optimizer;
use crate::tensor::Tensor;

/// A feedforward neural network: an ordered sequence of dense layers, one
/// loss function and one optimizer shared across all layers and epochs.
///
/// Layer order is the forward-pass order. Each layer's position doubles as
/// the optimizer's per-layer state key, so the sequence is fixed for the
/// network's lifetime.
#[derive(Debug)]
pub struct Network {
    layers: Vec<DenseLayer>,
    loss_function: Loss,
    optimizer: Box<dyn Optimizer>,
}

impl Network {
    pub fn new(
        layers: Vec<DenseLayer>,
        loss_function: Loss,
        optimizer: Box<dyn Optimizer>,
    ) -> Self {
        Network {
            layers,
            loss_function,
            optimizer,
        }
    }

    pub fn layers(&self) -> &[DenseLayer] {
        &self.layers
    }

    /// Forward pass: folds `input` through each layer in sequence order.
    ///
    /// Pure with respect to network state; every call records fresh graph
    /// nodes.
    pub fn forward(&self, input: &Tensor) -> Result<Tensor, FerrogradError> {
        let mut current = input.clone();
        for layer in &self.layers {
            current = layer.forward(&current)?;
        }
        Ok(current)
    }

    /// Trains the network for exactly `epochs` iterations over `(x, y)`.
    ///
    /// Each epoch runs the strict sequence: forward, loss, backward, update
    /// every layer in index order, then reset the gradient state of `x`, `y`
    /// and every layer's parameters. The reset is mandatory: reverse-mode
    /// accumulation sums, so stale gradients would corrupt the next epoch's
    /// backward pass.
    ///
    /// Progress is reported as `"Epoch {i}/{epochs}, Loss: {value}"`: every
    /// epoch when `print_every` is `None`, otherwise only when
    /// `(epoch + 1) % print_every == 0`. Reporting never affects training
    /// numerics.
    ///
    /// There are no convergence checks and no early exits; the first fault
    /// aborts the call.
    pub fn train(
        &mut self,
        x: &Tensor,
        y: &Tensor,
        epochs: usize,
        print_every: Option<usize>,
    ) -> Result<(), FerrogradError> {
        for epoch in 0..epochs {
            let y_pred = self.forward(x)?;
            let loss = self.loss_function.compute(&y_pred, y)?;
            loss.backward(None)?;
            debug!("epoch {}: backward complete", epoch + 1);

            for (layer_index, layer) in self.layers.iter_mut().enumerate() {
                layer.update(self.optimizer.as_mut(), layer_index)?;
            }

            x.reset();
            y.reset();
            for layer in &self.layers {
                layer.weights().reset();
                layer.biases().reset();
            }

            if should_report(epoch, print_every) {
                println!("Epoch {}/{}, Loss: {}", epoch + 1, epochs, loss.item()?);
            }
        }
        Ok(())
    }
}

/// Reporting cadence for [`Network::train`]: `None` reports every epoch,
/// `Some(n)` reports when `(epoch + 1)` is a multiple of `n` (`Some(0)`
/// never reports).
pub fn should_report(epoch: usize, print_every: Option<usize>) -> bool {
    match print_every {
        None => true,
        Some(0) => false,
        Some(n) => (epoch + 1) % n == 0,
    }
}

#[cfg(test)]
#[path = "network_test.rs"]
mod tests;
