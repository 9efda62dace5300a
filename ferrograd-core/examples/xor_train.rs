//! Trains a small feedforward network on the XOR truth table.
//!
//! Architecture: Dense(2 -> 32, ReLU) -> Dense(32 -> 1, Tanh), MSE loss,
//! AdaGrad at learning rate 0.1, 100 epochs.
//!
//! Run with: `cargo run --example xor_train`

use ferrograd_core::tensor::Tensor;
use ferrograd_core::{Activation, AdaGrad, DenseLayer, FerrogradError, Loss, Network, WeightInit};

fn main() -> Result<(), FerrogradError> {
    let layers = vec![
        DenseLayer::new(2, 32, Activation::Relu, WeightInit::XavierUniform)?,
        DenseLayer::new(32, 1, Activation::Tanh, WeightInit::XavierUniform)?,
    ];
    let mut network = Network::new(layers, Loss::Mse, Box::new(AdaGrad::new(0.1)));

    let x = Tensor::new(vec![0.0, 0.0, 0.0, 1.0, 1.0, 0.0, 1.0, 1.0], vec![4, 2])?;
    let y = Tensor::new(vec![0.0, 1.0, 1.0, 0.0], vec![4, 1])?;

    network.train(&x, &y, 100, Some(10))?;

    let prediction = network.forward(&x)?;
    println!("Predictions: {:?}", prediction.get_data());
    Ok(())
}
