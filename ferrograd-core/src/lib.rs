//! # ferrograd-core
//!
//! A minimal feedforward neural-network trainer built on a reverse-mode
//! autograd tensor: layers compose into a network, a scalar loss is
//! propagated backward through the recorded operation graph, and a pluggable
//! optimizer replaces each layer's parameters from its accumulated
//! gradients.

pub mod autograd;
pub mod error;
pub mod model;
pub mod nn;
pub mod ops;
pub mod optim;
pub mod tensor;
pub mod tensor_data;
pub mod utils;

pub use error::FerrogradError;
pub use model::Network;
pub use nn::{Activation, DenseLayer, Loss, WeightInit};
pub use optim::{AdaGrad, Optimizer, Sgd};
pub use tensor::Tensor;
