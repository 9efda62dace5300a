use std::sync::Arc;

use crate::autograd::BackwardOp;
use crate::error::FerrogradError;
use crate::tensor::utils::calculate_strides;
use crate::tensor::Tensor;

/// Internal storage and metadata for a [`Tensor`].
///
/// Holds the data buffer, shape, strides and autograd bookkeeping. It is
/// wrapped in `Arc<RwLock<TensorData>>` by the `Tensor` struct to allow
/// shared ownership and interior mutability.
#[derive(Debug)]
pub struct TensorData {
    /// The underlying row-major `f32` buffer.
    pub(crate) data: Vec<f32>,
    /// The shape (dimensions) of the tensor. An empty shape is a scalar.
    pub(crate) shape: Vec<usize>,
    /// The strides for each dimension.
    pub(crate) strides: Vec<usize>,

    // --- Autograd metadata ---
    /// Flag indicating if the tensor accumulates gradients during backward.
    pub(crate) requires_grad: bool,
    /// The accumulated gradient, populated by the backward pass.
    /// `None` is the zero state of the gradient slot.
    pub(crate) grad: Option<Tensor>,
    /// The operation node that produced this tensor, linking it into the
    /// recorded computation graph. Leaf tensors have `grad_fn = None`.
    pub(crate) grad_fn: Option<Arc<dyn BackwardOp + Send + Sync>>,
}

impl TensorData {
    /// Creates a new `TensorData` from raw data in row-major order.
    ///
    /// Computes contiguous strides and initializes the autograd metadata to
    /// the leaf state (no gradient, no recorded subgraph).
    ///
    /// # Errors
    /// Returns [`FerrogradError::TensorCreationError`] if the data length does
    /// not match the number of elements implied by `shape`.
    pub fn new(data: Vec<f32>, shape: Vec<usize>) -> Result<Self, FerrogradError> {
        let numel: usize = shape.iter().product();
        if data.len() != numel {
            return Err(FerrogradError::TensorCreationError {
                data_len: data.len(),
                shape,
            });
        }
        let strides = calculate_strides(&shape);
        Ok(TensorData {
            data,
            shape,
            strides,
            requires_grad: false,
            grad: None,
            grad_fn: None,
        })
    }

    /// Returns the number of elements in the tensor.
    pub fn numel(&self) -> usize {
        self.shape.iter().product()
    }
}
