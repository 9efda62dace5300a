use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::error::FerrogradError;
use crate::tensor_data::TensorData;

mod autograd_methods;
pub mod create;
pub mod utils;

pub use create::{from_vec, full, ones, rand, randn, zeros, zeros_like};

/// A multi-dimensional `f32` array that records the operations applied to it
/// so gradients of a downstream scalar can be computed with respect to it.
///
/// `Tensor` wraps `Arc<RwLock<TensorData>>`:
/// 1. **Shared ownership**: clones are cheap handle copies; the recorded
///    computation graph holds handles to its inputs without copying data.
/// 2. **Interior mutability**: the gradient slot and recorded subgraph can
///    be updated through a shared reference during the backward pass.
pub struct Tensor {
    pub(crate) data: Arc<RwLock<TensorData>>,
}

impl Clone for Tensor {
    fn clone(&self) -> Self {
        Tensor {
            data: Arc::clone(&self.data),
        }
    }
}

impl std::fmt::Debug for Tensor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let guard = self.read_data();
        f.debug_struct("Tensor")
            .field("shape", &guard.shape)
            .field("data", &guard.data)
            .field("requires_grad", &guard.requires_grad)
            .finish()
    }
}

impl Tensor {
    /// Creates a new tensor from raw data in row-major order.
    ///
    /// # Errors
    /// Returns [`FerrogradError::TensorCreationError`] if the data length
    /// does not match the number of elements implied by `shape`.
    pub fn new(data: Vec<f32>, shape: Vec<usize>) -> Result<Self, FerrogradError> {
        let tensor_data = TensorData::new(data, shape)?;
        Ok(Tensor {
            data: Arc::new(RwLock::new(tensor_data)),
        })
    }

    /// Returns a clone of the tensor's shape.
    pub fn shape(&self) -> Vec<usize> {
        self.read_data().shape.clone()
    }

    /// Returns a clone of the tensor's strides.
    pub fn strides(&self) -> Vec<usize> {
        self.read_data().strides.clone()
    }

    /// Returns the number of elements in the tensor.
    pub fn numel(&self) -> usize {
        self.read_data().numel()
    }

    /// Returns an owned copy of the tensor's data in row-major order.
    pub fn get_data(&self) -> Vec<f32> {
        self.read_data().data.clone()
    }

    /// Extracts the value of a single-element tensor.
    ///
    /// # Errors
    /// Returns [`FerrogradError::UnsupportedOperation`] if the tensor holds
    /// more than one element.
    pub fn item(&self) -> Result<f32, FerrogradError> {
        let guard = self.read_data();
        if guard.numel() != 1 {
            return Err(FerrogradError::UnsupportedOperation(format!(
                "item() requires a single-element tensor, got shape {:?}",
                guard.shape
            )));
        }
        Ok(guard.data[0])
    }

    /// Returns a new leaf tensor sharing this tensor's values but detached
    /// from the recorded computation graph (no `grad_fn`, `requires_grad`
    /// off).
    pub fn detach(&self) -> Tensor {
        let guard = self.read_data();
        let detached = TensorData {
            data: guard.data.clone(),
            shape: guard.shape.clone(),
            strides: guard.strides.clone(),
            requires_grad: false,
            grad: None,
            grad_fn: None,
        };
        drop(guard);
        Tensor {
            data: Arc::new(RwLock::new(detached)),
        }
    }

    /// Acquires a read lock on the tensor's data.
    ///
    /// Panics if the `RwLock` is poisoned.
    pub fn read_data(&self) -> RwLockReadGuard<'_, TensorData> {
        self.data.read().expect("RwLock poisoned")
    }

    /// Acquires a write lock on the tensor's data.
    ///
    /// Panics if the `RwLock` is poisoned.
    pub fn write_data(&self) -> RwLockWriteGuard<'_, TensorData> {
        self.data.write().expect("RwLock poisoned")
    }
}
