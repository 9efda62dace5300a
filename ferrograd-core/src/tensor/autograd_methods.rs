use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::autograd::graph::{topological_sort, NodeId};
use crate::autograd::BackwardOp;
use crate::error::FerrogradError;
use crate::tensor::create::ones;
use crate::tensor::Tensor;
use crate::tensor_data::TensorData;

impl Tensor {
    /// Checks if this tensor accumulates gradients during backward.
    pub fn requires_grad(&self) -> bool {
        self.read_data().requires_grad
    }

    /// Sets the `requires_grad` flag for this tensor.
    pub fn set_requires_grad(&self, requires_grad: bool) -> Result<(), FerrogradError> {
        let mut guard = self.write_data();
        guard.requires_grad = requires_grad;
        Ok(())
    }

    /// Returns a clone of the accumulated gradient, if any.
    pub fn grad(&self) -> Option<Tensor> {
        self.read_data().grad.clone()
    }

    /// Returns a clone of the backward operation node, if any.
    pub fn grad_fn(&self) -> Option<Arc<dyn BackwardOp + Send + Sync>> {
        self.read_data().grad_fn.clone()
    }

    /// Sets the backward operation node for this tensor.
    pub fn set_grad_fn(
        &self,
        grad_fn: Option<Arc<dyn BackwardOp + Send + Sync>>,
    ) -> Result<(), FerrogradError> {
        self.write_data().grad_fn = grad_fn;
        Ok(())
    }

    /// Resets this tensor to its leaf state: the gradient slot returns to
    /// zero (`None`) and the recorded subgraph is dropped.
    ///
    /// Reverse-mode accumulation sums rather than overwrites, so this must
    /// run between training steps or stale gradients corrupt the next
    /// backward pass. Idempotent.
    pub fn reset(&self) {
        let mut guard = self.write_data();
        guard.grad = None;
        guard.grad_fn = None;
    }

    /// Stable graph-node identity of this tensor.
    pub(crate) fn node_id(&self) -> NodeId {
        Arc::as_ptr(&self.data)
    }

    /// Performs the backward pass starting from this tensor.
    ///
    /// Walks the recorded graph in reverse topological order and accumulates
    /// dL/dX into the gradient slot of every reachable tensor flagged
    /// `requires_grad`. Contributions of multiple paths into the same tensor
    /// sum.
    ///
    /// # Arguments
    /// * `gradient` - initial gradient for this tensor (dL/dself). `None`
    ///   seeds with ones, which is only valid for single-element tensors.
    ///
    /// # Errors
    /// * [`FerrogradError::BackwardNonScalar`] if `gradient` is `None` and
    ///   the tensor holds more than one element.
    /// * [`FerrogradError::BackwardError`] if a provided gradient has the
    ///   wrong shape or the graph walk fails.
    pub fn backward(&self, gradient: Option<Tensor>) -> Result<(), FerrogradError> {
        // Backward on a tensor outside any recorded graph is a no-op.
        if !self.requires_grad() {
            return Ok(());
        }

        let seed = match gradient {
            Some(g) => {
                if g.shape() != self.shape() {
                    return Err(FerrogradError::BackwardError(format!(
                        "gradient shape mismatch: expected {:?}, got {:?}",
                        self.shape(),
                        g.shape()
                    )));
                }
                g
            }
            None => {
                if self.numel() == 1 {
                    ones(&self.shape())?
                } else {
                    return Err(FerrogradError::BackwardNonScalar);
                }
            }
        };

        let root = self.node_id();
        let sorted = topological_sort(root)?;

        // Flowing gradients per node; entries for the same node sum as paths
        // merge.
        let mut grad_map: HashMap<NodeId, Tensor> = HashMap::new();
        grad_map.insert(root, seed);

        for node_id in sorted.into_iter().rev() {
            let Some(node_grad) = grad_map.remove(&node_id) else {
                continue;
            };

            // SAFETY: node ids come from the recorded graph, whose backward
            // structs keep every input's TensorData alive (see BackwardOp).
            let node_lock = unsafe { &*node_id };
            let (requires_grad, grad_fn) = {
                let guard = node_lock.read().map_err(|_| {
                    FerrogradError::BackwardError(
                        "failed to acquire read lock during backward traversal".to_string(),
                    )
                })?;
                (guard.requires_grad, guard.grad_fn.clone())
            };

            if requires_grad {
                accumulate_grad(node_lock, &node_grad)?;
            }

            if let Some(op) = grad_fn {
                let input_grads = op.backward(&node_grad)?;
                let input_ids = op.inputs();
                if input_grads.len() != input_ids.len() {
                    return Err(FerrogradError::BackwardError(format!(
                        "backward op returned {} gradients, expected {} (op: {:?})",
                        input_grads.len(),
                        input_ids.len(),
                        op
                    )));
                }
                for (input_id, grad) in input_ids.into_iter().zip(input_grads) {
                    match grad_map.remove(&input_id) {
                        Some(existing) => {
                            let summed =
                                crate::ops::arithmetic::add_op(&existing, &grad)?;
                            grad_map.insert(input_id, summed);
                        }
                        None => {
                            grad_map.insert(input_id, grad);
                        }
                    }
                }
            }
        }

        Ok(())
    }
}

/// Accumulates `grad` into the gradient slot of the tensor behind
/// `tensor_data_lock`, summing with any existing gradient.
fn accumulate_grad(
    tensor_data_lock: &RwLock<TensorData>,
    grad: &Tensor,
) -> Result<(), FerrogradError> {
    let mut guard = tensor_data_lock.write().map_err(|_| {
        FerrogradError::BackwardError(
            "failed to acquire write lock for gradient accumulation".to_string(),
        )
    })?;

    let expected_shape = guard.shape.clone();
    if grad.shape() != expected_shape {
        return Err(FerrogradError::GradientAccumulationShapeMismatch {
            expected: expected_shape,
            actual: grad.shape(),
        });
    }

    match guard.grad.take() {
        Some(existing) => {
            let existing_data = existing.read_data();
            let grad_data = grad.read_data();
            let summed: Vec<f32> = existing_data
                .data
                .iter()
                .zip(grad_data.data.iter())
                .map(|(a, b)| a + b)
                .collect();
            drop(existing_data);
            drop(grad_data);
            guard.grad = Some(Tensor::new(summed, expected_shape)?);
        }
        None => {
            guard.grad = Some(grad.clone());
        }
    }
    Ok(())
}

#[cfg(test)]
#[path = "autograd_methods_test.rs"]
mod tests;
