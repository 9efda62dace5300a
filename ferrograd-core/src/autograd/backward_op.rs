use std::fmt::Debug;

use crate::autograd::graph::NodeId;
use crate::error::FerrogradError;
use crate::tensor::Tensor;

/// Interface for the backward pass of a differentiable tensor operation.
///
/// Any operation that creates a non-leaf `Tensor` stores an implementation of
/// this trait in the output tensor's `grad_fn` field. During `backward()` the
/// graph walk calls it to propagate gradients according to the chain rule.
///
/// Implementations hold strong `Tensor` clones of their forward inputs. This
/// keeps every input's `TensorData` alive for as long as the recorded graph
/// exists, which is what makes the raw-pointer [`NodeId`]s returned by
/// [`inputs`](BackwardOp::inputs) safe to dereference during the backward
/// walk.
pub trait BackwardOp: Debug + Send + Sync {
    /// Computes the gradients of the operation's inputs given the gradient of
    /// its output (dL/dOutput).
    ///
    /// Returns one gradient tensor per forward input. The order **must**
    /// match the order of [`inputs`](BackwardOp::inputs), and each gradient
    /// must have the shape of the corresponding input.
    fn backward(&self, grad_output: &Tensor) -> Result<Vec<Tensor>, FerrogradError>;

    /// Returns identifiers for the input nodes that participated in the
    /// forward operation, in the same order as the gradients returned by
    /// [`backward`](BackwardOp::backward).
    fn inputs(&self) -> Vec<NodeId>;
}
