//! Reverse-mode automatic differentiation.
//!
//! Operations record a dynamic directed acyclic graph as they run: each
//! non-leaf tensor carries a [`BackwardOp`] node that knows how to propagate
//! a gradient to the operation's inputs. [`Tensor::backward`] walks the graph
//! in reverse topological order, summing the contributions of every path
//! into each array. The graph is rebuilt on every forward pass and discarded
//! by [`Tensor::reset`].
//!
//! [`Tensor::backward`]: crate::tensor::Tensor::backward
//! [`Tensor::reset`]: crate::tensor::Tensor::reset

pub mod backward_op;
pub mod grad_check;
pub mod graph;

pub use backward_op::BackwardOp;
pub use graph::NodeId;
