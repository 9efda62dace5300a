//! Tensor operations.
//!
//! Each operation is a `xxx_op` function that performs the forward
//! computation and, when any input requires gradients, attaches a
//! `XxxBackward` node implementing
//! [`BackwardOp`](crate::autograd::BackwardOp) to the output tensor. The
//! backward structs store the forward context (input handles, shapes) needed
//! to propagate gradients during the backward pass.

pub mod activation;
pub mod arithmetic;
pub mod linalg;
pub mod reduction;
