use rand::Rng;
use rand_distr::{Distribution, StandardNormal};

use crate::error::FerrogradError;
use crate::tensor::Tensor;

/// Creates a new tensor filled with zeros with the specified shape.
pub fn zeros(shape: &[usize]) -> Result<Tensor, FerrogradError> {
    let numel = shape.iter().product();
    Tensor::new(vec![0.0; numel], shape.to_vec())
}

/// Creates a new tensor filled with ones with the specified shape.
pub fn ones(shape: &[usize]) -> Result<Tensor, FerrogradError> {
    let numel = shape.iter().product();
    Tensor::new(vec![1.0; numel], shape.to_vec())
}

/// Creates a new tensor filled with `value` with the specified shape.
pub fn full(shape: &[usize], value: f32) -> Result<Tensor, FerrogradError> {
    let numel = shape.iter().product();
    Tensor::new(vec![value; numel], shape.to_vec())
}

/// Creates a new tensor from a `Vec<f32>` and shape.
pub fn from_vec(data: Vec<f32>, shape: Vec<usize>) -> Result<Tensor, FerrogradError> {
    Tensor::new(data, shape)
}

/// Creates a new tensor filled with zeros, matching the shape of `tensor`.
pub fn zeros_like(tensor: &Tensor) -> Result<Tensor, FerrogradError> {
    zeros(&tensor.shape())
}

/// Creates a new tensor with values sampled uniformly from `[0, 1)`.
pub fn rand(shape: &[usize]) -> Result<Tensor, FerrogradError> {
    let numel: usize = shape.iter().product();
    let mut rng = rand::thread_rng();
    let data: Vec<f32> = (0..numel).map(|_| rng.gen::<f32>()).collect();
    Tensor::new(data, shape.to_vec())
}

/// Creates a new tensor with values sampled from the standard normal
/// distribution.
pub fn randn(shape: &[usize]) -> Result<Tensor, FerrogradError> {
    let numel: usize = shape.iter().product();
    let mut rng = rand::thread_rng();
    let data: Vec<f32> = (0..numel)
        .map(|_| StandardNormal.sample(&mut rng))
        .collect();
    Tensor::new(data, shape.to_vec())
}
