use ferrograd_core::tensor::Tensor;

/// Creates an f32 tensor for tests, panicking on invalid shapes.
pub fn create_test_tensor(data: Vec<f32>, shape: Vec<usize>) -> Tensor {
    Tensor::new(data, shape).expect("Tensor creation failed in test")
}

/// Creates an f32 tensor that requires gradients.
#[allow(dead_code)]
pub fn create_test_tensor_with_grad(data: Vec<f32>, shape: Vec<usize>) -> Tensor {
    let tensor = create_test_tensor(data, shape);
    tensor
        .set_requires_grad(true)
        .expect("set_requires_grad failed in test");
    tensor
}
