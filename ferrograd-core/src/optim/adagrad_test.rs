use approx::assert_relative_eq;

use crate::nn::activation::Activation;
use crate::nn::init::WeightInit;
use crate::nn::layers::DenseLayer;
use crate::optim::adagrad::AdaGrad;
use crate::optim::optimizer_trait::Optimizer;
use crate::tensor::Tensor;

fn set_data(t: &Tensor, data: Vec<f32>) {
    t.write_data().data = data;
}

fn set_grad(t: &Tensor, data: Vec<f32>) {
    let grad = Tensor::new(data, t.shape()).unwrap();
    t.write_data().grad = Some(grad);
}

fn fixed_layer() -> DenseLayer {
    let layer = DenseLayer::new(2, 1, Activation::Linear, WeightInit::XavierUniform).unwrap();
    set_data(layer.weights(), vec![1.0, -1.0]);
    set_data(layer.biases(), vec![0.5]);
    layer
}

#[test]
fn test_adagrad_first_step() {
    let layer = fixed_layer();
    set_grad(layer.weights(), vec![3.0, 0.0]);
    set_grad(layer.biases(), vec![0.0]);

    let mut adagrad = AdaGrad::new(0.1);
    let (new_weights, new_biases) = adagrad.update(&layer, 0).unwrap();

    // acc = 9 => step = 0.1 * 3 / (3 + eps) ~= 0.1
    let w = new_weights.get_data();
    assert_relative_eq!(w[0], 0.9, epsilon = 1e-5);
    // Zero gradient leaves the parameter in place.
    assert_relative_eq!(w[1], -1.0);
    assert_relative_eq!(new_biases.get_data()[0], 0.5);
}

#[test]
fn test_adagrad_steps_shrink_as_accumulator_grows() {
    let mut layer = fixed_layer();
    let mut adagrad = AdaGrad::new(0.1);

    set_grad(layer.weights(), vec![3.0, 3.0]);
    set_grad(layer.biases(), vec![0.0]);
    let before = layer.weights().get_data()[0];
    layer.update(&mut adagrad, 0).unwrap();
    let after_first = layer.weights().get_data()[0];
    let first_step = before - after_first;

    set_grad(layer.weights(), vec![3.0, 3.0]);
    set_grad(layer.biases(), vec![0.0]);
    layer.update(&mut adagrad, 0).unwrap();
    let after_second = layer.weights().get_data()[0];
    let second_step = after_first - after_second;

    // acc 9 -> 18: the same gradient now moves the weight less.
    assert!(second_step < first_step);
    assert_relative_eq!(first_step, 0.1, epsilon = 1e-5);
    assert_relative_eq!(second_step, 0.1 * 3.0 / 18.0f32.sqrt(), epsilon = 1e-5);
}

#[test]
fn test_adagrad_per_layer_state_isolation() {
    // Layer 1's update must depend only on its own gradients and state,
    // regardless of what layer 0's gradients were.
    let run = |layer0_grad: f32| -> Vec<f32> {
        let layer0 = fixed_layer();
        let layer1 = fixed_layer();
        set_grad(layer0.weights(), vec![layer0_grad, layer0_grad]);
        set_grad(layer0.biases(), vec![layer0_grad]);
        set_grad(layer1.weights(), vec![1.0, 2.0]);
        set_grad(layer1.biases(), vec![3.0]);

        let mut adagrad = AdaGrad::new(0.1);
        let _ = adagrad.update(&layer0, 0).unwrap();
        let (w1, _) = adagrad.update(&layer1, 1).unwrap();
        w1.get_data()
    };

    assert_eq!(run(5.0), run(-100.0));
}
