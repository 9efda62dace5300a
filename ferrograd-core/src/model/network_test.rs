use crate::model::network::{should_report, Network};
use crate::nn::activation::Activation;
use crate::nn::init::WeightInit;
use crate::nn::layers::DenseLayer;
use crate::nn::losses::Loss;
use crate::optim::Sgd;
use crate::tensor::Tensor;

#[test]
fn test_should_report_every_epoch_by_default() {
    let reports = (0..30).filter(|&e| should_report(e, None)).count();
    assert_eq!(reports, 30);
}

#[test]
fn test_should_report_cadence() {
    let reported: Vec<usize> = (0..30)
        .filter(|&e| should_report(e, Some(10)))
        .map(|e| e + 1)
        .collect();
    assert_eq!(reported, vec![10, 20, 30]);
}

#[test]
fn test_should_report_zero_never_reports() {
    assert!((0..30).all(|e| !should_report(e, Some(0))));
}

fn two_layer_network() -> Network {
    let layers = vec![
        DenseLayer::new(2, 3, Activation::Relu, WeightInit::XavierUniform).unwrap(),
        DenseLayer::new(3, 1, Activation::Linear, WeightInit::XavierUniform).unwrap(),
    ];
    Network::new(layers, Loss::Mse, Box::new(Sgd::new(0.1)))
}

#[test]
fn test_forward_composes_layers() {
    let network = two_layer_network();
    let input = Tensor::new(vec![1.0, 0.0, 0.0, 1.0], vec![2, 2]).unwrap();
    let output = network.forward(&input).unwrap();
    assert_eq!(output.shape(), vec![2, 1]);
}

#[test]
fn test_forward_is_pure() {
    let network = two_layer_network();
    let input = Tensor::new(vec![0.25, -0.5], vec![1, 2]).unwrap();

    let snapshot: Vec<Vec<f32>> = network
        .layers()
        .iter()
        .flat_map(|l| [l.weights().get_data(), l.biases().get_data()])
        .collect();

    let out1 = network.forward(&input).unwrap();
    let out2 = network.forward(&input).unwrap();
    assert_eq!(out1.get_data(), out2.get_data());

    let after: Vec<Vec<f32>> = network
        .layers()
        .iter()
        .flat_map(|l| [l.weights().get_data(), l.biases().get_data()])
        .collect();
    assert_eq!(snapshot, after);
}

#[test]
fn test_train_resets_gradient_state_each_epoch() {
    let mut network = two_layer_network();
    let x = Tensor::new(vec![0.0, 0.0, 1.0, 1.0], vec![2, 2]).unwrap();
    let y = Tensor::new(vec![0.0, 1.0], vec![2, 1]).unwrap();

    network.train(&x, &y, 3, Some(0)).unwrap();

    assert!(x.grad().is_none());
    assert!(x.grad_fn().is_none());
    assert!(y.grad().is_none());
    for layer in network.layers() {
        assert!(layer.weights().grad().is_none());
        assert!(layer.weights().grad_fn().is_none());
        assert!(layer.biases().grad().is_none());
        // Replacement parameters must stay trainable for the next epoch.
        assert!(layer.weights().requires_grad());
        assert!(layer.biases().requires_grad());
    }
}

#[test]
fn test_train_shape_fault_propagates() {
    let mut network = two_layer_network();
    let x = Tensor::new(vec![1.0, 2.0, 3.0], vec![1, 3]).unwrap();
    let y = Tensor::new(vec![0.0], vec![1, 1]).unwrap();
    assert!(network.train(&x, &y, 1, None).is_err());
}
