// Pipeline composition: ordering of forward/backward and the update step.

use mnist_backprop::{
    Layer, LayerSpec, Linear, LossType, NetError, NetworkSpec, Pipeline, Sgd, Sigmoid,
};
use ndarray::{array, Array2};
use rand::rngs::StdRng;
use rand::SeedableRng;

#[test]
fn forward_matches_manual_composition() {
    let linear =
        Linear::from_parameters(array![[1.0, -1.0], [0.5, 2.0]], array![0.0, 1.0]).unwrap();
    let mut manual_linear = linear.clone();
    let mut manual_sigmoid = Sigmoid::new();
    let layers: Vec<Box<dyn Layer>> = vec![Box::new(linear), Box::new(Sigmoid::new())];
    let mut pipeline = Pipeline::new(layers);

    let x = array![[1.0, 2.0], [-1.0, 0.5]];
    let expected = manual_sigmoid
        .forward(&manual_linear.forward(&x).unwrap())
        .unwrap();
    assert_eq!(pipeline.forward(&x).unwrap(), expected);

    let delta = array![[0.1, -0.2], [0.3, 0.0]];
    let expected_dx = manual_linear
        .backward(&manual_sigmoid.backward(&delta).unwrap())
        .unwrap();
    assert_eq!(pipeline.backward(&delta).unwrap(), expected_dx);
}

#[test]
fn apply_gradients_moves_only_parametrized_layers() {
    let spec = NetworkSpec::mlp(3, 4, 2, 2, LossType::Mse);
    let mut pipeline = spec.build(&mut StdRng::seed_from_u64(1)).unwrap();
    assert_eq!(pipeline.len(), 4);
    assert_eq!(pipeline.parameter_count(), 3 * 4 + 4 + 4 * 2 + 2);

    let before: Vec<Vec<f64>> = pipeline
        .layers()
        .iter()
        .flat_map(|l| l.parameters())
        .map(|p| p.view().iter().copied().collect())
        .collect();

    let x = Array2::from_elem((2, 3), 0.5);
    let y = pipeline.forward(&x).unwrap();
    pipeline.backward(&Array2::ones(y.raw_dim())).unwrap();
    pipeline.apply_gradients(&Sgd::new(0.1)).unwrap();

    let after: Vec<Vec<f64>> = pipeline
        .layers()
        .iter()
        .flat_map(|l| l.parameters())
        .map(|p| p.view().iter().copied().collect())
        .collect();
    assert_eq!(before.len(), 4);
    assert_ne!(before, after);
}

#[test]
fn update_without_backward_reports_missing_gradient() {
    let spec = NetworkSpec::mlp(2, 0, 1, 2, LossType::Mse);
    let mut pipeline = spec.build(&mut StdRng::seed_from_u64(2)).unwrap();
    assert!(matches!(
        pipeline.apply_gradients(&Sgd::unscaled()),
        Err(NetError::MissingGradient { name: "weight" })
    ));
}

#[test]
fn build_is_deterministic_for_a_seed() {
    let spec = NetworkSpec {
        layers: vec![LayerSpec::Linear { input: 5, output: 3 }, LayerSpec::Softmax],
        loss: LossType::CrossEntropy,
    };
    let mut a = spec.build(&mut StdRng::seed_from_u64(8)).unwrap();
    let mut b = spec.build(&mut StdRng::seed_from_u64(8)).unwrap();
    let x = Array2::from_elem((1, 5), 0.25);
    assert_eq!(a.forward(&x).unwrap(), b.forward(&x).unwrap());
}

#[test]
fn width_mismatch_surfaces_on_first_forward() {
    let spec = NetworkSpec::mlp(784, 0, 1, 10, LossType::Mse);
    let mut pipeline = spec.build(&mut StdRng::seed_from_u64(3)).unwrap();
    let err = pipeline.forward(&Array2::zeros((2, 28))).unwrap_err();
    assert!(matches!(err, NetError::ShapeMismatch { .. }));
}
