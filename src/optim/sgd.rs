use crate::error::Result;
use crate::layers::Layer;

/// Plain gradient descent: `p ← p − scale · ∂L/∂p` for every parameter.
///
/// When the loss backward is seeded with the learning rate the gradients are
/// already scaled and [`Sgd::unscaled`] is the matching optimizer. Seeding
/// with 1.0 and using `Sgd::new(learning_rate)` gives the same update.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sgd {
    pub scale: f64,
}

impl Sgd {
    pub fn new(scale: f64) -> Sgd {
        Sgd { scale }
    }

    pub fn unscaled() -> Sgd {
        Sgd::new(1.0)
    }

    /// Updates every parameter the layer exposes; stateless layers are a no-op.
    pub fn step(&self, layer: &mut dyn Layer) -> Result<()> {
        for param in layer.parameters_mut() {
            param.descend(self.scale)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::activation::Sigmoid;
    use crate::layers::Linear;
    use ndarray::array;

    #[test]
    fn step_subtracts_gradients_from_linear() {
        let mut layer = Linear::from_parameters(array![[1.0], [1.0]], array![0.0]).unwrap();
        layer.forward(&array![[1.0, 2.0]]).unwrap();
        layer.backward(&array![[0.5]]).unwrap();
        Sgd::unscaled().step(&mut layer).unwrap();
        assert_eq!(layer.weight(), &array![[0.5], [0.0]]);
        assert_eq!(layer.bias(), &array![-0.5]);
    }

    #[test]
    fn stateless_layers_are_skipped() {
        let mut sigmoid = Sigmoid::new();
        assert!(Sgd::new(0.1).step(&mut sigmoid).is_ok());
    }
}
