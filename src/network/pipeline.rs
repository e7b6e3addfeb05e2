use ndarray::Array2;

use crate::error::Result;
use crate::layers::Layer;
use crate::optim::Sgd;

/// An ordered chain of layers treated as one differentiable function.
#[derive(Debug, Default)]
pub struct Pipeline {
    layers: Vec<Box<dyn Layer>>,
}

impl Pipeline {
    pub fn new(layers: Vec<Box<dyn Layer>>) -> Pipeline {
        Pipeline { layers }
    }

    pub fn layers(&self) -> &[Box<dyn Layer>] {
        &self.layers
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    /// Feeds `x` through every layer front to back; each layer caches its input.
    pub fn forward(&mut self, x: &Array2<f64>) -> Result<Array2<f64>> {
        self.layers
            .iter_mut()
            .try_fold(x.clone(), |current, layer| layer.forward(&current))
    }

    /// Feeds `delta` through every layer back to front and returns ∂L/∂input.
    /// Parameter gradients are left in the layers.
    pub fn backward(&mut self, delta: &Array2<f64>) -> Result<Array2<f64>> {
        self.layers
            .iter_mut()
            .rev()
            .try_fold(delta.clone(), |current, layer| layer.backward(&current))
    }

    /// Applies `optimizer` to every parameter of every layer.
    pub fn apply_gradients(&mut self, optimizer: &Sgd) -> Result<()> {
        for layer in &mut self.layers {
            optimizer.step(layer.as_mut())?;
        }
        Ok(())
    }

    pub fn parameter_count(&self) -> usize {
        self.layers.iter().map(|l| l.parameter_count()).sum()
    }
}
