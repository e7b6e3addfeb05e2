use ndarray::{Array, ArrayViewD, Dimension};

use crate::error::{NetError, Result};
use crate::math::ensure_finite;

/// A learnable tensor together with the gradient from the latest backward pass.
#[derive(Debug, Clone)]
pub struct Parameter<D: Dimension> {
    name: &'static str,
    value: Array<f64, D>,
    delta: Option<Array<f64, D>>,
}

impl<D: Dimension> Parameter<D> {
    pub fn new(name: &'static str, value: Array<f64, D>) -> Parameter<D> {
        Parameter { name, value, delta: None }
    }

    pub fn value(&self) -> &Array<f64, D> {
        &self.value
    }

    /// Gradient from the most recent backward pass; `None` before the first one.
    pub fn delta(&self) -> Option<&Array<f64, D>> {
        self.delta.as_ref()
    }

    /// Overwrites the stored gradient. The shape must match the value.
    pub(crate) fn set_delta(&mut self, delta: Array<f64, D>) -> Result<()> {
        if delta.shape() != self.value.shape() {
            return Err(NetError::shape(self.name, self.value.shape(), delta.shape()));
        }
        self.delta = Some(delta);
        Ok(())
    }
}

/// Type-erased access to a parameter, used by optimizers and inspection code
/// that iterate over layers without knowing their concrete types.
pub trait Trainable {
    fn name(&self) -> &'static str;

    fn shape(&self) -> &[usize];

    /// Number of scalar entries.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn view(&self) -> ArrayViewD<'_, f64>;

    fn delta_view(&self) -> Option<ArrayViewD<'_, f64>>;

    /// `value ← value − scale · delta`.
    fn descend(&mut self, scale: f64) -> Result<()>;
}

impl<D: Dimension> Trainable for Parameter<D> {
    fn name(&self) -> &'static str {
        self.name
    }

    fn shape(&self) -> &[usize] {
        self.value.shape()
    }

    fn len(&self) -> usize {
        self.value.len()
    }

    fn view(&self) -> ArrayViewD<'_, f64> {
        self.value.view().into_dyn()
    }

    fn delta_view(&self) -> Option<ArrayViewD<'_, f64>> {
        self.delta.as_ref().map(|d| d.view().into_dyn())
    }

    fn descend(&mut self, scale: f64) -> Result<()> {
        let delta = self
            .delta
            .as_ref()
            .ok_or(NetError::MissingGradient { name: self.name })?;
        self.value.scaled_add(-scale, delta);
        ensure_finite(&self.value, self.name)
    }
}
