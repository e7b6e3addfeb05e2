use ndarray::{Array1, Array2, Axis, Ix1, Ix2};
use rand::Rng;
use tracing::debug;

use crate::error::{NetError, Result};
use crate::layers::{Layer, Parameter, Trainable};
use crate::math::{ensure_finite, standard_normal};

/// Affine map `y = x·W + b` from `input_dim` to `output_dim` features.
#[derive(Debug, Clone)]
pub struct Linear {
    weight: Parameter<Ix2>,
    bias: Parameter<Ix1>,
    input: Option<Array2<f64>>,
}

impl Linear {
    /// Draws W `[input_dim, output_dim]` and b `[output_dim]` from N(0, 1).
    pub fn new<R: Rng + ?Sized>(input_dim: usize, output_dim: usize, rng: &mut R) -> Linear {
        debug!(input_dim, output_dim, "initialising linear layer");
        let weight = standard_normal((input_dim, output_dim), rng);
        let bias = standard_normal(output_dim, rng);
        Linear {
            weight: Parameter::new("weight", weight),
            bias: Parameter::new("bias", bias),
            input: None,
        }
    }

    /// Builds a layer from explicit parameters; `bias.len()` must equal the
    /// number of weight columns.
    pub fn from_parameters(weight: Array2<f64>, bias: Array1<f64>) -> Result<Linear> {
        if bias.len() != weight.ncols() {
            return Err(NetError::shape("linear bias", &[weight.ncols()], bias.shape()));
        }
        Ok(Linear {
            weight: Parameter::new("weight", weight),
            bias: Parameter::new("bias", bias),
            input: None,
        })
    }

    pub fn input_dim(&self) -> usize {
        self.weight.value().nrows()
    }

    pub fn output_dim(&self) -> usize {
        self.weight.value().ncols()
    }

    pub fn weight(&self) -> &Array2<f64> {
        self.weight.value()
    }

    pub fn bias(&self) -> &Array1<f64> {
        self.bias.value()
    }

    pub fn weight_delta(&self) -> Option<&Array2<f64>> {
        self.weight.delta()
    }

    pub fn bias_delta(&self) -> Option<&Array1<f64>> {
        self.bias.delta()
    }
}

impl Layer for Linear {
    fn name(&self) -> &'static str {
        "linear"
    }

    fn forward(&mut self, x: &Array2<f64>) -> Result<Array2<f64>> {
        self.input = None;
        if x.ncols() != self.input_dim() {
            return Err(NetError::shape(
                "linear forward",
                &[x.nrows(), self.input_dim()],
                x.shape(),
            ));
        }
        let y = x.dot(self.weight.value()) + self.bias.value();
        ensure_finite(&y, "linear forward")?;
        self.input = Some(x.clone());
        Ok(y)
    }

    fn backward(&mut self, delta: &Array2<f64>) -> Result<Array2<f64>> {
        let x = self
            .input
            .as_ref()
            .ok_or(NetError::BackwardBeforeForward { component: "linear" })?;
        if delta.dim() != (x.nrows(), self.output_dim()) {
            return Err(NetError::shape(
                "linear backward",
                &[x.nrows(), self.output_dim()],
                delta.shape(),
            ));
        }

        let weight_delta = x.t().dot(delta);
        let bias_delta = delta.sum_axis(Axis(0));
        let input_delta = delta.dot(&self.weight.value().t());

        self.weight.set_delta(weight_delta)?;
        self.bias.set_delta(bias_delta)?;
        Ok(input_delta)
    }

    fn parameters(&self) -> Vec<&dyn Trainable> {
        vec![&self.weight as &dyn Trainable, &self.bias]
    }

    fn parameters_mut(&mut self) -> Vec<&mut dyn Trainable> {
        vec![&mut self.weight as &mut dyn Trainable, &mut self.bias]
    }
}
