use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::activation::{Sigmoid, Softmax};
use crate::error::{NetError, Result};
use crate::layers::{Layer, Linear};
use crate::loss::LossType;
use crate::network::Pipeline;

/// One stage of a network description.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LayerSpec {
    Linear { input: usize, output: usize },
    Sigmoid,
    Softmax,
}

/// A serializable description of a network architecture and its loss.
///
/// Only the architecture is stored; trained parameters are not persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkSpec {
    /// Ordered list of stages (input → output).
    pub layers: Vec<LayerSpec>,
    pub loss: LossType,
}

impl NetworkSpec {
    /// Stack of `num_layers` linear layers mapping `input` features to
    /// `classes` outputs through hidden layers of width `hidden_width`.
    ///
    /// Every hidden linear layer is followed by a Sigmoid. The output gets a
    /// Sigmoid for `Mse` and a Softmax for `CrossEntropy`.
    pub fn mlp(
        input: usize,
        hidden_width: usize,
        num_layers: usize,
        classes: usize,
        loss: LossType,
    ) -> NetworkSpec {
        let mut layers = Vec::with_capacity(num_layers * 2);
        let mut width = input;
        for i in 0..num_layers {
            let output = if i + 1 == num_layers { classes } else { hidden_width };
            layers.push(LayerSpec::Linear { input: width, output });
            if i + 1 < num_layers {
                layers.push(LayerSpec::Sigmoid);
            }
            width = output;
        }
        layers.push(match loss {
            LossType::Mse => LayerSpec::Sigmoid,
            LossType::CrossEntropy => LayerSpec::Softmax,
        });
        NetworkSpec { layers, loss }
    }

    /// Checks that consecutive linear layers agree on their widths.
    pub fn validate(&self) -> Result<()> {
        if self.layers.is_empty() {
            return Err(NetError::Configuration("network has no layers".into()));
        }
        let mut width: Option<usize> = None;
        for (i, layer) in self.layers.iter().enumerate() {
            if let LayerSpec::Linear { input, output } = *layer {
                if input == 0 || output == 0 {
                    return Err(NetError::Configuration(format!(
                        "layer {i}: linear widths must be positive (got {input} -> {output})"
                    )));
                }
                if let Some(prev) = width {
                    if prev != input {
                        return Err(NetError::Configuration(format!(
                            "layer {i}: expects {input} inputs but the previous linear layer produces {prev}"
                        )));
                    }
                }
                width = Some(output);
            }
        }
        Ok(())
    }

    /// Instantiates the layers, drawing initial parameters from `rng`.
    pub fn build<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<Pipeline> {
        self.validate()?;
        let layers = self
            .layers
            .iter()
            .map(|spec| -> Box<dyn Layer> {
                match *spec {
                    LayerSpec::Linear { input, output } => {
                        Box::new(Linear::new(input, output, &mut *rng))
                    }
                    LayerSpec::Sigmoid => Box::new(Sigmoid::new()),
                    LayerSpec::Softmax => Box::new(Softmax::new()),
                }
            })
            .collect::<Vec<_>>();
        debug!(layers = layers.len(), "built pipeline");
        Ok(Pipeline::new(layers))
    }

    /// Serializes the spec to a pretty-printed JSON file.
    pub fn save_json(&self, path: &str) -> Result<()> {
        let file = std::fs::File::create(path)?;
        let writer = std::io::BufWriter::new(file);
        serde_json::to_writer_pretty(writer, self)?;
        Ok(())
    }

    /// Deserializes a `NetworkSpec` from a JSON file.
    pub fn load_json(path: &str) -> Result<NetworkSpec> {
        let file = std::fs::File::open(path)?;
        let reader = std::io::BufReader::new(file);
        Ok(serde_json::from_reader(reader)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn single_layer_mlp_is_linear_then_sigmoid() {
        let spec = NetworkSpec::mlp(784, 1000, 1, 10, LossType::Mse);
        assert_eq!(
            spec.layers,
            vec![LayerSpec::Linear { input: 784, output: 10 }, LayerSpec::Sigmoid]
        );
    }

    #[test]
    fn deep_mlp_chains_hidden_widths() {
        let spec = NetworkSpec::mlp(784, 64, 3, 10, LossType::CrossEntropy);
        assert_eq!(
            spec.layers,
            vec![
                LayerSpec::Linear { input: 784, output: 64 },
                LayerSpec::Sigmoid,
                LayerSpec::Linear { input: 64, output: 64 },
                LayerSpec::Sigmoid,
                LayerSpec::Linear { input: 64, output: 10 },
                LayerSpec::Softmax,
            ]
        );
        assert!(spec.validate().is_ok());
    }

    #[test]
    fn mismatched_widths_are_rejected() {
        let spec = NetworkSpec {
            layers: vec![
                LayerSpec::Linear { input: 4, output: 3 },
                LayerSpec::Sigmoid,
                LayerSpec::Linear { input: 2, output: 1 },
            ],
            loss: LossType::Mse,
        };
        let err = spec.build(&mut StdRng::seed_from_u64(1)).unwrap_err();
        assert!(matches!(err, NetError::Configuration(_)));
    }

    #[test]
    fn json_layout_is_tagged() {
        let spec = NetworkSpec::mlp(2, 0, 1, 2, LossType::Mse);
        let json = serde_json::to_string(&spec).unwrap();
        assert_eq!(
            json,
            r#"{"layers":[{"type":"linear","input":2,"output":2},{"type":"sigmoid"}],"loss":"mse"}"#
        );
        let back: NetworkSpec = serde_json::from_str(&json).unwrap();
        assert_eq!(back, spec);
    }
}
