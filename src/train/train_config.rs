use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{NetError, Result};
use crate::loss::LossType;

/// Hyperparameters and data location for a training run.
///
/// Every field has a default, so a JSON file only needs the values it changes.
///
/// # Fields
/// - `epochs`:          number of epochs
/// - `batch_size`:      items per training mini-batch
/// - `learning_rate`:   seed passed to the loss backward pass
/// - `iterations`:      mini-batches per epoch; `None` means `dataset_size / batch_size`
/// - `num_layers`:      linear layers in the network
/// - `hidden_width`:    width of every hidden layer (unused when `num_layers == 1`)
/// - `test_batch_size`: items in the held-out evaluation batch
/// - `loss`:            `mse` (Sigmoid output) or `cross_entropy` (Softmax output)
/// - `dequantize`:      add uniform noise to raw training pixels before scaling;
///   evaluation batches are always plain `raw / 255`
/// - `seed`:            RNG seed; `None` draws one from the OS
/// - `data_dir`:        directory holding the four MNIST IDX files
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainConfig {
    pub epochs: usize,
    pub batch_size: usize,
    pub learning_rate: f64,
    pub iterations: Option<usize>,
    pub num_layers: usize,
    pub hidden_width: usize,
    pub test_batch_size: usize,
    pub loss: LossType,
    pub dequantize: bool,
    pub seed: Option<u64>,
    pub data_dir: String,
}

impl Default for TrainConfig {
    fn default() -> Self {
        TrainConfig {
            epochs: 10,
            batch_size: 300,
            learning_rate: 0.001,
            iterations: None,
            num_layers: 1,
            hidden_width: 1000,
            test_batch_size: 100,
            loss: LossType::Mse,
            dequantize: false,
            seed: None,
            data_dir: "MNIST".to_owned(),
        }
    }
}

impl TrainConfig {
    /// Rejects values that would make the run meaningless before any work starts.
    pub fn validate(&self) -> Result<()> {
        let fail = |msg: String| Err(NetError::Configuration(msg));
        if self.epochs == 0 {
            return fail("epochs must be at least 1".into());
        }
        if self.batch_size == 0 {
            return fail("batch_size must be at least 1".into());
        }
        if self.test_batch_size == 0 {
            return fail("test_batch_size must be at least 1".into());
        }
        if self.iterations == Some(0) {
            return fail("iterations must be at least 1 when given".into());
        }
        if self.num_layers == 0 {
            return fail("num_layers must be at least 1".into());
        }
        if self.num_layers > 1 && self.hidden_width == 0 {
            return fail("hidden_width must be at least 1 with more than one layer".into());
        }
        if !self.learning_rate.is_finite() || self.learning_rate <= 0.0 {
            return fail(format!(
                "learning_rate must be a positive finite number, got {}",
                self.learning_rate
            ));
        }
        Ok(())
    }

    /// Mini-batches per epoch for a dataset of `dataset_size` items.
    pub fn iterations_for(&self, dataset_size: usize) -> Result<usize> {
        if let Some(n) = self.iterations {
            return Ok(n);
        }
        let n = dataset_size / self.batch_size.max(1);
        if n == 0 {
            return Err(NetError::Configuration(format!(
                "batch_size {} exceeds the dataset size {dataset_size}; set iterations explicitly",
                self.batch_size
            )));
        }
        if self.batch_size > dataset_size / 2 {
            warn!(
                batch_size = self.batch_size,
                dataset_size, "only {n} iteration(s) per epoch"
            );
        }
        Ok(n)
    }

    /// Serializes the config to a pretty-printed JSON file.
    pub fn save_json(&self, path: &str) -> Result<()> {
        let file = std::fs::File::create(path)?;
        let writer = std::io::BufWriter::new(file);
        serde_json::to_writer_pretty(writer, self)?;
        Ok(())
    }

    /// Deserializes a `TrainConfig` from a JSON file; missing fields take defaults.
    pub fn load_json(path: &str) -> Result<TrainConfig> {
        let file = std::fs::File::open(path)?;
        let reader = std::io::BufReader::new(file);
        Ok(serde_json::from_reader(reader)?)
    }
}
