use ndarray::Array2;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, info};

use crate::data::{flatten, normalize, Batch, Buffer};
use crate::error::{NetError, Result};
use crate::loss::Loss;
use crate::math::accuracy;
use crate::network::{NetworkSpec, Pipeline};
use crate::optim::Sgd;
use crate::train::stats::{BatchMetrics, EpochSummary, IterationStats, TrainReport};
use crate::train::train_config::TrainConfig;

/// Where a [`Trainer`] is in its run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrainerState {
    Idle,
    Training { epoch: usize, iteration: usize },
    Evaluating,
    Done,
}

/// Drives a pipeline and its loss through mini-batch gradient descent.
///
/// Each step runs forward, loss, backward and update to completion before the
/// next batch is drawn. The loss backward is seeded with the learning rate,
/// so the optimizer subtracts the gradients unscaled.
#[derive(Debug)]
pub struct Trainer {
    pipeline: Pipeline,
    loss: Box<dyn Loss>,
    optimizer: Sgd,
    config: TrainConfig,
    rng: StdRng,
    state: TrainerState,
}

impl Trainer {
    /// Wraps an already-built pipeline. `rng` drives batch sampling and
    /// dequantization noise.
    pub fn new(
        pipeline: Pipeline,
        loss: Box<dyn Loss>,
        config: TrainConfig,
        rng: StdRng,
    ) -> Result<Trainer> {
        config.validate()?;
        if pipeline.is_empty() {
            return Err(NetError::Configuration("pipeline has no layers".into()));
        }
        Ok(Trainer {
            pipeline,
            loss,
            optimizer: Sgd::unscaled(),
            config,
            rng,
            state: TrainerState::Idle,
        })
    }

    /// Builds the network described by `config` for inputs of `input_width`
    /// features and `classes` outputs.
    ///
    /// The same seeded generator initializes the parameters and then samples
    /// batches, so a fixed `config.seed` reproduces a run exactly.
    pub fn from_config(config: TrainConfig, input_width: usize, classes: usize) -> Result<Trainer> {
        config.validate()?;
        let mut rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let spec = NetworkSpec::mlp(
            input_width,
            config.hidden_width,
            config.num_layers,
            classes,
            config.loss,
        );
        let pipeline = spec.build(&mut rng)?;
        info!(
            layers = pipeline.len(),
            parameters = pipeline.parameter_count(),
            loss = ?config.loss,
            "network ready"
        );
        let loss = config.loss.build();
        Trainer::new(pipeline, loss, config, rng)
    }

    pub fn state(&self) -> TrainerState {
        self.state
    }

    pub fn config(&self) -> &TrainConfig {
        &self.config
    }

    pub fn pipeline(&self) -> &Pipeline {
        &self.pipeline
    }

    /// Scales raw inputs into the unit interval and flattens them to
    /// `[batch, features]`.
    fn prepare(&mut self, batch: &Batch, dequantize: bool) -> Result<Array2<f64>> {
        let scaled = normalize(&batch.inputs, dequantize, &mut self.rng);
        flatten(scaled)
    }

    /// One gradient-descent step on `batch`; returns the pre-update metrics.
    pub fn step(&mut self, batch: &Batch) -> Result<BatchMetrics> {
        let x = self.prepare(batch, self.config.dequantize)?;
        let predictions = self.pipeline.forward(&x)?;
        let loss = self.loss.forward(&predictions, &batch.labels)?;
        let accuracy = accuracy(&predictions, &batch.labels)?;

        let delta = self.loss.backward(self.config.learning_rate)?;
        self.pipeline.backward(&delta)?;
        self.pipeline.apply_gradients(&self.optimizer)?;

        Ok(BatchMetrics {
            loss: loss / batch.len() as f64,
            accuracy,
        })
    }

    /// Forward-only pass over `batch`. Parameters are left untouched and
    /// inputs are always scaled as `raw / 255`, even when training
    /// dequantizes.
    pub fn evaluate(&mut self, batch: &Batch) -> Result<BatchMetrics> {
        let x = self.prepare(batch, false)?;
        let predictions = self.pipeline.forward(&x)?;
        let loss = self.loss.forward(&predictions, &batch.labels)?;
        Ok(BatchMetrics {
            loss: loss / batch.len() as f64,
            accuracy: accuracy(&predictions, &batch.labels)?,
        })
    }

    /// Trains for `config.epochs` epochs on batches drawn from `train`, then
    /// evaluates one `config.test_batch_size` batch drawn from `test`.
    ///
    /// `on_iteration` is called after every training step. A trainer runs once;
    /// calling `run` again is a configuration error.
    pub fn run<F>(&mut self, train: &Buffer, test: &Buffer, mut on_iteration: F) -> Result<TrainReport>
    where
        F: FnMut(&IterationStats),
    {
        if self.state != TrainerState::Idle {
            return Err(NetError::Configuration(format!(
                "trainer already started (state {:?})",
                self.state
            )));
        }
        let iterations = self.config.iterations_for(train.len())?;
        let mut epochs = Vec::with_capacity(self.config.epochs);

        for epoch in 0..self.config.epochs {
            info!(epoch, iterations, "starting epoch");
            let (mut loss_sum, mut accuracy_sum) = (0.0, 0.0);

            for iteration in 0..iterations {
                self.state = TrainerState::Training { epoch, iteration };
                let batch = train.draw(self.config.batch_size, &mut self.rng)?;
                let metrics = self.step(&batch)?;
                debug!(epoch, iteration, loss = metrics.loss, accuracy = metrics.accuracy, "step");

                loss_sum += metrics.loss;
                accuracy_sum += metrics.accuracy;
                on_iteration(&IterationStats {
                    epoch,
                    iteration,
                    iterations,
                    metrics,
                });
            }

            let summary = EpochSummary {
                epoch,
                mean_loss: loss_sum / iterations as f64,
                mean_accuracy: accuracy_sum / iterations as f64,
            };
            info!(
                epoch,
                mean_loss = summary.mean_loss,
                mean_accuracy = summary.mean_accuracy,
                "epoch finished"
            );
            epochs.push(summary);
        }

        self.state = TrainerState::Evaluating;
        let batch = test.draw(self.config.test_batch_size, &mut self.rng)?;
        let test = self.evaluate(&batch)?;
        info!(loss = test.loss, accuracy = test.accuracy, "evaluation finished");

        self.state = TrainerState::Done;
        Ok(TrainReport { epochs, test })
    }
}
