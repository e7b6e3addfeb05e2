use std::fmt;

use serde::{Deserialize, Serialize};

/// Loss and accuracy measured on one batch.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BatchMetrics {
    /// Loss divided by the batch size. Gradients use the undivided value.
    pub loss: f64,
    /// Fraction of the batch whose argmax prediction matched the label.
    pub accuracy: f64,
}

impl fmt::Display for BatchMetrics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "loss: {:.6} ratio: {:.4}", self.loss, self.accuracy)
    }
}

/// Metrics for one training iteration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IterationStats {
    /// 0-based epoch index.
    pub epoch: usize,
    /// 0-based iteration index within the epoch.
    pub iteration: usize,
    /// Iterations per epoch.
    pub iterations: usize,
    pub metrics: BatchMetrics,
}

impl fmt::Display for IterationStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "epoch: {} iteration: {}/{} {}",
            self.epoch, self.iteration, self.iterations, self.metrics
        )
    }
}

/// Mean training metrics over one epoch.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EpochSummary {
    pub epoch: usize,
    pub mean_loss: f64,
    pub mean_accuracy: f64,
}

/// Everything a completed run produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainReport {
    pub epochs: Vec<EpochSummary>,
    /// Forward-only metrics on the held-out batch.
    pub test: BatchMetrics,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn iteration_line_format() {
        let stats = IterationStats {
            epoch: 2,
            iteration: 14,
            iterations: 200,
            metrics: BatchMetrics { loss: 0.45, accuracy: 0.12 },
        };
        assert_eq!(
            stats.to_string(),
            "epoch: 2 iteration: 14/200 loss: 0.450000 ratio: 0.1200"
        );
    }

    #[test]
    fn metrics_line_format() {
        let stats = BatchMetrics { loss: 0.1, accuracy: 0.9 };
        assert_eq!(stats.to_string(), "loss: 0.100000 ratio: 0.9000");
    }
}
