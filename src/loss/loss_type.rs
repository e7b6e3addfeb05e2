use serde::{Deserialize, Serialize};

use crate::loss::{CrossEntropyLoss, Loss, MseLoss};

/// Selects which loss function terminates the pipeline.
///
/// - `Mse`          — pair with a Sigmoid output.
/// - `CrossEntropy` — pair with a Softmax output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LossType {
    #[default]
    Mse,
    CrossEntropy,
}

impl LossType {
    pub fn build(self) -> Box<dyn Loss> {
        match self {
            LossType::Mse => Box::new(MseLoss::new()),
            LossType::CrossEntropy => Box::new(CrossEntropyLoss::new()),
        }
    }
}
