pub mod stats;
pub mod train_config;
pub mod trainer;

pub use stats::{BatchMetrics, EpochSummary, IterationStats, TrainReport};
pub use train_config::TrainConfig;
pub use trainer::{Trainer, TrainerState};
