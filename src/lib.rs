pub mod activation;
pub mod data;
pub mod error;
pub mod layers;
pub mod logging;
pub mod loss;
pub mod math;
pub mod network;
pub mod optim;
pub mod train;

// Convenience re-exports
pub use activation::{Sigmoid, Softmax};
pub use data::{Batch, Buffer};
pub use error::{NetError, Result};
pub use layers::{Layer, Linear, Parameter, Trainable};
pub use loss::{CrossEntropyLoss, Loss, LossType, MseLoss};
pub use network::{LayerSpec, NetworkSpec, Pipeline};
pub use optim::Sgd;
pub use train::{Trainer, TrainerState, TrainConfig};
