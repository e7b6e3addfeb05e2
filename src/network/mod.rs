pub mod pipeline;
pub mod spec;

pub use pipeline::Pipeline;
pub use spec::{LayerSpec, NetworkSpec};
