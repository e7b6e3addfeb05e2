pub mod sigmoid;
pub mod softmax;

pub use sigmoid::Sigmoid;
pub use softmax::Softmax;
