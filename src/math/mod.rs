pub mod matrix;

pub use matrix::{accuracy, argmax_rows, ensure_finite, standard_normal};
