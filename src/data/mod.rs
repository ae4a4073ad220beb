//! Training samples: the file-backed sample source and the XOR sample generator

mod samples;
mod training_data;

pub use samples::*;
pub use training_data::*;
