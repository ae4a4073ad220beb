//! Fully connected feedforward neural network with online backpropagation and momentum

mod config;
mod net;
mod trainer;
mod unit;

pub use config::*;
pub use net::*;
pub use trainer::*;
pub use unit::*;
