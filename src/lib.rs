//! Fully connected feedforward neural network where every unit and connection is an explicit
//! value, trained online (one sample at a time) by backpropagation with momentum.
//!
//! # Examples
//!
//! ```
//! use scalarnet::data::{SampleSource, TrainingData};
//! use scalarnet::feedforward::{NetConfig, Network};
//!
//! let text = "topology: 2 3 1\nin: 1.0 0.0\nout: 1.0\nin: 0.0 0.0\nout: 0.0\n";
//! let mut data = TrainingData::from_reader(text.as_bytes()).unwrap();
//!
//! let net = Network::new(data.topology(), NetConfig::default()).unwrap();
//! let mut trainer = net.build_trainer();
//! let passes = trainer
//!     .train_from(&mut data, |report| println!("{:?}", report))
//!     .unwrap();
//! assert_eq!(passes, 2);
//! ```

pub mod data;
pub mod feedforward;

#[cfg(feature = "python")]
pub mod python_ffi;
