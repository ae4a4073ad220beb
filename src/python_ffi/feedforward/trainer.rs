use pyo3::prelude::*;

use super::net::{ConsumableNetwork, Network};
use crate::feedforward::{TrainError, Trainer as InnerTrainer};
use crate::{Impl_to_PyErr, MakeConsumable};

MakeConsumable!(ConsumableTrainer, InnerTrainer, Trainer);

#[pyclass]
pub struct Trainer {
    pub(super) trainer: ConsumableTrainer,
}

#[pymethods]
impl Trainer {
    pub fn topology(&self) -> Vec<usize> {
        self.trainer.get_ref().net_ref().topology().to_vec()
    }

    pub fn passes(&self) -> usize {
        self.trainer.get_ref().passes()
    }

    /// Trains on one sample.
    ///
    /// Returns `(outputs, error, recent_average_error)`.
    pub fn train_sample(
        &mut self,
        inputs: Vec<f64>,
        targets: Vec<f64>,
    ) -> Result<(Vec<f64>, f64, f64), TrainError> {
        let report = self.trainer.get_ref_mut().train_sample(&inputs, &targets)?;
        Ok((report.outputs, report.error, report.recent_average_error))
    }

    /// Trains on `(inputs, targets)` pairs in order.
    ///
    /// Returns the recent average error after every pass.
    pub fn train_samples(
        &mut self,
        samples: Vec<(Vec<f64>, Vec<f64>)>,
    ) -> Result<Vec<f64>, TrainError> {
        let trainer = self.trainer.get_ref_mut();
        samples
            .iter()
            .map(|(inputs, targets)| {
                trainer
                    .train_sample(inputs, targets)
                    .map(|report| report.recent_average_error)
            })
            .collect()
    }

    pub fn teardown(&mut self) -> Network {
        Network {
            net: ConsumableNetwork::acquire(self.trainer.release().teardown()),
        }
    }
}

Impl_to_PyErr!(for TrainError);
