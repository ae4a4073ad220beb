use pyo3::prelude::*;

use super::trainer::{ConsumableTrainer, Trainer};
use crate::feedforward::{
    BackwardError, ForwardError, NetConfig, Network as InnerNetwork, NewNetError,
    WeightIndexError,
};
use crate::{Impl_to_PyErr, MakeConsumable};

MakeConsumable!(ConsumableNetwork, InnerNetwork, Network);

#[pyclass]
pub struct Network {
    pub(super) net: ConsumableNetwork,
}

#[pymethods]
impl Network {
    /// Missing training constants fall back to `NetConfig::default()`.
    #[new]
    pub fn new(
        topology: Vec<usize>,
        learning_rate: Option<f64>,
        momentum: Option<f64>,
        smoothing_factor: Option<f64>,
    ) -> Result<Self, NewNetError> {
        let defaults = NetConfig::default();
        let config = NetConfig::new(
            learning_rate.unwrap_or_else(|| defaults.learning_rate()),
            momentum.unwrap_or_else(|| defaults.momentum()),
            smoothing_factor.unwrap_or_else(|| defaults.smoothing_factor()),
        );

        Ok(Self {
            net: ConsumableNetwork::acquire(InnerNetwork::new(&topology, config)?),
        })
    }

    pub fn topology(&self) -> Vec<usize> {
        self.net.get_ref().topology().to_vec()
    }

    pub fn forward(&mut self, inputs: Vec<f64>) -> Result<(), ForwardError> {
        self.net.get_ref_mut().forward(&inputs)
    }

    pub fn results(&self) -> Vec<f64> {
        self.net.get_ref().results()
    }

    pub fn backward(&mut self, targets: Vec<f64>) -> Result<f64, BackwardError> {
        self.net.get_ref_mut().backward(&targets)
    }

    pub fn recent_average_error(&self) -> f64 {
        self.net.get_ref().recent_average_error()
    }

    pub fn weight(&self, layer: usize, from: usize, to: usize) -> Option<f64> {
        self.net.get_ref().weight(layer, from, to)
    }

    pub fn set_weight(
        &mut self,
        layer: usize,
        from: usize,
        to: usize,
        weight: f64,
    ) -> Result<(), WeightIndexError> {
        self.net.get_ref_mut().set_weight(layer, from, to, weight)
    }

    pub fn build_trainer(&mut self) -> Trainer {
        Trainer {
            trainer: ConsumableTrainer::acquire(self.net.release().build_trainer()),
        }
    }
}

Impl_to_PyErr!(for NewNetError, ForwardError, BackwardError, WeightIndexError);
