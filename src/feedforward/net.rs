use rand::Rng;
use std::{error, fmt};

use super::config::NetConfig;
use super::trainer::Trainer;
use super::unit::Layer;

/// Fully connected feedforward network, trained one sample at a time.
///
/// Every unit and every connection is stored explicitly:
/// `layers = [layer_0][layer_1] ... [layer_N]`
/// `layer = [unit_0][unit_1] ... [unit_K][bias]`
/// `unit = activation, gradient, [connection_0] ... [connection_M]`
/// where `M` is the width of the next layer. A connection is addressed by
/// `(layer, source unit, destination unit)`, there are no back references.
#[derive(Debug, Clone)]
pub struct Network {
    /// The number of units in each layer, bias units excluded.
    pub(super) topology: Box<[usize]>,

    pub(super) layers: Vec<Layer>,

    pub(super) config: NetConfig,

    /// RMS error of the most recent `Network::backward`.
    pub(super) error: f64,

    /// Smoothed RMS error across training passes.
    pub(super) recent_average_error: f64,
}

impl Network {
    /// Returns network for given topology.
    /// Connection weights are random from range [0,1).
    ///
    /// # Arguments
    /// * `topology` - a number slice that holds a desired number of units in each layer,
    /// bias units excluded;
    /// * `config` - training constants.
    ///
    /// # Returns
    /// * `Ok(Network)` if there are at least two layers and none of them is empty;
    /// * `Err(NewNetError)` otherwise.
    ///
    /// # Examples
    /// ```
    /// # use scalarnet::feedforward::{NetConfig, Network};
    /// let net = Network::new(&[2, 4, 1], NetConfig::default()).unwrap();
    /// assert_eq!(net.layers().len(), 3);
    /// ```
    pub fn new(topology: &[usize], config: NetConfig) -> Result<Network, NewNetError> {
        Network::with_rng(topology, config, &mut rand::thread_rng())
    }

    /// Same as `Network::new`, drawing the initial weights from `rng`.
    ///
    /// # Examples
    /// ```
    /// # use scalarnet::feedforward::{NetConfig, Network};
    /// use rand::{rngs::StdRng, SeedableRng};
    ///
    /// let config = NetConfig::default();
    /// let a = Network::with_rng(&[2, 2, 1], config, &mut StdRng::seed_from_u64(1)).unwrap();
    /// let b = Network::with_rng(&[2, 2, 1], config, &mut StdRng::seed_from_u64(1)).unwrap();
    /// assert_eq!(a.layers(), b.layers());
    /// ```
    pub fn with_rng<R: Rng + ?Sized>(
        topology: &[usize],
        config: NetConfig,
        rng: &mut R,
    ) -> Result<Network, NewNetError> {
        if topology.len() < 2 {
            return Err(NewNetError::BadTopology(topology.len()));
        }
        if let Some(index) = topology.iter().position(|&width| width == 0) {
            return Err(NewNetError::EmptyLayer(index));
        }

        let layers: Vec<Layer> = topology
            .iter()
            .enumerate()
            .map(|(i, &width)| {
                // Output layer units have no outgoing connections
                let outgoing_count = topology.get(i + 1).copied().unwrap_or(0);
                Layer::new(width, outgoing_count, rng)
            })
            .collect();

        tracing::debug!(
            ?topology,
            units = layers.iter().map(Layer::len).sum::<usize>(),
            "created network"
        );

        Ok(Network {
            topology: topology.to_owned().into_boxed_slice(),
            layers,
            config,
            error: 0.0,
            recent_average_error: 0.0,
        })
    }

    pub fn topology(&self) -> &[usize] {
        &self.topology
    }

    pub fn config(&self) -> &NetConfig {
        &self.config
    }

    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    /// Weight of the connection from unit `from` of layer `layer` to unit `to` of the next layer.
    ///
    /// Returns `None` if there is no such connection.
    pub fn weight(&self, layer: usize, from: usize, to: usize) -> Option<f64> {
        self.layers
            .get(layer)?
            .units
            .get(from)?
            .outgoing
            .get(to)
            .map(|connection| connection.weight)
    }

    /// Overrides the weight of the connection from unit `from` of layer `layer` to unit `to`
    /// of the next layer. Bias units can be used as `from`.
    ///
    /// # Examples
    /// ```
    /// # use scalarnet::feedforward::{NetConfig, Network};
    /// let mut net = Network::new(&[1, 1], NetConfig::default()).unwrap();
    /// net.set_weight(0, 1, 0, 0.0).unwrap();
    /// assert_eq!(net.weight(0, 1, 0), Some(0.0));
    /// assert!(net.set_weight(1, 0, 0, 0.0).is_err());
    /// ```
    pub fn set_weight(
        &mut self,
        layer: usize,
        from: usize,
        to: usize,
        weight: f64,
    ) -> Result<(), WeightIndexError> {
        let connection = self
            .layers
            .get_mut(layer)
            .and_then(|l| l.units.get_mut(from))
            .and_then(|unit| unit.outgoing.get_mut(to))
            .ok_or(WeightIndexError { layer, from, to })?;

        connection.weight = weight;
        Ok(())
    }

    /// Feeds `inputs` through the network.
    ///
    /// Inputs are latched onto the input layer, then each following layer computes its
    /// activations from the previous one. Bias units are never touched.
    ///
    /// # Returns
    /// * `Ok(())` if amount of inputs is right;
    /// * `Err(ForwardError)` otherwise, leaving the network unchanged.
    ///
    /// # Examples
    /// ```
    /// # use scalarnet::feedforward::{NetConfig, Network};
    /// let mut net = Network::new(&[3, 2], NetConfig::default()).unwrap();
    /// net.forward(&[1.0, 0.0, -1.0]).unwrap();
    /// assert_eq!(net.results().len(), 2);
    /// assert!(net.forward(&[1.0]).is_err());
    /// ```
    pub fn forward(&mut self, inputs: &[f64]) -> Result<(), ForwardError> {
        if inputs.len() != self.topology[0] {
            return Err(ForwardError::BadInputs(SizeMismatch {
                expected: self.topology[0],
                got: inputs.len(),
            }));
        }

        for (unit, &input) in self.layers[0].real_units_mut().iter_mut().zip(inputs) {
            unit.set_activation(input);
        }

        for i in 1..self.layers.len() {
            let (done, rest) = self.layers.split_at_mut(i);
            let prev_layer = &done[i - 1];
            for unit in rest[0].real_units_mut() {
                unit.propagate_forward(prev_layer);
            }
        }

        Ok(())
    }

    /// Activations of the output layer, bias unit excluded.
    pub fn results(&self) -> Vec<f64> {
        self.output_layer()
            .real_units()
            .iter()
            .map(|unit| unit.activation)
            .collect()
    }

    /// Same as `Network::results`, writing into `outputs`.
    pub fn write_results(&self, outputs: &mut [f64]) -> Result<(), SizeMismatch> {
        let output_units = self.output_layer().real_units();
        if outputs.len() != output_units.len() {
            return Err(SizeMismatch {
                expected: output_units.len(),
                got: outputs.len(),
            });
        }

        for (output, unit) in outputs.iter_mut().zip(output_units) {
            *output = unit.activation;
        }
        Ok(())
    }

    /// Calculates RMS error of the output layer against given desired values.
    /// Implements the formula:
    /// `sqrt(mean((target - output)^2))`
    fn calc_error(&self, targets: &[f64]) -> f64 {
        let output_units = self.output_layer().real_units();
        let sum: f64 = output_units
            .iter()
            .zip(targets)
            .map(|(unit, &target)| {
                let delta = target - unit.activation;
                delta * delta
            })
            .sum();

        (sum / output_units.len() as f64).sqrt()
    }

    /// Backpropagates `targets` against the outputs of the last `Network::forward` and updates
    /// every connection weight.
    ///
    /// Steps:
    /// * RMS error of the outputs, folded into the running error;
    /// * output layer gradients;
    /// * hidden layer gradients, last hidden layer first;
    /// * connection weights, from the output layer back to the first hidden layer.
    ///
    /// # Returns
    /// * `Ok(f64)` - RMS error of this sample, if amount of targets is right;
    /// * `Err(BackwardError)` otherwise, leaving the network unchanged.
    pub fn backward(&mut self, targets: &[f64]) -> Result<f64, BackwardError> {
        let outputs_count = self.topology[self.topology.len() - 1];
        if targets.len() != outputs_count {
            return Err(BackwardError::BadTargets(SizeMismatch {
                expected: outputs_count,
                got: targets.len(),
            }));
        }

        self.error = self.calc_error(targets);

        // Recent average measurement
        let smoothing = self.config.smoothing_factor;
        self.recent_average_error =
            (self.recent_average_error + smoothing + self.error) / (smoothing + 1.0);

        let last = self.layers.len() - 1;
        for (unit, &target) in self.layers[last].real_units_mut().iter_mut().zip(targets) {
            unit.compute_output_gradient(target);
        }

        // Hidden layers, bias units included
        for i in (1..last).rev() {
            let (head, tail) = self.layers.split_at_mut(i + 1);
            let next_layer = &tail[0];
            for unit in head[i].units.iter_mut() {
                unit.compute_hidden_gradient(next_layer);
            }
        }

        // Bias units have no incoming connections, so only real units update their inputs
        for i in (1..=last).rev() {
            let (head, tail) = self.layers.split_at_mut(i);
            let prev_layer = &mut head[i - 1];
            for unit in tail[0].real_units() {
                unit.update_incoming_weights(prev_layer, &self.config);
            }
        }

        Ok(self.error)
    }

    /// RMS error of the most recent `Network::backward`.
    pub fn last_error(&self) -> f64 {
        self.error
    }

    /// Smoothed RMS error across all `Network::backward` calls so far.
    pub fn recent_average_error(&self) -> f64 {
        self.recent_average_error
    }

    fn output_layer(&self) -> &Layer {
        &self.layers[self.layers.len() - 1]
    }

    /// Consumes `Network` and builds `Trainer` object containing it.
    /// See `Trainer`'s documentation for details.
    pub fn build_trainer(self) -> Trainer {
        Trainer::build(self)
    }
}

/// Error structure for `Network::new`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NewNetError {
    BadTopology(usize),
    EmptyLayer(usize),
}

impl fmt::Display for NewNetError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match &self {
            NewNetError::BadTopology(length) => write!(
                f,
                "Network must have at least two layers (input and output), \
                but got topology with len {}!",
                length
            ),
            NewNetError::EmptyLayer(index) => {
                write!(f, "Layer {} must have at least one unit!", index)
            }
        }
    }
}

impl error::Error for NewNetError {}

/// Error structure for `Network::forward`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ForwardError {
    BadInputs(SizeMismatch),
}

impl fmt::Display for ForwardError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match &self {
            ForwardError::BadInputs(SizeMismatch { expected, got }) => {
                write!(f, "Expected {} input(s), but got {}!", expected, got)
            }
        }
    }
}

impl error::Error for ForwardError {}

/// Error structure for `Network::backward`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackwardError {
    BadTargets(SizeMismatch),
}

impl fmt::Display for BackwardError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match &self {
            BackwardError::BadTargets(SizeMismatch { expected, got }) => {
                write!(f, "Expected {} target(s), but got {}!", expected, got)
            }
        }
    }
}

impl error::Error for BackwardError {}

/// Error structure for `Network::set_weight`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeightIndexError {
    pub layer: usize,
    pub from: usize,
    pub to: usize,
}

impl fmt::Display for WeightIndexError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "No connection from unit {} of layer {} to unit {} of the next layer!",
            self.from, self.layer, self.to
        )
    }
}

impl error::Error for WeightIndexError {}

/// Error structure for collections size mismatch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SizeMismatch {
    pub expected: usize,
    pub got: usize,
}

impl fmt::Display for SizeMismatch {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "Expected {} values, but got {}!",
            self.expected, self.got
        )
    }
}

impl error::Error for SizeMismatch {}
