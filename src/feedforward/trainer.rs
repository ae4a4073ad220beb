use std::{error, fmt};

use super::net::{BackwardError, ForwardError, Network};
use crate::data::{LoadError, SampleSource};

/// Online network trainer.
///
/// Training procedure will look like this:
/// * One wraps a `Network` by calling `Network::build_trainer`, which consumes it.
/// * Samples are processed one at a time via `Trainer::train_sample`, or pulled from a
/// `SampleSource` until it runs dry via `Trainer::train_from`. Each finished pass is described
/// by a `PassReport`; printing it is up to the caller.
/// * At any time one can call `Trainer::net_ref` or `Trainer::net_mut` to inspect the network.
/// * Once finished training, `Trainer::teardown` gives the `Network` back.
pub struct Trainer {
    pub(crate) net: Network,

    /// Completed training passes.
    pub(crate) passes: usize,
}

/// Everything observable about a single training pass.
#[derive(Debug, Clone, PartialEq)]
pub struct PassReport {
    /// 1-based pass number.
    pub pass: usize,
    pub inputs: Vec<f64>,
    /// Network outputs, taken after the forward pass and before weights were updated.
    pub outputs: Vec<f64>,
    pub targets: Vec<f64>,
    /// RMS error of this pass.
    pub error: f64,
    pub recent_average_error: f64,
}

impl Trainer {
    /// Consumes `Network` and builds `Trainer` object containing it.
    pub(super) fn build(net: Network) -> Trainer {
        Trainer { net, passes: 0 }
    }

    /// Returns reference to contained `Network`.
    pub fn net_ref(&self) -> &Network {
        &self.net
    }

    /// Returns mutable reference to contained `Network`.
    pub fn net_mut(&mut self) -> &mut Network {
        &mut self.net
    }

    pub fn passes(&self) -> usize {
        self.passes
    }

    /// Runs one forward and one backward pass.
    ///
    /// # Returns
    /// * `Ok(PassReport)` if `inputs` and `targets` fit the network;
    /// * `Err(TrainError)` otherwise. A bad input count leaves the network unchanged,
    /// a bad target count leaves it with the new activations but untrained.
    ///
    /// # Examples
    /// ```
    /// # use scalarnet::feedforward::{NetConfig, Network};
    /// let mut trainer = Network::new(&[2, 4, 1], NetConfig::default()).unwrap().build_trainer();
    /// let report = trainer.train_sample(&[1.0, 0.0], &[1.0]).unwrap();
    /// assert_eq!(report.pass, 1);
    /// assert_eq!(report.outputs.len(), 1);
    /// ```
    pub fn train_sample(
        &mut self,
        inputs: &[f64],
        targets: &[f64],
    ) -> Result<PassReport, TrainError> {
        self.net.forward(inputs)?;
        let outputs = self.net.results();
        let error = self.net.backward(targets)?;
        self.passes += 1;

        Ok(PassReport {
            pass: self.passes,
            inputs: inputs.to_vec(),
            outputs,
            targets: targets.to_vec(),
            error,
            recent_average_error: self.net.recent_average_error(),
        })
    }

    /// Trains on samples from `source` until it is exhausted.
    ///
    /// Training stops without an error when the source signals end of data or yields an
    /// input vector of the wrong length (e.g. a truncated last line). `report` is called
    /// after every pass.
    ///
    /// # Returns
    /// * `Ok(usize)` - the number of passes done by this call;
    /// * `Err(TrainError)` if reading the source fails or a target vector has the wrong length.
    pub fn train_from<S, F>(&mut self, source: &mut S, mut report: F) -> Result<usize, TrainError>
    where
        S: SampleSource + ?Sized,
        F: FnMut(&PassReport),
    {
        let inputs_count = self.net.topology()[0];
        let mut passes = 0;

        while let Some(inputs) = source.next_input_vector()? {
            if inputs.len() != inputs_count {
                break;
            }
            let targets = source.next_target_vector()?;

            let pass = self.train_sample(&inputs, &targets)?;
            report(&pass);
            passes += 1;
        }

        Ok(passes)
    }

    /// Consumes `Trainer` object and returns contained `Network` back.
    pub fn teardown(self) -> Network {
        self.net
    }
}

#[derive(Debug)]
pub enum TrainError {
    Forward(ForwardError),
    Backward(BackwardError),
    Source(LoadError),
}

impl fmt::Display for TrainError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match &self {
            TrainError::Forward(e) => write!(f, "Forward pass failed: {}", e),
            TrainError::Backward(e) => write!(f, "Backward pass failed: {}", e),
            TrainError::Source(e) => write!(f, "Could not read samples: {}", e),
        }
    }
}

impl error::Error for TrainError {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match self {
            TrainError::Forward(e) => Some(e),
            TrainError::Backward(e) => Some(e),
            TrainError::Source(e) => Some(e),
        }
    }
}

impl From<ForwardError> for TrainError {
    fn from(e: ForwardError) -> Self {
        TrainError::Forward(e)
    }
}

impl From<BackwardError> for TrainError {
    fn from(e: BackwardError) -> Self {
        TrainError::Backward(e)
    }
}

impl From<LoadError> for TrainError {
    fn from(e: LoadError) -> Self {
        TrainError::Source(e)
    }
}
