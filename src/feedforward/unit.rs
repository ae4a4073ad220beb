use rand::distributions::{Distribution, Uniform};
use rand::Rng;

use super::config::NetConfig;

/// Weighted edge from a unit to the unit with the same index in the next layer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Connection {
    pub(super) weight: f64,
    /// Last applied change of `weight`, reused as the momentum term.
    pub(super) delta_weight: f64,
}

impl Connection {
    pub fn weight(&self) -> f64 {
        self.weight
    }

    pub fn delta_weight(&self) -> f64 {
        self.delta_weight
    }
}

/// Single neuron: an activation, a gradient and one outgoing connection per
/// non-bias unit of the following layer.
#[derive(Debug, Clone, PartialEq)]
pub struct Unit {
    pub(super) activation: f64,
    pub(super) gradient: f64,
    pub(super) outgoing: Vec<Connection>,
    /// Index of this unit inside its own layer. Units of the next layer use it to pick
    /// `prev_unit.outgoing[position]`.
    pub(super) position: usize,
}

/// Transfer function, outputs in `[-1, 1]`.
fn transfer(x: f64) -> f64 {
    x.tanh()
}

/// Derivative of `tanh`, expressed in terms of its output.
fn transfer_derivative(y: f64) -> f64 {
    1.0 - y * y
}

impl Unit {
    /// Creates a unit with `outgoing_count` connections, weights drawn from `[0, 1)`.
    pub(super) fn new<R: Rng + ?Sized>(
        outgoing_count: usize,
        position: usize,
        rng: &mut R,
    ) -> Unit {
        let weights_between = Uniform::from(0.0..1.0);
        let outgoing = weights_between
            .sample_iter(rng)
            .take(outgoing_count)
            .map(|weight| Connection {
                weight,
                delta_weight: 0.0,
            })
            .collect();

        Unit {
            activation: 0.0,
            gradient: 0.0,
            outgoing,
            position,
        }
    }

    pub fn activation(&self) -> f64 {
        self.activation
    }

    pub(super) fn set_activation(&mut self, value: f64) {
        self.activation = value;
    }

    pub fn gradient(&self) -> f64 {
        self.gradient
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn outgoing(&self) -> &[Connection] {
        &self.outgoing
    }

    /// Computes `tanh(sum(prev.activation + prev.outgoing[position].weight))` over every
    /// unit of `prev_layer`, the bias unit included.
    ///
    /// The predecessor activation and the connection weight are added, not multiplied.
    pub(super) fn propagate_forward(&mut self, prev_layer: &Layer) {
        let sum: f64 = prev_layer
            .units
            .iter()
            .map(|unit| unit.activation + unit.outgoing[self.position].weight)
            .sum();

        self.activation = transfer(sum);
    }

    pub(super) fn compute_output_gradient(&mut self, target: f64) {
        let delta = target - self.activation;
        self.gradient = delta * transfer_derivative(self.activation);
    }

    /// Sum of this unit's contributions to the gradients of the units it feeds.
    pub(super) fn sum_downstream_gradient(&self, next_layer: &Layer) -> f64 {
        self.outgoing
            .iter()
            .zip(next_layer.real_units())
            .map(|(connection, unit)| connection.weight * unit.gradient)
            .sum()
    }

    pub(super) fn compute_hidden_gradient(&mut self, next_layer: &Layer) {
        let dow = self.sum_downstream_gradient(next_layer);
        self.gradient = dow * transfer_derivative(self.activation);
    }

    /// Updates the connections of `prev_layer` that end in this unit.
    ///
    /// `new_delta = eta * prev.activation * gradient * alpha * old_delta`, all four factors
    /// multiplied together.
    pub(super) fn update_incoming_weights(&self, prev_layer: &mut Layer, config: &NetConfig) {
        for unit in prev_layer.units.iter_mut() {
            let activation = unit.activation;
            let connection = &mut unit.outgoing[self.position];

            let new_delta = config.learning_rate
                * activation
                * self.gradient
                * config.momentum
                * connection.delta_weight;

            connection.delta_weight = new_delta;
            connection.weight += new_delta;
        }
    }
}

/// Ordered units of one layer. The last unit is always the bias unit, pinned to `1.0`.
#[derive(Debug, Clone, PartialEq)]
pub struct Layer {
    pub(super) units: Vec<Unit>,
}

impl Layer {
    /// Builds `width` units plus the bias unit, each with `outgoing_count` connections.
    pub(super) fn new<R: Rng + ?Sized>(width: usize, outgoing_count: usize, rng: &mut R) -> Layer {
        let mut units: Vec<Unit> = (0..=width)
            .map(|position| Unit::new(outgoing_count, position, rng))
            .collect();

        // Force the bias unit's output to 1.0
        if let Some(bias) = units.last_mut() {
            bias.set_activation(1.0);
        }

        Layer { units }
    }

    /// All units, bias unit last.
    pub fn units(&self) -> &[Unit] {
        &self.units
    }

    /// Number of units including the bias unit.
    pub fn len(&self) -> usize {
        self.units.len()
    }

    /// Declared width of the layer, i.e. number of units excluding the bias unit.
    pub fn width(&self) -> usize {
        self.units.len() - 1
    }

    pub fn bias(&self) -> &Unit {
        &self.units[self.width()]
    }

    /// Units without the trailing bias unit.
    pub fn real_units(&self) -> &[Unit] {
        &self.units[..self.width()]
    }

    pub(super) fn real_units_mut(&mut self) -> &mut [Unit] {
        let width = self.width();
        &mut self.units[..width]
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;

    fn layer(activations: &[f64], weights: &[&[f64]]) -> Layer {
        let units = activations
            .iter()
            .zip(weights.iter())
            .enumerate()
            .map(|(position, (&activation, &weights))| Unit {
                activation,
                gradient: 0.0,
                outgoing: weights
                    .iter()
                    .map(|&weight| Connection {
                        weight,
                        delta_weight: 0.0,
                    })
                    .collect(),
                position,
            })
            .collect();
        Layer { units }
    }

    #[test]
    fn new_layer_has_bias() {
        let mut rng = StdRng::seed_from_u64(7);
        let layer = Layer::new(3, 2, &mut rng);

        assert_eq!(layer.len(), 4);
        assert_eq!(layer.width(), 3);
        assert_eq!(layer.bias().activation(), 1.0);
        for (i, unit) in layer.units().iter().enumerate() {
            assert_eq!(unit.position(), i);
            assert_eq!(unit.outgoing().len(), 2);
            for connection in unit.outgoing() {
                assert!(connection.weight() >= 0.0 && connection.weight() < 1.0);
                assert_eq!(connection.delta_weight(), 0.0);
            }
        }
    }

    #[test]
    fn forward_adds_activation_and_weight() {
        let prev = layer(&[0.5, -0.25, 1.0], &[&[0.1, 0.2], &[0.3, 0.4], &[0.0, 0.6]]);
        let mut unit = Unit {
            activation: 0.0,
            gradient: 0.0,
            outgoing: Vec::new(),
            position: 1,
        };

        unit.propagate_forward(&prev);

        let sum: f64 = (0.5 + 0.2) + (-0.25 + 0.4) + (1.0 + 0.6);
        assert_abs_diff_eq!(unit.activation(), sum.tanh(), epsilon = 1e-12);
    }

    #[test]
    fn output_gradient() {
        let mut unit = Unit {
            activation: 0.5,
            gradient: 0.0,
            outgoing: Vec::new(),
            position: 0,
        };

        unit.compute_output_gradient(1.0);

        assert_abs_diff_eq!(unit.gradient(), 0.5 * 0.75, epsilon = 1e-12);
    }

    #[test]
    fn hidden_gradient_skips_next_bias() {
        let mut next = layer(&[0.0, 0.0, 1.0], &[&[], &[], &[]]);
        next.units[0].gradient = 2.0;
        next.units[1].gradient = -1.0;
        next.units[2].gradient = 100.0;

        let mut unit = layer(&[0.5], &[&[0.25, 0.5]]).units.remove(0);

        assert_abs_diff_eq!(unit.sum_downstream_gradient(&next), 0.0, epsilon = 1e-12);

        unit.outgoing[0].weight = 1.0;
        unit.compute_hidden_gradient(&next);

        assert_abs_diff_eq!(unit.gradient(), (2.0 - 0.5) * 0.75, epsilon = 1e-12);
    }

    #[test]
    fn update_multiplies_momentum_term() {
        let config = NetConfig::new(0.5, 0.5, 100.0);
        let mut prev = layer(&[1.0, 1.0], &[&[0.2], &[0.4]]);
        prev.units[0].outgoing[0].delta_weight = 2.0;

        let unit = Unit {
            activation: 0.0,
            gradient: 0.5,
            outgoing: Vec::new(),
            position: 0,
        };
        unit.update_incoming_weights(&mut prev, &config);

        // 0.5 * 1.0 * 0.5 * 0.5 * 2.0
        assert_abs_diff_eq!(prev.units[0].outgoing[0].delta_weight(), 0.25, epsilon = 1e-12);
        assert_abs_diff_eq!(prev.units[0].outgoing[0].weight(), 0.45, epsilon = 1e-12);
        // Zero previous delta keeps the weight where it is
        assert_eq!(prev.units[1].outgoing[0].delta_weight(), 0.0);
        assert_eq!(prev.units[1].outgoing[0].weight(), 0.4);
    }
}
