/// Training constants shared by every unit of a `Network`.
///
/// Built once and handed to `Network::new`; the network never changes it afterwards.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NetConfig {
    /// `eta`, the overall training rate, usually in `[0, 1]`.
    pub(super) learning_rate: f64,
    /// `alpha`, the multiplier of the previous weight change.
    pub(super) momentum: f64,
    /// Number of samples the running error is averaged over.
    pub(super) smoothing_factor: f64,
}

impl NetConfig {
    /// # Examples
    /// ```
    /// # use scalarnet::feedforward::NetConfig;
    /// let config = NetConfig::new(0.2, 0.4, 50.0);
    /// assert_eq!(config.momentum(), 0.4);
    /// ```
    pub fn new(learning_rate: f64, momentum: f64, smoothing_factor: f64) -> NetConfig {
        NetConfig {
            learning_rate,
            momentum,
            smoothing_factor,
        }
    }

    pub fn learning_rate(&self) -> f64 {
        self.learning_rate
    }

    pub fn momentum(&self) -> f64 {
        self.momentum
    }

    pub fn smoothing_factor(&self) -> f64 {
        self.smoothing_factor
    }
}

impl Default for NetConfig {
    fn default() -> NetConfig {
        NetConfig::new(0.15, 0.5, 100.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_values() {
        let config = NetConfig::default();
        assert_eq!(config.learning_rate(), 0.15);
        assert_eq!(config.momentum(), 0.5);
        assert_eq!(config.smoothing_factor(), 100.0);
    }
}
