//! SA configuration.

/// Configuration for Simulated Annealing.
///
/// # Examples
///
/// ```
/// use mixopt::sa::SaConfig;
///
/// let config = SaConfig::default()
///     .with_initial_temperature(50.0)
///     .with_cooling_rate(0.99);
/// assert_eq!(config.initial_temperature, 50.0);
/// ```
#[derive(Debug, Clone)]
pub struct SaConfig {
    /// Starting temperature. Must be positive.
    pub initial_temperature: f64,

    /// Multiplicative decay applied each iteration: `T ← T · cooling_rate`.
    ///
    /// Must lie in `(0, 1)`.
    pub cooling_rate: f64,

    /// Temperature at which the run terminates.
    pub min_temperature: f64,

    /// Hard iteration cap.
    pub max_iterations: usize,

    /// Neighbor step as a fraction of a variable's range.
    pub neighbor_scale: f64,

    /// Random seed (`None` for random).
    pub seed: Option<u64>,
}

impl Default for SaConfig {
    fn default() -> Self {
        Self {
            initial_temperature: 100.0,
            cooling_rate: 0.995,
            min_temperature: 1e-4,
            max_iterations: 2_000,
            neighbor_scale: 0.1,
            seed: None,
        }
    }
}

impl SaConfig {
    /// Sets the initial temperature.
    pub fn with_initial_temperature(mut self, t: f64) -> Self {
        self.initial_temperature = t;
        self
    }

    /// Sets the multiplicative cooling rate.
    pub fn with_cooling_rate(mut self, rate: f64) -> Self {
        self.cooling_rate = rate;
        self
    }

    /// Sets the terminating temperature.
    pub fn with_min_temperature(mut self, t: f64) -> Self {
        self.min_temperature = t;
        self
    }

    /// Sets the hard iteration cap.
    pub fn with_max_iterations(mut self, n: usize) -> Self {
        self.max_iterations = n;
        self
    }

    /// Sets the neighbor step scale.
    pub fn with_neighbor_scale(mut self, scale: f64) -> Self {
        self.neighbor_scale = scale.max(0.0);
        self
    }

    /// Sets the random seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), String> {
        if self.initial_temperature <= 0.0 {
            return Err("initial_temperature must be positive".into());
        }
        if !(self.cooling_rate > 0.0 && self.cooling_rate < 1.0) {
            return Err("cooling_rate must be in (0, 1)".into());
        }
        if self.min_temperature <= 0.0 {
            return Err("min_temperature must be positive".into());
        }
        if self.max_iterations == 0 {
            return Err("max_iterations must be at least 1".into());
        }
        Ok(())
    }
}
