//! Tabu Search configuration.

/// Configuration parameters for Tabu Search.
///
/// # Examples
///
/// ```
/// use mixopt::tabu::TabuConfig;
///
/// let config = TabuConfig::default()
///     .with_max_iterations(1000)
///     .with_tabu_tenure(7);
/// assert_eq!(config.tabu_tenure, 7);
/// ```
#[derive(Debug, Clone)]
pub struct TabuConfig {
    /// Maximum number of iterations.
    pub max_iterations: usize,

    /// Size of the FIFO short-term memory: how many recent moves stay tabu.
    pub tabu_tenure: usize,

    /// Whether a tabu move may be taken when it sets a new global best
    /// (aspiration criterion).
    pub aspiration: bool,

    /// Maximum iterations without improvement before stopping.
    pub max_no_improve: usize,

    /// Neighborhood step as a fraction of a variable's range.
    pub neighborhood_scale: f64,

    /// Random seed (`None` for random).
    pub seed: Option<u64>,
}

impl Default for TabuConfig {
    fn default() -> Self {
        Self {
            max_iterations: 500,
            tabu_tenure: 7,
            aspiration: true,
            max_no_improve: 100,
            neighborhood_scale: 0.05,
            seed: None,
        }
    }
}

impl TabuConfig {
    /// Sets the maximum number of iterations.
    pub fn with_max_iterations(mut self, n: usize) -> Self {
        self.max_iterations = n;
        self
    }

    /// Sets the tabu tenure.
    pub fn with_tabu_tenure(mut self, tenure: usize) -> Self {
        self.tabu_tenure = tenure;
        self
    }

    /// Enables or disables the aspiration criterion.
    pub fn with_aspiration(mut self, aspiration: bool) -> Self {
        self.aspiration = aspiration;
        self
    }

    /// Sets maximum iterations without improvement.
    pub fn with_max_no_improve(mut self, n: usize) -> Self {
        self.max_no_improve = n;
        self
    }

    /// Sets the neighborhood step scale.
    pub fn with_neighborhood_scale(mut self, scale: f64) -> Self {
        self.neighborhood_scale = scale.max(0.0);
        self
    }

    /// Sets the random seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), String> {
        if self.max_iterations == 0 {
            return Err("max_iterations must be at least 1".into());
        }
        if self.tabu_tenure == 0 {
            return Err("tabu_tenure must be at least 1".into());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_valid() {
        assert!(TabuConfig::default().validate().is_ok());
        assert!(TabuConfig::default().aspiration);
    }

    #[test]
    fn test_validate_zero_tenure() {
        assert!(TabuConfig::default().with_tabu_tenure(0).validate().is_err());
    }
}
