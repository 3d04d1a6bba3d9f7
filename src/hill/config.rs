//! Hill climbing configuration.

/// Configuration for steepest-ascent hill climbing.
///
/// # Examples
///
/// ```
/// use mixopt::hill::HillConfig;
///
/// let config = HillConfig::default().with_max_iterations(100);
/// assert_eq!(config.max_iterations, 100);
/// ```
#[derive(Debug, Clone)]
pub struct HillConfig {
    /// Hard iteration cap.
    pub max_iterations: usize,

    /// Neighborhood step as a fraction of a variable's range.
    pub neighborhood_scale: f64,

    /// Random seed (`None` for random). Seeds the starting point and the
    /// categorical neighborhood sampling.
    pub seed: Option<u64>,
}

impl Default for HillConfig {
    fn default() -> Self {
        Self {
            max_iterations: 500,
            neighborhood_scale: 0.05,
            seed: None,
        }
    }
}

impl HillConfig {
    /// Sets the hard iteration cap.
    pub fn with_max_iterations(mut self, n: usize) -> Self {
        self.max_iterations = n;
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
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_valid() {
        assert!(HillConfig::default().validate().is_ok());
    }

    #[test]
    fn test_validate_zero_iterations() {
        assert!(HillConfig::default()
            .with_max_iterations(0)
            .validate()
            .is_err());
    }
}
