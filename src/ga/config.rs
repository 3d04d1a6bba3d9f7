//! GA configuration.

/// Configuration for the Genetic Algorithm.
///
/// # Builder Pattern
///
/// ```
/// use mixopt::ga::GaConfig;
///
/// let config = GaConfig::default()
///     .with_population_size(40)
///     .with_tournament_size(4)
///     .with_mutation_rate(0.05);
/// assert_eq!(config.population_size, 40);
/// ```
#[derive(Debug, Clone)]
pub struct GaConfig {
    /// Number of individuals in the population.
    pub population_size: usize,

    /// Maximum number of generations before termination.
    pub max_generations: usize,

    /// Tournament size for parent selection (fixed per run).
    ///
    /// Higher values increase selection pressure. Typical range: 2–5.
    pub tournament_size: usize,

    /// Probability of applying uniform crossover to a pair of parents.
    pub crossover_rate: f64,

    /// Per-gene mutation probability.
    pub mutation_rate: f64,

    /// Continuous mutation step as a fraction of a variable's range.
    pub mutation_scale: f64,

    /// Early-stop threshold: the run converges when the variance of the
    /// last 10 best-fitness values falls below this.
    pub convergence_threshold: f64,

    /// Whether to evaluate offspring in parallel using rayon.
    pub parallel: bool,

    /// Random seed for reproducibility. `None` uses a random seed.
    pub seed: Option<u64>,
}

impl Default for GaConfig {
    fn default() -> Self {
        Self {
            population_size: 50,
            max_generations: 200,
            tournament_size: 3,
            crossover_rate: 0.8,
            mutation_rate: 0.1,
            mutation_scale: 0.1,
            convergence_threshold: 1e-8,
            parallel: true,
            seed: None,
        }
    }
}

impl GaConfig {
    /// Sets the population size.
    pub fn with_population_size(mut self, n: usize) -> Self {
        self.population_size = n;
        self
    }

    /// Sets the maximum number of generations.
    pub fn with_max_generations(mut self, n: usize) -> Self {
        self.max_generations = n;
        self
    }

    /// Sets the tournament size.
    pub fn with_tournament_size(mut self, k: usize) -> Self {
        self.tournament_size = k.max(1);
        self
    }

    /// Sets the crossover rate.
    pub fn with_crossover_rate(mut self, rate: f64) -> Self {
        self.crossover_rate = rate.clamp(0.0, 1.0);
        self
    }

    /// Sets the per-gene mutation rate.
    pub fn with_mutation_rate(mut self, rate: f64) -> Self {
        self.mutation_rate = rate.clamp(0.0, 1.0);
        self
    }

    /// Sets the continuous mutation step scale.
    pub fn with_mutation_scale(mut self, scale: f64) -> Self {
        self.mutation_scale = scale.max(0.0);
        self
    }

    /// Sets the convergence variance threshold.
    pub fn with_convergence_threshold(mut self, threshold: f64) -> Self {
        self.convergence_threshold = threshold.max(0.0);
        self
    }

    /// Enables or disables parallel evaluation.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Sets the random seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), String> {
        if self.population_size < 2 {
            return Err("population_size must be at least 2".into());
        }
        if self.max_generations == 0 {
            return Err("max_generations must be at least 1".into());
        }
        if self.tournament_size == 0 {
            return Err("tournament_size must be at least 1".into());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_valid() {
        assert!(GaConfig::default().validate().is_ok());
    }

    #[test]
    fn test_builder_clamps_rates() {
        let config = GaConfig::default()
            .with_crossover_rate(1.5)
            .with_mutation_rate(-0.2);
        assert!((config.crossover_rate - 1.0).abs() < 1e-12);
        assert!((config.mutation_rate - 0.0).abs() < 1e-12);
    }

    #[test]
    fn test_validate_rejects_degenerate() {
        assert!(GaConfig::default()
            .with_population_size(1)
            .validate()
            .is_err());
        assert!(GaConfig::default()
            .with_max_generations(0)
            .validate()
            .is_err());
    }
}
