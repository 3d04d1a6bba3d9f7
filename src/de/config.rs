//! DE configuration.

/// Configuration for Differential Evolution (rand/1/bin).
///
/// # Examples
///
/// ```
/// use mixopt::de::DeConfig;
///
/// let config = DeConfig::default()
///     .with_differential_weight(0.7)
///     .with_crossover_rate(0.9);
/// assert_eq!(config.differential_weight, 0.7);
/// ```
#[derive(Debug, Clone)]
pub struct DeConfig {
    /// Number of individuals in the population. At least 4 (each mutant
    /// needs three distinct partners besides its target).
    pub population_size: usize,

    /// Maximum number of generations.
    pub max_generations: usize,

    /// Differential weight `F` scaling the difference vector.
    pub differential_weight: f64,

    /// Binomial crossover rate `CR`.
    pub crossover_rate: f64,

    /// Whether to evaluate trial vectors in parallel using rayon.
    pub parallel: bool,

    /// Random seed (`None` for random).
    pub seed: Option<u64>,
}

impl Default for DeConfig {
    fn default() -> Self {
        Self {
            population_size: 40,
            max_generations: 200,
            differential_weight: 0.8,
            crossover_rate: 0.9,
            parallel: true,
            seed: None,
        }
    }
}

impl DeConfig {
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

    /// Sets the differential weight `F`.
    pub fn with_differential_weight(mut self, f: f64) -> Self {
        self.differential_weight = f;
        self
    }

    /// Sets the binomial crossover rate `CR`.
    pub fn with_crossover_rate(mut self, cr: f64) -> Self {
        self.crossover_rate = cr.clamp(0.0, 1.0);
        self
    }

    /// Enables or disables parallel trial evaluation.
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
        if self.population_size < 4 {
            return Err("population_size must be at least 4".into());
        }
        if self.max_generations == 0 {
            return Err("max_generations must be at least 1".into());
        }
        Ok(())
    }
}
