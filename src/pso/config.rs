//! PSO configuration.

/// Configuration for Particle Swarm Optimization.
///
/// # Examples
///
/// ```
/// use mixopt::pso::PsoConfig;
///
/// let config = PsoConfig::default()
///     .with_swarm_size(30)
///     .with_inertia(0.7);
/// assert_eq!(config.swarm_size, 30);
/// ```
#[derive(Debug, Clone)]
pub struct PsoConfig {
    /// Number of particles in the swarm.
    pub swarm_size: usize,

    /// Maximum number of iterations.
    pub max_iterations: usize,

    /// Inertia weight on the previous velocity.
    pub inertia: f64,

    /// Cognitive coefficient pulling toward each particle's personal best.
    pub cognitive: f64,

    /// Social coefficient pulling toward the global best.
    pub social: f64,

    /// Velocity bound per dimension, as a fraction of the variable's range.
    pub max_velocity: f64,

    /// Random seed (`None` for random).
    pub seed: Option<u64>,
}

impl Default for PsoConfig {
    fn default() -> Self {
        Self {
            swarm_size: 30,
            max_iterations: 200,
            inertia: 0.7,
            cognitive: 1.5,
            social: 1.5,
            max_velocity: 0.2,
            seed: None,
        }
    }
}

impl PsoConfig {
    /// Sets the swarm size.
    pub fn with_swarm_size(mut self, n: usize) -> Self {
        self.swarm_size = n;
        self
    }

    /// Sets the maximum number of iterations.
    pub fn with_max_iterations(mut self, n: usize) -> Self {
        self.max_iterations = n;
        self
    }

    /// Sets the inertia weight.
    pub fn with_inertia(mut self, w: f64) -> Self {
        self.inertia = w;
        self
    }

    /// Sets the cognitive coefficient.
    pub fn with_cognitive(mut self, c: f64) -> Self {
        self.cognitive = c;
        self
    }

    /// Sets the social coefficient.
    pub fn with_social(mut self, c: f64) -> Self {
        self.social = c;
        self
    }

    /// Sets the velocity bound (fraction of each variable's range).
    pub fn with_max_velocity(mut self, v: f64) -> Self {
        self.max_velocity = v.max(0.0);
        self
    }

    /// Sets the random seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), String> {
        if self.swarm_size < 2 {
            return Err("swarm_size must be at least 2".into());
        }
        if self.max_iterations == 0 {
            return Err("max_iterations must be at least 1".into());
        }
        if self.max_velocity <= 0.0 {
            return Err("max_velocity must be positive".into());
        }
        Ok(())
    }
}
