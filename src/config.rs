//! Search options.

use crate::error::ConfigError;

/// Tuning knobs for [`MctsAgent`](crate::MctsAgent).
#[derive(Debug, Clone, PartialEq)]
pub struct MctsOptions {
    /// The exploration parameter for UCB1.
    /// Higher values favor exploration over exploitation; theory suggests
    /// roughly sqrt(2).
    pub exploration_constant: f64,
    /// Iterations per move. One iteration selects (and maybe expands) a leaf,
    /// runs rollouts from it and backpropagates each result.
    pub iterations: usize,
    /// Random rollouts run per iteration.
    pub rollouts_per_iteration: usize,
    /// Worker threads running iterations in parallel.
    pub num_threads: usize,
    /// Seed for the agent's random source. `None` seeds from the OS.
    pub seed: Option<u64>,
}

impl Default for MctsOptions {
    fn default() -> Self {
        MctsOptions {
            exploration_constant: 1.4,
            iterations: 10_000,
            rollouts_per_iteration: 1,
            num_threads: 1,
            seed: None,
        }
    }
}

impl MctsOptions {
    pub fn with_exploration_constant(mut self, c: f64) -> Self {
        self.exploration_constant = c;
        self
    }

    pub fn with_iterations(mut self, iterations: usize) -> Self {
        self.iterations = iterations;
        self
    }

    pub fn with_rollouts_per_iteration(mut self, rollouts: usize) -> Self {
        self.rollouts_per_iteration = rollouts;
        self
    }

    pub fn with_threads(mut self, num_threads: usize) -> Self {
        self.num_threads = num_threads;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Checks that the options describe a runnable search.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let c = self.exploration_constant;
        if !c.is_finite() || c < 0.0 {
            return Err(ConfigError::ExplorationConstant(c));
        }
        if self.rollouts_per_iteration == 0 {
            return Err(ConfigError::NoRollouts);
        }
        if self.num_threads == 0 {
            return Err(ConfigError::NoThreads);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = MctsOptions::default();
        assert_eq!(options.exploration_constant, 1.4);
        assert_eq!(options.iterations, 10_000);
        assert_eq!(options.rollouts_per_iteration, 1);
        assert_eq!(options.num_threads, 1);
        assert_eq!(options.seed, None);
        assert!(options.validate().is_ok());
    }

    #[test]
    fn test_builder_chain() {
        let options = MctsOptions::default()
            .with_exploration_constant(0.5)
            .with_iterations(42)
            .with_rollouts_per_iteration(3)
            .with_threads(4)
            .with_seed(7);
        assert_eq!(options.exploration_constant, 0.5);
        assert_eq!(options.iterations, 42);
        assert_eq!(options.rollouts_per_iteration, 3);
        assert_eq!(options.num_threads, 4);
        assert_eq!(options.seed, Some(7));
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let bad_c = MctsOptions::default().with_exploration_constant(f64::NAN);
        assert!(matches!(bad_c.validate(), Err(ConfigError::ExplorationConstant(_))));

        let negative_c = MctsOptions::default().with_exploration_constant(-1.0);
        assert!(matches!(negative_c.validate(), Err(ConfigError::ExplorationConstant(_))));

        let no_rollouts = MctsOptions::default().with_rollouts_per_iteration(0);
        assert_eq!(no_rollouts.validate(), Err(ConfigError::NoRollouts));

        let no_threads = MctsOptions::default().with_threads(0);
        assert_eq!(no_threads.validate(), Err(ConfigError::NoThreads));
    }

    #[test]
    fn test_zero_iterations_is_allowed() {
        assert!(MctsOptions::default().with_iterations(0).validate().is_ok());
    }
}
