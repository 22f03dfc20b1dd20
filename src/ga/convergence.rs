//! Stagnation detection.
//!
//! Tracks the best scalar fitness per generation and reports stagnation when
//! a full window of generations has passed without a meaningful improvement.

/// Watches best-fitness history for a stalled search.
#[derive(Debug, Clone)]
pub struct ConvergenceMonitor {
    window: usize,
    epsilon: f64,
    history: Vec<f64>,
}

impl ConvergenceMonitor {
    /// Creates a monitor that flags stagnation after `window` generations
    /// improve total fitness by less than `epsilon`.
    pub fn new(window: usize, epsilon: f64) -> Self {
        Self {
            window: window.max(1),
            epsilon,
            history: Vec::new(),
        }
    }

    /// Records one generation's best fitness.
    pub fn record(&mut self, best_fitness: f64) {
        self.history.push(best_fitness);
    }

    /// Whether the last full window improved by less than epsilon.
    ///
    /// Never fires before `window + 1` generations have been recorded, so a
    /// short run cannot be declared stagnant on insufficient evidence.
    pub fn is_stagnant(&self) -> bool {
        if self.history.len() <= self.window {
            return false;
        }
        let latest = self.history[self.history.len() - 1];
        let reference = self.history[self.history.len() - 1 - self.window];
        latest - reference < self.epsilon
    }

    /// Recorded best-fitness history, one entry per generation.
    pub fn history(&self) -> &[f64] {
        &self.history
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_stagnant_before_full_window() {
        let mut monitor = ConvergenceMonitor::new(3, 1e-6);
        for fitness in [-10.0, -10.0, -10.0] {
            monitor.record(fitness);
            assert!(!monitor.is_stagnant());
        }
    }

    #[test]
    fn test_stagnant_after_flat_window() {
        let mut monitor = ConvergenceMonitor::new(3, 1e-6);
        for _ in 0..4 {
            monitor.record(-10.0);
        }
        assert!(monitor.is_stagnant());
    }

    #[test]
    fn test_improvement_resets_stagnation() {
        let mut monitor = ConvergenceMonitor::new(2, 1e-6);
        monitor.record(-10.0);
        monitor.record(-10.0);
        monitor.record(-5.0);
        // Window covers -10.0 -> -5.0: a real improvement.
        assert!(!monitor.is_stagnant());
    }

    #[test]
    fn test_sub_epsilon_improvement_counts_as_stagnant() {
        let mut monitor = ConvergenceMonitor::new(2, 0.5);
        monitor.record(-10.0);
        monitor.record(-9.9);
        monitor.record(-9.8);
        assert!(monitor.is_stagnant());
    }

    #[test]
    fn test_window_clamped_to_one() {
        let mut monitor = ConvergenceMonitor::new(0, 1e-6);
        monitor.record(-10.0);
        assert!(!monitor.is_stagnant());
        monitor.record(-10.0);
        assert!(monitor.is_stagnant());
    }
}
