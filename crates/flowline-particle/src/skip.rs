use flowline_core::ConfigError;

/// Dash pattern toggling whether a particle draws.
///
/// Built from positive run lengths: the particle draws for the first run,
/// skips the second, draws the third and so on. After the last run the
/// pattern wraps; the tick that wraps counts as the first tick of the next
/// cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkipPattern {
    thresholds: Vec<u32>,
    counter: u32,
    index: usize,
    visible: bool,
}

impl SkipPattern {
    /// Builds a pattern from run lengths. Every run must be at least one tick.
    pub fn new(runs: &[u32]) -> Result<Self, ConfigError> {
        if runs.is_empty() {
            return Err(ConfigError::BelowMinimum {
                field: "skip_pattern length",
                minimum: 1.0,
                value: 0.0,
            });
        }
        let mut total = 0u32;
        let mut thresholds = Vec::with_capacity(runs.len());
        for &run in runs {
            ConfigError::check_minimum("skip_pattern entry", run as f64, 1.0)?;
            total = total.saturating_add(run);
            thresholds.push(total);
        }
        Ok(Self {
            thresholds,
            counter: 0,
            index: 0,
            visible: true,
        })
    }

    /// Cumulative thresholds.
    pub fn thresholds(&self) -> &[u32] {
        &self.thresholds
    }

    /// Whether the particle currently draws.
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Restarts the pattern at its first (visible) run.
    pub fn reset(&mut self) {
        self.counter = 0;
        self.index = 0;
        self.visible = true;
    }

    /// Counts one tick and returns whether the particle draws on it.
    pub fn advance(&mut self) -> bool {
        self.counter += 1;
        if self.counter > self.thresholds[self.index] {
            self.index += 1;
            if self.index >= self.thresholds.len() {
                self.index = 0;
                self.counter = 1;
            }
            self.visible = !self.visible;
        }
        self.visible
    }
}
