use rand::Rng;
use std::time::{Duration, Instant};

/// Options for the exponential backoff used between job status polls.
/// The delay starts at the initial interval, grows by the multiplier at each
/// retry and is randomized to avoid polling the array in lockstep with other
/// waiters. The total wait is bounded by the max elapsed budget.
#[derive(Debug, Clone)]
pub struct BackoffOptions {
    pub(crate) initial_interval: Duration,
    pub(crate) multiplier: f64,
    pub(crate) randomization_factor: f64,
    pub(crate) max_elapsed: Duration,
}

impl BackoffOptions {
    /// Default delay before the first retry.
    pub(crate) fn default_initial_interval() -> Duration {
        Duration::from_secs(1)
    }
    /// Default delay multiplier at each retry.
    pub(crate) fn default_multiplier() -> f64 {
        2.0
    }
    /// Default randomization applied to each delay.
    pub(crate) fn default_randomization_factor() -> f64 {
        0.1
    }
    /// Default total wait budget.
    pub(crate) fn default_max_elapsed() -> Duration {
        Duration::from_secs(30)
    }
}

impl Default for BackoffOptions {
    fn default() -> Self {
        Self {
            initial_interval: Self::default_initial_interval(),
            multiplier: Self::default_multiplier(),
            randomization_factor: Self::default_randomization_factor(),
            max_elapsed: Self::default_max_elapsed(),
        }
    }
}

impl BackoffOptions {
    /// New options with the given total wait budget.
    #[must_use]
    pub fn new(max_elapsed: Duration) -> Self {
        Self {
            max_elapsed,
            ..Default::default()
        }
    }

    /// Delay before the first retry.
    #[must_use]
    pub fn with_initial_interval(mut self, interval: Duration) -> Self {
        self.initial_interval = interval;
        self
    }

    /// Multiplier applied to the delay at each retry.
    #[must_use]
    pub fn with_multiplier(mut self, multiplier: f64) -> Self {
        self.multiplier = multiplier;
        self
    }

    /// Randomization factor `r`: each delay is drawn uniformly from
    /// `[delay * (1 - r), delay * (1 + r)]`.
    #[must_use]
    pub fn with_randomization_factor(mut self, factor: f64) -> Self {
        self.randomization_factor = factor;
        self
    }

    /// Total wait budget after which the retries are given up on.
    #[must_use]
    pub fn with_max_elapsed(mut self, max_elapsed: Duration) -> Self {
        self.max_elapsed = max_elapsed;
        self
    }

    /// Get the total wait budget.
    pub fn max_elapsed(&self) -> Duration {
        self.max_elapsed
    }
}

/// Delay generator for a single wait.
/// Delays grow exponentially and are clamped to the remaining budget, so the
/// full budget is consumed before giving up.
pub(crate) struct ExponentialBackoff {
    opts: BackoffOptions,
    current_interval: Duration,
    start: Instant,
}

impl ExponentialBackoff {
    pub(crate) fn new(opts: BackoffOptions) -> Self {
        Self {
            current_interval: opts.initial_interval,
            opts,
            start: Instant::now(),
        }
    }

    /// Time since the first attempt.
    pub(crate) fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    /// The next delay to sleep for, or `None` once the budget is exhausted.
    pub(crate) fn next_delay(&mut self) -> Option<Duration> {
        let elapsed = self.start.elapsed();
        if elapsed >= self.opts.max_elapsed {
            return None;
        }
        let remaining = self.opts.max_elapsed - elapsed;
        let delay = self.randomized(self.current_interval).min(remaining);
        self.current_interval = self.current_interval.mul_f64(self.opts.multiplier);
        Some(delay)
    }

    fn randomized(&self, interval: Duration) -> Duration {
        if self.opts.randomization_factor <= 0.0 {
            return interval;
        }
        let delta = interval.mul_f64(self.opts.randomization_factor);
        let lower = interval.saturating_sub(delta);
        lower + delta.mul_f64(2.0).mul_f64(rand::thread_rng().gen::<f64>())
    }
}
