//! Playback run configuration: how many passes, and how long between clicks.

use std::num::NonZeroU32;
use std::time::Duration;

use thiserror::Error;

/// Errors raised when building a policy from raw settings.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PolicyError {
    /// `Count` repetition with a count of zero.
    #[error("repeat count must be at least 1")]
    ZeroRepeatCount,
}

/// How many passes over the enabled clicks a playback run makes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RepeatPolicy {
    /// Play the full enabled sequence `n` times, then stop.
    Count(NonZeroU32),
    /// Repeat until explicitly stopped.
    Continuous,
}

impl RepeatPolicy {
    /// Builds a `Count` policy.
    ///
    /// # Errors
    ///
    /// Returns [`PolicyError::ZeroRepeatCount`] when `n == 0`.
    pub fn count(n: u32) -> Result<Self, PolicyError> {
        NonZeroU32::new(n)
            .map(RepeatPolicy::Count)
            .ok_or(PolicyError::ZeroRepeatCount)
    }

    /// Number of passes, or `None` for continuous playback.
    pub fn passes(&self) -> Option<u32> {
        match self {
            RepeatPolicy::Count(n) => Some(n.get()),
            RepeatPolicy::Continuous => None,
        }
    }
}

/// Inter-click timing and humanization switches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DelayPolicy {
    /// Delay between consecutive clicks, in milliseconds.
    pub base_delay_ms: u64,
    /// Perturb each delay by a bounded random offset.
    pub humanize_delay: bool,
    /// Fire each click near, not exactly at, its recorded point.
    pub humanize_click_spot: bool,
}

impl DelayPolicy {
    /// Creates a policy where one `humanize` switch controls both delay and
    /// position jitter.
    pub fn new(base_delay_ms: u64, humanize: bool) -> Self {
        Self {
            base_delay_ms,
            humanize_delay: humanize,
            humanize_click_spot: humanize,
        }
    }

    /// Creates a policy with no humanization.
    pub fn fixed(base_delay_ms: u64) -> Self {
        Self::new(base_delay_ms, false)
    }

    pub fn base_delay(&self) -> Duration {
        Duration::from_millis(self.base_delay_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_count_zero_is_rejected() {
        assert_eq!(RepeatPolicy::count(0), Err(PolicyError::ZeroRepeatCount));
    }

    #[test]
    fn test_count_reports_passes() {
        let policy = RepeatPolicy::count(3).unwrap();
        assert_eq!(policy.passes(), Some(3));
        assert_eq!(RepeatPolicy::Continuous.passes(), None);
    }

    #[test]
    fn test_delay_policy_new_sets_both_switches() {
        let policy = DelayPolicy::new(250, true);
        assert!(policy.humanize_delay);
        assert!(policy.humanize_click_spot);
        assert_eq!(policy.base_delay(), Duration::from_millis(250));
        assert!(!DelayPolicy::fixed(250).humanize_delay);
    }
}
