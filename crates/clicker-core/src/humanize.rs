//! Bounded random jitter for replayed clicks.
//!
//! A perfectly regular click stream at pixel-exact positions is trivially
//! recognisable as automation.  When humanization is on, each click lands a
//! few pixels away from its recorded point and each delay is stretched or
//! shortened by a random amount proportional to the base delay.
//!
//! All randomness goes through a [`Humanizer`] that owns its own `StdRng`.
//! Production code seeds it from OS entropy; tests seed it explicitly so the
//! draws are reproducible.

use std::time::Duration;

use rand::{rngs::StdRng, Rng, SeedableRng};

use crate::domain::policy::DelayPolicy;

/// Maximum per-axis offset, in pixels, applied to a humanized click spot.
pub const CLICK_SPOT_JITTER_PX: i32 = 3;

/// Smallest delay a humanized draw may produce.
pub const MIN_HUMANIZED_DELAY_MS: u64 = 10;

/// Lower bound on the delay jitter span, so short base delays still vary.
const MIN_DELAY_JITTER_MS: u64 = 15;

/// Returns the maximum absolute delay offset for `base_delay_ms`.
///
/// The span is a quarter of the base delay, but never less than
/// [`MIN_DELAY_JITTER_MS`].
pub fn delay_jitter_bound_ms(base_delay_ms: u64) -> u64 {
    (base_delay_ms / 4).max(MIN_DELAY_JITTER_MS)
}

/// Source of humanization draws.
pub struct Humanizer {
    rng: StdRng,
}

impl Humanizer {
    /// Creates a humanizer seeded from OS entropy.
    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Creates a deterministic humanizer for tests and benchmarks.
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Returns the point to click for a recorded `(x, y)`.
    ///
    /// Without click-spot humanization this is exactly the recorded point.
    pub fn target(&mut self, policy: &DelayPolicy, x: i32, y: i32) -> (i32, i32) {
        if !policy.humanize_click_spot {
            return (x, y);
        }
        let dx = self
            .rng
            .gen_range(-CLICK_SPOT_JITTER_PX..=CLICK_SPOT_JITTER_PX);
        let dy = self
            .rng
            .gen_range(-CLICK_SPOT_JITTER_PX..=CLICK_SPOT_JITTER_PX);
        (x.saturating_add(dx), y.saturating_add(dy))
    }

    /// Returns the delay to wait after a click.
    ///
    /// Without delay humanization this is exactly `base_delay_ms`.  With it,
    /// the base is offset by up to [`delay_jitter_bound_ms`] in either
    /// direction and clamped to at least [`MIN_HUMANIZED_DELAY_MS`].
    pub fn delay(&mut self, policy: &DelayPolicy) -> Duration {
        if !policy.humanize_delay {
            return policy.base_delay();
        }
        let base = i64::try_from(policy.base_delay_ms).unwrap_or(i64::MAX);
        let bound =
            i64::try_from(delay_jitter_bound_ms(policy.base_delay_ms)).unwrap_or(i64::MAX);
        let offset = self.rng.gen_range(-bound..=bound);
        let jittered = base.saturating_add(offset);
        let clamped = jittered.max(MIN_HUMANIZED_DELAY_MS as i64) as u64;
        Duration::from_millis(clamped)
    }
}

impl Default for Humanizer {
    fn default() -> Self {
        Self::from_entropy()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
