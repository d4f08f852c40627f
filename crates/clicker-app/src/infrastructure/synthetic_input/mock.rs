//! Mock injector for unit testing.
//!
//! # Why a mock injector?
//!
//! The real injector moves the cursor and clicks on the test machine, and its
//! effect cannot be observed from Rust test code.  `MockInjector` replaces the
//! OS calls with in-memory recording so assertions can inspect exactly which
//! points were clicked and in what order.
//!
//! # Usage in tests
//!
//! ```ignore
//! let injector = Arc::new(MockInjector::new());
//! let scheduler = PlaybackScheduler::new(handle, injector.clone(), store, state);
//!
//! scheduler.start(RepeatPolicy::count(1)?, DelayPolicy::fixed(10))?;
//! tokio::time::sleep(Duration::from_secs(1)).await;
//!
//! assert_eq!(injector.calls(), vec![(300, 220)]);
//! ```

use parking_lot::Mutex;

use super::SyntheticInput;

/// A mock injector that records every click instead of performing it.
#[derive(Debug, Default)]
pub struct MockInjector {
    calls: Mutex<Vec<(i32, i32)>>,
}

impl MockInjector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns every clicked point, oldest first.
    pub fn calls(&self) -> Vec<(i32, i32)> {
        self.calls.lock().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().len()
    }
}

impl SyntheticInput for MockInjector {
    fn click(&self, x: i32, y: i32) {
        self.calls.lock().push((x, y));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_injector_records_clicks_in_order() {
        // Arrange
        let injector = MockInjector::new();

        // Act
        injector.click(120, 45);
        injector.click(-300, 220);

        // Assert
        assert_eq!(injector.calls(), vec![(120, 45), (-300, 220)]);
        assert_eq!(injector.call_count(), 2);
    }

    #[test]
    fn test_mock_injector_starts_empty() {
        assert!(MockInjector::new().calls().is_empty());
    }
}
