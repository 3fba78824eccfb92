use pool_watch_domain::PoolSize;
use rust_decimal::Decimal;

/// Whether a suppression window that started at `last_reported_at` is over.
///
/// `None` means nothing was reported yet, which never suppresses.
#[must_use]
pub fn window_elapsed(last_reported_at: Option<u64>, now: u64, window_secs: u64) -> bool {
    match last_reported_at {
        Some(at) => now >= at.saturating_add(window_secs),
        None => true,
    }
}

/// Memory of a pool detector between cycles.
///
/// Owned by exactly one detector and replaced as a whole at the end of a
/// successful cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DetectorState {
    /// Block timestamp of the last imbalance report.
    pub last_reported_at: Option<u64>,
    /// Imbalance carried by the last report, in percent.
    pub last_reported_imbalance: Decimal,
    /// Pool size observed in the previous cycle.
    pub pool_size: PoolSize,
}

impl DetectorState {
    /// Whether the steady-state imbalance alert may fire again at `now`.
    #[must_use]
    pub fn can_report(&self, now: u64, window_secs: u64) -> bool {
        window_elapsed(self.last_reported_at, now, window_secs)
    }

    /// Records an imbalance report.
    #[must_use]
    pub fn reported(self, now: u64, imbalance: Decimal) -> Self {
        Self {
            last_reported_at: Some(now),
            last_reported_imbalance: imbalance,
            ..self
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_window_boundary_is_inclusive() {
        assert!(!window_elapsed(Some(1000), 1099, 100));
        assert!(window_elapsed(Some(1000), 1100, 100));
        assert!(window_elapsed(Some(0), 1, 0));
    }

    #[test]
    fn test_report_at_genesis_still_suppresses() {
        assert!(!window_elapsed(Some(0), 100, 86_400));
    }

    #[test]
    fn test_fresh_state_can_report() {
        let state = DetectorState::default();
        assert_eq!(state.last_reported_at, None);
        assert!(state.can_report(0, 86_400));
        assert!(state.can_report(100, 86_400));
        assert_eq!(state.last_reported_imbalance, Decimal::ZERO);
    }

    #[test]
    fn test_reported_keeps_size() {
        let state = DetectorState {
            pool_size: PoolSize::from(pool_watch_domain::PoolReserves::new(dec!(1), dec!(2))),
            ..Default::default()
        };
        let next = state.reported(500, dec!(-12.5));
        assert_eq!(next.last_reported_at, Some(500));
        assert_eq!(next.last_reported_imbalance, dec!(-12.5));
        assert_eq!(next.pool_size, state.pool_size);
        assert!(!next.can_report(600, 86_400));
    }
}
