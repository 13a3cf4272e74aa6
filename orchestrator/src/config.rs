//! Run configuration
//!
//! Validated in full before any shared resource is created.

use std::ops::RangeInclusive;
use std::time::Duration;

use shared::{Order, DEFAULT_CAPACITY_RANGE, DEFAULT_CYCLE_DELAY_RANGE_MS, MAX_WORKERS};

use crate::error::{OrchestratorError, OrchestratorResult};

pub const DEFAULT_CHANNEL_BOUND: usize = 64;
pub const DEFAULT_STALL_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunConfig {
    pub worker_count: u32,
    pub order: Order,
    pub capacity_range: RangeInclusive<u32>,
    pub cycle_delay_range_ms: RangeInclusive<u64>,
    /// Capacity of the report channel
    pub channel_bound: usize,
    /// How long the aggregator waits for any report before declaring the run stalled
    pub stall_timeout: Option<Duration>,
    /// Hard limit on reaping spawned units after the handoff
    pub reap_timeout: Option<Duration>,
}

impl RunConfig {
    pub fn new(worker_count: u32, order_size: u32) -> Self {
        Self {
            worker_count,
            order: Order::new(order_size),
            capacity_range: DEFAULT_CAPACITY_RANGE,
            cycle_delay_range_ms: DEFAULT_CYCLE_DELAY_RANGE_MS,
            channel_bound: DEFAULT_CHANNEL_BOUND,
            stall_timeout: Some(DEFAULT_STALL_TIMEOUT),
            reap_timeout: None,
        }
    }

    pub fn with_capacity_range(mut self, range: RangeInclusive<u32>) -> Self {
        self.capacity_range = range;
        self
    }

    pub fn with_cycle_delay_range_ms(mut self, range: RangeInclusive<u64>) -> Self {
        self.cycle_delay_range_ms = range;
        self
    }

    pub fn with_channel_bound(mut self, bound: usize) -> Self {
        self.channel_bound = bound;
        self
    }

    pub fn with_stall_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.stall_timeout = timeout;
        self
    }

    pub fn with_reap_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.reap_timeout = timeout;
        self
    }

    pub fn validate(&self) -> OrchestratorResult<()> {
        if self.worker_count == 0 {
            return Err(OrchestratorError::config("worker_count", "at least one worker is required"));
        }
        if self.worker_count > MAX_WORKERS {
            return Err(OrchestratorError::config(
                "worker_count",
                format!("there may not be more than {MAX_WORKERS} workers, got {}", self.worker_count),
            ));
        }
        if self.capacity_range.is_empty() || *self.capacity_range.start() == 0 {
            return Err(OrchestratorError::config(
                "capacity_range",
                format!("{:?} must be a non-empty range of positive values", self.capacity_range),
            ));
        }
        if self.cycle_delay_range_ms.is_empty() {
            return Err(OrchestratorError::config(
                "cycle_delay_range_ms",
                format!("{:?} is empty", self.cycle_delay_range_ms),
            ));
        }
        if self.channel_bound == 0 {
            return Err(OrchestratorError::config("channel_bound", "must be at least 1"));
        }
        if let Some(stall) = self.stall_timeout {
            if stall.is_zero() {
                return Err(OrchestratorError::config("stall_timeout", "use no timeout instead of zero"));
            }
            let slowest = Duration::from_millis(*self.cycle_delay_range_ms.end());
            if !self.outlasts_cycle(slowest) {
                return Err(OrchestratorError::config(
                    "stall_timeout",
                    format!("{stall:?} must exceed the slowest cycle delay of {slowest:?}"),
                ));
            }
        }
        Ok(())
    }

    /// Whether the aggregator's stall timeout tolerates a cycle of `delay`
    pub fn outlasts_cycle(&self, delay: Duration) -> bool {
        self.stall_timeout.is_none_or(|stall| stall > delay)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_worker_count_bounds() {
        assert!(RunConfig::new(1, 100).validate().is_ok());
        assert!(RunConfig::new(MAX_WORKERS, 100).validate().is_ok());

        let err = RunConfig::new(MAX_WORKERS + 1, 100).validate().unwrap_err();
        assert!(err.is_configuration());
        assert!(err.to_string().contains("more than 40 workers"));

        assert!(RunConfig::new(0, 100).validate().is_err());
    }

    #[test]
    fn test_empty_order_is_valid() {
        assert!(RunConfig::new(3, 0).validate().is_ok());
    }

    #[test]
    fn test_ranges_and_bounds() {
        assert!(RunConfig::new(2, 10).with_capacity_range(0..=5).validate().is_err());
        #[allow(clippy::reversed_empty_ranges)]
        let empty = 50..=10;
        assert!(RunConfig::new(2, 10).with_capacity_range(empty).validate().is_err());
        assert!(RunConfig::new(2, 10).with_cycle_delay_range_ms(0..=0).validate().is_ok());
        assert!(RunConfig::new(2, 10).with_channel_bound(0).validate().is_err());
        assert!(RunConfig::new(2, 10)
            .with_stall_timeout(Some(Duration::ZERO))
            .validate()
            .is_err());
        assert!(RunConfig::new(2, 10).with_stall_timeout(None).validate().is_ok());
    }

    #[test]
    fn test_stall_timeout_must_outlast_slowest_cycle() {
        let slow = RunConfig::new(2, 10).with_cycle_delay_range_ms(0..=60_000);
        let err = slow.clone().validate().unwrap_err();
        assert!(err.is_configuration());
        assert!(err.to_string().contains("stall_timeout"));

        assert!(slow
            .clone()
            .with_stall_timeout(Some(Duration::from_secs(60)))
            .validate()
            .is_err());
        assert!(slow
            .clone()
            .with_stall_timeout(Some(Duration::from_millis(60_001)))
            .validate()
            .is_ok());
        assert!(slow.with_stall_timeout(None).validate().is_ok());
    }
}
