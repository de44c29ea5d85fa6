//! Clamped retry backoff schedules.

use std::time::Duration;

use crate::error::RpcError;

/// Ordered, non-empty wait durations indexed by attempt number.
///
/// Once the attempt count runs past the end of the schedule, the last
/// entry is reused for every subsequent attempt. This is a sticky probe
/// interval, not exponential growth: a host application that is still
/// booting settles on a steady re-check cadence.
#[derive(Debug, Clone)]
pub struct RetrySchedule {
    delays: Vec<Duration>,
}

impl RetrySchedule {
    /// Build a schedule from explicit delays. Fails on an empty list.
    pub fn new(delays: Vec<Duration>) -> Result<Self, RpcError> {
        if delays.is_empty() {
            return Err(RpcError::InvalidArgument(
                "retry schedule must not be empty".to_string(),
            ));
        }
        Ok(Self { delays })
    }

    /// Build from whole-second delays, as configured.
    pub fn from_secs(secs: &[u64]) -> Result<Self, RpcError> {
        Self::new(secs.iter().copied().map(Duration::from_secs).collect())
    }

    /// Delay before the retry that follows failed attempt `attempt`
    /// (0-indexed), sticky at the last entry.
    pub fn delay_for(&self, attempt: usize) -> Duration {
        let index = attempt.min(self.delays.len() - 1);
        self.delays[index]
    }
}

impl Default for RetrySchedule {
    /// The module-resolve schedule: 1, 3, 5, then 10 seconds thereafter.
    fn default() -> Self {
        Self {
            delays: [1, 3, 5, 10].iter().map(|s| Duration::from_secs(*s)).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamps_to_the_last_entry() {
        let schedule = RetrySchedule::default();
        assert_eq!(schedule.delay_for(0), Duration::from_secs(1));
        assert_eq!(schedule.delay_for(1), Duration::from_secs(3));
        assert_eq!(schedule.delay_for(2), Duration::from_secs(5));
        assert_eq!(schedule.delay_for(3), Duration::from_secs(10));
        assert_eq!(schedule.delay_for(4), Duration::from_secs(10));
        assert_eq!(schedule.delay_for(100), Duration::from_secs(10));
    }

    #[test]
    fn single_entry_schedule_repeats_it() {
        let schedule = RetrySchedule::from_secs(&[2]).unwrap();
        assert_eq!(schedule.delay_for(0), Duration::from_secs(2));
        assert_eq!(schedule.delay_for(7), Duration::from_secs(2));
    }

    #[test]
    fn empty_schedule_is_rejected() {
        assert!(matches!(
            RetrySchedule::from_secs(&[]),
            Err(RpcError::InvalidArgument(_))
        ));
    }
}
