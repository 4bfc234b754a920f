#![forbid(unsafe_code)]

use crate::terminate_signal::TerminateSignal;
use serde::{Deserialize, Serialize};
use serde_with::serde_as;
use std::time::Duration;

#[serde_as]
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Control {
    /// Shortest accepted sleep, in seconds.
    #[serde_as(as = "serde_with::DurationSeconds")]
    pub min_sleep: Duration,

    /// Longest accepted sleep, in seconds.
    #[serde_as(as = "serde_with::DurationSeconds")]
    pub max_sleep: Duration,

    pub terminate_signal: TerminateSignal,
}

impl Default for Control {
    fn default() -> Self {
        Self {
            min_sleep: Duration::from_secs(1),
            max_sleep: Duration::from_secs(15),
            terminate_signal: TerminateSignal::default(),
        }
    }
}

impl Control {
    /// Clamp a requested sleep (in seconds) into `min_sleep..=max_sleep`.
    ///
    /// A misconfigured range where `max_sleep < min_sleep` collapses to
    /// `min_sleep`.
    pub fn clamp_sleep(&self, secs: i64) -> Duration {
        let min = self.min_sleep.as_secs();
        let max = self.max_sleep.as_secs().max(min);
        let secs = u64::try_from(secs).unwrap_or(0);
        Duration::from_secs(secs.clamp(min, max))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn clamps_to_default_range() {
        let control = Control::default();
        assert_eq!(control.clamp_sleep(-3), Duration::from_secs(1));
        assert_eq!(control.clamp_sleep(0), Duration::from_secs(1));
        assert_eq!(control.clamp_sleep(7), Duration::from_secs(7));
        assert_eq!(control.clamp_sleep(60), Duration::from_secs(15));
    }

    #[test]
    fn inverted_range_collapses_to_min() {
        let control = Control {
            min_sleep: Duration::from_secs(5),
            max_sleep: Duration::from_secs(2),
            ..Default::default()
        };
        assert_eq!(control.clamp_sleep(100), Duration::from_secs(5));
    }

    proptest! {
        #[test]
        fn clamp_stays_in_range(secs in any::<i64>()) {
            let control = Control::default();
            let clamped = control.clamp_sleep(secs);
            prop_assert!(clamped >= control.min_sleep);
            prop_assert!(clamped <= control.max_sleep);
        }
    }
}
