//! Lifecycle phase of a pair.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Where a pair currently is in its trade cycle.
///
/// Phases only change through the named transitions on
/// [`Position`](super::Position); there is no arithmetic on phases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// Not eligible for trading. Only the validity gate runs.
    #[default]
    Invalid,
    /// Eligible; the entry evaluator looks for a setup.
    Validating,
    /// A buy order is resting on the book.
    AwaitingBuy,
    /// Holding base asset; a sell order must be placed.
    SettingUpSell,
    /// A sell order is resting on the book.
    ManagingSell,
    /// Sell completed; waiting for the trade-finished handler.
    Finished,
}

impl Phase {
    /// Numeric code used by operators and logs.
    #[must_use]
    pub const fn code(self) -> i8 {
        match self {
            Phase::Invalid => -1,
            Phase::Validating => 0,
            Phase::AwaitingBuy => 1,
            Phase::SettingUpSell => 2,
            Phase::ManagingSell => 3,
            Phase::Finished => 4,
        }
    }

    /// Phases the validity gate is allowed to run in.
    #[must_use]
    pub const fn is_gated(self) -> bool {
        matches!(self, Phase::Invalid | Phase::Validating)
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Phase::Invalid => "invalid",
            Phase::Validating => "validating",
            Phase::AwaitingBuy => "awaiting_buy",
            Phase::SettingUpSell => "setting_up_sell",
            Phase::ManagingSell => "managing_sell",
            Phase::Finished => "finished",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_follow_lifecycle_order() {
        let phases = [
            Phase::Invalid,
            Phase::Validating,
            Phase::AwaitingBuy,
            Phase::SettingUpSell,
            Phase::ManagingSell,
            Phase::Finished,
        ];
        let codes: Vec<i8> = phases.iter().map(|p| p.code()).collect();
        assert_eq!(codes, vec![-1, 0, 1, 2, 3, 4]);
    }

    #[test]
    fn only_invalid_and_validating_are_gated() {
        assert!(Phase::Invalid.is_gated());
        assert!(Phase::Validating.is_gated());
        assert!(!Phase::AwaitingBuy.is_gated());
        assert!(!Phase::Finished.is_gated());
    }
}
