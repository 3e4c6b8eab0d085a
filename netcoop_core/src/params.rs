//! Experiment parameters.
//!
//! Defaults reproduce the baseline design: groups of eight, fifteen
//! rounds, a 20-point endowment with a binary 10-point contribution, and
//! an MPCR of 0.70 or 0.30 depending on the hidden state.

use crate::currency::Currency;
use crate::error::ParamsError;
use netcoop_env::SessionConfig;
use serde::{Deserialize, Serialize};

/// Parameters shared by every group of a session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExperimentParams {
    /// Players per group
    pub players_per_group: usize,

    /// Rounds per run
    pub num_rounds: u32,

    /// Endowment each player receives every round
    pub endowment: Currency,

    /// Amount moved to the group account when contributing
    pub contribution_amount: Currency,

    /// MPCR when the hidden state is HIGH
    pub mpcr_high: f64,

    /// MPCR when the hidden state is LOW
    pub mpcr_low: f64,

    /// P(signal = true state)
    pub signal_accuracy: f64,

    /// Prior probability of the HIGH state (informational, the draw is 50/50)
    pub prior_high: f64,
}

impl Default for ExperimentParams {
    fn default() -> Self {
        Self {
            players_per_group: 8,
            num_rounds: 15,
            endowment: Currency::from_points(20),
            contribution_amount: Currency::from_points(10),
            mpcr_high: 0.70,
            mpcr_low: 0.30,
            signal_accuracy: 0.70,
            prior_high: 0.5,
        }
    }
}

impl ExperimentParams {
    /// Builds parameters from the platform session config.
    ///
    /// Unset fields keep their defaults. The result is validated.
    pub fn from_session(config: &SessionConfig) -> Result<Self, ParamsError> {
        let defaults = Self::default();
        let params = Self {
            players_per_group: config.players_per_group.unwrap_or(defaults.players_per_group),
            num_rounds: config.num_rounds.unwrap_or(defaults.num_rounds),
            endowment: amount_or("endowment", config.endowment, defaults.endowment)?,
            contribution_amount: amount_or(
                "contribution_amount",
                config.contribution_amount,
                defaults.contribution_amount,
            )?,
            mpcr_high: config.mpcr_high.unwrap_or(defaults.mpcr_high),
            mpcr_low: config.mpcr_low.unwrap_or(defaults.mpcr_low),
            signal_accuracy: config.signal_accuracy.unwrap_or(defaults.signal_accuracy),
            prior_high: config.prior_high.unwrap_or(defaults.prior_high),
        };
        params.validate()?;
        Ok(params)
    }

    /// Checks the parameters for consistency.
    pub fn validate(&self) -> Result<(), ParamsError> {
        if self.players_per_group < 3 {
            return Err(ParamsError::GroupTooSmall(self.players_per_group));
        }
        if self.num_rounds == 0 {
            return Err(ParamsError::NoRounds);
        }
        check_probability("signal_accuracy", self.signal_accuracy)?;
        check_probability("prior_high", self.prior_high)?;
        check_non_negative("mpcr_high", self.mpcr_high)?;
        check_non_negative("mpcr_low", self.mpcr_low)?;
        check_non_negative("endowment", self.endowment.as_f64())?;
        check_non_negative("contribution_amount", self.contribution_amount.as_f64())?;
        if self.contribution_amount > self.endowment {
            return Err(ParamsError::ContributionExceedsEndowment {
                contribution: self.contribution_amount.as_f64(),
                endowment: self.endowment.as_f64(),
            });
        }

        // Every payoff, and every sum of them over a session, must fit
        let n = self.players_per_group as f64;
        let mpcr = self.mpcr_high.max(self.mpcr_low);
        let group_total = n * self.contribution_amount.as_f64();
        let max_payoff = self.endowment.as_f64() + mpcr * group_total;
        check_amount("group_total_contribution", group_total)?;
        check_amount("max_payoff", max_payoff)?;
        check_amount("session_payoff_total", max_payoff * n * self.num_rounds as f64)?;
        Ok(())
    }
}

fn amount_or(name: &'static str, value: Option<f64>, default: Currency) -> Result<Currency, ParamsError> {
    match value {
        Some(points) => {
            Currency::from_f64(points).ok_or(ParamsError::AmountOutOfRange { name, value: points })
        }
        None => Ok(default),
    }
}

fn check_amount(name: &'static str, value: f64) -> Result<(), ParamsError> {
    if value.is_nan() || value > Currency::MAX_POINTS {
        return Err(ParamsError::AmountOutOfRange { name, value });
    }
    Ok(())
}

fn check_probability(name: &'static str, value: f64) -> Result<(), ParamsError> {
    // NaN fails the range check as well
    if !(0.0..=1.0).contains(&value) {
        return Err(ParamsError::ProbabilityOutOfRange { name, value });
    }
    Ok(())
}

fn check_non_negative(name: &'static str, value: f64) -> Result<(), ParamsError> {
    if value.is_nan() || value < 0.0 {
        return Err(ParamsError::Negative { name, value });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::payoff::compute_payoffs;

    #[test]
    fn test_defaults_are_valid() {
        let params = ExperimentParams::default();
        assert!(params.validate().is_ok());
        assert_eq!(params.players_per_group, 8);
        assert_eq!(params.num_rounds, 15);
        assert_eq!(params.endowment, Currency::from_points(20));
        assert_eq!(params.contribution_amount, Currency::from_points(10));
    }

    #[test]
    fn test_from_empty_session_is_default() {
        let params = ExperimentParams::from_session(&SessionConfig::default()).unwrap();
        assert_eq!(params, ExperimentParams::default());
    }

    #[test]
    fn test_from_session_overrides() {
        let config = SessionConfig {
            num_rounds: Some(3),
            signal_accuracy: Some(0.9),
            endowment: Some(30.0),
            ..Default::default()
        };
        let params = ExperimentParams::from_session(&config).unwrap();

        assert_eq!(params.num_rounds, 3);
        assert_eq!(params.signal_accuracy, 0.9);
        assert_eq!(params.endowment, Currency::from_points(30));
        assert_eq!(params.players_per_group, 8);
    }

    #[test]
    fn test_rejects_bad_values() {
        let small = ExperimentParams {
            players_per_group: 2,
            ..Default::default()
        };
        assert_eq!(small.validate(), Err(ParamsError::GroupTooSmall(2)));

        let no_rounds = ExperimentParams {
            num_rounds: 0,
            ..Default::default()
        };
        assert_eq!(no_rounds.validate(), Err(ParamsError::NoRounds));

        let accuracy = ExperimentParams {
            signal_accuracy: 1.5,
            ..Default::default()
        };
        assert!(matches!(
            accuracy.validate(),
            Err(ParamsError::ProbabilityOutOfRange { name: "signal_accuracy", .. })
        ));

        let nan = ExperimentParams {
            mpcr_low: f64::NAN,
            ..Default::default()
        };
        assert!(matches!(nan.validate(), Err(ParamsError::Negative { name: "mpcr_low", .. })));

        let greedy = ExperimentParams {
            contribution_amount: Currency::from_points(25),
            ..Default::default()
        };
        assert!(matches!(
            greedy.validate(),
            Err(ParamsError::ContributionExceedsEndowment { .. })
        ));
    }

    #[test]
    fn test_from_session_rejects_unrepresentable_amounts() {
        let huge = SessionConfig {
            endowment: Some(1e17),
            ..Default::default()
        };
        assert_eq!(
            ExperimentParams::from_session(&huge),
            Err(ParamsError::AmountOutOfRange { name: "endowment", value: 1e17 })
        );

        let infinite = SessionConfig {
            contribution_amount: Some(f64::INFINITY),
            ..Default::default()
        };
        assert!(matches!(
            ExperimentParams::from_session(&infinite),
            Err(ParamsError::AmountOutOfRange { name: "contribution_amount", .. })
        ));
    }

    #[test]
    fn test_rejects_payoffs_that_cannot_be_represented() {
        let config = SessionConfig {
            players_per_group: Some(100),
            endowment: Some(1e11),
            contribution_amount: Some(1e11),
            ..Default::default()
        };
        assert!(matches!(
            ExperimentParams::from_session(&config),
            Err(ParamsError::AmountOutOfRange { name: "group_total_contribution", .. })
        ));

        let mpcr = ExperimentParams {
            mpcr_high: f64::INFINITY,
            ..Default::default()
        };
        assert!(matches!(
            mpcr.validate(),
            Err(ParamsError::AmountOutOfRange { name: "max_payoff", .. })
        ));

        let rounds = ExperimentParams {
            num_rounds: u32::MAX,
            endowment: Currency::from_points(1_000_000),
            ..Default::default()
        };
        assert!(matches!(
            rounds.validate(),
            Err(ParamsError::AmountOutOfRange { name: "session_payoff_total", .. })
        ));
    }

    #[test]
    fn test_large_accepted_amounts_compute_payoffs() {
        let config = SessionConfig {
            endowment: Some(1e9),
            contribution_amount: Some(1e9),
            ..Default::default()
        };
        let params = ExperimentParams::from_session(&config).unwrap();

        let outcome = compute_payoffs(&params, params.mpcr_high, &[true; 8]);
        assert_eq!(outcome.total_contribution, Currency::from_points(8_000_000_000));
        // 1e9 - 1e9 + 0.7 * 8e9
        assert_eq!(outcome.payoffs[0], Currency::from_points(5_600_000_000));
    }
}
