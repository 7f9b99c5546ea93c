//! Rating policy configuration with builder pattern.
//!
//! ```
//! use edurank::rating::{PerformanceModel, RatingConfig};
//!
//! // Defaults: w = (0.6, 0.2, 0.2), k_time = 0.1, k_selection = 0.05, mid = 60
//! let config = RatingConfig::builder().build().unwrap();
//!
//! let config = RatingConfig::builder()
//!     .w_performance(0.8)
//!     .w_efficiency(0.1)
//!     .w_strategy(0.1)
//!     .performance(PerformanceModel::Logarithmic)
//!     .build()
//!     .unwrap();
//! ```

use bon::Builder;
use ndarray::Array1;
use serde::{Deserialize, Serialize};

use super::performance::{efficiency, performance, strategy, PerformanceModel};
use super::{Interaction, Signals, SignalsView};
use crate::error::{Error, Result};

pub const DEFAULT_W_PERFORMANCE: f64 = 0.6;
pub const DEFAULT_W_EFFICIENCY: f64 = 0.2;
pub const DEFAULT_W_STRATEGY: f64 = 0.2;
pub const DEFAULT_K_TIME: f64 = 0.1;
pub const DEFAULT_K_SELECTION: f64 = 0.05;
pub const DEFAULT_MID: f64 = 60.0;

/// Weights and constants of the rating blend.
///
/// `weight = w_performance · performance + w_efficiency · efficiency + w_strategy · strategy`
#[derive(Debug, Clone, PartialEq, Builder, Serialize, Deserialize)]
#[builder(derive(Clone, Debug), finish_fn(vis = "", name = __build_internal))]
#[serde(default)]
pub struct RatingConfig {
    /// Weight of the performance score. Default: 0.6.
    #[builder(default = DEFAULT_W_PERFORMANCE)]
    pub w_performance: f64,

    /// Weight of the efficiency score. Default: 0.2.
    #[builder(default = DEFAULT_W_EFFICIENCY)]
    pub w_efficiency: f64,

    /// Weight of the strategy score. Default: 0.2.
    #[builder(default = DEFAULT_W_STRATEGY)]
    pub w_strategy: f64,

    /// Steepness of the time decay. Default: 0.1.
    #[builder(default = DEFAULT_K_TIME)]
    pub k_time: f64,

    /// Penalty per answer change. Default: 0.05.
    #[builder(default = DEFAULT_K_SELECTION)]
    pub k_selection: f64,

    /// Time-decay midpoint, in seconds. Default: 60.
    #[builder(default = DEFAULT_MID)]
    pub mid: f64,

    /// Time-decay model. Default: logistic.
    #[builder(default)]
    pub performance: PerformanceModel,
}

impl<S: rating_config_builder::IsComplete> RatingConfigBuilder<S> {
    /// Build and validate the configuration.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidParameter`] if:
    /// - any blend weight is negative or not finite
    /// - `k_time <= 0`
    /// - `k_selection < 0`
    /// - `mid <= 0`
    pub fn build(self) -> Result<RatingConfig> {
        let config = self.__build_internal();
        config.validate()?;
        Ok(config)
    }
}

impl Default for RatingConfig {
    fn default() -> Self {
        Self {
            w_performance: DEFAULT_W_PERFORMANCE,
            w_efficiency: DEFAULT_W_EFFICIENCY,
            w_strategy: DEFAULT_W_STRATEGY,
            k_time: DEFAULT_K_TIME,
            k_selection: DEFAULT_K_SELECTION,
            mid: DEFAULT_MID,
            performance: PerformanceModel::default(),
        }
    }
}

impl RatingConfig {
    /// Parse a configuration from JSON. Missing fields take their defaults.
    ///
    /// ```
    /// use edurank::rating::{PerformanceModel, RatingConfig};
    ///
    /// let config = RatingConfig::from_json(r#"{ "mid": 45.0, "performance": "logarithmic" }"#).unwrap();
    /// assert_eq!(config.mid, 45.0);
    /// assert_eq!(config.performance, PerformanceModel::Logarithmic);
    /// assert_eq!(config.w_performance, 0.6);
    /// ```
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| Error::invalid("rating config", e, "could not be parsed"))?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        for (name, w) in [
            ("w_performance", self.w_performance),
            ("w_efficiency", self.w_efficiency),
            ("w_strategy", self.w_strategy),
        ] {
            if !(w.is_finite() && w >= 0.0) {
                return Err(Error::invalid(name, w, "must be finite and non-negative"));
            }
        }
        if !(self.k_time.is_finite() && self.k_time > 0.0) {
            return Err(Error::invalid("k_time", self.k_time, "must be positive"));
        }
        if !(self.k_selection.is_finite() && self.k_selection >= 0.0) {
            return Err(Error::invalid(
                "k_selection",
                self.k_selection,
                "must be non-negative",
            ));
        }
        if !(self.mid.is_finite() && self.mid > 0.0) {
            return Err(Error::invalid("mid", self.mid, "must be positive"));
        }
        Ok(())
    }

    /// Blend the three sub-scores into one weight per interaction.
    pub fn rate(&self, signals: &SignalsView<'_>) -> Array1<f64> {
        let perf = performance(self.performance, signals, self.k_time, self.mid);
        let eff = efficiency(signals.selection_change(), self.k_selection);
        let strat = strategy(signals.hint_used());

        perf * self.w_performance + eff * self.w_efficiency + strat * self.w_strategy
    }

    /// Rate interaction records directly.
    pub fn rate_interactions(&self, records: &[Interaction]) -> Array1<f64> {
        self.rate(&Signals::from_interactions(records).view())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ndarray::array;

    #[test]
    fn builder_defaults_match_default() {
        let built = RatingConfig::builder().build().unwrap();
        assert_eq!(built, RatingConfig::default());
    }

    #[test]
    fn builder_rejects_invalid_constants() {
        assert!(matches!(
            RatingConfig::builder().k_time(0.0).build(),
            Err(Error::InvalidParameter { name: "k_time", .. })
        ));
        assert!(matches!(
            RatingConfig::builder().k_selection(-0.1).build(),
            Err(Error::InvalidParameter { name: "k_selection", .. })
        ));
        assert!(matches!(
            RatingConfig::builder().mid(-5.0).build(),
            Err(Error::InvalidParameter { name: "mid", .. })
        ));
        assert!(matches!(
            RatingConfig::builder().w_strategy(f64::NAN).build(),
            Err(Error::InvalidParameter { name: "w_strategy", .. })
        ));
    }

    #[test]
    fn reference_weight_to_six_decimals() {
        let config = RatingConfig::default();
        let one = array![1.0];
        let zero = array![0.0];
        let five = array![5.0];
        let thirty = array![30.0];
        let signals = SignalsView::new(
            one.view(),
            five.view(),
            five.view(),
            thirty.view(),
            zero.view(),
            zero.view(),
        )
        .unwrap();

        let weight = config.rate(&signals)[0];
        let reference = 0.6 * (5.0 / 5.0 / (1.0 + (0.1f64 * (30.0 - 60.0)).exp()) / 3.0) + 0.2 + 0.2;
        assert_abs_diff_eq!(weight, reference, epsilon = 1e-6);
        assert_abs_diff_eq!(weight, 0.590515, epsilon = 1e-6);
    }

    #[test]
    fn weight_blends_linearly() {
        let config = RatingConfig::builder()
            .w_performance(0.0)
            .w_efficiency(1.0)
            .w_strategy(0.0)
            .build()
            .unwrap();
        let n = array![1.0, 1.0];
        let changes = array![0.0, 20.0];
        let signals = SignalsView::new(
            n.view(),
            n.view(),
            n.view(),
            n.view(),
            changes.view(),
            n.view(),
        )
        .unwrap();

        let weights = config.rate(&signals);
        assert_abs_diff_eq!(weights[0], 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(weights[1], 0.5, epsilon = 1e-12);
    }

    #[test]
    fn json_rejects_bad_values() {
        assert!(matches!(
            RatingConfig::from_json(r#"{ "k_time": -1.0 }"#),
            Err(Error::InvalidParameter { name: "k_time", .. })
        ));
        assert!(matches!(
            RatingConfig::from_json("not json"),
            Err(Error::InvalidParameter { name: "rating config", .. })
        ));
        assert!(matches!(
            RatingConfig::from_json(r#"{ "performance": "cubic" }"#),
            Err(Error::InvalidParameter { name: "rating config", .. })
        ));
    }

    #[test]
    fn json_round_trip() {
        let config = RatingConfig::builder()
            .mid(90.0)
            .performance(PerformanceModel::Logarithmic)
            .build()
            .unwrap();
        let json = serde_json::to_string(&config).unwrap();
        assert_eq!(RatingConfig::from_json(&json).unwrap(), config);
    }
}
