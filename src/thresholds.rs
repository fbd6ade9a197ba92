//! Plausibility bounds for numeric tags
//!
//! The defaults are domain heuristics for German roads. Each one can be
//! overridden from the `thresholds` section of the configuration.

use serde::{Deserialize, Serialize};

pub const MIN_LANES: i64 = 1;
pub const MAX_LANES: i64 = 8;

/// km/h
pub const MIN_MAXSPEED: i64 = 5;
/// km/h; highest speed limit signposted in Germany
pub const MAX_MAXSPEED: i64 = 130;

/// metres
pub const MIN_MAXHEIGHT: f64 = 1.8;
pub const MAX_MAXHEIGHT: f64 = 6.0;

/// metres
pub const MIN_MAXWIDTH: f64 = 1.0;
pub const MAX_MAXWIDTH: f64 = 5.0;

/// tonnes
pub const MIN_MAXWEIGHT: f64 = 1.0;
pub const MAX_MAXWEIGHT: f64 = 60.0;

pub const MIN_LAYER: i64 = -5;
pub const MAX_LAYER: i64 = 5;

/// All plausibility bounds, inclusive
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Thresholds {
    pub lanes_min: i64,
    pub lanes_max: i64,
    pub maxspeed_min: i64,
    pub maxspeed_max: i64,
    pub maxheight_min: f64,
    pub maxheight_max: f64,
    pub maxwidth_min: f64,
    pub maxwidth_max: f64,
    pub maxweight_min: f64,
    pub maxweight_max: f64,
    pub layer_min: i64,
    pub layer_max: i64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            lanes_min: MIN_LANES,
            lanes_max: MAX_LANES,
            maxspeed_min: MIN_MAXSPEED,
            maxspeed_max: MAX_MAXSPEED,
            maxheight_min: MIN_MAXHEIGHT,
            maxheight_max: MAX_MAXHEIGHT,
            maxwidth_min: MIN_MAXWIDTH,
            maxwidth_max: MAX_MAXWIDTH,
            maxweight_min: MIN_MAXWEIGHT,
            maxweight_max: MAX_MAXWEIGHT,
            layer_min: MIN_LAYER,
            layer_max: MAX_LAYER,
        }
    }
}

impl Thresholds {
    /// Check that every minimum is below its maximum
    pub fn validate(&self) -> Result<(), String> {
        let pairs = [
            ("lanes", self.lanes_min as f64, self.lanes_max as f64),
            ("maxspeed", self.maxspeed_min as f64, self.maxspeed_max as f64),
            ("maxheight", self.maxheight_min, self.maxheight_max),
            ("maxwidth", self.maxwidth_min, self.maxwidth_max),
            ("maxweight", self.maxweight_min, self.maxweight_max),
            ("layer", self.layer_min as f64, self.layer_max as f64),
        ];
        for (name, min, max) in pairs {
            if min > max {
                return Err(format!("{name}: minimum {min} exceeds maximum {max}"));
            }
        }
        Ok(())
    }
}

/// Bounds as written in a configuration file
///
/// Unset bounds fall through to whatever an extended file or the built-in
/// default provides, so a file can also restate a default explicitly.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThresholdOverrides {
    pub lanes_min: Option<i64>,
    pub lanes_max: Option<i64>,
    pub maxspeed_min: Option<i64>,
    pub maxspeed_max: Option<i64>,
    pub maxheight_min: Option<f64>,
    pub maxheight_max: Option<f64>,
    pub maxwidth_min: Option<f64>,
    pub maxwidth_max: Option<f64>,
    pub maxweight_min: Option<f64>,
    pub maxweight_max: Option<f64>,
    pub layer_min: Option<i64>,
    pub layer_max: Option<i64>,
}

impl ThresholdOverrides {
    /// Take every bound that `other` sets
    pub fn merge(&mut self, other: &ThresholdOverrides) {
        macro_rules! take {
            ($($field:ident),*) => {
                $(
                    if other.$field.is_some() {
                        self.$field = other.$field;
                    }
                )*
            };
        }

        take!(
            lanes_min,
            lanes_max,
            maxspeed_min,
            maxspeed_max,
            maxheight_min,
            maxheight_max,
            maxwidth_min,
            maxwidth_max,
            maxweight_min,
            maxweight_max,
            layer_min,
            layer_max
        );
    }

    /// Fill unset bounds from the defaults
    pub fn resolve(&self) -> Thresholds {
        let defaults = Thresholds::default();

        macro_rules! pick {
            ($($field:ident),*) => {
                Thresholds {
                    $($field: self.$field.unwrap_or(defaults.$field),)*
                }
            };
        }

        pick!(
            lanes_min,
            lanes_max,
            maxspeed_min,
            maxspeed_max,
            maxheight_min,
            maxheight_max,
            maxwidth_min,
            maxwidth_max,
            maxweight_min,
            maxweight_max,
            layer_min,
            layer_max
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_named_constants() {
        let t = Thresholds::default();
        assert_eq!(t.lanes_max, MAX_LANES);
        assert_eq!(t.maxspeed_max, MAX_MAXSPEED);
        assert_eq!(t.maxheight_min, MIN_MAXHEIGHT);
        assert!(t.validate().is_ok());
    }

    #[test]
    fn test_partial_yaml_override() {
        let t: Thresholds = serde_yaml::from_str("lanes_max: 10\n").unwrap();
        assert_eq!(t.lanes_max, 10);
        assert_eq!(t.lanes_min, MIN_LANES);
    }

    #[test]
    fn test_merge_keeps_base_overrides() {
        let mut base = ThresholdOverrides {
            lanes_max: Some(10),
            ..ThresholdOverrides::default()
        };
        let other = ThresholdOverrides {
            maxspeed_max: Some(120),
            ..ThresholdOverrides::default()
        };
        base.merge(&other);

        let t = base.resolve();
        assert_eq!(t.lanes_max, 10);
        assert_eq!(t.maxspeed_max, 120);
        assert_eq!(t.lanes_min, MIN_LANES);
    }

    #[test]
    fn test_merge_restores_default() {
        let mut base: ThresholdOverrides = serde_yaml::from_str("maxspeed_max: 120\n").unwrap();
        let other: ThresholdOverrides =
            serde_yaml::from_str(&format!("maxspeed_max: {MAX_MAXSPEED}\n")).unwrap();
        base.merge(&other);
        assert_eq!(base.resolve().maxspeed_max, MAX_MAXSPEED);
    }

    #[test]
    fn test_unset_overrides_resolve_to_defaults() {
        assert_eq!(ThresholdOverrides::default().resolve(), Thresholds::default());
    }

    #[test]
    fn test_validate_inverted() {
        let t = Thresholds {
            layer_min: 3,
            layer_max: 1,
            ..Thresholds::default()
        };
        assert!(t.validate().unwrap_err().starts_with("layer"));
    }
}
