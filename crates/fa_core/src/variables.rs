//! Configuration variables with safe defaults.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::entities::HeatingZone;
use crate::errors::CoreError;
use crate::tokens::BlockLetter;

/// Define a serde'd enum with explicit wire tokens.
macro_rules! serde_enum {
    ($(#[$m:meta])* $name:ident => { $($variant:ident = $token:expr),+ $(,)? }) => {
        $(#[$m])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $(
                #[serde(rename = $token)]
                $variant,
            )+
        }

        impl $name {
            pub fn token(self) -> &'static str {
                match self { $($name::$variant => $token,)+ }
            }
        }

        impl core::str::FromStr for $name {
            type Err = CoreError;
            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($token => Ok($name::$variant),)+
                    _ => Err(CoreError::DomainOutOfRange(stringify!($name))),
                }
            }
        }
    };
}

serde_enum!(
    /// Allocation rule for electricity, water and miscellaneous totals.
    UtilityRule => {
        EqualSplit = "equal_split",
        FloorArea  = "floor_area"
    }
);

impl Default for UtilityRule {
    fn default() -> Self { UtilityRule::EqualSplit }
}

fn default_exemplar_unit() -> u32 { 201 }

/// Which unit illustrates per-unit shares in the expense detail table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExemplarPolicy {
    #[serde(default = "default_exemplar_unit")]
    pub default_unit_number: u32,
    #[serde(default)]
    pub per_block: BTreeMap<BlockLetter, u32>,
}

impl Default for ExemplarPolicy {
    fn default() -> Self {
        Self { default_unit_number: default_exemplar_unit(), per_block: BTreeMap::new() }
    }
}

impl ExemplarPolicy {
    pub fn unit_number_for(&self, block: &BlockLetter) -> u32 {
        self.per_block.get(block).copied().unwrap_or(self.default_unit_number)
    }
}

fn default_zones() -> Vec<HeatingZone> { HeatingZone::ALL.to_vec() }

/// Deployment-wide engine configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    #[serde(default)]
    pub utility_rule: UtilityRule,
    #[serde(default)]
    pub exemplar: ExemplarPolicy,
    #[serde(default = "default_zones")]
    pub heating_zones: Vec<HeatingZone>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            utility_rule: UtilityRule::default(),
            exemplar: ExemplarPolicy::default(),
            heating_zones: default_zones(),
        }
    }
}

impl EngineConfig {
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.heating_zones.is_empty() {
            return Err(CoreError::DomainOutOfRange("heating_zones"));
        }
        Ok(())
    }

    /// Rule in force for a period: the snapshot's override, else the default.
    pub fn utility_rule_for(&self, snapshot_rule: Option<UtilityRule>) -> UtilityRule {
        snapshot_rule.unwrap_or(self.utility_rule)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_fill_missing_fields() {
        let c: EngineConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(c, EngineConfig::default());
        assert_eq!(c.utility_rule, UtilityRule::EqualSplit);
        assert_eq!(c.exemplar.default_unit_number, 201);
        assert_eq!(c.heating_zones, vec![HeatingZone::One, HeatingZone::Two]);
    }

    #[test]
    fn exemplar_per_block_overrides_default() {
        let c: EngineConfig = serde_json::from_str(
            r#"{"utility_rule":"floor_area","exemplar":{"per_block":{"D":101}}}"#,
        )
        .unwrap();
        assert_eq!(c.utility_rule, UtilityRule::FloorArea);
        assert_eq!(c.exemplar.unit_number_for(&"D".parse().unwrap()), 101);
        assert_eq!(c.exemplar.unit_number_for(&"A".parse().unwrap()), 201);
    }

    #[test]
    fn snapshot_rule_wins() {
        let c = EngineConfig::default();
        assert_eq!(c.utility_rule_for(None), UtilityRule::EqualSplit);
        assert_eq!(c.utility_rule_for(Some(UtilityRule::FloorArea)), UtilityRule::FloorArea);
    }

    #[test]
    fn utility_rule_tokens_parse() {
        assert_eq!("floor_area".parse::<UtilityRule>().unwrap(), UtilityRule::FloorArea);
        assert_eq!(UtilityRule::EqualSplit.token(), "equal_split");
        assert!("area".parse::<UtilityRule>().is_err());
    }

    #[test]
    fn empty_zone_set_is_invalid() {
        let c = EngineConfig { heating_zones: vec![], ..EngineConfig::default() };
        assert!(c.validate().is_err());
    }
}
