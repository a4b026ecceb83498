//! Input entities: units, expense snapshots, block metadata, announcements,
//! registrations.
//!
//! Wire names are snake_case; the legacy document field names of the
//! original store are accepted as aliases so existing documents load as-is.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::errors::CoreError;
use crate::tokens::{BlockLetter, Period};

/* -------------------------------------------------------------------------- */
/*                                Heating zones                               */
/* -------------------------------------------------------------------------- */

/// Group of blocks sharing one heating source. Wire form is the zone number.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum HeatingZone {
    /// Fuel split pro-rata by heating capacity.
    One,
    /// Fuel split equally among the zone's units.
    Two,
}

impl HeatingZone {
    pub const ALL: [HeatingZone; 2] = [HeatingZone::One, HeatingZone::Two];

    pub fn number(self) -> u8 {
        match self {
            HeatingZone::One => 1,
            HeatingZone::Two => 2,
        }
    }
}

impl TryFrom<u8> for HeatingZone {
    type Error = CoreError;
    fn try_from(v: u8) -> Result<Self, Self::Error> {
        match v {
            1 => Ok(HeatingZone::One),
            2 => Ok(HeatingZone::Two),
            other => Err(CoreError::InvalidZone(other)),
        }
    }
}

impl From<HeatingZone> for u8 {
    fn from(z: HeatingZone) -> Self { z.number() }
}

impl core::fmt::Display for HeatingZone {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.number())
    }
}

/* -------------------------------------------------------------------------- */
/*                                    Unit                                    */
/* -------------------------------------------------------------------------- */

fn yes() -> bool { true }

/// One residential apartment; the leaf billing entity. Read-only to the engine.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Unit {
    #[serde(alias = "globalDaireId")]
    pub global_id: String,
    #[serde(alias = "blokHarfi")]
    pub block: BlockLetter,
    /// 0 = ground floor.
    #[serde(alias = "kat")]
    pub floor: i32,
    #[serde(alias = "katAdi", default)]
    pub floor_label: String,
    #[serde(alias = "daireNo")]
    pub unit_number: u32,
    #[serde(alias = "daireTamAdi", default)]
    pub display_name: String,
    #[serde(alias = "daireTipi", default)]
    pub unit_type: String,
    #[serde(alias = "metrekare")]
    pub area: Decimal,
    #[serde(alias = "asansorKullanimi", default)]
    pub uses_elevator: bool,
    #[serde(alias = "kazanGrubu")]
    pub heating_zone: HeatingZone,
    /// Radiator sizing proxy; pro-rata basis for zone-1 fuel.
    #[serde(alias = "petekOlcusu", default)]
    pub heating_capacity: Decimal,
    #[serde(alias = "aktifMi", default = "yes")]
    pub active: bool,
}

impl Unit {
    pub fn is_ground_floor(&self) -> bool { self.floor == 0 }
    pub fn is_upper_floor(&self) -> bool { self.floor > 0 }

    /// Check roster invariants: positive area, zone among the configured ones.
    pub fn validate(&self, zones: &[HeatingZone]) -> Result<(), CoreError> {
        if self.area <= Decimal::ZERO {
            return Err(CoreError::NonPositiveArea { unit: self.global_id.clone() });
        }
        if !zones.contains(&self.heating_zone) {
            return Err(CoreError::InvalidZone(self.heating_zone.number()));
        }
        if self.heating_capacity < Decimal::ZERO {
            return Err(CoreError::DomainOutOfRange("heating_capacity"));
        }
        Ok(())
    }
}

/* -------------------------------------------------------------------------- */
/*                              Expense snapshot                              */
/* -------------------------------------------------------------------------- */

/// Fixed expense categories, in display/export order.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExpenseCategory {
    FuelZone1,
    FuelZone2,
    Elevator,
    Security,
    Janitorial,
    Electricity,
    Water,
    Management,
    Miscellaneous,
}

impl ExpenseCategory {
    pub const ALL: [ExpenseCategory; 9] = [
        ExpenseCategory::FuelZone1,
        ExpenseCategory::FuelZone2,
        ExpenseCategory::Elevator,
        ExpenseCategory::Security,
        ExpenseCategory::Janitorial,
        ExpenseCategory::Electricity,
        ExpenseCategory::Water,
        ExpenseCategory::Management,
        ExpenseCategory::Miscellaneous,
    ];

    pub fn key(self) -> &'static str {
        match self {
            ExpenseCategory::FuelZone1 => "fuel_zone1",
            ExpenseCategory::FuelZone2 => "fuel_zone2",
            ExpenseCategory::Elevator => "elevator",
            ExpenseCategory::Security => "security",
            ExpenseCategory::Janitorial => "janitorial",
            ExpenseCategory::Electricity => "electricity",
            ExpenseCategory::Water => "water",
            ExpenseCategory::Management => "management",
            ExpenseCategory::Miscellaneous => "miscellaneous",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ExpenseCategory::FuelZone1 => "Heating Zone 1 Fuel",
            ExpenseCategory::FuelZone2 => "Heating Zone 2 Fuel",
            ExpenseCategory::Elevator => "Elevator",
            ExpenseCategory::Security => "Security",
            ExpenseCategory::Janitorial => "Building Staff",
            ExpenseCategory::Electricity => "Electricity",
            ExpenseCategory::Water => "Water",
            ExpenseCategory::Management => "Management",
            ExpenseCategory::Miscellaneous => "Miscellaneous",
        }
    }

    /// Fallback description when the snapshot carries none.
    pub fn default_description(self) -> &'static str {
        match self {
            ExpenseCategory::FuelZone1 => "Fuel for the zone 1 heating plant",
            ExpenseCategory::FuelZone2 => "Fuel for the zone 2 heating plant",
            ExpenseCategory::Elevator => "Elevator maintenance and power",
            ExpenseCategory::Security => "Security staff and equipment",
            ExpenseCategory::Janitorial => "Building staff wages",
            ExpenseCategory::Electricity => "Common area electricity",
            ExpenseCategory::Water => "Common area water",
            ExpenseCategory::Management => "Management service fee",
            ExpenseCategory::Miscellaneous => "Miscellaneous shared costs",
        }
    }
}

impl core::fmt::Display for ExpenseCategory {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.key())
    }
}

/// Amount of an ad-hoc extra entry exactly as it arrived. May be a number,
/// a numeric string, null, missing, or garbage; coercion happens at the
/// strategy boundary.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawAmount {
    #[default]
    Missing,
    Number(Decimal),
    Text(String),
    Other(serde_json::Value),
}

impl From<Decimal> for RawAmount {
    fn from(d: Decimal) -> Self { RawAmount::Number(d) }
}

/// One ad-hoc extra expense line.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ExtraExpense {
    #[serde(alias = "ad")]
    pub name: String,
    #[serde(alias = "aciklama", default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(alias = "tutar", default)]
    pub amount: RawAmount,
}

/// Optional human-readable description per fixed category.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ExpenseDescriptions {
    #[serde(alias = "kazan1", default, skip_serializing_if = "Option::is_none")]
    pub fuel_zone1: Option<String>,
    #[serde(alias = "kazan2", default, skip_serializing_if = "Option::is_none")]
    pub fuel_zone2: Option<String>,
    #[serde(alias = "asansor", default, skip_serializing_if = "Option::is_none")]
    pub elevator: Option<String>,
    #[serde(alias = "guvenlikPersonelGideri", default, skip_serializing_if = "Option::is_none")]
    pub security: Option<String>,
    #[serde(alias = "binagorevliGideri", default, skip_serializing_if = "Option::is_none")]
    pub janitorial: Option<String>,
    #[serde(alias = "elektrik", default, skip_serializing_if = "Option::is_none")]
    pub electricity: Option<String>,
    #[serde(alias = "su", default, skip_serializing_if = "Option::is_none")]
    pub water: Option<String>,
    #[serde(alias = "yonetimGideri", default, skip_serializing_if = "Option::is_none")]
    pub management: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub miscellaneous: Option<String>,
}

impl ExpenseDescriptions {
    pub fn get(&self, cat: ExpenseCategory) -> Option<&str> {
        let v = match cat {
            ExpenseCategory::FuelZone1 => &self.fuel_zone1,
            ExpenseCategory::FuelZone2 => &self.fuel_zone2,
            ExpenseCategory::Elevator => &self.elevator,
            ExpenseCategory::Security => &self.security,
            ExpenseCategory::Janitorial => &self.janitorial,
            ExpenseCategory::Electricity => &self.electricity,
            ExpenseCategory::Water => &self.water,
            ExpenseCategory::Management => &self.management,
            ExpenseCategory::Miscellaneous => &self.miscellaneous,
        };
        v.as_deref().filter(|s| !s.trim().is_empty())
    }
}

/// Aggregate expense figures for one period.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ExpenseSnapshot {
    pub period: Period,
    #[serde(alias = "kazan1DogazFaturasi", default)]
    pub fuel_zone1: Option<Decimal>,
    #[serde(alias = "kazan2DogazFaturasi", default)]
    pub fuel_zone2: Option<Decimal>,
    #[serde(alias = "asansorToplam", default)]
    pub elevator: Option<Decimal>,
    #[serde(alias = "guvenlikPersonelGideri", alias = "guvenlikGideri", default)]
    pub security: Option<Decimal>,
    #[serde(alias = "binagorevliGideri", default)]
    pub janitorial: Option<Decimal>,
    #[serde(alias = "elektrikGideri", default)]
    pub electricity: Option<Decimal>,
    #[serde(alias = "suGideri", default)]
    pub water: Option<Decimal>,
    #[serde(alias = "yonetimGideri", default)]
    pub management: Option<Decimal>,
    #[serde(alias = "masrafGideri", default)]
    pub miscellaneous: Option<Decimal>,
    #[serde(alias = "ekGiderler", default)]
    pub extras: Vec<ExtraExpense>,
    #[serde(alias = "giderAciklamalari", default)]
    pub descriptions: ExpenseDescriptions,
    /// Per-period override of the deployment's utility rule.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub utility_rule: Option<crate::variables::UtilityRule>,
}

impl ExpenseSnapshot {
    /// Empty snapshot for `period` (all categories missing).
    pub fn empty(period: Period) -> Self {
        Self {
            period,
            fuel_zone1: None,
            fuel_zone2: None,
            elevator: None,
            security: None,
            janitorial: None,
            electricity: None,
            water: None,
            management: None,
            miscellaneous: None,
            extras: Vec::new(),
            descriptions: ExpenseDescriptions::default(),
            utility_rule: None,
        }
    }

    /// Raw category figure; `None` when the store omitted it.
    pub fn amount(&self, cat: ExpenseCategory) -> Option<Decimal> {
        match cat {
            ExpenseCategory::FuelZone1 => self.fuel_zone1,
            ExpenseCategory::FuelZone2 => self.fuel_zone2,
            ExpenseCategory::Elevator => self.elevator,
            ExpenseCategory::Security => self.security,
            ExpenseCategory::Janitorial => self.janitorial,
            ExpenseCategory::Electricity => self.electricity,
            ExpenseCategory::Water => self.water,
            ExpenseCategory::Management => self.management,
            ExpenseCategory::Miscellaneous => self.miscellaneous,
        }
    }

    /// Category figure with missing values defaulted to zero.
    pub fn amount_or_zero(&self, cat: ExpenseCategory) -> Decimal {
        self.amount(cat).unwrap_or(Decimal::ZERO)
    }

    /// Categories the store did not supply, in fixed order.
    pub fn missing_categories(&self) -> Vec<ExpenseCategory> {
        ExpenseCategory::ALL
            .into_iter()
            .filter(|c| self.amount(*c).is_none())
            .collect()
    }

    /// All supplied totals must be non-negative.
    pub fn validate(&self) -> Result<(), CoreError> {
        for cat in ExpenseCategory::ALL {
            if let Some(v) = self.amount(cat) {
                if v < Decimal::ZERO {
                    return Err(CoreError::NegativeAmount(cat.key()));
                }
            }
        }
        Ok(())
    }

    /// Description for `cat`, falling back to the category default.
    pub fn description(&self, cat: ExpenseCategory) -> String {
        self.descriptions
            .get(cat)
            .unwrap_or(cat.default_description())
            .to_string()
    }
}

/* -------------------------------------------------------------------------- */
/*                       Block metadata / announcements                       */
/* -------------------------------------------------------------------------- */

/// Declared structure of one block (complex metadata collection).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockDescriptor {
    #[serde(alias = "blokNo")]
    pub block_no: u32,
    #[serde(alias = "blokHarfi")]
    pub block: BlockLetter,
    #[serde(alias = "daireTipi", default)]
    pub unit_type: String,
    #[serde(alias = "toplamDaireSayisi")]
    pub unit_count: u32,
    #[serde(alias = "asansorKullananDaireSayisi", default)]
    pub elevator_users: u32,
    #[serde(alias = "zeminKatDaireSayisi", default)]
    pub ground_floor_units: u32,
    /// Declared area of one unit in this block.
    #[serde(alias = "metrekare")]
    pub area: Decimal,
    #[serde(alias = "kazanGrubu")]
    pub heating_zone: HeatingZone,
    #[serde(alias = "petekOlcusu", default)]
    pub heating_capacity: Decimal,
}

/// Free-text notice shown with expense exports.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Announcement {
    #[serde(alias = "baslik", default)]
    pub title: String,
    #[serde(alias = "aciklama", default)]
    pub body: String,
    #[serde(alias = "oncelik", default)]
    pub priority: String,
    #[serde(alias = "tarih", default, skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,
}

/// Visitor sign-up record, stored verbatim by the registration endpoint.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Registration {
    /// Canonical 10-digit mobile number (no leading 0).
    pub phone: String,
    pub apartment_number: String,
    pub building: String,
    pub registration_source: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_address: Option<String>,
    pub user_agent: String,
    pub registered_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unit_loads_from_legacy_document() {
        let doc = r#"{
            "globalDaireId": "A-201", "blokHarfi": "A", "kat": 2, "katAdi": "2. Kat",
            "daireNo": 201, "daireTamAdi": "A Blok 201", "daireTipi": "3+1",
            "metrekare": 120, "asansorKullanimi": true, "kazanGrubu": 1,
            "petekOlcusu": 450, "aktifMi": true
        }"#;
        let u: Unit = serde_json::from_str(doc).unwrap();
        assert_eq!(u.block.as_str(), "A");
        assert_eq!(u.unit_number, 201);
        assert_eq!(u.heating_zone, HeatingZone::One);
        assert!(u.uses_elevator);
        assert_eq!(u.area, Decimal::from(120));
        assert!(u.validate(&HeatingZone::ALL).is_ok());
    }

    #[test]
    fn unit_rejects_unknown_zone_on_load() {
        let doc = r#"{"global_id":"X","block":"A","floor":0,"unit_number":1,
                      "area":10,"heating_zone":3}"#;
        assert!(serde_json::from_str::<Unit>(doc).is_err());
    }

    #[test]
    fn unit_validate_checks_area_and_configured_zone() {
        let doc = r#"{"global_id":"X","block":"A","floor":0,"unit_number":1,
                      "area":0,"heating_zone":2}"#;
        let mut u: Unit = serde_json::from_str(doc).unwrap();
        assert!(u.active, "active defaults to true");
        assert!(matches!(u.validate(&HeatingZone::ALL), Err(CoreError::NonPositiveArea { .. })));
        u.area = Decimal::from(10);
        assert_eq!(u.validate(&[HeatingZone::One]), Err(CoreError::InvalidZone(2)));
    }

    #[test]
    fn snapshot_reports_missing_categories_in_order() {
        let doc = r#"{"period":"2024-01","kazan1DogazFaturasi":10000,
                      "guvenlikGideri":3560,"elektrikGideri":1780}"#;
        let s: ExpenseSnapshot = serde_json::from_str(doc).unwrap();
        assert_eq!(s.amount(ExpenseCategory::Security), Some(Decimal::from(3560)));
        assert_eq!(s.amount_or_zero(ExpenseCategory::Water), Decimal::ZERO);
        let missing = s.missing_categories();
        assert_eq!(missing.first(), Some(&ExpenseCategory::FuelZone2));
        assert!(!missing.contains(&ExpenseCategory::Electricity));
        assert_eq!(missing.len(), 6);
    }

    #[test]
    fn snapshot_rejects_negative_totals() {
        let mut s = ExpenseSnapshot::empty("2024-01".parse().unwrap());
        s.water = Some(Decimal::from(-5));
        assert_eq!(s.validate(), Err(CoreError::NegativeAmount("water")));
    }

    #[test]
    fn extra_amount_keeps_whatever_shape_arrived() {
        let doc = r#"[{"ad":"Garden","tutar":1780},{"ad":"Paint","tutar":"250.5"},
                      {"ad":"Broken","tutar":null},{"ad":"Absent"},
                      {"ad":"Junk","tutar":"n/a"},{"ad":"Odd","tutar":true}]"#;
        let xs: Vec<ExtraExpense> = serde_json::from_str(doc).unwrap();
        assert_eq!(xs[0].amount, RawAmount::Number(Decimal::from(1780)));
        assert_eq!(xs[1].amount, RawAmount::Number("250.5".parse().unwrap()));
        assert_eq!(xs[2].amount, RawAmount::Missing);
        assert_eq!(xs[3].amount, RawAmount::Missing);
        assert_eq!(xs[4].amount, RawAmount::Text("n/a".into()));
        assert!(matches!(xs[5].amount, RawAmount::Other(_)));
    }

    #[test]
    fn descriptions_fall_back_to_defaults() {
        let mut s = ExpenseSnapshot::empty("2024-01".parse().unwrap());
        s.descriptions.security = Some("Night watch".into());
        s.descriptions.water = Some("   ".into());
        assert_eq!(s.description(ExpenseCategory::Security), "Night watch");
        assert_eq!(s.description(ExpenseCategory::Water), "Common area water");
    }
}
