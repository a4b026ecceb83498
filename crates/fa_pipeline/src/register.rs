//! Registration submission: validate, normalise, store.
//!
//! Phone numbers are stripped to digits and must match `^0?5\d{9}$`; the
//! stored form is the 10 digits without the leading zero.

use serde::{Deserialize, Serialize};
use tracing::info;

use fa_core::entities::Registration;
use fa_io::Store;

use crate::{Clock, PipelineError, PipelineResult};

pub const DEFAULT_SOURCE: &str = "cli";
pub const UNKNOWN_AGENT: &str = "Unknown";

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistrationRequest {
    #[serde(default)]
    pub phone: String,
    #[serde(alias = "apartmentNumber", default)]
    pub apartment_number: String,
    #[serde(alias = "buildingNumber", default)]
    pub building: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistrationAck {
    pub id: String,
    pub phone: String,
}

/// Canonical 10-digit mobile number (`5XXXXXXXXX`).
pub fn normalize_phone(raw: &str) -> PipelineResult<String> {
    let digits: String = raw.chars().filter(char::is_ascii_digit).collect();
    let local = digits.strip_prefix('0').unwrap_or(&digits);
    if local.len() == 10 && local.starts_with('5') {
        Ok(local.to_string())
    } else {
        Err(PipelineError::Validation(format!("invalid mobile phone number: {raw:?} (expected e.g. 0555 123 45 67)")))
    }
}

pub fn submit_registration(
    store: &dyn Store,
    clock: &dyn Clock,
    req: &RegistrationRequest,
) -> PipelineResult<RegistrationAck> {
    let apartment = req.apartment_number.trim();
    let building = req.building.trim();
    if req.phone.trim().is_empty() || apartment.is_empty() || building.is_empty() {
        return Err(PipelineError::Validation("phone, building and apartment number are required".into()));
    }
    let phone = normalize_phone(&req.phone)?;

    let record = Registration {
        phone: phone.clone(),
        apartment_number: apartment.to_string(),
        building: building.to_uppercase(),
        registration_source: req.source.clone().unwrap_or_else(|| DEFAULT_SOURCE.to_string()),
        client_address: req.client_address.clone(),
        user_agent: req.user_agent.clone().filter(|a| !a.trim().is_empty()).unwrap_or_else(|| UNKNOWN_AGENT.to_string()),
        registered_at: clock.now(),
    };
    let id = store.insert_registration(&record)?;
    info!(%id, building = %record.building, "registration stored");
    Ok(RegistrationAck { id, phone })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testkit::clock;
    use fa_io::MemoryStore;

    #[test]
    fn phone_normalization() {
        assert_eq!(normalize_phone("0555 123 45 67").unwrap(), "5551234567");
        assert_eq!(normalize_phone("555-123-4567").unwrap(), "5551234567");
        assert_eq!(normalize_phone("(0532) 000 00 00").unwrap(), "5320000000");
        assert!(normalize_phone("0212 123 45 67").is_err());
        assert!(normalize_phone("555 123 45 6").is_err());
        assert!(normalize_phone("00555 123 45 67").is_err());
        assert!(normalize_phone("abc").is_err());
    }

    #[test]
    fn stores_normalized_record() {
        let s = MemoryStore::new();
        let req = RegistrationRequest {
            phone: "0555 123 45 67".into(),
            apartment_number: " 12 ".into(),
            building: " c ".into(),
            ..Default::default()
        };
        let ack = submit_registration(&s, &clock(), &req).unwrap();
        assert_eq!(ack, RegistrationAck { id: "REG-000001".into(), phone: "5551234567".into() });

        let (_, rec) = &s.registrations()[0];
        assert_eq!(rec.apartment_number, "12");
        assert_eq!(rec.building, "C");
        assert_eq!(rec.user_agent, "Unknown");
        assert_eq!(rec.registration_source, "cli");
        assert_eq!(rec.registered_at, clock().0);
    }

    #[test]
    fn missing_fields_write_nothing() {
        let s = MemoryStore::new();
        let req = RegistrationRequest { phone: "05551234567".into(), building: "A".into(), ..Default::default() };
        assert!(matches!(submit_registration(&s, &clock(), &req), Err(PipelineError::Validation(_))));
        let bad = RegistrationRequest { phone: "123".into(), apartment_number: "1".into(), building: "A".into(), ..Default::default() };
        assert!(submit_registration(&s, &clock(), &bad).is_err());
        assert!(s.registrations().is_empty());
    }
}
