use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::storage::DocumentId;

const SECONDS_PER_DAY: f64 = 86_400.0;

/// Stored body of a fridge item. Dates cross the store boundary as RFC 3339.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryFields {
    pub name: String,
    pub weight: f64, // grams held
    #[serde(with = "time::serde::rfc3339")]
    pub added_date: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub expiration_date: OffsetDateTime,
}

#[derive(Debug, Clone, PartialEq)]
pub struct InventoryItem {
    pub id: DocumentId,
    pub fields: InventoryFields,
}

impl InventoryItem {
    /// Whole days until expiry, rounded up; negative once expired.
    pub fn days_until_expiry(&self, now: OffsetDateTime) -> i64 {
        let remaining = self.fields.expiration_date - now;
        (remaining.as_seconds_f64() / SECONDS_PER_DAY).ceil() as i64
    }
}

#[cfg(test)]
mod inventory_types_tests {
    use super::*;
    use serde_json::json;
    use time::macros::datetime;
    use uuid::Uuid;

    fn milk(expires: OffsetDateTime) -> InventoryItem {
        InventoryItem {
            id: Uuid::new_v4(),
            fields: InventoryFields {
                name: "milk".into(),
                weight: 1000.0,
                added_date: datetime!(2026-10-10 08:00 UTC),
                expiration_date: expires,
            },
        }
    }

    #[test]
    fn days_round_up() {
        let now = datetime!(2026-10-16 12:00 UTC);
        assert_eq!(milk(datetime!(2026-10-16 12:00 UTC)).days_until_expiry(now), 0);
        assert_eq!(milk(datetime!(2026-10-16 13:00 UTC)).days_until_expiry(now), 1);
        assert_eq!(milk(datetime!(2026-10-19 12:00 UTC)).days_until_expiry(now), 3);
        assert_eq!(milk(datetime!(2026-10-19 12:01 UTC)).days_until_expiry(now), 4);
        assert_eq!(milk(datetime!(2026-10-15 11:00 UTC)).days_until_expiry(now), -1);
    }

    #[test]
    fn dates_stored_as_rfc3339() {
        let item = milk(datetime!(2026-10-20 00:00 UTC));
        let value = serde_json::to_value(&item.fields).expect("serialize");
        assert_eq!(value["addedDate"], json!("2026-10-10T08:00:00Z"));
        assert_eq!(value["expirationDate"], json!("2026-10-20T00:00:00Z"));

        let back: InventoryFields = serde_json::from_value(value).expect("deserialize");
        assert_eq!(back, item.fields);
    }
}
