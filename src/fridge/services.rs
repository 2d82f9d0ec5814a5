use time::{Duration, OffsetDateTime};

use super::dto::{AddFridgeItem, FridgeItemUpdate};
use super::repo_types::{InventoryFields, InventoryItem};
use crate::catalog::services::Catalog;
use crate::error::{KitchenError, KitchenResult};

/// Days ahead the "expiring soon" badge looks.
pub const DEFAULT_EXPIRY_WARNING_DAYS: u32 = 3;

/// Build a new fridge item, filling gaps from the catalog.
///
/// The expiration derived from `avg_shelf_life` is frozen here; later catalog
/// edits do not move it.
pub fn new_item(catalog: &Catalog, req: &AddFridgeItem, now: OffsetDateTime) -> KitchenResult<InventoryFields> {
    let name = req.name.trim();
    if name.is_empty() {
        return Err(KitchenError::validation("fridge item name must not be empty"));
    }
    let record = catalog.find(name);
    let added_date = req.added_date.unwrap_or(now);

    let weight = req
        .weight
        .or_else(|| record.map(|r| r.reference_weight))
        .ok_or_else(|| {
            KitchenError::validation(format!("'{}' is not in the catalog; a weight is required", name))
        })?;
    let expiration_date = match (req.expiration_date, record) {
        (Some(date), _) => date,
        (None, Some(r)) => added_date
            .checked_add(Duration::days(i64::from(r.avg_shelf_life)))
            .ok_or_else(|| {
                KitchenError::validation(format!(
                    "shelf life of {} days for '{}' runs past the last representable date",
                    r.avg_shelf_life, name
                ))
            })?,
        (None, None) => {
            return Err(KitchenError::validation(format!(
                "'{}' is not in the catalog; an expiration date is required",
                name
            )))
        }
    };

    let fields = InventoryFields {
        name: name.to_string(),
        weight,
        added_date,
        expiration_date,
    };
    validate(&fields)?;
    Ok(fields)
}

pub fn apply_update(current: &InventoryFields, update: &FridgeItemUpdate) -> KitchenResult<InventoryFields> {
    let fields = InventoryFields {
        name: update
            .name
            .as_deref()
            .map(|n| n.trim().to_string())
            .unwrap_or_else(|| current.name.clone()),
        weight: update.weight.unwrap_or(current.weight),
        added_date: update.added_date.unwrap_or(current.added_date),
        expiration_date: update.expiration_date.unwrap_or(current.expiration_date),
    };
    validate(&fields)?;
    Ok(fields)
}

fn validate(fields: &InventoryFields) -> KitchenResult<()> {
    if fields.name.is_empty() {
        return Err(KitchenError::validation("fridge item name must not be empty"));
    }
    if !(fields.weight.is_finite() && fields.weight > 0.0) {
        return Err(KitchenError::validation(format!(
            "weight of '{}' must be positive, got {}",
            fields.name, fields.weight
        )));
    }
    Ok(())
}

/// Items whose expiry, in whole days rounded up, falls within `0..=days`.
pub fn expiring_within(items: &[InventoryItem], days: u32, now: OffsetDateTime) -> Vec<&InventoryItem> {
    items
        .iter()
        .filter(|i| (0..=i64::from(days)).contains(&i.days_until_expiry(now)))
        .collect()
}
