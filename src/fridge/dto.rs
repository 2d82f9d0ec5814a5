use time::OffsetDateTime;

/// Request to put something in the fridge.
///
/// Missing weight and expiration are filled from the catalog entry of the same
/// name; without one, both must be given.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AddFridgeItem {
    pub name: String,
    pub weight: Option<f64>,
    pub added_date: Option<OffsetDateTime>,
    pub expiration_date: Option<OffsetDateTime>,
}

impl AddFridgeItem {
    pub fn from_catalog(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn manual(name: impl Into<String>, weight: f64, expiration_date: OffsetDateTime) -> Self {
        Self {
            name: name.into(),
            weight: Some(weight),
            expiration_date: Some(expiration_date),
            ..Self::default()
        }
    }

    pub fn weight(mut self, grams: f64) -> Self {
        self.weight = Some(grams);
        self
    }

    pub fn added_on(mut self, date: OffsetDateTime) -> Self {
        self.added_date = Some(date);
        self
    }
}

/// Partial edit of a fridge item; `None` keeps the current value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FridgeItemUpdate {
    pub name: Option<String>,
    pub weight: Option<f64>,
    pub added_date: Option<OffsetDateTime>,
    pub expiration_date: Option<OffsetDateTime>,
}
