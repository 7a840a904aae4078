//! Core record structs: cities and their temperature readings.

use serde::{Deserialize, Serialize};

use crate::ids::{CityId, TemperatureId};
use crate::record::RecordMeta;

/// A named location with descriptive text.
///
/// Owns every [`CityTemperature`] recorded against it; deleting the city
/// deletes its readings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct City {
    /// Identity and audit timestamps.
    #[serde(flatten)]
    pub meta: RecordMeta<CityId>,
    /// Display name, non-empty, at most 100 characters.
    pub name: String,
    /// Free-form description, may be empty.
    pub description: String,
}

impl City {
    /// Create a new, not yet persisted city with a fresh identity.
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            meta: RecordMeta::fresh(),
            name: name.into(),
            description: description.into(),
        }
    }

    /// The city's identifier.
    pub const fn id(&self) -> CityId {
        self.meta.id
    }

    /// Apply a partial update in place.
    ///
    /// Fields absent from `changes` are left untouched. `updated_at` is
    /// bumped even when `changes` is empty, matching a save of an
    /// unchanged record.
    pub fn apply(&mut self, changes: &CityChanges) {
        if let Some(name) = &changes.name {
            name.clone_into(&mut self.name);
        }
        if let Some(description) = &changes.description {
            description.clone_into(&mut self.description);
        }
        self.meta.touch();
    }
}

/// A partial update to a [`City`].
///
/// `None` means "keep the current value".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CityChanges {
    /// New name, if it should change.
    pub name: Option<String>,
    /// New description, if it should change.
    pub description: Option<String>,
}

impl CityChanges {
    /// Whether the update leaves every field as it is.
    pub const fn is_empty(&self) -> bool {
        self.name.is_none() && self.description.is_none()
    }
}

/// A single temperature value recorded against a city.
///
/// Readings are immutable once created and only disappear when their city
/// is deleted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CityTemperature {
    /// Identity and audit timestamps.
    #[serde(flatten)]
    pub meta: RecordMeta<TemperatureId>,
    /// The city this reading belongs to.
    pub city: CityId,
    /// The recorded temperature.
    pub value: f64,
}

impl CityTemperature {
    /// Create a new, not yet persisted reading for `city`.
    pub fn new(city: CityId, value: f64) -> Self {
        Self {
            meta: RecordMeta::fresh(),
            city,
            value,
        }
    }

    /// The reading's identifier.
    pub const fn id(&self) -> TemperatureId {
        self.meta.id
    }
}
