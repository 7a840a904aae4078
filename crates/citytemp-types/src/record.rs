//! Identity and audit timestamps shared by every persisted record.
//!
//! Both cities and temperature readings carry the same three
//! server-assigned fields. [`RecordMeta`] bundles them so each record type
//! embeds one value instead of repeating the fields and the stamping logic.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Server-assigned identity plus creation and update timestamps.
///
/// Clients never set any of these fields. The ID and `created_at` are fixed
/// when the record is created; `updated_at` moves forward on every change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordMeta<I> {
    /// Unique identifier of the record.
    pub id: I,
    /// When the record was created.
    pub created_at: DateTime<Utc>,
    /// When the record was last modified.
    pub updated_at: DateTime<Utc>,
}

impl<I: Default> RecordMeta<I> {
    /// Stamp a brand new record: fresh ID, both timestamps set to now.
    pub fn fresh() -> Self {
        let now = Utc::now();
        Self {
            id: I::default(),
            created_at: now,
            updated_at: now,
        }
    }
}

impl<I> RecordMeta<I> {
    /// Record a modification at the current time.
    pub fn touch(&mut self) {
        self.touch_at(Utc::now());
    }

    /// Record a modification at `at`.
    ///
    /// `updated_at` never moves backwards, so a clock step back leaves the
    /// previous value in place.
    pub fn touch_at(&mut self, at: DateTime<Utc>) {
        if at > self.updated_at {
            self.updated_at = at;
        }
    }
}
