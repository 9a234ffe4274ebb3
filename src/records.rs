//! Records
//!
//! A [`Record`] wraps an entity's business fields with the identity and audit data every register
//! shares. Entities plug into the generic store, filter and screen machinery through [`Entity`].

use std::fmt::Debug;

use jiff::{Timestamp, civil::Date, tz::TimeZone};

use crate::{filter::Criteria, ids::RecordId, validation::FormSchema, validation::ValidationErrors};

/// User-facing messages for one register.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Messages {
    /// Shown after a successful create.
    pub created: &'static str,

    /// Shown after a successful update.
    pub updated: &'static str,

    /// Shown after a successful delete.
    pub deleted: &'static str,

    /// Confirmation prompt shown before deleting.
    pub delete_prompt: &'static str,
}

/// Business object held in a register.
pub trait Entity: Clone + Debug + Sized {
    /// Create/edit form for this entity.
    type Form: FormSchema + Clone + Debug + Default;

    /// Active filter predicates for this entity.
    type Criteria: Criteria<Self> + Clone + Debug + Default;

    /// Short name used in log lines.
    const KIND: &'static str;

    /// User-facing messages.
    const MESSAGES: Messages;

    /// Build the entity from a validated form, applying any default status.
    ///
    /// # Errors
    ///
    /// Returns a field error if a value passed the schema but cannot be converted.
    fn from_form(form: &Self::Form, today: Date) -> Result<Self, ValidationErrors>;

    /// Overwrite the business fields from a validated form.
    ///
    /// # Errors
    ///
    /// Returns a field error if a value passed the schema but cannot be converted.
    fn apply_form(&mut self, form: &Self::Form, today: Date) -> Result<(), ValidationErrors> {
        *self = Self::from_form(form, today)?;

        Ok(())
    }

    /// Populate a form with every editable field.
    fn to_form(&self) -> Self::Form;
}

/// Entity with an explicit two-state status flipped by a dedicated action.
pub trait Toggle: Entity {
    /// Shown after the status changes.
    const TOGGLED_MESSAGE: &'static str;

    /// Flip the status in place.
    fn toggle(&mut self);
}

/// A stored entity with its identity and audit timestamps.
#[derive(Debug, Clone, PartialEq)]
pub struct Record<E> {
    id: RecordId<E>,
    data: E,
    created_at: Timestamp,
    updated_at: Timestamp,
}

impl<E> Record<E> {
    /// Create a record stamped at `now`.
    pub fn new(data: E, now: Timestamp) -> Self {
        Self {
            id: RecordId::new(),
            data,
            created_at: now,
            updated_at: now,
        }
    }

    /// Rebuild a record from seed data.
    ///
    /// `updated_at` is clamped so it never precedes `created_at`.
    pub fn seeded(data: E, created_at: Timestamp, updated_at: Timestamp) -> Self {
        Self {
            id: RecordId::new(),
            data,
            created_at,
            updated_at: updated_at.max(created_at),
        }
    }

    /// Record id.
    pub fn id(&self) -> RecordId<E> {
        self.id
    }

    /// Business fields.
    pub fn data(&self) -> &E {
        &self.data
    }

    /// Creation time; never changes.
    pub fn created_at(&self) -> Timestamp {
        self.created_at
    }

    /// Time of the latest mutation.
    pub fn updated_at(&self) -> Timestamp {
        self.updated_at
    }

    pub(crate) fn data_mut(&mut self) -> &mut E {
        &mut self.data
    }

    pub(crate) fn touch(&mut self, now: Timestamp) {
        self.updated_at = now.max(self.created_at).max(self.updated_at);
    }
}

/// Calendar date of `now` in UTC.
pub fn utc_date(now: Timestamp) -> Date {
    now.to_zoned(TimeZone::UTC).date()
}

#[cfg(test)]
mod tests {
    use jiff::ToSpan;
    use testresult::TestResult;

    use super::*;

    #[test]
    fn new_record_has_equal_timestamps() {
        let now = Timestamp::now();
        let record = Record::new("payload", now);

        assert_eq!(record.created_at(), now);
        assert_eq!(record.updated_at(), now);
    }

    #[test]
    fn seeded_record_never_updated_before_created() -> TestResult {
        let created: Timestamp = "2025-04-20T10:00:00Z".parse()?;
        let updated: Timestamp = "2025-01-01T00:00:00Z".parse()?;

        let record = Record::seeded("payload", created, updated);

        assert_eq!(record.updated_at(), created);

        Ok(())
    }

    #[test]
    fn touch_never_moves_backwards() -> TestResult {
        let now: Timestamp = "2025-04-20T10:00:00Z".parse()?;
        let mut record = Record::new("payload", now);

        record.touch(now.checked_sub(1.hour())?);
        assert_eq!(record.updated_at(), now);

        let later = now.checked_add(1.hour())?;
        record.touch(later);
        assert_eq!(record.updated_at(), later);
        assert_eq!(record.created_at(), now);

        Ok(())
    }

    #[test]
    fn utc_date_uses_utc_calendar() -> TestResult {
        let now: Timestamp = "2025-05-01T23:30:00Z".parse()?;

        assert_eq!(utc_date(now), jiff::civil::date(2025, 5, 1));

        Ok(())
    }
}
