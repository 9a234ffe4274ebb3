//! Entity Store & Record Lifecycle
//!
//! A [`Store`] is the ordered, in-memory register for one entity type. All mutations go through
//! its lifecycle methods, which validate input, stamp audit timestamps and log the outcome.

use jiff::Timestamp;
use tracing::{info, warn};

use crate::{
    ids::RecordId,
    records::{Entity, Record, Toggle, utc_date},
    validation::{ValidationErrors, validate},
};

/// Asks the user to confirm a destructive action.
pub trait Confirm {
    /// Show `prompt` and return whether the user accepted.
    fn confirm(&mut self, prompt: &str) -> bool;
}

impl<F: FnMut(&str) -> bool> Confirm for F {
    fn confirm(&mut self, prompt: &str) -> bool {
        self(prompt)
    }
}

/// Result of a delete request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    /// The record was removed.
    Deleted,

    /// The user declined; nothing changed.
    Declined,

    /// No record had the id; nothing changed.
    NotFound,
}

/// Ordered in-memory register of one entity type.
#[derive(Debug, Clone)]
pub struct Store<E> {
    records: Vec<Record<E>>,
}

impl<E> Default for Store<E> {
    fn default() -> Self {
        Self {
            records: Vec::new(),
        }
    }
}

impl<E: Entity> Store<E> {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store holding `records`, e.g. from seed data.
    pub fn with_records(records: impl Into<Vec<Record<E>>>) -> Self {
        Self {
            records: records.into(),
        }
    }

    /// All records, in insertion order.
    pub fn records(&self) -> &[Record<E>] {
        &self.records
    }

    /// Iterate all records, in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Record<E>> {
        self.records.iter()
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// True when the store holds no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Look up a record by id.
    pub fn get(&self, id: RecordId<E>) -> Option<&Record<E>> {
        self.records.iter().find(|record| record.id() == id)
    }

    fn get_mut(&mut self, id: RecordId<E>) -> Option<&mut Record<E>> {
        self.records.iter_mut().find(|record| record.id() == id)
    }

    /// Validate `form` and append a new record stamped with the current time.
    ///
    /// # Errors
    ///
    /// Returns the failing fields; the store is left untouched.
    pub fn create(&mut self, form: &E::Form) -> Result<Record<E>, ValidationErrors> {
        self.create_at(form, Timestamp::now())
    }

    /// Validate `form` and append a new record stamped at `now`.
    ///
    /// # Errors
    ///
    /// Returns the failing fields; the store is left untouched.
    pub fn create_at(
        &mut self,
        form: &E::Form,
        now: Timestamp,
    ) -> Result<Record<E>, ValidationErrors> {
        validate(form)?;

        let data = E::from_form(form, utc_date(now))?;
        let record = Record::new(data, now);

        info!(kind = E::KIND, id = %record.id(), "record created");

        self.records.push(record.clone());

        Ok(record)
    }

    /// Validate `form` and overwrite the business fields of record `id`.
    ///
    /// Returns `Ok(None)` when no record has `id`; ids handed to callers always come from the
    /// store, so this is logged rather than reported.
    ///
    /// # Errors
    ///
    /// Returns the failing fields; the record is left untouched.
    pub fn update(
        &mut self,
        id: RecordId<E>,
        form: &E::Form,
    ) -> Result<Option<Record<E>>, ValidationErrors> {
        self.update_at(id, form, Timestamp::now())
    }

    /// As [`Store::update`], stamping `updated_at` with `now`.
    ///
    /// # Errors
    ///
    /// Returns the failing fields; the record is left untouched.
    pub fn update_at(
        &mut self,
        id: RecordId<E>,
        form: &E::Form,
        now: Timestamp,
    ) -> Result<Option<Record<E>>, ValidationErrors> {
        validate(form)?;

        let Some(record) = self.get_mut(id) else {
            warn!(kind = E::KIND, %id, "update for unknown record ignored");

            return Ok(None);
        };

        let mut data = record.data().clone();
        data.apply_form(form, utc_date(now))?;

        *record.data_mut() = data;
        record.touch(now);

        info!(kind = E::KIND, %id, "record updated");

        Ok(Some(record.clone()))
    }

    /// Remove record `id` after `confirm` accepts the entity's delete prompt.
    pub fn delete(&mut self, id: RecordId<E>, confirm: &mut impl Confirm) -> DeleteOutcome {
        if !confirm.confirm(E::MESSAGES.delete_prompt) {
            return DeleteOutcome::Declined;
        }

        let before = self.records.len();
        self.records.retain(|record| record.id() != id);

        if self.records.len() == before {
            warn!(kind = E::KIND, %id, "delete for unknown record ignored");

            return DeleteOutcome::NotFound;
        }

        info!(kind = E::KIND, %id, "record deleted");

        DeleteOutcome::Deleted
    }
}

impl<E: Toggle> Store<E> {
    /// Flip the status of record `id`, stamping the current time.
    pub fn toggle_status(&mut self, id: RecordId<E>) -> Option<Record<E>> {
        self.toggle_status_at(id, Timestamp::now())
    }

    /// Flip the status of record `id`, stamping `now`.
    ///
    /// Returns `None` when no record has `id`.
    pub fn toggle_status_at(&mut self, id: RecordId<E>, now: Timestamp) -> Option<Record<E>> {
        let Some(record) = self.get_mut(id) else {
            warn!(kind = E::KIND, %id, "status toggle for unknown record ignored");

            return None;
        };

        record.data_mut().toggle();
        record.touch(now);

        info!(kind = E::KIND, %id, "record status toggled");

        Some(record.clone())
    }
}

#[cfg(test)]
mod tests {
    use jiff::ToSpan;
    use testresult::TestResult;

    use super::*;
    use crate::entities::bidders::{Bidder, BidderForm, BidderStatus};

    fn form(name: &str) -> BidderForm {
        BidderForm {
            legal_name: name.to_string(),
            cnpj: "98.765.432/0001-10".to_string(),
            address: "Av. Paulista, 1000".to_string(),
            city: "São Paulo".to_string(),
            state: "SP".to_string(),
            cep: "01310-100".to_string(),
            phone: "(11) 3456-7890".to_string(),
            email: "contato@tecnologiaxyz.com.br".to_string(),
            legal_representative: "Maria Oliveira".to_string(),
            representative_cpf: "987.654.321-00".to_string(),
            notes: String::new(),
        }
    }

    fn now() -> Result<Timestamp, jiff::Error> {
        "2025-05-20T12:00:00Z".parse()
    }

    #[test]
    fn create_appends_in_order() -> TestResult {
        let mut store = Store::<Bidder>::new();

        let first = store.create_at(&form("Primeira Ltda"), now()?)?;
        let second = store.create_at(&form("Segunda Ltda"), now()?)?;

        assert_eq!(store.len(), 2);
        assert_ne!(first.id(), second.id());
        assert_eq!(
            store.records().last().map(Record::id),
            Some(second.id())
        );
        assert_eq!(first.created_at(), first.updated_at());
        assert_eq!(first.data().status, BidderStatus::Active);

        Ok(())
    }

    #[test]
    fn invalid_create_leaves_store_untouched() {
        let mut store = Store::<Bidder>::new();

        let result = store.create(&BidderForm::default());

        assert!(result.is_err());
        assert!(store.is_empty());
    }

    #[test]
    fn update_keeps_identity_and_creation_time() -> TestResult {
        let mut store = Store::<Bidder>::new();
        let created = store.create_at(&form("Tecnologia XYZ S.A."), now()?)?;
        store.toggle_status_at(created.id(), now()?);

        let later = now()?.checked_add(2.hours())?;
        let updated = store
            .update_at(created.id(), &form("Tecnologia XYZ Ltda"), later)?
            .ok_or("record missing")?;

        assert_eq!(updated.id(), created.id());
        assert_eq!(updated.created_at(), created.created_at());
        assert_eq!(updated.updated_at(), later);
        assert_eq!(updated.data().legal_name, "Tecnologia XYZ Ltda");
        assert_eq!(updated.data().status, BidderStatus::Inactive);

        Ok(())
    }

    #[test]
    fn invalid_update_leaves_record_untouched() -> TestResult {
        let mut store = Store::<Bidder>::new();
        let created = store.create_at(&form("Tecnologia XYZ S.A."), now()?)?;

        let mut invalid = form("Tecnologia XYZ S.A.");
        invalid.email = "sem-arroba".to_string();

        let errors = store
            .update(created.id(), &invalid)
            .err()
            .unwrap_or_default();

        assert_eq!(errors.get("email"), Some("Email inválido"));
        assert_eq!(store.get(created.id()), Some(&created));

        Ok(())
    }

    #[test]
    fn unknown_ids_are_ignored() -> TestResult {
        let mut store = Store::<Bidder>::new();
        store.create_at(&form("Tecnologia XYZ S.A."), now()?)?;
        let before = store.clone();

        let missing = RecordId::new();

        assert_eq!(store.update(missing, &form("Outra Ltda"))?, None);
        assert_eq!(store.toggle_status(missing), None);
        assert_eq!(
            store.delete(missing, &mut |_: &str| true),
            DeleteOutcome::NotFound
        );
        assert_eq!(store.records(), before.records());

        Ok(())
    }

    #[test]
    fn delete_asks_with_entity_prompt() -> TestResult {
        let mut store = Store::<Bidder>::new();
        let created = store.create_at(&form("Tecnologia XYZ S.A."), now()?)?;
        let mut prompts = Vec::new();

        let outcome = store.delete(created.id(), &mut |prompt: &str| {
            prompts.push(prompt.to_string());
            false
        });

        assert_eq!(outcome, DeleteOutcome::Declined);
        assert_eq!(prompts, [Bidder::MESSAGES.delete_prompt]);
        assert_eq!(store.len(), 1);

        let outcome = store.delete(created.id(), &mut |_: &str| true);

        assert_eq!(outcome, DeleteOutcome::Deleted);
        assert!(store.get(created.id()).is_none());

        Ok(())
    }

    #[test]
    fn toggle_twice_restores_status() -> TestResult {
        let mut store = Store::<Bidder>::new();
        let created = store.create_at(&form("Tecnologia XYZ S.A."), now()?)?;

        store.toggle_status(created.id());
        let restored = store.toggle_status(created.id()).ok_or("record missing")?;

        assert_eq!(restored.data().status, BidderStatus::Active);
        assert!(restored.updated_at() >= created.updated_at());

        Ok(())
    }
}
