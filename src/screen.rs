//! Register Screens
//!
//! A [`Screen`] drives one register the way a user does: it holds the active filters and the
//! open form, routes submissions to create or update, and reports each outcome through a
//! [`Notifier`].

use std::path::{Path, PathBuf};

use jiff::civil::{Date, DateTime};
use tracing::{info, warn};

use crate::{
    export::{self, ExportError, Exportable, PDF_EXPORTED, XLSX_EXPORTED},
    filter::filter,
    ids::RecordId,
    records::{Entity, Record, Toggle},
    store::{Confirm, DeleteOutcome, Store},
    validation::ValidationErrors,
};

/// Receives user-facing outcome messages.
pub trait Notifier {
    /// An action succeeded.
    fn success(&mut self, message: &str);

    /// An action failed.
    fn error(&mut self, message: &str);
}

/// Sends notifications to the log.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn success(&mut self, message: &str) {
        info!(notice = message, "notification");
    }

    fn error(&mut self, message: &str) {
        warn!(notice = message, "notification");
    }
}

/// A notification kept by [`RecordingNotifier`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    /// Success message.
    Success(String),

    /// Error message.
    Error(String),
}

/// Keeps every notification in order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordingNotifier {
    /// Notifications received so far.
    pub notices: Vec<Notice>,
}

impl RecordingNotifier {
    /// Most recent notification.
    pub fn last(&self) -> Option<&Notice> {
        self.notices.last()
    }
}

impl Notifier for RecordingNotifier {
    fn success(&mut self, message: &str) {
        self.notices.push(Notice::Success(message.to_string()));
    }

    fn error(&mut self, message: &str) {
        self.notices.push(Notice::Error(message.to_string()));
    }
}

/// What the form is currently editing.
#[derive(Debug, Clone, PartialEq)]
pub enum Editing<E> {
    /// No form open.
    Closed,

    /// Form open for a new record.
    New,

    /// Form open for an existing record.
    Existing(RecordId<E>),
}

/// Controller for one register.
#[derive(Debug)]
pub struct Screen<E: Entity, N> {
    store: Store<E>,
    criteria: E::Criteria,
    editing: Editing<E>,
    form: E::Form,
    notifier: N,
}

impl<E: Entity, N: Notifier> Screen<E, N> {
    /// Wrap `store`, with no filters and no form open.
    pub fn new(store: Store<E>, notifier: N) -> Self {
        Self {
            store,
            criteria: E::Criteria::default(),
            editing: Editing::Closed,
            form: E::Form::default(),
            notifier,
        }
    }

    /// The underlying register.
    pub fn store(&self) -> &Store<E> {
        &self.store
    }

    /// Active filters.
    pub fn criteria(&self) -> &E::Criteria {
        &self.criteria
    }

    /// Replace the active filters.
    pub fn set_criteria(&mut self, criteria: E::Criteria) {
        self.criteria = criteria;
    }

    /// Records passing the active filters, in store order.
    pub fn visible(&self) -> Vec<&Record<E>> {
        filter(&self.store, &self.criteria)
    }

    /// Notification sink.
    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    /// Current editing state.
    pub fn editing(&self) -> &Editing<E> {
        &self.editing
    }

    /// Form contents.
    pub fn form(&self) -> &E::Form {
        &self.form
    }

    /// Mutable form contents.
    pub fn form_mut(&mut self) -> &mut E::Form {
        &mut self.form
    }

    /// Open an empty form for a new record.
    pub fn open_new(&mut self) {
        self.form = E::Form::default();
        self.editing = Editing::New;
    }

    /// Open the form pre-filled from record `id`. Returns `false` when no record has `id`.
    pub fn open_edit(&mut self, id: RecordId<E>) -> bool {
        let Some(record) = self.store.get(id) else {
            return false;
        };

        self.form = record.data().to_form();
        self.editing = Editing::Existing(id);

        true
    }

    /// Close the form, discarding its contents.
    pub fn close(&mut self) {
        self.form = E::Form::default();
        self.editing = Editing::Closed;
    }

    /// Save the open form as a new or updated record.
    ///
    /// The form stays open when validation fails. Returns `Ok(None)` when no form is open or the
    /// edited record has gone.
    ///
    /// # Errors
    ///
    /// Returns the failing fields.
    pub fn submit(&mut self) -> Result<Option<Record<E>>, ValidationErrors> {
        let saved = match self.editing {
            Editing::Closed => return Ok(None),
            Editing::New => {
                let record = self.store.create(&self.form)?;
                self.notifier.success(E::MESSAGES.created);

                Some(record)
            }
            Editing::Existing(id) => {
                let record = self.store.update(id, &self.form)?;

                if record.is_some() {
                    self.notifier.success(E::MESSAGES.updated);
                }

                record
            }
        };

        self.close();

        Ok(saved)
    }

    /// Delete record `id` after confirmation.
    pub fn delete(&mut self, id: RecordId<E>, confirm: &mut impl Confirm) -> DeleteOutcome {
        let outcome = self.store.delete(id, confirm);

        if outcome == DeleteOutcome::Deleted {
            if matches!(self.editing, Editing::Existing(editing) if editing == id) {
                self.close();
            }

            self.notifier.success(E::MESSAGES.deleted);
        }

        outcome
    }
}

impl<E: Toggle, N: Notifier> Screen<E, N> {
    /// Flip the status of record `id`.
    pub fn toggle_status(&mut self, id: RecordId<E>) -> Option<Record<E>> {
        let record = self.store.toggle_status(id)?;

        self.notifier.success(E::TOGGLED_MESSAGE);

        Some(record)
    }
}

impl<E: Exportable, N: Notifier> Screen<E, N> {
    /// Export the visible records as a spreadsheet into `dir`.
    ///
    /// # Errors
    ///
    /// Returns an [`ExportError`] if rendering or writing fails.
    pub fn export_workbook(&mut self, dir: &Path, today: Date) -> Result<PathBuf, ExportError> {
        let result = export::export_workbook(&self.visible(), dir, today);

        self.report_export(result, XLSX_EXPORTED)
    }

    /// Export the visible records as a PDF into `dir`.
    ///
    /// # Errors
    ///
    /// Returns an [`ExportError`] if rendering or writing fails.
    pub fn export_pdf(
        &mut self,
        dir: &Path,
        generated_at: DateTime,
    ) -> Result<PathBuf, ExportError> {
        let result = export::export_pdf(&self.visible(), dir, generated_at);

        self.report_export(result, PDF_EXPORTED)
    }

    fn report_export(
        &mut self,
        result: Result<PathBuf, ExportError>,
        success: &str,
    ) -> Result<PathBuf, ExportError> {
        match &result {
            Ok(_) => self.notifier.success(success),
            Err(err) => self.notifier.error(&err.to_string()),
        }

        result
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;
    use crate::entities::bidders::{Bidder, BidderForm, BidderStatus};

    fn form(name: &str) -> BidderForm {
        BidderForm {
            legal_name: name.to_string(),
            cnpj: "12.345.678/0001-90".to_string(),
            address: "Rua das Flores, 123".to_string(),
            city: "São Paulo".to_string(),
            state: "SP".to_string(),
            cep: "01234-567".to_string(),
            phone: "(11) 98765-4321".to_string(),
            email: "contato@empresaabc.com.br".to_string(),
            legal_representative: "João Silva".to_string(),
            representative_cpf: "123.456.789-00".to_string(),
            notes: String::new(),
        }
    }

    fn screen() -> Screen<Bidder, RecordingNotifier> {
        Screen::new(Store::new(), RecordingNotifier::default())
    }

    #[test]
    fn submit_new_creates_and_notifies() -> TestResult {
        let mut screen = screen();

        screen.open_new();
        *screen.form_mut() = form("Empresa ABC Ltda");

        let record = screen.submit()?;

        assert!(record.is_some());
        assert_eq!(screen.store().len(), 1);
        assert_eq!(screen.editing(), &Editing::Closed);
        assert_eq!(
            screen.notifier().last(),
            Some(&Notice::Success("Licitante cadastrado com sucesso!".to_string()))
        );

        Ok(())
    }

    #[test]
    fn invalid_submit_keeps_form_open() {
        let mut screen = screen();

        screen.open_new();
        screen.form_mut().legal_name = "Sem CNPJ".to_string();

        let errors = screen.submit().err().unwrap_or_default();

        assert!(errors.get("cnpj").is_some());
        assert_eq!(screen.editing(), &Editing::New);
        assert!(screen.store().is_empty());
        assert!(screen.notifier().notices.is_empty());
    }

    #[test]
    fn edit_prefills_and_updates() -> TestResult {
        let mut screen = screen();

        screen.open_new();
        *screen.form_mut() = form("Empresa ABC Ltda");
        let created = screen.submit()?.ok_or("not created")?;

        assert!(screen.open_edit(created.id()));
        assert_eq!(screen.form().legal_name, "Empresa ABC Ltda");

        screen.form_mut().legal_name = "Empresa ABC S.A.".to_string();
        let updated = screen.submit()?.ok_or("not updated")?;

        assert_eq!(updated.id(), created.id());
        assert_eq!(updated.data().legal_name, "Empresa ABC S.A.");
        assert_eq!(
            screen.notifier().last(),
            Some(&Notice::Success("Licitante atualizado com sucesso!".to_string()))
        );

        Ok(())
    }

    #[test]
    fn toggle_notifies() -> TestResult {
        let mut screen = screen();

        screen.open_new();
        *screen.form_mut() = form("Empresa ABC Ltda");
        let created = screen.submit()?.ok_or("not created")?;

        let toggled = screen.toggle_status(created.id()).ok_or("not toggled")?;

        assert_eq!(toggled.data().status, BidderStatus::Inactive);
        assert_eq!(
            screen.notifier().last(),
            Some(&Notice::Success("Status do licitante atualizado!".to_string()))
        );

        Ok(())
    }

    #[test]
    fn declined_delete_is_silent() -> TestResult {
        let mut screen = screen();

        screen.open_new();
        *screen.form_mut() = form("Empresa ABC Ltda");
        let created = screen.submit()?.ok_or("not created")?;
        let notices = screen.notifier().notices.len();

        let outcome = screen.delete(created.id(), &mut |_: &str| false);

        assert_eq!(outcome, DeleteOutcome::Declined);
        assert_eq!(screen.store().len(), 1);
        assert_eq!(screen.notifier().notices.len(), notices);

        let outcome = screen.delete(created.id(), &mut |_: &str| true);

        assert_eq!(outcome, DeleteOutcome::Deleted);
        assert!(screen.store().is_empty());
        assert_eq!(
            screen.notifier().last(),
            Some(&Notice::Success("Licitante excluído com sucesso!".to_string()))
        );

        Ok(())
    }
}
