//! Penalties
//!
//! Administrative sanctions applied to suppliers. A penalty's status is never entered by hand:
//! it is active while its end date lies in the future.

use jiff::civil::Date;
use smallvec::{SmallVec, smallvec};

use crate::{
    entities::{notes, parse_date, parse_label},
    export::{
        Exportable,
        format::{format_period, or_missing},
        format_date,
    },
    filter::{Criteria, Searchable, TextQuery, matches_choice},
    labels::labelled_enum,
    records::{Entity, Messages, Record},
    store::Store,
    validation::{FieldRule, FieldValue, FormSchema, Rule, ValidationErrors},
};

labelled_enum! {
    /// Kind of administrative sanction.
    pub enum SanctionType {
        /// Written warning.
        Warning => "Advertência",
        /// Fine.
        Fine => "Multa",
        /// Temporary suspension from bidding.
        TemporarySuspension => "Suspensão temporária",
        /// Declared unfit to contract with the public administration.
        Debarment => "Declaração de inidoneidade",
    }
}

labelled_enum! {
    /// Whether a penalty is still running.
    pub enum PenaltyStatus {
        /// End date not reached.
        Active => "Ativa",
        /// End date reached.
        Closed => "Encerrada",
    }
}

impl PenaltyStatus {
    /// Status of a penalty ending on `end_date`, as seen on `today`.
    pub fn on(end_date: Date, today: Date) -> Self {
        if end_date > today {
            Self::Active
        } else {
            Self::Closed
        }
    }
}

/// A sanction applied to a supplier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Penalty {
    /// Supplier name.
    pub supplier: String,

    /// Supplier CNPJ.
    pub cnpj: String,

    /// Identification of the related process.
    pub process: String,

    /// Sanction.
    pub sanction: SanctionType,

    /// First day of the sanction.
    pub start_date: Date,

    /// Last day of the sanction.
    pub end_date: Date,

    /// Reason.
    pub reason: String,

    /// Statutory basis.
    pub legal_basis: String,

    /// Free notes.
    pub notes: Option<String>,

    /// Derived from `end_date` when saved.
    pub status: PenaltyStatus,
}

impl Penalty {
    /// Days left until `end_date`, counted from `today`; zero once it has passed.
    pub fn remaining_days(&self, today: Date) -> i32 {
        today
            .until(self.end_date)
            .map_or(0, |span| span.get_days().max(0))
    }

    /// Recompute the status as of `today`.
    pub fn refresh_status(&mut self, today: Date) {
        self.status = PenaltyStatus::on(self.end_date, today);
    }
}

/// Create/edit form for a [`Penalty`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PenaltyForm {
    /// Supplier name.
    pub supplier: String,

    /// Supplier CNPJ.
    pub cnpj: String,

    /// Related process.
    pub process: String,

    /// Sanction label.
    pub sanction: String,

    /// Start date, `yyyy-mm-dd`.
    pub start_date: String,

    /// End date, `yyyy-mm-dd`.
    pub end_date: String,

    /// Reason.
    pub reason: String,

    /// Statutory basis.
    pub legal_basis: String,

    /// Free notes.
    pub notes: String,
}

const PENALTY_RULES: &[FieldRule] = &[
    FieldRule::new(
        "supplier",
        Rule::Required { min_len: 1 },
        "Fornecedor é obrigatório",
    ),
    FieldRule::new(
        "cnpj",
        Rule::Required { min_len: 14 },
        "CNPJ deve ter pelo menos 14 caracteres",
    ),
    FieldRule::new("process", Rule::Required { min_len: 1 }, "Processo é obrigatório"),
    FieldRule::new(
        "sanction",
        Rule::Choice {
            options: SanctionType::LABELS,
        },
        "Tipo de sanção é obrigatório",
    ),
    FieldRule::new("start_date", Rule::Date, "Data de início é obrigatória"),
    FieldRule::new("end_date", Rule::Date, "Data de fim é obrigatória"),
    FieldRule::new("reason", Rule::Required { min_len: 1 }, "Motivo é obrigatório"),
    FieldRule::new(
        "legal_basis",
        Rule::Required { min_len: 1 },
        "Fundamentação legal é obrigatória",
    ),
    FieldRule::new("notes", Rule::Optional, ""),
];

impl FormSchema for PenaltyForm {
    fn rules() -> &'static [FieldRule] {
        PENALTY_RULES
    }

    fn value(&self, field: &str) -> Option<FieldValue<'_>> {
        let text = match field {
            "supplier" => &self.supplier,
            "cnpj" => &self.cnpj,
            "process" => &self.process,
            "sanction" => &self.sanction,
            "start_date" => &self.start_date,
            "end_date" => &self.end_date,
            "reason" => &self.reason,
            "legal_basis" => &self.legal_basis,
            "notes" => &self.notes,
            _ => return None,
        };

        Some(FieldValue::Text(text))
    }
}

/// Penalty list filters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PenaltyCriteria {
    /// Matches supplier, CNPJ or process.
    pub text: TextQuery,

    /// Exact sanction; `None` for all.
    pub sanction: Option<SanctionType>,

    /// Exact status; `None` for all.
    pub status: Option<PenaltyStatus>,
}

impl Searchable for Penalty {
    fn search_fields(&self) -> SmallVec<[&str; 4]> {
        smallvec![
            self.supplier.as_str(),
            self.cnpj.as_str(),
            self.process.as_str()
        ]
    }
}

impl Criteria<Penalty> for PenaltyCriteria {
    fn matches(&self, penalty: &Penalty) -> bool {
        self.text.matches(penalty)
            && matches_choice(self.sanction.as_ref(), &penalty.sanction)
            && matches_choice(self.status.as_ref(), &penalty.status)
    }
}

impl Entity for Penalty {
    type Form = PenaltyForm;
    type Criteria = PenaltyCriteria;

    const KIND: &'static str = "penalty";

    const MESSAGES: Messages = Messages {
        created: "Penalidade cadastrada com sucesso!",
        updated: "Penalidade atualizada com sucesso!",
        deleted: "Penalidade excluída com sucesso!",
        delete_prompt: "Tem certeza que deseja excluir esta penalidade?",
    };

    fn from_form(form: &PenaltyForm, today: Date) -> Result<Self, ValidationErrors> {
        let end_date = parse_date("end_date", &form.end_date, "Data de fim é obrigatória")?;

        Ok(Self {
            supplier: form.supplier.clone(),
            cnpj: form.cnpj.clone(),
            process: form.process.clone(),
            sanction: parse_label("sanction", &form.sanction, "Tipo de sanção é obrigatório")?,
            start_date: parse_date("start_date", &form.start_date, "Data de início é obrigatória")?,
            end_date,
            reason: form.reason.clone(),
            legal_basis: form.legal_basis.clone(),
            notes: notes(&form.notes),
            status: PenaltyStatus::on(end_date, today),
        })
    }

    fn to_form(&self) -> PenaltyForm {
        PenaltyForm {
            supplier: self.supplier.clone(),
            cnpj: self.cnpj.clone(),
            process: self.process.clone(),
            sanction: self.sanction.to_string(),
            start_date: self.start_date.to_string(),
            end_date: self.end_date.to_string(),
            reason: self.reason.clone(),
            legal_basis: self.legal_basis.clone(),
            notes: self.notes.clone().unwrap_or_default(),
        }
    }
}

impl Exportable for Penalty {
    const FILE_STEM: &'static str = "penalidades";
    const SHEET_NAME: &'static str = "Penalidades";
    const TITLE: &'static str = "Relatório de Penalidades";

    const SHEET_COLUMNS: &'static [&'static str] = &[
        "Fornecedor",
        "CNPJ",
        "Processo",
        "Tipo de Sanção",
        "Data de Início",
        "Data de Fim",
        "Motivo",
        "Fundamentação Legal",
        "Status",
        "Observações",
    ];

    const PDF_COLUMNS: &'static [&'static str] =
        &["Fornecedor", "Tipo de Sanção", "Período", "Status"];

    fn sheet_row(record: &Record<Self>) -> Vec<String> {
        let penalty = record.data();

        vec![
            penalty.supplier.clone(),
            penalty.cnpj.clone(),
            penalty.process.clone(),
            penalty.sanction.to_string(),
            format_date(penalty.start_date),
            format_date(penalty.end_date),
            penalty.reason.clone(),
            penalty.legal_basis.clone(),
            penalty.status.to_string(),
            or_missing(penalty.notes.as_deref()),
        ]
    }

    fn pdf_row(record: &Record<Self>) -> Vec<String> {
        let penalty = record.data();

        vec![
            penalty.supplier.clone(),
            penalty.sanction.to_string(),
            format_period(penalty.start_date, penalty.end_date),
            penalty.status.to_string(),
        ]
    }
}

/// Headline counts for the penalty register.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PenaltyStatistics {
    /// All penalties.
    pub total: usize,

    /// Penalties `Ativa`.
    pub active: usize,

    /// Penalties `Encerrada`.
    pub closed: usize,
}

impl PenaltyStatistics {
    /// Tally the given penalties by stored status.
    pub fn of<'a>(penalties: impl IntoIterator<Item = &'a Penalty>) -> Self {
        penalties
            .into_iter()
            .fold(Self::default(), |mut stats, penalty| {
                stats.total += 1;

                match penalty.status {
                    PenaltyStatus::Active => stats.active += 1,
                    PenaltyStatus::Closed => stats.closed += 1,
                }

                stats
            })
    }

    /// Tally a whole register.
    pub fn of_store(store: &Store<Penalty>) -> Self {
        Self::of(store.iter().map(Record::data))
    }
}
