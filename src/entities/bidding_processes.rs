//! Bidding Processes
//!
//! Competitive procurement procedures, from publication to award or cancellation.

use decimal_percentage::Percentage;
use jiff::civil::Date;
use rust_decimal::Decimal;
use smallvec::{SmallVec, smallvec};

use crate::{
    entities::{notes, parse_date, parse_label},
    export::{Exportable, PDF_TEXT_BUDGET, format::or_missing, format_date, truncate},
    filter::{Criteria, Searchable, TextQuery, distinct, matches_choice},
    labels::labelled_enum,
    money::{Amount, brl, format_amount, format_brl},
    records::{Entity, Messages, Record},
    store::Store,
    validation::{FieldRule, FieldValue, FormSchema, Rule, ValidationErrors},
};

labelled_enum! {
    /// Legal procurement modality.
    pub enum Modality {
        /// Online reverse auction.
        ElectronicAuction => "Pregão Eletrônico",
        /// In-person reverse auction.
        InPersonAuction => "Pregão Presencial",
        /// Open competition.
        Competition => "Concorrência",
        /// Price survey among registered suppliers.
        PriceSurvey => "Tomada de Preços",
        /// Invitation.
        Invitation => "Convite",
        /// Public sale.
        Auction => "Leilão",
        /// Contest.
        Contest => "Concurso",
    }
}

labelled_enum! {
    /// Award criterion.
    pub enum AwardCriterion {
        /// Lowest price.
        LowestPrice => "Menor Preço",
        /// Best technique.
        BestTechnique => "Melhor Técnica",
        /// Technique and price.
        TechniqueAndPrice => "Técnica e Preço",
        /// Highest bid.
        HighestBid => "Maior Lance ou Oferta",
    }
}

labelled_enum! {
    /// Stage of a bidding process.
    pub enum ProcessStatus {
        /// Open.
        InProgress => "Em Andamento",
        /// Awarded.
        Completed => "Concluído",
        /// Cancelled.
        Canceled => "Cancelado",
        /// On hold.
        Suspended => "Suspenso",
    }
}

/// A bidding process.
#[derive(Debug, Clone, PartialEq)]
pub struct BiddingProcess {
    /// Human identification, e.g. `PE-2025-001`. Not required to be unique.
    pub identification: String,

    /// Modality.
    pub modality: Modality,

    /// Award criterion.
    pub criterion: AwardCriterion,

    /// Object of the procurement.
    pub object: String,

    /// Publication date.
    pub publication_date: Date,

    /// Opening date.
    pub opening_date: Date,

    /// Estimated value.
    pub estimated_value: Amount,

    /// Awarded value, once known.
    pub final_value: Option<Amount>,

    /// Stage.
    pub status: ProcessStatus,

    /// Requesting sector.
    pub sector: String,

    /// Responsible directorate.
    pub directorate: String,

    /// Free notes.
    pub notes: Option<String>,
}

impl BiddingProcess {
    /// Estimated minus final value, for completed processes with a final value.
    pub fn savings(&self) -> Option<Decimal> {
        match (self.status, self.final_value) {
            (ProcessStatus::Completed, Some(final_value)) => {
                Some(*self.estimated_value.amount() - *final_value.amount())
            }
            _ => None,
        }
    }

    /// Estimated minus final value whenever a final value exists, regardless of status.
    pub fn price_difference(&self) -> Option<Decimal> {
        self.final_value
            .map(|final_value| *self.estimated_value.amount() - *final_value.amount())
    }
}

/// Create/edit form for a [`BiddingProcess`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BiddingProcessForm {
    /// Identification.
    pub identification: String,

    /// Modality label.
    pub modality: String,

    /// Award criterion label.
    pub criterion: String,

    /// Object.
    pub object: String,

    /// Publication date, `yyyy-mm-dd`.
    pub publication_date: String,

    /// Opening date, `yyyy-mm-dd`.
    pub opening_date: String,

    /// Estimated value.
    pub estimated_value: Option<Decimal>,

    /// Final value.
    pub final_value: Option<Decimal>,

    /// Status label.
    pub status: String,

    /// Sector.
    pub sector: String,

    /// Directorate.
    pub directorate: String,

    /// Free notes.
    pub notes: String,
}

const PROCESS_RULES: &[FieldRule] = &[
    FieldRule::new(
        "identification",
        Rule::Required { min_len: 1 },
        "Identificação é obrigatória",
    ),
    FieldRule::new(
        "modality",
        Rule::Choice {
            options: Modality::LABELS,
        },
        "Modalidade é obrigatória",
    ),
    FieldRule::new(
        "criterion",
        Rule::Choice {
            options: AwardCriterion::LABELS,
        },
        "Tipo é obrigatório",
    ),
    FieldRule::new("object", Rule::Required { min_len: 1 }, "Objeto é obrigatório"),
    FieldRule::new(
        "publication_date",
        Rule::Date,
        "Data de publicação é obrigatória",
    ),
    FieldRule::new("opening_date", Rule::Date, "Data de abertura é obrigatória"),
    FieldRule::new(
        "estimated_value",
        Rule::Amount {
            min: Some(Decimal::ZERO),
            required: true,
        },
        "Valor estimado deve ser maior ou igual a zero",
    ),
    FieldRule::new("final_value", Rule::Optional, ""),
    FieldRule::new(
        "status",
        Rule::Choice {
            options: ProcessStatus::LABELS,
        },
        "Status é obrigatório",
    ),
    FieldRule::new("sector", Rule::Required { min_len: 1 }, "Setor é obrigatório"),
    FieldRule::new(
        "directorate",
        Rule::Required { min_len: 1 },
        "Diretoria é obrigatória",
    ),
    FieldRule::new("notes", Rule::Optional, ""),
];

impl FormSchema for BiddingProcessForm {
    fn rules() -> &'static [FieldRule] {
        PROCESS_RULES
    }

    fn value(&self, field: &str) -> Option<FieldValue<'_>> {
        Some(match field {
            "identification" => FieldValue::Text(&self.identification),
            "modality" => FieldValue::Text(&self.modality),
            "criterion" => FieldValue::Text(&self.criterion),
            "object" => FieldValue::Text(&self.object),
            "publication_date" => FieldValue::Text(&self.publication_date),
            "opening_date" => FieldValue::Text(&self.opening_date),
            "estimated_value" => FieldValue::Amount(self.estimated_value),
            "final_value" => FieldValue::Amount(self.final_value),
            "status" => FieldValue::Text(&self.status),
            "sector" => FieldValue::Text(&self.sector),
            "directorate" => FieldValue::Text(&self.directorate),
            "notes" => FieldValue::Text(&self.notes),
            _ => return None,
        })
    }
}

/// Bidding process list filters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BiddingProcessCriteria {
    /// Matches identification or object.
    pub text: TextQuery,

    /// Exact modality; `None` for all.
    pub modality: Option<Modality>,

    /// Exact status; `None` for all.
    pub status: Option<ProcessStatus>,

    /// Publication year; `None` for all.
    pub year: Option<i16>,
}

impl BiddingProcessCriteria {
    /// Choices offered by the modality, status and year filters, taken from `store`.
    pub fn options(store: &Store<BiddingProcess>) -> BiddingProcessOptions {
        BiddingProcessOptions {
            modalities: distinct(store, |process| process.modality),
            statuses: distinct(store, |process| process.status),
            years: distinct(store, |process| process.publication_date.year()),
        }
    }
}

/// Filter choices present in a bidding process register, in first-seen order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BiddingProcessOptions {
    /// Modalities in use.
    pub modalities: Vec<Modality>,

    /// Statuses in use.
    pub statuses: Vec<ProcessStatus>,

    /// Publication years.
    pub years: Vec<i16>,
}

impl Searchable for BiddingProcess {
    fn search_fields(&self) -> SmallVec<[&str; 4]> {
        smallvec![self.identification.as_str(), self.object.as_str()]
    }
}

impl Criteria<BiddingProcess> for BiddingProcessCriteria {
    fn matches(&self, process: &BiddingProcess) -> bool {
        self.text.matches(process)
            && matches_choice(self.modality.as_ref(), &process.modality)
            && matches_choice(self.status.as_ref(), &process.status)
            && matches_choice(self.year.as_ref(), &process.publication_date.year())
    }
}

impl Entity for BiddingProcess {
    type Form = BiddingProcessForm;
    type Criteria = BiddingProcessCriteria;

    const KIND: &'static str = "bidding_process";

    const MESSAGES: Messages = Messages {
        created: "Processo de licitação cadastrado com sucesso!",
        updated: "Processo de licitação atualizado com sucesso!",
        deleted: "Processo de licitação excluído com sucesso!",
        delete_prompt: "Tem certeza que deseja excluir este processo de licitação?",
    };

    fn from_form(form: &BiddingProcessForm, _today: Date) -> Result<Self, ValidationErrors> {
        let estimated_value = form.estimated_value.ok_or_else(|| {
            ValidationErrors::single(
                "estimated_value",
                "Valor estimado deve ser maior ou igual a zero",
            )
        })?;

        Ok(Self {
            identification: form.identification.clone(),
            modality: parse_label("modality", &form.modality, "Modalidade é obrigatória")?,
            criterion: parse_label("criterion", &form.criterion, "Tipo é obrigatório")?,
            object: form.object.clone(),
            publication_date: parse_date(
                "publication_date",
                &form.publication_date,
                "Data de publicação é obrigatória",
            )?,
            opening_date: parse_date(
                "opening_date",
                &form.opening_date,
                "Data de abertura é obrigatória",
            )?,
            estimated_value: brl(estimated_value),
            final_value: form.final_value.map(brl),
            status: parse_label("status", &form.status, "Status é obrigatório")?,
            sector: form.sector.clone(),
            directorate: form.directorate.clone(),
            notes: notes(&form.notes),
        })
    }

    fn to_form(&self) -> BiddingProcessForm {
        BiddingProcessForm {
            identification: self.identification.clone(),
            modality: self.modality.to_string(),
            criterion: self.criterion.to_string(),
            object: self.object.clone(),
            publication_date: self.publication_date.to_string(),
            opening_date: self.opening_date.to_string(),
            estimated_value: Some(*self.estimated_value.amount()),
            final_value: self.final_value.map(|amount| *amount.amount()),
            status: self.status.to_string(),
            sector: self.sector.clone(),
            directorate: self.directorate.clone(),
            notes: self.notes.clone().unwrap_or_default(),
        }
    }
}

impl Exportable for BiddingProcess {
    const FILE_STEM: &'static str = "licitacoes";
    const SHEET_NAME: &'static str = "Licitações";
    const TITLE: &'static str = "Relatório de Processos de Licitação";

    const SHEET_COLUMNS: &'static [&'static str] = &[
        "Identificação",
        "Modalidade",
        "Tipo",
        "Objeto",
        "Data de Publicação",
        "Data de Abertura",
        "Valor Estimado (R$)",
        "Valor Final (R$)",
        "Status",
        "Setor",
        "Diretoria",
        "Observações",
    ];

    const PDF_COLUMNS: &'static [&'static str] =
        &["ID", "Modalidade", "Objeto", "Valor Estimado", "Status"];

    fn sheet_row(record: &Record<Self>) -> Vec<String> {
        let process = record.data();

        vec![
            process.identification.clone(),
            process.modality.to_string(),
            process.criterion.to_string(),
            process.object.clone(),
            format_date(process.publication_date),
            format_date(process.opening_date),
            format_amount(&process.estimated_value),
            process
                .final_value
                .as_ref()
                .map_or_else(|| or_missing(None), format_amount),
            process.status.to_string(),
            process.sector.clone(),
            process.directorate.clone(),
            or_missing(process.notes.as_deref()),
        ]
    }

    fn pdf_row(record: &Record<Self>) -> Vec<String> {
        let process = record.data();

        vec![
            process.identification.clone(),
            process.modality.to_string(),
            truncate(&process.object, PDF_TEXT_BUDGET),
            format_brl(&process.estimated_value),
            process.status.to_string(),
        ]
    }
}

/// Headline figures for the bidding register.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BiddingStatistics {
    /// All processes.
    pub total: usize,

    /// Processes `Concluído`.
    pub completed: usize,

    /// Processes `Em Andamento`.
    pub in_progress: usize,

    /// Processes `Cancelado`.
    pub canceled: usize,

    /// Processes `Suspenso`.
    pub suspended: usize,

    /// Sum of estimated values.
    pub total_estimated: Amount,

    /// Sum of savings over completed processes with a final value.
    pub total_savings: Amount,

    /// Savings relative to the total estimated value; zero when nothing is estimated.
    pub savings_percent: Percentage,
}

impl BiddingStatistics {
    /// Compute the figures over the given processes.
    pub fn of<'a>(processes: impl IntoIterator<Item = &'a BiddingProcess>) -> Self {
        let mut stats = Self {
            total: 0,
            completed: 0,
            in_progress: 0,
            canceled: 0,
            suspended: 0,
            total_estimated: brl(Decimal::ZERO),
            total_savings: brl(Decimal::ZERO),
            savings_percent: Percentage::from(Decimal::ZERO),
        };

        let mut estimated = Decimal::ZERO;
        let mut savings = Decimal::ZERO;

        for process in processes {
            stats.total += 1;

            match process.status {
                ProcessStatus::Completed => stats.completed += 1,
                ProcessStatus::InProgress => stats.in_progress += 1,
                ProcessStatus::Canceled => stats.canceled += 1,
                ProcessStatus::Suspended => stats.suspended += 1,
            }

            estimated += *process.estimated_value.amount();
            savings += process.savings().unwrap_or_default();
        }

        stats.total_estimated = brl(estimated);
        stats.total_savings = brl(savings);
        stats.savings_percent = savings_ratio(savings, estimated);
        stats
    }

    /// Compute the figures over a whole register.
    pub fn of_store(store: &Store<BiddingProcess>) -> Self {
        Self::of(store.iter().map(Record::data))
    }
}

/// `part / whole` as a percentage, or zero when `whole` is zero.
pub fn savings_ratio(part: Decimal, whole: Decimal) -> Percentage {
    if whole.is_zero() {
        return Percentage::from(Decimal::ZERO);
    }

    Percentage::from(part / whole)
}

/// Percent points of a fractional percentage, rounded to two places.
pub fn percent_points(percentage: Percentage) -> Decimal {
    ((percentage * Decimal::ONE) * Decimal::ONE_HUNDRED).round_dp(2)
}
