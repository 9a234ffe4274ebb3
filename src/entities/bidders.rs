//! Bidders
//!
//! Companies registered to take part in procurement processes.

use jiff::civil::Date;
use smallvec::{SmallVec, smallvec};

use crate::{
    export::{Exportable, format::or_missing, format_timestamp_date},
    filter::{Criteria, Searchable, TextQuery, matches_choice},
    labels::labelled_enum,
    records::{Entity, Messages, Record, Toggle},
    store::Store,
    validation::{FieldRule, FieldValue, FormSchema, Rule, ValidationErrors},
};

labelled_enum! {
    /// Registration status of a bidder.
    pub enum BidderStatus {
        /// May take part in new processes.
        Active => "Ativo",

        /// Kept on file but barred from new processes.
        Inactive => "Inativo",
    }
}

impl BidderStatus {
    /// The other status.
    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::Active => Self::Inactive,
            Self::Inactive => Self::Active,
        }
    }
}

/// A registered company.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bidder {
    /// Razão social.
    pub legal_name: String,

    /// CNPJ, kept as entered.
    pub cnpj: String,

    /// Street address.
    pub address: String,

    /// City.
    pub city: String,

    /// State abbreviation.
    pub state: String,

    /// Postal code.
    pub cep: String,

    /// Phone number.
    pub phone: String,

    /// Contact email.
    pub email: String,

    /// Legal representative.
    pub legal_representative: String,

    /// CPF of the legal representative.
    pub representative_cpf: String,

    /// Free notes.
    pub notes: Option<String>,

    /// Registration status.
    pub status: BidderStatus,
}

/// Create/edit form for a [`Bidder`]. Status is not editable here.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BidderForm {
    /// Razão social.
    pub legal_name: String,

    /// CNPJ.
    pub cnpj: String,

    /// Street address.
    pub address: String,

    /// City.
    pub city: String,

    /// State abbreviation.
    pub state: String,

    /// Postal code.
    pub cep: String,

    /// Phone number.
    pub phone: String,

    /// Contact email.
    pub email: String,

    /// Legal representative.
    pub legal_representative: String,

    /// CPF of the legal representative.
    pub representative_cpf: String,

    /// Free notes.
    pub notes: String,
}

const BIDDER_RULES: &[FieldRule] = &[
    FieldRule::new(
        "legal_name",
        Rule::Required { min_len: 1 },
        "Razão Social é obrigatória",
    ),
    FieldRule::new(
        "cnpj",
        Rule::Required { min_len: 14 },
        "CNPJ deve ter pelo menos 14 caracteres",
    ),
    FieldRule::new("address", Rule::Required { min_len: 1 }, "Endereço é obrigatório"),
    FieldRule::new("city", Rule::Required { min_len: 1 }, "Cidade é obrigatória"),
    FieldRule::new("state", Rule::Required { min_len: 2 }, "Estado é obrigatório"),
    FieldRule::new(
        "cep",
        Rule::Required { min_len: 8 },
        "CEP deve ter pelo menos 8 caracteres",
    ),
    FieldRule::new(
        "phone",
        Rule::Required { min_len: 10 },
        "Telefone deve ter pelo menos 10 caracteres",
    ),
    FieldRule::new("email", Rule::Email, "Email inválido"),
    FieldRule::new(
        "legal_representative",
        Rule::Required { min_len: 1 },
        "Representante Legal é obrigatório",
    ),
    FieldRule::new(
        "representative_cpf",
        Rule::Required { min_len: 11 },
        "CPF deve ter pelo menos 11 caracteres",
    ),
    FieldRule::new("notes", Rule::Optional, ""),
];

impl FormSchema for BidderForm {
    fn rules() -> &'static [FieldRule] {
        BIDDER_RULES
    }

    fn value(&self, field: &str) -> Option<FieldValue<'_>> {
        let text = match field {
            "legal_name" => &self.legal_name,
            "cnpj" => &self.cnpj,
            "address" => &self.address,
            "city" => &self.city,
            "state" => &self.state,
            "cep" => &self.cep,
            "phone" => &self.phone,
            "email" => &self.email,
            "legal_representative" => &self.legal_representative,
            "representative_cpf" => &self.representative_cpf,
            "notes" => &self.notes,
            _ => return None,
        };

        Some(FieldValue::Text(text))
    }
}

/// Bidder list filters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BidderCriteria {
    /// Matches legal name, CNPJ or email.
    pub text: TextQuery,

    /// Exact status; `None` for all.
    pub status: Option<BidderStatus>,
}

impl Searchable for Bidder {
    fn search_fields(&self) -> SmallVec<[&str; 4]> {
        smallvec![
            self.legal_name.as_str(),
            self.cnpj.as_str(),
            self.email.as_str()
        ]
    }
}

impl Criteria<Bidder> for BidderCriteria {
    fn matches(&self, bidder: &Bidder) -> bool {
        self.text.matches(bidder) && matches_choice(self.status.as_ref(), &bidder.status)
    }
}

impl Entity for Bidder {
    type Form = BidderForm;
    type Criteria = BidderCriteria;

    const KIND: &'static str = "bidder";

    const MESSAGES: Messages = Messages {
        created: "Licitante cadastrado com sucesso!",
        updated: "Licitante atualizado com sucesso!",
        deleted: "Licitante excluído com sucesso!",
        delete_prompt: "Tem certeza que deseja excluir este licitante?",
    };

    fn from_form(form: &BidderForm, _today: Date) -> Result<Self, ValidationErrors> {
        Ok(Self {
            legal_name: form.legal_name.clone(),
            cnpj: form.cnpj.clone(),
            address: form.address.clone(),
            city: form.city.clone(),
            state: form.state.clone(),
            cep: form.cep.clone(),
            phone: form.phone.clone(),
            email: form.email.clone(),
            legal_representative: form.legal_representative.clone(),
            representative_cpf: form.representative_cpf.clone(),
            notes: super::notes(&form.notes),
            status: BidderStatus::Active,
        })
    }

    fn apply_form(&mut self, form: &BidderForm, today: Date) -> Result<(), ValidationErrors> {
        let status = self.status;

        *self = Self::from_form(form, today)?;
        self.status = status;

        Ok(())
    }

    fn to_form(&self) -> BidderForm {
        BidderForm {
            legal_name: self.legal_name.clone(),
            cnpj: self.cnpj.clone(),
            address: self.address.clone(),
            city: self.city.clone(),
            state: self.state.clone(),
            cep: self.cep.clone(),
            phone: self.phone.clone(),
            email: self.email.clone(),
            legal_representative: self.legal_representative.clone(),
            representative_cpf: self.representative_cpf.clone(),
            notes: self.notes.clone().unwrap_or_default(),
        }
    }
}

impl Toggle for Bidder {
    const TOGGLED_MESSAGE: &'static str = "Status do licitante atualizado!";

    fn toggle(&mut self) {
        self.status = self.status.toggled();
    }
}

impl Exportable for Bidder {
    const FILE_STEM: &'static str = "licitantes";
    const SHEET_NAME: &'static str = "Licitantes";
    const TITLE: &'static str = "Relatório de Licitantes";

    const SHEET_COLUMNS: &'static [&'static str] = &[
        "Razão Social",
        "CNPJ",
        "Endereço",
        "Cidade",
        "Estado",
        "CEP",
        "Telefone",
        "Email",
        "Representante Legal",
        "CPF do Representante",
        "Situação",
        "Data de Cadastro",
        "Última Atualização",
        "Observações",
    ];

    const PDF_COLUMNS: &'static [&'static str] = &["Razão Social", "CNPJ", "Cidade/UF", "Situação"];

    fn sheet_row(record: &Record<Self>) -> Vec<String> {
        let bidder = record.data();

        vec![
            bidder.legal_name.clone(),
            bidder.cnpj.clone(),
            bidder.address.clone(),
            bidder.city.clone(),
            bidder.state.clone(),
            bidder.cep.clone(),
            bidder.phone.clone(),
            bidder.email.clone(),
            bidder.legal_representative.clone(),
            bidder.representative_cpf.clone(),
            bidder.status.to_string(),
            format_timestamp_date(record.created_at()),
            format_timestamp_date(record.updated_at()),
            or_missing(bidder.notes.as_deref()),
        ]
    }

    fn pdf_row(record: &Record<Self>) -> Vec<String> {
        let bidder = record.data();

        vec![
            bidder.legal_name.clone(),
            bidder.cnpj.clone(),
            format!("{}/{}", bidder.city, bidder.state),
            bidder.status.to_string(),
        ]
    }
}

/// Headline counts for the bidder register.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BidderStatistics {
    /// All bidders.
    pub total: usize,

    /// Bidders with status `Ativo`.
    pub active: usize,

    /// Bidders with status `Inativo`.
    pub inactive: usize,
}

impl BidderStatistics {
    /// Tally the given bidders.
    pub fn of<'a>(bidders: impl IntoIterator<Item = &'a Bidder>) -> Self {
        bidders
            .into_iter()
            .fold(Self::default(), |mut stats, bidder| {
                stats.total += 1;

                match bidder.status {
                    BidderStatus::Active => stats.active += 1,
                    BidderStatus::Inactive => stats.inactive += 1,
                }

                stats
            })
    }

    /// Tally a whole register.
    pub fn of_store(store: &Store<Bidder>) -> Self {
        Self::of(store.iter().map(Record::data))
    }
}
