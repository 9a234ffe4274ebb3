//! Direct Contracts
//!
//! Purchases made without competitive bidding, under a waiver (`Dispensa`) or because
//! competition is impossible (`Inexigibilidade`). Each one is backed by a legal opinion.

use jiff::civil::Date;
use rust_decimal::Decimal;
use smallvec::{SmallVec, smallvec};

use crate::{
    entities::{notes, parse_date, parse_label},
    export::{Exportable, format::or_missing, format_date},
    filter::{Criteria, Searchable, TextQuery, distinct, matches_choice},
    labels::labelled_enum,
    money::{Amount, brl, format_amount, format_brl},
    records::{Entity, Messages, Record},
    store::Store,
    validation::{FieldRule, FieldValue, FormSchema, Rule, ValidationErrors},
};

labelled_enum! {
    /// Legal ground for skipping the bidding process.
    pub enum ContractType {
        /// Bidding waived.
        Waiver => "Dispensa",
        /// Bidding not applicable.
        Unenforceability => "Inexigibilidade",
    }
}

labelled_enum! {
    /// Stage of a direct contract.
    pub enum ContractStatus {
        /// Being drafted.
        Drafting => "Em Elaboração",
        /// In force.
        InForce => "Vigente",
        /// Closed.
        Closed => "Encerrado",
    }
}

/// A direct contract.
#[derive(Debug, Clone, PartialEq)]
pub struct DirectContract {
    /// Human identification, e.g. `DL-2025-001`.
    pub identification: String,

    /// Legal ground.
    pub contract_type: ContractType,

    /// Supplier name.
    pub supplier: String,

    /// Supplier CNPJ.
    pub cnpj: String,

    /// Object of the contract.
    pub object: String,

    /// First day in force.
    pub start_date: Date,

    /// Last day in force.
    pub end_date: Date,

    /// Total value.
    pub total_value: Amount,

    /// Number of the legal opinion.
    pub opinion_number: String,

    /// Date of the legal opinion.
    pub opinion_date: Date,

    /// Statutory basis.
    pub legal_basis: String,

    /// Stage.
    pub status: ContractStatus,

    /// Requesting sector.
    pub sector: String,

    /// Responsible directorate.
    pub directorate: String,

    /// Free notes.
    pub notes: Option<String>,
}

/// Create/edit form for a [`DirectContract`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DirectContractForm {
    /// Identification.
    pub identification: String,

    /// Contract type label.
    pub contract_type: String,

    /// Supplier name.
    pub supplier: String,

    /// Supplier CNPJ.
    pub cnpj: String,

    /// Object.
    pub object: String,

    /// Start date, `yyyy-mm-dd`.
    pub start_date: String,

    /// End date, `yyyy-mm-dd`.
    pub end_date: String,

    /// Total value.
    pub total_value: Option<Decimal>,

    /// Legal opinion number.
    pub opinion_number: String,

    /// Legal opinion date, `yyyy-mm-dd`.
    pub opinion_date: String,

    /// Statutory basis.
    pub legal_basis: String,

    /// Status label.
    pub status: String,

    /// Sector.
    pub sector: String,

    /// Directorate.
    pub directorate: String,

    /// Free notes.
    pub notes: String,
}

const CONTRACT_RULES: &[FieldRule] = &[
    FieldRule::new(
        "identification",
        Rule::Required { min_len: 1 },
        "Identificação é obrigatória",
    ),
    FieldRule::new(
        "contract_type",
        Rule::Choice {
            options: ContractType::LABELS,
        },
        "Tipo é obrigatório",
    ),
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
    FieldRule::new("object", Rule::Required { min_len: 1 }, "Objeto é obrigatório"),
    FieldRule::new("start_date", Rule::Date, "Data de início é obrigatória"),
    FieldRule::new("end_date", Rule::Date, "Data de fim é obrigatória"),
    FieldRule::new(
        "total_value",
        Rule::Amount {
            min: Some(Decimal::ZERO),
            required: true,
        },
        "Valor total deve ser maior ou igual a zero",
    ),
    FieldRule::new(
        "opinion_number",
        Rule::Required { min_len: 1 },
        "Número do parecer é obrigatório",
    ),
    FieldRule::new("opinion_date", Rule::Date, "Data do parecer é obrigatória"),
    FieldRule::new(
        "legal_basis",
        Rule::Required { min_len: 1 },
        "Fundamentação legal é obrigatória",
    ),
    FieldRule::new(
        "status",
        Rule::Choice {
            options: ContractStatus::LABELS,
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

impl FormSchema for DirectContractForm {
    fn rules() -> &'static [FieldRule] {
        CONTRACT_RULES
    }

    fn value(&self, field: &str) -> Option<FieldValue<'_>> {
        Some(match field {
            "identification" => FieldValue::Text(&self.identification),
            "contract_type" => FieldValue::Text(&self.contract_type),
            "supplier" => FieldValue::Text(&self.supplier),
            "cnpj" => FieldValue::Text(&self.cnpj),
            "object" => FieldValue::Text(&self.object),
            "start_date" => FieldValue::Text(&self.start_date),
            "end_date" => FieldValue::Text(&self.end_date),
            "total_value" => FieldValue::Amount(self.total_value),
            "opinion_number" => FieldValue::Text(&self.opinion_number),
            "opinion_date" => FieldValue::Text(&self.opinion_date),
            "legal_basis" => FieldValue::Text(&self.legal_basis),
            "status" => FieldValue::Text(&self.status),
            "sector" => FieldValue::Text(&self.sector),
            "directorate" => FieldValue::Text(&self.directorate),
            "notes" => FieldValue::Text(&self.notes),
            _ => return None,
        })
    }
}

/// Direct contract list filters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DirectContractCriteria {
    /// Matches identification, supplier or object.
    pub text: TextQuery,

    /// Exact contract type; `None` for all.
    pub contract_type: Option<ContractType>,

    /// Exact status; `None` for all.
    pub status: Option<ContractStatus>,
}

impl DirectContractCriteria {
    /// Choices offered by the type and status filters, taken from `store`.
    pub fn options(store: &Store<DirectContract>) -> DirectContractOptions {
        DirectContractOptions {
            contract_types: distinct(store, |contract| contract.contract_type),
            statuses: distinct(store, |contract| contract.status),
        }
    }
}

/// Filter choices present in a direct contract register.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DirectContractOptions {
    /// Contract types in use.
    pub contract_types: Vec<ContractType>,

    /// Statuses in use.
    pub statuses: Vec<ContractStatus>,
}

impl Searchable for DirectContract {
    fn search_fields(&self) -> SmallVec<[&str; 4]> {
        smallvec![
            self.identification.as_str(),
            self.supplier.as_str(),
            self.object.as_str()
        ]
    }
}

impl Criteria<DirectContract> for DirectContractCriteria {
    fn matches(&self, contract: &DirectContract) -> bool {
        self.text.matches(contract)
            && matches_choice(self.contract_type.as_ref(), &contract.contract_type)
            && matches_choice(self.status.as_ref(), &contract.status)
    }
}

impl Entity for DirectContract {
    type Form = DirectContractForm;
    type Criteria = DirectContractCriteria;

    const KIND: &'static str = "direct_contract";

    const MESSAGES: Messages = Messages {
        created: "Contratação direta cadastrada com sucesso!",
        updated: "Contratação direta atualizada com sucesso!",
        deleted: "Contratação direta excluída com sucesso!",
        delete_prompt: "Tem certeza que deseja excluir esta contratação direta?",
    };

    fn from_form(form: &DirectContractForm, _today: Date) -> Result<Self, ValidationErrors> {
        let total_value = form.total_value.ok_or_else(|| {
            ValidationErrors::single("total_value", "Valor total deve ser maior ou igual a zero")
        })?;

        Ok(Self {
            identification: form.identification.clone(),
            contract_type: parse_label("contract_type", &form.contract_type, "Tipo é obrigatório")?,
            supplier: form.supplier.clone(),
            cnpj: form.cnpj.clone(),
            object: form.object.clone(),
            start_date: parse_date("start_date", &form.start_date, "Data de início é obrigatória")?,
            end_date: parse_date("end_date", &form.end_date, "Data de fim é obrigatória")?,
            total_value: brl(total_value),
            opinion_number: form.opinion_number.clone(),
            opinion_date: parse_date(
                "opinion_date",
                &form.opinion_date,
                "Data do parecer é obrigatória",
            )?,
            legal_basis: form.legal_basis.clone(),
            status: parse_label("status", &form.status, "Status é obrigatório")?,
            sector: form.sector.clone(),
            directorate: form.directorate.clone(),
            notes: notes(&form.notes),
        })
    }

    fn to_form(&self) -> DirectContractForm {
        DirectContractForm {
            identification: self.identification.clone(),
            contract_type: self.contract_type.to_string(),
            supplier: self.supplier.clone(),
            cnpj: self.cnpj.clone(),
            object: self.object.clone(),
            start_date: self.start_date.to_string(),
            end_date: self.end_date.to_string(),
            total_value: Some(*self.total_value.amount()),
            opinion_number: self.opinion_number.clone(),
            opinion_date: self.opinion_date.to_string(),
            legal_basis: self.legal_basis.clone(),
            status: self.status.to_string(),
            sector: self.sector.clone(),
            directorate: self.directorate.clone(),
            notes: self.notes.clone().unwrap_or_default(),
        }
    }
}

impl Exportable for DirectContract {
    const FILE_STEM: &'static str = "contratacoes_diretas";
    const SHEET_NAME: &'static str = "Contratações Diretas";
    const TITLE: &'static str = "Relatório de Contratações Diretas";

    const SHEET_COLUMNS: &'static [&'static str] = &[
        "Identificação",
        "Tipo",
        "Fornecedor",
        "CNPJ",
        "Objeto",
        "Data de Início",
        "Data de Fim",
        "Valor Total (R$)",
        "Parecer Jurídico",
        "Data do Parecer",
        "Fundamentação Legal",
        "Status",
        "Setor",
        "Diretoria",
        "Observações",
    ];

    const PDF_COLUMNS: &'static [&'static str] =
        &["ID", "Tipo", "Fornecedor", "Valor Total", "Status"];

    fn sheet_row(record: &Record<Self>) -> Vec<String> {
        let contract = record.data();

        vec![
            contract.identification.clone(),
            contract.contract_type.to_string(),
            contract.supplier.clone(),
            contract.cnpj.clone(),
            contract.object.clone(),
            format_date(contract.start_date),
            format_date(contract.end_date),
            format_amount(&contract.total_value),
            contract.opinion_number.clone(),
            format_date(contract.opinion_date),
            contract.legal_basis.clone(),
            contract.status.to_string(),
            contract.sector.clone(),
            contract.directorate.clone(),
            or_missing(contract.notes.as_deref()),
        ]
    }

    fn pdf_row(record: &Record<Self>) -> Vec<String> {
        let contract = record.data();

        vec![
            contract.identification.clone(),
            contract.contract_type.to_string(),
            contract.supplier.clone(),
            format_brl(&contract.total_value),
            contract.status.to_string(),
        ]
    }
}

/// Headline figures for the direct contract register.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContractStatistics {
    /// All contracts.
    pub total: usize,

    /// Contracts `Vigente`.
    pub in_force: usize,

    /// Contracts `Em Elaboração`.
    pub drafting: usize,

    /// Contracts `Encerrado`.
    pub closed: usize,

    /// Contracts under `Dispensa`.
    pub waivers: usize,

    /// Contracts under `Inexigibilidade`.
    pub unenforceable: usize,

    /// Sum of total values.
    pub total_value: Amount,
}

impl ContractStatistics {
    /// Compute the figures over the given contracts.
    pub fn of<'a>(contracts: impl IntoIterator<Item = &'a DirectContract>) -> Self {
        let mut stats = Self {
            total: 0,
            in_force: 0,
            drafting: 0,
            closed: 0,
            waivers: 0,
            unenforceable: 0,
            total_value: brl(Decimal::ZERO),
        };

        let mut value = Decimal::ZERO;

        for contract in contracts {
            stats.total += 1;

            match contract.status {
                ContractStatus::InForce => stats.in_force += 1,
                ContractStatus::Drafting => stats.drafting += 1,
                ContractStatus::Closed => stats.closed += 1,
            }

            match contract.contract_type {
                ContractType::Waiver => stats.waivers += 1,
                ContractType::Unenforceability => stats.unenforceable += 1,
            }

            value += *contract.total_value.amount();
        }

        stats.total_value = brl(value);
        stats
    }

    /// Compute the figures over a whole register.
    pub fn of_store(store: &Store<DirectContract>) -> Self {
        Self::of(store.iter().map(Record::data))
    }
}

#[cfg(test)]
mod tests {
    use jiff::{Timestamp, civil::date};
    use testresult::TestResult;

    use super::*;
    use crate::validation::validate;

    fn form() -> DirectContractForm {
        DirectContractForm {
            identification: "DL-2025-001".to_string(),
            contract_type: "Dispensa".to_string(),
            supplier: "Empresa ABC Ltda".to_string(),
            cnpj: "12.345.678/0001-90".to_string(),
            object: "Aquisição de material de escritório".to_string(),
            start_date: "2025-05-01".to_string(),
            end_date: "2025-11-01".to_string(),
            total_value: Some(Decimal::new(15_000, 0)),
            opinion_number: "PAR-2025-001".to_string(),
            opinion_date: "2025-04-20".to_string(),
            legal_basis: "Art. 24, II da Lei 8.666/93".to_string(),
            status: "Vigente".to_string(),
            sector: "Compras".to_string(),
            directorate: "Administrativa".to_string(),
            notes: "Contratação emergencial".to_string(),
        }
    }

    #[test]
    fn missing_legal_opinion_is_rejected() {
        let bad = DirectContractForm {
            opinion_number: String::new(),
            opinion_date: String::new(),
            legal_basis: " ".to_string(),
            ..form()
        };

        let errors = validate(&bad).err().unwrap_or_default();

        assert_eq!(
            errors.fields().collect::<Vec<_>>(),
            ["opinion_number", "opinion_date", "legal_basis"]
        );
        assert_eq!(
            errors.get("opinion_number"),
            Some("Número do parecer é obrigatório")
        );
    }

    #[test]
    fn negative_total_is_rejected() {
        let bad = DirectContractForm {
            total_value: Some(Decimal::new(-5, 1)),
            ..form()
        };

        let errors = validate(&bad).err().unwrap_or_default();

        assert_eq!(
            errors.get("total_value"),
            Some("Valor total deve ser maior ou igual a zero")
        );
    }

    #[test]
    fn search_matches_supplier() -> TestResult {
        let contract = DirectContract::from_form(&form(), date(2025, 5, 1))?;

        let criteria = DirectContractCriteria {
            text: TextQuery::new("empresa abc"),
            contract_type: Some(ContractType::Waiver),
            status: None,
        };

        assert!(criteria.matches(&contract));

        let wrong_type = DirectContractCriteria {
            contract_type: Some(ContractType::Unenforceability),
            ..criteria
        };

        assert!(!wrong_type.matches(&contract));

        Ok(())
    }

    #[test]
    fn rows_format_dates_and_money() -> TestResult {
        let contract = DirectContract::from_form(&form(), date(2025, 5, 1))?;
        let record = Record::new(contract, Timestamp::now());

        let sheet = DirectContract::sheet_row(&record);

        assert_eq!(sheet.len(), DirectContract::SHEET_COLUMNS.len());
        assert_eq!(sheet.get(5).map(String::as_str), Some("01/05/2025"));
        assert_eq!(sheet.get(7).map(String::as_str), Some("15.000,00"));
        assert_eq!(sheet.get(9).map(String::as_str), Some("20/04/2025"));

        assert_eq!(
            DirectContract::pdf_row(&record),
            ["DL-2025-001", "Dispensa", "Empresa ABC Ltda", "R$ 15.000,00", "Vigente"]
        );

        Ok(())
    }

    #[test]
    fn statistics_split_by_status_and_type() -> TestResult {
        let waiver = DirectContract::from_form(&form(), date(2025, 5, 1))?;
        let exclusive = DirectContract::from_form(
            &DirectContractForm {
                contract_type: "Inexigibilidade".to_string(),
                status: "Em Elaboração".to_string(),
                total_value: Some(Decimal::new(85_000, 0)),
                ..form()
            },
            date(2025, 5, 1),
        )?;

        let stats = ContractStatistics::of([&waiver, &exclusive]);

        assert_eq!(stats.total, 2);
        assert_eq!(stats.in_force, 1);
        assert_eq!(stats.drafting, 1);
        assert_eq!(stats.waivers, 1);
        assert_eq!(stats.unenforceable, 1);
        assert_eq!(stats.total_value, brl(Decimal::new(100_000, 0)));

        Ok(())
    }
}
