//! Direct Contract Fixtures

use jiff::{Timestamp, civil::Date};
use serde::Deserialize;

use crate::{
    entities::direct_contracts::{ContractStatus, ContractType, DirectContract},
    fixtures::{Audit, FixtureError, SeedRecord, parse_amount},
    records::Record,
};

/// Direct contract fixture from YAML
#[derive(Debug, Deserialize)]
pub struct DirectContractFixture {
    /// Contract number (e.g., "DL-2025-001")
    pub identification: String,

    /// Contract type label
    pub contract_type: ContractType,

    /// Supplier name
    pub supplier: String,

    /// Supplier CNPJ
    pub cnpj: String,

    /// Object of the contract
    pub object: String,

    /// First day in force
    pub start_date: Date,

    /// Last day in force
    pub end_date: Date,

    /// Total value (e.g., "15000.00 BRL")
    pub total_value: String,

    /// Legal opinion number
    pub opinion_number: String,

    /// Legal opinion date
    pub opinion_date: Date,

    /// Legal basis
    pub legal_basis: String,

    /// Status label
    pub status: ContractStatus,

    /// Requesting sector
    pub sector: String,

    /// Requesting directorate
    pub directorate: String,

    /// Free notes
    pub notes: Option<String>,

    /// Creation time
    pub created_at: Timestamp,

    /// Time of the latest change
    pub updated_at: Timestamp,
}

impl SeedRecord for DirectContractFixture {
    type Entity = DirectContract;

    const DIRECTORY: &'static str = "direct_contracts";

    fn into_record(self) -> Result<Record<DirectContract>, FixtureError> {
        let audit = Audit {
            created_at: self.created_at,
            updated_at: self.updated_at,
        };

        audit.record(DirectContract {
            identification: self.identification,
            contract_type: self.contract_type,
            supplier: self.supplier,
            cnpj: self.cnpj,
            object: self.object,
            start_date: self.start_date,
            end_date: self.end_date,
            total_value: parse_amount(&self.total_value)?,
            opinion_number: self.opinion_number,
            opinion_date: self.opinion_date,
            legal_basis: self.legal_basis,
            status: self.status,
            sector: self.sector,
            directorate: self.directorate,
            notes: self.notes,
        })
    }
}
