//! Penalty Fixtures

use jiff::{Timestamp, civil::Date};
use serde::Deserialize;

use crate::{
    entities::penalties::{Penalty, PenaltyStatus, SanctionType},
    fixtures::{Audit, FixtureError, SeedRecord},
    records::Record,
};

/// Penalty fixture from YAML
///
/// The status is stored as written; it is not recomputed from the end date on load.
#[derive(Debug, Deserialize)]
pub struct PenaltyFixture {
    /// Penalised supplier
    pub supplier: String,

    /// Supplier CNPJ
    pub cnpj: String,

    /// Related process number
    pub process: String,

    /// Sanction label
    pub sanction: SanctionType,

    /// First day of the sanction
    pub start_date: Date,

    /// Last day of the sanction
    pub end_date: Date,

    /// Reason
    pub reason: String,

    /// Legal basis
    pub legal_basis: String,

    /// Free notes
    pub notes: Option<String>,

    /// Status label
    pub status: PenaltyStatus,

    /// Creation time
    pub created_at: Timestamp,

    /// Time of the latest change
    pub updated_at: Timestamp,
}

impl SeedRecord for PenaltyFixture {
    type Entity = Penalty;

    const DIRECTORY: &'static str = "penalties";

    fn into_record(self) -> Result<Record<Penalty>, FixtureError> {
        let audit = Audit {
            created_at: self.created_at,
            updated_at: self.updated_at,
        };

        audit.record(Penalty {
            supplier: self.supplier,
            cnpj: self.cnpj,
            process: self.process,
            sanction: self.sanction,
            start_date: self.start_date,
            end_date: self.end_date,
            reason: self.reason,
            legal_basis: self.legal_basis,
            notes: self.notes,
            status: self.status,
        })
    }
}
