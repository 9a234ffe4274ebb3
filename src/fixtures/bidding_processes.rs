//! Bidding Process Fixtures

use jiff::{Timestamp, civil::Date};
use serde::Deserialize;

use crate::{
    entities::bidding_processes::{AwardCriterion, BiddingProcess, Modality, ProcessStatus},
    fixtures::{Audit, FixtureError, SeedRecord, parse_amount},
    records::Record,
};

/// Bidding process fixture from YAML
#[derive(Debug, Deserialize)]
pub struct BiddingProcessFixture {
    /// Process number (e.g., "PE-2025-001")
    pub identification: String,

    /// Modality label
    pub modality: Modality,

    /// Award criterion label
    pub criterion: AwardCriterion,

    /// Object of the process
    pub object: String,

    /// Publication date
    pub publication_date: Date,

    /// Opening date
    pub opening_date: Date,

    /// Estimated value (e.g., "250000.00 BRL")
    pub estimated_value: String,

    /// Awarded value, same format as `estimated_value`
    pub final_value: Option<String>,

    /// Status label
    pub status: ProcessStatus,

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

impl SeedRecord for BiddingProcessFixture {
    type Entity = BiddingProcess;

    const DIRECTORY: &'static str = "bidding_processes";

    fn into_record(self) -> Result<Record<BiddingProcess>, FixtureError> {
        let audit = Audit {
            created_at: self.created_at,
            updated_at: self.updated_at,
        };

        let final_value = self
            .final_value
            .as_deref()
            .map(parse_amount)
            .transpose()?;

        audit.record(BiddingProcess {
            identification: self.identification,
            modality: self.modality,
            criterion: self.criterion,
            object: self.object,
            publication_date: self.publication_date,
            opening_date: self.opening_date,
            estimated_value: parse_amount(&self.estimated_value)?,
            final_value,
            status: self.status,
            sector: self.sector,
            directorate: self.directorate,
            notes: self.notes,
        })
    }
}
