//! Bidder Fixtures

use jiff::Timestamp;
use serde::Deserialize;

use crate::{
    entities::bidders::{Bidder, BidderStatus},
    fixtures::{Audit, FixtureError, SeedRecord},
    records::Record,
};

/// Bidder fixture from YAML
#[derive(Debug, Deserialize)]
pub struct BidderFixture {
    /// Razão social
    pub legal_name: String,

    /// CNPJ
    pub cnpj: String,

    /// Street address
    pub address: String,

    /// City
    pub city: String,

    /// State abbreviation
    pub state: String,

    /// Postal code
    pub cep: String,

    /// Phone number
    pub phone: String,

    /// Contact email
    pub email: String,

    /// Legal representative
    pub legal_representative: String,

    /// CPF of the legal representative
    pub representative_cpf: String,

    /// Free notes
    pub notes: Option<String>,

    /// Status label (e.g., "Ativo")
    pub status: BidderStatus,

    /// Creation time
    pub created_at: Timestamp,

    /// Time of the latest change
    pub updated_at: Timestamp,
}

impl SeedRecord for BidderFixture {
    type Entity = Bidder;

    const DIRECTORY: &'static str = "bidders";

    fn into_record(self) -> Result<Record<Bidder>, FixtureError> {
        let audit = Audit {
            created_at: self.created_at,
            updated_at: self.updated_at,
        };

        audit.record(Bidder {
            legal_name: self.legal_name,
            cnpj: self.cnpj,
            address: self.address,
            city: self.city,
            state: self.state,
            cep: self.cep,
            phone: self.phone,
            email: self.email,
            legal_representative: self.legal_representative,
            representative_cpf: self.representative_cpf,
            notes: self.notes,
            status: self.status,
        })
    }
}
