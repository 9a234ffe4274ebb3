//! Fixtures
//!
//! Seed data for the registers, kept as YAML under `fixtures/<register>/<set>.yml`.

use std::{fs, path::PathBuf};

use jiff::Timestamp;
use rust_decimal::Decimal;
use rusty_money::iso;
use serde::{Deserialize, de::DeserializeOwned};
use thiserror::Error;
use tracing::debug;

use crate::{
    entities::{
        bidders::Bidder, bidding_processes::BiddingProcess, direct_contracts::DirectContract,
        penalties::Penalty,
    },
    money::{Amount, brl},
    records::{Entity, Record},
    reports::Registers,
    store::Store,
};

pub mod bidders;
pub mod bidding_processes;
pub mod direct_contracts;
pub mod penalties;

/// Fixture Parsing Errors
#[derive(Debug, Error)]
pub enum FixtureError {
    /// IO error reading fixture files
    #[error("Failed to read fixture file: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error
    #[error("Failed to parse YAML: {0}")]
    Yaml(#[from] serde_norway::Error),

    /// Invalid amount format
    #[error("Invalid amount format: {0}")]
    InvalidAmount(String),

    /// Unknown or unsupported currency code
    #[error("Unknown currency code: {0}")]
    UnknownCurrency(String),

    /// Update time precedes creation time
    #[error("Record updated at {updated_at} before it was created at {created_at}")]
    UpdatedBeforeCreated {
        /// Creation time
        created_at: Timestamp,
        /// Update time
        updated_at: Timestamp,
    },
}

/// Audit timestamps shared by every seed record.
#[derive(Debug, Clone, Copy)]
pub struct Audit {
    /// Creation time
    pub created_at: Timestamp,

    /// Time of the latest change
    pub updated_at: Timestamp,
}

impl Audit {
    /// Wrap `data` in a record carrying these timestamps.
    ///
    /// # Errors
    ///
    /// Returns an error if `updated_at` precedes `created_at`.
    pub fn record<E>(self, data: E) -> Result<Record<E>, FixtureError> {
        if self.updated_at < self.created_at {
            return Err(FixtureError::UpdatedBeforeCreated {
                created_at: self.created_at,
                updated_at: self.updated_at,
            });
        }

        Ok(Record::seeded(data, self.created_at, self.updated_at))
    }
}

/// A seed record that converts into a stored record.
pub trait SeedRecord: DeserializeOwned {
    /// Entity produced.
    type Entity: Entity;

    /// Directory under the fixture base path.
    const DIRECTORY: &'static str;

    /// Convert into a stored record.
    ///
    /// # Errors
    ///
    /// Returns an error if a field does not parse.
    fn into_record(self) -> Result<Record<Self::Entity>, FixtureError>;
}

#[derive(Debug, Deserialize)]
struct SeedFile<S> {
    records: Vec<S>,
}

/// Fixture
#[derive(Debug)]
pub struct Fixture {
    /// Base path for fixture files
    base_path: PathBuf,

    bidders: Store<Bidder>,
    processes: Store<BiddingProcess>,
    contracts: Store<DirectContract>,
    penalties: Store<Penalty>,
}

impl Fixture {
    /// Create a new empty fixture with default base path
    pub fn new() -> Self {
        Self::with_base_path("./fixtures")
    }

    /// Create a new empty fixture with custom base path
    pub fn with_base_path(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
            bidders: Store::new(),
            processes: Store::new(),
            contracts: Store::new(),
            penalties: Store::new(),
        }
    }

    /// Load every register of a named fixture set
    ///
    /// # Errors
    ///
    /// Returns an error if any of the files cannot be read or parsed.
    pub fn from_set(name: &str) -> Result<Self, FixtureError> {
        Self::with_base_path("./fixtures").load_set(name)
    }

    /// Load every register of a named fixture set from this fixture's base path
    ///
    /// # Errors
    ///
    /// Returns an error if any of the files cannot be read or parsed.
    pub fn load_set(mut self, name: &str) -> Result<Self, FixtureError> {
        self.load_bidders(name)?
            .load_processes(name)?
            .load_contracts(name)?
            .load_penalties(name)?;

        Ok(self)
    }

    /// Load bidders from a YAML fixture file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load_bidders(&mut self, name: &str) -> Result<&mut Self, FixtureError> {
        self.bidders = self.load::<bidders::BidderFixture>(name)?;

        Ok(self)
    }

    /// Load bidding processes from a YAML fixture file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed, or an amount is invalid.
    pub fn load_processes(&mut self, name: &str) -> Result<&mut Self, FixtureError> {
        self.processes = self.load::<bidding_processes::BiddingProcessFixture>(name)?;

        Ok(self)
    }

    /// Load direct contracts from a YAML fixture file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed, or an amount is invalid.
    pub fn load_contracts(&mut self, name: &str) -> Result<&mut Self, FixtureError> {
        self.contracts = self.load::<direct_contracts::DirectContractFixture>(name)?;

        Ok(self)
    }

    /// Load penalties from a YAML fixture file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load_penalties(&mut self, name: &str) -> Result<&mut Self, FixtureError> {
        self.penalties = self.load::<penalties::PenaltyFixture>(name)?;

        Ok(self)
    }

    fn load<S: SeedRecord>(&self, name: &str) -> Result<Store<S::Entity>, FixtureError> {
        let file_path = self
            .base_path
            .join(S::DIRECTORY)
            .join(format!("{name}.yml"));
        let contents = fs::read_to_string(&file_path)?;
        let fixture: SeedFile<S> = serde_norway::from_str(&contents)?;

        let records = fixture
            .records
            .into_iter()
            .map(SeedRecord::into_record)
            .collect::<Result<Vec<_>, _>>()?;

        debug!(
            path = %file_path.display(),
            records = records.len(),
            "fixture loaded"
        );

        Ok(Store::with_records(records))
    }

    /// Seeded bidders
    pub fn bidders(&self) -> &Store<Bidder> {
        &self.bidders
    }

    /// Seeded bidding processes
    pub fn processes(&self) -> &Store<BiddingProcess> {
        &self.processes
    }

    /// Seeded direct contracts
    pub fn contracts(&self) -> &Store<DirectContract> {
        &self.contracts
    }

    /// Seeded penalties
    pub fn penalties(&self) -> &Store<Penalty> {
        &self.penalties
    }

    /// The registers consolidated reports draw on
    pub fn registers(&self) -> Registers<'_> {
        Registers {
            bidders: &self.bidders,
            processes: &self.processes,
            penalties: &self.penalties,
        }
    }
}

impl Default for Fixture {
    fn default() -> Self {
        Self::new()
    }
}

/// Parse an amount string (e.g., "250000.00 BRL")
///
/// # Errors
///
/// Returns an error if the string is not in the format "AMOUNT CURRENCY", if the amount is
/// not a decimal, or if the currency is not BRL.
pub fn parse_amount(s: &str) -> Result<Amount, FixtureError> {
    let parts: Vec<&str> = s.split_whitespace().collect();

    let [amount, currency_code] = parts.as_slice() else {
        return Err(FixtureError::InvalidAmount(format!(
            "Expected format 'AMOUNT CURRENCY', got: {s}"
        )));
    };

    let amount = amount
        .parse::<Decimal>()
        .map_err(|_err| FixtureError::InvalidAmount(s.to_string()))?;

    if iso::find(currency_code) != Some(iso::BRL) {
        return Err(FixtureError::UnknownCurrency((*currency_code).to_string()));
    }

    Ok(brl(amount))
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use testresult::TestResult;

    use super::*;
    use crate::entities::penalties::PenaltyStatus;

    fn write_fixture(base: &Path, category: &str, name: &str, contents: &str) -> TestResult {
        let dir = base.join(category);

        fs::create_dir_all(&dir)?;
        fs::write(dir.join(format!("{name}.yml")), contents)?;

        Ok(())
    }

    #[test]
    fn fixture_from_set_loads_all_registers() -> TestResult {
        let fixture = Fixture::from_set("seed")?;

        assert_eq!(fixture.bidders().len(), 5);
        assert_eq!(fixture.processes().len(), 7);
        assert_eq!(fixture.contracts().len(), 5);
        assert_eq!(fixture.penalties().len(), 5);

        Ok(())
    }

    #[test]
    fn fixture_keeps_file_order() -> TestResult {
        let fixture = Fixture::from_set("seed")?;

        let names: Vec<&str> = fixture
            .bidders()
            .iter()
            .map(|record| record.data().legal_name.as_str())
            .collect();

        assert_eq!(
            names,
            [
                "Empresa ABC Ltda",
                "Tecnologia XYZ S.A.",
                "Construções Rápidas Ltda",
                "Consultoria Financeira Ltda",
                "Distribuidora de Alimentos S.A.",
            ]
        );

        Ok(())
    }

    #[test]
    fn seeded_penalty_status_is_taken_as_given() -> TestResult {
        let fixture = Fixture::from_set("seed")?;

        let closed = fixture
            .penalties()
            .iter()
            .filter(|record| record.data().status == PenaltyStatus::Closed)
            .count();

        assert_eq!(closed, 1);

        Ok(())
    }

    #[test]
    fn missing_set_is_an_io_error() {
        let result = Fixture::from_set("missing");

        assert!(matches!(result, Err(FixtureError::Io(_))));
    }

    #[test]
    fn timestamps_out_of_order_are_rejected() -> TestResult {
        let dir = tempfile::tempdir()?;

        write_fixture(
            dir.path(),
            "penalties",
            "broken",
            r#"
records:
  - supplier: Empresa ABC Ltda
    cnpj: 12.345.678/0001-90
    process: PE-2025-001
    sanction: Advertência
    start_date: 2025-01-15
    end_date: 2025-04-15
    reason: Atraso na entrega dos produtos
    legal_basis: Art. 87, I da Lei 8.666/93
    status: Ativa
    created_at: 2025-01-10T10:00:00Z
    updated_at: 2025-01-09T10:00:00Z
"#,
        )?;

        let mut fixture = Fixture::with_base_path(dir.path());
        let result = fixture.load_penalties("broken");

        assert!(matches!(
            result,
            Err(FixtureError::UpdatedBeforeCreated { .. })
        ));

        Ok(())
    }

    #[test]
    fn unknown_label_is_a_yaml_error() -> TestResult {
        let dir = tempfile::tempdir()?;

        write_fixture(
            dir.path(),
            "bidders",
            "broken",
            r#"
records:
  - legal_name: Empresa ABC Ltda
    cnpj: 12.345.678/0001-90
    address: Rua das Flores, 123
    city: São Paulo
    state: SP
    cep: 01234-567
    phone: (11) 98765-4321
    email: contato@empresaabc.com.br
    legal_representative: João Silva
    representative_cpf: 123.456.789-00
    status: Suspenso
    created_at: 2025-01-15T10:00:00Z
    updated_at: 2025-04-20T14:30:00Z
"#,
        )?;

        let mut fixture = Fixture::with_base_path(dir.path());

        assert!(matches!(
            fixture.load_bidders("broken"),
            Err(FixtureError::Yaml(_))
        ));

        Ok(())
    }

    #[test]
    fn parse_amount_accepts_brl() -> TestResult {
        let amount = parse_amount("250000.00 BRL")?;

        assert_eq!(*amount.amount(), Decimal::new(250_000, 0));

        Ok(())
    }

    #[test]
    fn parse_amount_rejects_invalid_format() {
        assert!(matches!(
            parse_amount("250000BRL"),
            Err(FixtureError::InvalidAmount(_))
        ));
        assert!(matches!(
            parse_amount("abc BRL"),
            Err(FixtureError::InvalidAmount(_))
        ));
    }

    #[test]
    fn parse_amount_rejects_other_currencies() {
        assert!(matches!(
            parse_amount("10 USD"),
            Err(FixtureError::UnknownCurrency(code)) if code == "USD"
        ));
    }
}
