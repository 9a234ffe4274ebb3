//! Licita prelude.
//!
//! Convenience exports for common library consumers.

pub use crate::{
    entities::{
        bidders::{Bidder, BidderCriteria, BidderForm, BidderStatistics, BidderStatus},
        bidding_processes::{
            AwardCriterion, BiddingProcess, BiddingProcessCriteria, BiddingProcessForm,
            BiddingProcessOptions, BiddingStatistics, Modality, ProcessStatus,
        },
        direct_contracts::{
            ContractStatistics, ContractStatus, ContractType, DirectContract,
            DirectContractCriteria, DirectContractForm, DirectContractOptions,
        },
        penalties::{
            Penalty, PenaltyCriteria, PenaltyForm, PenaltyStatistics, PenaltyStatus, SanctionType,
        },
    },
    export::{ExportError, Exportable, PdfProjection, SheetProjection},
    filter::{Criteria, Searchable, TextQuery, filter},
    fixtures::{Fixture, FixtureError},
    ids::RecordId,
    labels::UnknownLabel,
    money::Amount,
    records::{Entity, Record, Toggle},
    reports::{Period, PeriodPreset, Registers, Report, ReportError, ReportKind},
    screen::{Editing, Notice, Notifier, RecordingNotifier, Screen, TracingNotifier},
    settings::Settings,
    store::{Confirm, DeleteOutcome, Store},
    validation::{FormSchema, ValidationErrors, validate},
};
