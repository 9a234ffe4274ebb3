//! Licita
//!
//! Licita keeps the procurement registers of a municipal purchasing office: bidders, bidding
//! processes, direct contracts and penalties. Each register is an ordered in-memory [`Store`]
//! with a validated create/edit/delete lifecycle, a filter engine and spreadsheet and PDF
//! exports. Consolidated period reports and the organisation settings sit alongside.
//!
//! [`Store`]: store::Store

pub mod config;
pub mod entities;
pub mod export;
pub mod filter;
pub mod fixtures;
pub mod ids;
pub mod labels;
pub mod money;
pub mod prelude;
pub mod records;
pub mod reports;
pub mod screen;
pub mod settings;
pub mod store;
pub mod validation;
