//! Core modules for bizpulse.
//!
//! This module contains the fundamental building blocks:
//! - ERP records handed over by the storage collaborator
//! - Count snapshots derived from inventory and invoices
//! - Service configuration

pub mod config;
pub mod records;
pub mod snapshot;

pub use config::*;
pub use records::*;
pub use snapshot::*;
