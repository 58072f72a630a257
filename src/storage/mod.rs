//! Storage module for ERP records.
//!
//! ## Backends
//!
//! - **InMemoryStore**: Fast, ephemeral storage for tests and demos
//! - **FileStore**: JSON file persistence under a data directory
//!
//! ## Usage
//!
//! ```rust,ignore
//! use bizpulse::storage::{ErpRepository, InMemoryStore, SeedData};
//!
//! let repo = ErpRepository::new(InMemoryStore::new());
//! repo.load_seed(&SeedData::from_file("seed.json".as_ref())?)?;
//! ```

pub mod backend;
pub mod repository;

pub use backend::*;
pub use repository::*;
