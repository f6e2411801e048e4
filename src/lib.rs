pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use crate::config::{CliConfig, Command};

pub use crate::adapters::{HerdFile, InMemoryHerd};
pub use crate::config::HerdConfig;
pub use crate::core::{
    ancestry::{resolve_ancestry, AncestryMap, AncestryResolver},
    pagination::{paginate, PageMetadata, PageRequest, PagedView, Paginator},
    registry::HerdService,
};
pub use crate::domain::model::{AnimalId, AnimalRecord, AnimalRow, Sex};
pub use crate::domain::ports::{AnimalLookup, AnimalRepository};
pub use crate::utils::error::{HerdError, Result};
