pub mod ancestry;
pub mod pagination;
pub mod registry;

pub use crate::domain::model::{AnimalId, AnimalRecord, AnimalRow, Sex};
pub use crate::domain::ports::{AnimalLookup, AnimalRepository, PaginationSettings};
pub use crate::utils::error::Result;
