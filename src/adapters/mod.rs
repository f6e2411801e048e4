// Adapters layer: concrete repositories behind the domain ports.

pub mod herd_file;
pub mod memory;

pub use herd_file::{HerdFile, HerdFormat};
pub use memory::InMemoryHerd;
