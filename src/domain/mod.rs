// Domain layer: validated records and the capabilities (ports) the core consumes.
// No storage or transport concerns live here.

pub mod model;
pub mod ports;
