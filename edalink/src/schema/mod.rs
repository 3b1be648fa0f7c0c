//! Schema Definitions
//!
//! Data structures for PCB design entities, operation requests and operation
//! results. Serialized field names are camelCase to match the connector wire
//! contract.

pub mod design;
pub mod requests;
pub mod results;

pub use design::*;
pub use requests::*;
pub use results::*;
