//! Network assembly: canonical tables → styled CX documents

pub mod assembler;
pub mod attributes;
pub mod cx;
pub mod load_plan;

pub use assembler::NetworkAssembler;
pub use attributes::NetworkAttributes;
pub use cx::CxNetwork;
pub use load_plan::{AttributeType, LoadPlan, PropertyColumn};
