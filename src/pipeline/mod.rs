// Data-processing pipeline: cleaning raw session uploads and combining
// cleaned trials into per-participant RDMs.

pub mod clean;
pub mod combine;
