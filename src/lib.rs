// Semspace: dissimilarity analysis for bilingual circle-arrangement
// experiments.
//
// This is the library root. Each module corresponds to a stage of the
// arrangement-to-RDM processing pipeline.

pub mod config;
pub mod isc;
pub mod output;
pub mod pipeline;
pub mod rdm;
pub mod screen;
pub mod session;
pub mod status;
pub mod words;
