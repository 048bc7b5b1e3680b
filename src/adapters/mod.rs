// Adapters layer: concrete implementations for the outside world (dataset
// source, storage, chart rendering, report artifacts).

pub mod chart;
pub mod report;
pub mod source;
pub mod storage;
