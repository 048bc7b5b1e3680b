pub mod storm_pipeline;

pub use storm_pipeline::StormPipeline;
