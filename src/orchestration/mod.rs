pub mod pipeline;

pub use pipeline::{Pipeline, PipelineSettings, Throttle};
