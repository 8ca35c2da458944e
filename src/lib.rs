pub mod aggregator_core;
pub mod pipeline;
