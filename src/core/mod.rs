pub mod aggregator;
pub mod classifier;
pub mod domain;
pub mod engine;
pub mod errors;
pub mod pipeline;
pub mod traits;
pub mod workspace;
