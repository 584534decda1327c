/// Probe, install and statistics behaviour of a single cache.
pub mod engine;
