//! Benchmarks for real-world scenarios.

mod frame;
mod voices;

pub use frame::bench_frame;
pub use voices::bench_voices;
