//! Real-world scenario benchmarks.
//!
//! Full engine renders: queue drain, buffer clear, every active voice and the
//! reclaim pass.

mod engine;

pub use engine::bench_engine;
