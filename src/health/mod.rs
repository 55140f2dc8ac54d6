//! 健康检测模块
//!
//! 提供每周期的端点探测引擎与周期调度器

pub mod engine;
pub mod scheduler;

pub use engine::{HealthCheckEngine, ProbeOutcome};
pub use scheduler::ProbeScheduler;
