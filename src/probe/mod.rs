//! RPC探测模块
//!
//! 提供探测客户端trait及其网络实现与脚本化测试实现

pub mod client;
pub mod script;

pub use client::{HttpRpcProbe, RpcProbe};
pub use script::ScriptedProbe;
