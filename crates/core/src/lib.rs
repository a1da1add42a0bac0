//! RedGreen Creator 核心 crate
//!
//! 包含内容结构、配图槽位、运行阶段等核心类型，以及错误类型与配置。

pub mod config;
pub mod errors;
pub mod types;

pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
