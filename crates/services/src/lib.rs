//! 创作工作流服务 crate
//!
//! 包含公众号文章与小红书图文两套生成工作流的控制器。

pub mod builder;

pub use builder::article::{ArticleBuilderService, ArticleBuilderState};
pub use builder::post::{PostBuilderService, PostBuilderState};
pub use builder::slots::SlotMap;

pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
