//! 生成服务 Provider crate
//!
//! 定义文本/图像生成的 trait 接口与 Gemini 实现。
//! 控制器只依赖 trait，便于替换上游与注入测试替身。

pub mod fallback;
pub mod gemini;

use async_trait::async_trait;
use redgreen_core::errors::GenerationError;
use redgreen_core::types::{Article, Post};

pub use gemini::GeminiClient;

/// 结构化文本生成接口
///
/// 文本生成是硬依赖：失败会让整轮运行进入 error 终态。
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// 生成公众号文章结构，包含恰好 `image_slots` 个配图槽位
    async fn generate_article(
        &self,
        topic: &str,
        image_slots: usize,
    ) -> Result<Article, GenerationError>;

    /// 生成小红书图文内容（约定含 4 条配图提示词）
    async fn generate_post(&self, topic: &str) -> Result<Post, GenerationError>;
}

/// 图像生成接口
///
/// 图像生成是软依赖：Gemini 实现失败时在内部回退到占位图、永不返回 Err；
/// Err 分支由控制器标记为单槽位失败。
#[async_trait]
pub trait ImageGenerator: Send + Sync {
    async fn generate_image(&self, prompt: &str) -> Result<String, GenerationError>;
}
