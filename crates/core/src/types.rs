//! 内容类型定义
//!
//! 定义公众号文章、小红书图文、配图槽位与运行阶段等核心数据结构。
//! 文章与图文的 JSON 结构即生成接口约定的输出结构，按严格反序列化处理。

use serde::{Deserialize, Serialize};

/// 文章段落（带类型标签的联合体）
///
/// 生成接口返回 `{ "type": "...", "content": "...", "style": "..." }`，
/// 其中 `heading` / `paragraph` 的 content 为富文本，style 为内联 CSS；
/// `image_prompt` 的 content 为配图的英文提示词。
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ArticleSection {
    /// 小标题
    Heading {
        content: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        style: Option<String>,
    },
    /// 正文段落
    Paragraph {
        content: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        style: Option<String>,
    },
    /// 配图占位（content 为图像提示词）
    ImagePrompt { content: String },
}

/// 公众号文章结构
///
/// sections 保持生成顺序，配图槽位按段落下标寻址。
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Article {
    pub title: String,
    pub sections: Vec<ArticleSection>,
}

impl Article {
    /// 枚举所有配图槽位：(段落下标, 图像提示词)
    pub fn image_slots(&self) -> Vec<(usize, String)> {
        self.sections
            .iter()
            .enumerate()
            .filter_map(|(index, section)| match section {
                ArticleSection::ImagePrompt { content } => Some((index, content.clone())),
                _ => None,
            })
            .collect()
    }
}

/// 小红书图文内容
///
/// image_prompts 由生成端约定固定为 4 条，这里不做校验。
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub title: String,
    pub content: String,
    pub tags: Vec<String>,
    pub image_prompts: Vec<String>,
}

impl Post {
    /// 枚举所有配图槽位：(提示词下标, 图像提示词)
    pub fn image_slots(&self) -> Vec<(usize, String)> {
        self.image_prompts
            .iter()
            .enumerate()
            .map(|(index, prompt)| (index, prompt.clone()))
            .collect()
    }
}

/// 单个配图槽位的状态记录
///
/// 槽位在提示词确定的那一刻以 loading 态创建，
/// 之后恰好结算一次：要么 resolved（url 有值），要么 failed（error 有值），
/// 不会回到 loading。
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GeneratedImage {
    pub prompt: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    pub loading: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl GeneratedImage {
    /// 以 loading 态创建槽位
    pub fn loading(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            url: None,
            loading: true,
            error: None,
        }
    }

    /// 结算为成功（仅允许从 loading 态结算一次）
    pub fn resolve(&mut self, url: String) {
        if !self.loading {
            return;
        }
        self.loading = false;
        self.url = Some(url);
    }

    /// 结算为失败（仅允许从 loading 态结算一次）
    pub fn fail(&mut self, message: String) {
        if !self.loading {
            return;
        }
        self.loading = false;
        self.error = Some(message);
    }

    pub fn is_resolved(&self) -> bool {
        self.url.is_some()
    }

    pub fn is_failed(&self) -> bool {
        !self.loading && self.url.is_none()
    }
}

/// 工作流运行阶段
///
/// 单次运行内单调推进：idle → generating_text → generating_images → complete；
/// error 为终态，只有用户重新提交才会开始新一轮。
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RunPhase {
    Idle,
    GeneratingText,
    GeneratingImages,
    Complete,
    Error,
}

impl Default for RunPhase {
    fn default() -> Self {
        Self::Idle
    }
}

impl RunPhase {
    /// 是否有生成请求在途
    pub fn is_busy(&self) -> bool {
        matches!(self, Self::GeneratingText | Self::GeneratingImages)
    }
}

// ============================================================================
// 测试
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_article_section_tagged_parse() {
        let json = r#"{
            "title": "夏日健康生活指南",
            "sections": [
                { "type": "heading", "content": "引言", "style": "font-size: 18px;" },
                { "type": "paragraph", "content": "正文内容…", "style": "line-height: 1.8;" },
                { "type": "image_prompt", "content": "A high quality photo of summer fruits", "style": "" }
            ]
        }"#;

        let article: Article = serde_json::from_str(json).unwrap();
        assert_eq!(article.title, "夏日健康生活指南");
        assert_eq!(article.sections.len(), 3);
        assert!(matches!(
            article.sections[0],
            ArticleSection::Heading { .. }
        ));
        assert!(matches!(
            article.sections[2],
            ArticleSection::ImagePrompt { .. }
        ));
    }

    #[test]
    fn test_article_rejects_unknown_section_type() {
        let json = r#"{
            "title": "t",
            "sections": [ { "type": "video_prompt", "content": "x" } ]
        }"#;
        assert!(serde_json::from_str::<Article>(json).is_err());
    }

    #[test]
    fn test_article_image_slots_preserve_indices() {
        let article = Article {
            title: "t".into(),
            sections: vec![
                ArticleSection::Heading {
                    content: "h".into(),
                    style: None,
                },
                ArticleSection::ImagePrompt {
                    content: "p1".into(),
                },
                ArticleSection::Paragraph {
                    content: "p".into(),
                    style: None,
                },
                ArticleSection::ImagePrompt {
                    content: "p2".into(),
                },
            ],
        };

        let slots = article.image_slots();
        assert_eq!(slots, vec![(1, "p1".to_string()), (3, "p2".to_string())]);
    }

    #[test]
    fn test_post_parses_camel_case_image_prompts() {
        let json = r##"{
            "title": "夏日OOTD💗",
            "content": "今天分享…",
            "tags": ["#OOTD", "#夏日穿搭"],
            "imagePrompts": ["p1", "p2", "p3", "p4"]
        }"##;

        let post: Post = serde_json::from_str(json).unwrap();
        assert_eq!(post.image_prompts.len(), 4);
        assert_eq!(post.image_slots()[3], (3, "p4".to_string()));
    }

    #[test]
    fn test_generated_image_settles_exactly_once() {
        let mut slot = GeneratedImage::loading("prompt");
        assert!(slot.loading);

        slot.resolve("data:image/png;base64,xx".into());
        assert!(slot.is_resolved());
        assert!(!slot.loading);

        // 已结算的槽位不再接受任何转移
        slot.fail("late failure".into());
        assert!(slot.error.is_none());
        assert!(slot.is_resolved());
    }

    #[test]
    fn test_generated_image_failure_state() {
        let mut slot = GeneratedImage::loading("prompt");
        slot.fail("upstream error".into());
        assert!(slot.is_failed());
        assert!(!slot.is_resolved());

        slot.resolve("url".into());
        assert!(slot.url.is_none());
    }

    #[test]
    fn test_run_phase_serde_names() {
        assert_eq!(
            serde_json::to_string(&RunPhase::GeneratingText).unwrap(),
            "\"generating_text\""
        );
        assert_eq!(
            serde_json::to_string(&RunPhase::GeneratingImages).unwrap(),
            "\"generating_images\""
        );
        let phase: RunPhase = serde_json::from_str("\"complete\"").unwrap();
        assert_eq!(phase, RunPhase::Complete);
    }

    #[test]
    fn test_run_phase_busy() {
        assert!(RunPhase::GeneratingText.is_busy());
        assert!(RunPhase::GeneratingImages.is_busy());
        assert!(!RunPhase::Idle.is_busy());
        assert!(!RunPhase::Complete.is_busy());
        assert!(!RunPhase::Error.is_busy());
    }
}
