//! Gemini 生成客户端
//!
//! 封装 `generateContent` REST 接口的两类调用：
//! - 文本生成：带 responseSchema 约束，响应文本按约定结构严格反序列化；
//! - 图像生成：提取响应中第一个内联图像并编码为 data URI，
//!   任何失败都回退到确定性的占位图（见 [`crate::fallback`]）。

use std::time::Duration;

use async_trait::async_trait;
use redgreen_core::config::GeneratorConfig;
use redgreen_core::errors::GenerationError;
use redgreen_core::types::{Article, Post};
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{debug, warn};

use crate::fallback;
use crate::{ImageGenerator, TextGenerator};

// ============================================================================
// 接口报文结构
// ============================================================================

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<RequestContent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig>,
}

#[derive(Debug, Clone, Serialize)]
struct RequestContent {
    parts: Vec<RequestPart>,
}

#[derive(Debug, Clone, Serialize)]
struct RequestPart {
    text: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    response_mime_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_schema: Option<Value>,
}

#[derive(Debug, Clone, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Clone, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Clone, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ResponsePart {
    #[serde(default)]
    text: Option<String>,
    #[serde(default)]
    inline_data: Option<InlineData>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct InlineData {
    mime_type: String,
    /// base64 编码的图像数据
    data: String,
}

// ============================================================================
// 客户端
// ============================================================================

/// Gemini 生成客户端
///
/// 同一个客户端同时承担文本与图像生成，模型名由配置决定。
pub struct GeminiClient {
    http: Client,
    config: GeneratorConfig,
}

impl GeminiClient {
    pub fn new(config: GeneratorConfig) -> Result<Self, GenerationError> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|error| GenerationError::Request(error.to_string()))?;
        Ok(Self { http, config })
    }

    fn endpoint(&self, model: &str) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.config.base_url.trim_end_matches('/'),
            model
        )
    }

    async fn generate_content(
        &self,
        model: &str,
        prompt: String,
        generation_config: Option<GenerationConfig>,
    ) -> Result<GenerateContentResponse, GenerationError> {
        let request = GenerateContentRequest {
            contents: vec![RequestContent {
                parts: vec![RequestPart { text: prompt }],
            }],
            generation_config,
        };

        let response = self
            .http
            .post(self.endpoint(model))
            .header("x-goog-api-key", &self.config.api_key)
            .header(CONTENT_TYPE, "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|error| GenerationError::Request(error.to_string()))?;

        let status = response.status();
        let payload = response
            .text()
            .await
            .map_err(|error| GenerationError::Request(error.to_string()))?;

        if !status.is_success() {
            return Err(GenerationError::Upstream {
                status: status.as_u16(),
                message: preview_payload(&payload),
            });
        }

        Ok(serde_json::from_str(&payload)?)
    }
}

#[async_trait]
impl TextGenerator for GeminiClient {
    async fn generate_article(
        &self,
        topic: &str,
        image_slots: usize,
    ) -> Result<Article, GenerationError> {
        debug!("生成文章结构: topic={topic} 配图数={image_slots}");
        let response = self
            .generate_content(
                &self.config.text_model,
                article_prompt(topic, image_slots),
                Some(GenerationConfig {
                    response_mime_type: "application/json".to_string(),
                    response_schema: Some(article_response_schema()),
                }),
            )
            .await?;

        let text = extract_text(&response).ok_or(GenerationError::EmptyResponse)?;
        Ok(serde_json::from_str(&text)?)
    }

    async fn generate_post(&self, topic: &str) -> Result<Post, GenerationError> {
        debug!("生成图文内容: topic={topic}");
        let response = self
            .generate_content(
                &self.config.text_model,
                post_prompt(topic),
                Some(GenerationConfig {
                    response_mime_type: "application/json".to_string(),
                    response_schema: Some(post_response_schema()),
                }),
            )
            .await?;

        let text = extract_text(&response).ok_or(GenerationError::EmptyResponse)?;
        Ok(serde_json::from_str(&text)?)
    }
}

#[async_trait]
impl ImageGenerator for GeminiClient {
    /// 生成单张配图
    ///
    /// 永不返回 Err：无论传输失败还是响应缺少图像数据，
    /// 都回退到占位图，配图失败不允许中断整轮运行。
    async fn generate_image(&self, prompt: &str) -> Result<String, GenerationError> {
        match self
            .generate_content(&self.config.image_model, prompt.to_string(), None)
            .await
        {
            Ok(response) => match extract_inline_image(&response) {
                Some(data_uri) => Ok(data_uri),
                None => {
                    warn!("图像响应缺少内联图像数据，使用占位图");
                    Ok(fallback::placeholder_url(prompt))
                }
            },
            Err(error) => {
                warn!("图像生成失败，使用占位图: {error}");
                Ok(fallback::placeholder_url(prompt))
            }
        }
    }
}

// ============================================================================
// 响应提取
// ============================================================================

/// 取第一个候选的第一个非空文本 part
fn extract_text(response: &GenerateContentResponse) -> Option<String> {
    response
        .candidates
        .iter()
        .filter_map(|candidate| candidate.content.as_ref())
        .flat_map(|content| content.parts.iter())
        .find_map(|part| match &part.text {
            Some(text) if !text.trim().is_empty() => Some(text.clone()),
            _ => None,
        })
}

/// 取响应中第一个内联图像并编码为 data URI
fn extract_inline_image(response: &GenerateContentResponse) -> Option<String> {
    response
        .candidates
        .iter()
        .filter_map(|candidate| candidate.content.as_ref())
        .flat_map(|content| content.parts.iter())
        .find_map(|part| {
            part.inline_data
                .as_ref()
                .map(|inline| format!("data:{};base64,{}", inline.mime_type, inline.data))
        })
}

/// 截断错误响应正文，按字符截断避免 UTF-8 边界问题
fn preview_payload(payload: &str) -> String {
    const MAX_CHARS: usize = 280;
    let chars: Vec<char> = payload.chars().collect();
    if chars.len() <= MAX_CHARS {
        payload.to_string()
    } else {
        format!("{}...", chars[..MAX_CHARS].iter().collect::<String>())
    }
}

// ============================================================================
// 提示词与输出结构约定
// ============================================================================

fn article_prompt(topic: &str, image_slots: usize) -> String {
    format!(
        r#"You are a professional WeChat Official Account (公众号) editor.
Create a detailed, engaging article about the topic: "{topic}".

Requirements:
1. Structure the response strictly as JSON.
2. The article must be suitable for copying into the WeChat editor.
3. Use inline CSS styles for 'heading' types to make them look aesthetically pleasing (e.g., bottom borders, colored text, bolding). Use a professional color palette (e.g., #333 text, #007bff or #d9534f accents).
4. Include exactly {image_slots} places where an image should be inserted. Mark these as type "image_prompt".
5. For "image_prompt", the content field must be a detailed English prompt describing the image to be generated."#
    )
}

fn post_prompt(topic: &str) -> String {
    format!(
        r#"You are a top Xiaohongshu (Little Red Book) influencer.
Create a viral post about: "{topic}".

Requirements:
1. Tone: Enthusiastic, authentic, emoji-heavy (use lots of emojis!).
2. Format: Short paragraphs, bullet points.
3. Include 3-5 distinct tags (hashtags).
4. Generate exactly 4 distinct image prompts that would go well with this post (e.g., cover image, detail shots). These prompts must be in English."#
    )
}

fn article_response_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "title": { "type": "STRING" },
            "sections": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "type": {
                            "type": "STRING",
                            "enum": ["heading", "paragraph", "image_prompt"]
                        },
                        "content": { "type": "STRING" },
                        "style": { "type": "STRING" }
                    },
                    "required": ["type", "content"]
                }
            }
        },
        "required": ["title", "sections"]
    })
}

fn post_response_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "title": { "type": "STRING" },
            "content": { "type": "STRING" },
            "tags": { "type": "ARRAY", "items": { "type": "STRING" } },
            "imagePrompts": { "type": "ARRAY", "items": { "type": "STRING" } }
        },
        "required": ["title", "content", "tags", "imagePrompts"]
    })
}

// ============================================================================
// 测试
// ============================================================================
