//! 配置模块
//!
//! 生成服务与 HTTP 外壳的配置，启动时从环境变量读取。
//! 除 API Key 外全部有默认值。

use std::env;

/// 默认的 Gemini REST 接口地址
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";
/// 默认文本生成模型
pub const DEFAULT_TEXT_MODEL: &str = "gemini-3-flash-preview";
/// 默认图像生成模型
pub const DEFAULT_IMAGE_MODEL: &str = "gemini-2.5-flash-image";
/// 默认请求超时（秒）
pub const DEFAULT_TIMEOUT_SECS: u64 = 45;
/// 默认监听地址
pub const DEFAULT_LISTEN_ADDR: &str = "127.0.0.1:8787";

/// 生成服务配置
#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    /// API Key（唯一必填项）
    pub api_key: String,
    /// 接口 Base URL
    pub base_url: String,
    /// 文本生成模型
    pub text_model: String,
    /// 图像生成模型
    pub image_model: String,
    /// 单次请求超时（秒）
    pub timeout_secs: u64,
}

impl GeneratorConfig {
    /// 使用默认接口参数创建配置
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            text_model: DEFAULT_TEXT_MODEL.to_string(),
            image_model: DEFAULT_IMAGE_MODEL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }

    /// 从环境变量读取配置
    ///
    /// 必填：`GEMINI_API_KEY`；
    /// 可选：`GEMINI_BASE_URL`、`GEMINI_TEXT_MODEL`、`GEMINI_IMAGE_MODEL`、
    /// `GEMINI_TIMEOUT_SECS`。
    pub fn from_env() -> Result<Self, String> {
        let api_key = env::var("GEMINI_API_KEY")
            .map_err(|_| "缺少 GEMINI_API_KEY 环境变量".to_string())?;

        let mut config = Self::new(api_key);
        if let Ok(base_url) = env::var("GEMINI_BASE_URL") {
            if !base_url.trim().is_empty() {
                config.base_url = base_url;
            }
        }
        if let Ok(model) = env::var("GEMINI_TEXT_MODEL") {
            if !model.trim().is_empty() {
                config.text_model = model;
            }
        }
        if let Ok(model) = env::var("GEMINI_IMAGE_MODEL") {
            if !model.trim().is_empty() {
                config.image_model = model;
            }
        }
        if let Ok(timeout) = env::var("GEMINI_TIMEOUT_SECS") {
            if let Ok(secs) = timeout.parse::<u64>() {
                config.timeout_secs = secs;
            }
        }

        Ok(config)
    }
}

/// HTTP 外壳配置
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// 监听地址，形如 `127.0.0.1:8787`
    pub listen_addr: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: DEFAULT_LISTEN_ADDR.to_string(),
        }
    }
}

impl ServerConfig {
    /// 从环境变量读取配置（`REDGREEN_LISTEN`，可选）
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(addr) = env::var("REDGREEN_LISTEN") {
            if !addr.trim().is_empty() {
                config.listen_addr = addr;
            }
        }
        config
    }
}
