//! 服务入口
//!
//! 读取环境配置，装配 Gemini 客户端与两套工作流，启动 HTTP 服务。

use std::sync::Arc;

use anyhow::Context;
use redgreen_core::config::{GeneratorConfig, ServerConfig};
use redgreen_providers::GeminiClient;
use redgreen_server::{router, AppState};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let generator = GeneratorConfig::from_env().map_err(anyhow::Error::msg)?;
    let server = ServerConfig::from_env();
    info!(
        "redgreen v{} 启动: text_model={} image_model={}",
        redgreen_core::version(),
        generator.text_model,
        generator.image_model
    );

    let client = Arc::new(GeminiClient::new(generator).context("构建 Gemini 客户端失败")?);
    let state = AppState::new(client.clone(), client);
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(&server.listen_addr)
        .await
        .with_context(|| format!("监听地址绑定失败: {}", server.listen_addr))?;
    info!("HTTP 服务就绪: http://{}", server.listen_addr);
    axum::serve(listener, app).await.context("HTTP 服务异常退出")?;
    Ok(())
}
