//! HTTP 外壳 crate
//!
//! 将两套创作工作流暴露为本机 HTTP 服务：
//! - GET  /                     - 内嵌前端页面
//! - POST /api/article/generate - 提交文章生成
//! - GET  /api/article/state    - 文章工作流状态快照
//! - GET  /api/article/preview  - 文章预览 HTML
//! - POST /api/article/export   - 文章复制到剪贴板
//! - POST /api/post/generate    - 提交图文生成
//! - GET  /api/post/state       - 图文工作流状态快照
//! - GET  /api/post/preview     - 图文预览 HTML
//!
//! 状态快照为 JSON，前端轮询 state/preview 获得进度。

pub mod shell;

use std::sync::Arc;

use axum::extract::State;
use axum::response::Html;
use axum::routing::{get, post};
use axum::{Json, Router};
use redgreen_providers::{ImageGenerator, TextGenerator};
use redgreen_render::preview::{render_article_preview, render_post_preview};
use redgreen_services::{
    ArticleBuilderService, ArticleBuilderState, PostBuilderService, PostBuilderState,
};
use serde::{Deserialize, Serialize};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::warn;
use uuid::Uuid;

use crate::shell::SHELL_PAGE;

/// 单次文章生成的配图段落数上限
const MAX_IMAGE_COUNT: usize = 5;
/// 默认配图段落数
const DEFAULT_IMAGE_COUNT: usize = 2;

/// 共享应用状态
///
/// 两个工作流服务各自持有独立状态树。
#[derive(Clone)]
pub struct AppState {
    pub article: Arc<ArticleBuilderService>,
    pub post: Arc<PostBuilderService>,
}

impl AppState {
    pub fn new(text: Arc<dyn TextGenerator>, image: Arc<dyn ImageGenerator>) -> Self {
        Self {
            article: Arc::new(ArticleBuilderService::new(text.clone(), image.clone())),
            post: Arc::new(PostBuilderService::new(text, image)),
        }
    }
}

/// 构建路由
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(shell_page))
        .route("/api/article/generate", post(generate_article))
        .route("/api/article/state", get(article_state))
        .route("/api/article/preview", get(article_preview))
        .route("/api/article/export", post(export_article))
        .route("/api/post/generate", post(generate_post))
        .route("/api/post/state", get(post_state))
        .route("/api/post/preview", get(post_preview))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

// ============================================================================
// 请求 / 响应体
// ============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateArticleRequest {
    pub topic: String,
    #[serde(default = "default_image_count")]
    pub image_count: usize,
}

fn default_image_count() -> usize {
    DEFAULT_IMAGE_COUNT
}

#[derive(Debug, Deserialize)]
pub struct GeneratePostRequest {
    pub topic: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateResponse {
    /// 是否实际启动了一轮生成（空白主题返回 false）
    pub started: bool,
    pub run_id: Option<Uuid>,
}

#[derive(Debug, Serialize)]
pub struct ExportResponse {
    pub ok: bool,
    pub message: String,
}

// ============================================================================
// 处理器
// ============================================================================

async fn shell_page() -> Html<&'static str> {
    Html(SHELL_PAGE)
}

async fn generate_article(
    State(app): State<AppState>,
    Json(request): Json<GenerateArticleRequest>,
) -> Json<GenerateResponse> {
    let image_count = request.image_count.clamp(1, MAX_IMAGE_COUNT);
    let run_id = app.article.generate(&request.topic, image_count).await;
    Json(GenerateResponse {
        started: run_id.is_some(),
        run_id,
    })
}

async fn article_state(State(app): State<AppState>) -> Json<ArticleBuilderState> {
    Json(app.article.snapshot().await)
}

async fn article_preview(State(app): State<AppState>) -> Html<String> {
    Html(render_article_preview(&app.article.snapshot().await))
}

async fn export_article(State(app): State<AppState>) -> Json<ExportResponse> {
    let snapshot = app.article.snapshot().await;
    // 剪贴板是阻塞系统调用，移出异步上下文
    let result =
        tokio::task::spawn_blocking(move || redgreen_render::export_article(&snapshot)).await;
    match result {
        Ok(Ok(())) => Json(ExportResponse {
            ok: true,
            message: "Copied to clipboard! Ready to paste into WeChat Editor.".to_string(),
        }),
        Ok(Err(error)) => {
            warn!("剪贴板导出失败: {error}");
            Json(ExportResponse {
                ok: false,
                message: "Copy failed. Please manually select and copy.".to_string(),
            })
        }
        Err(error) => {
            warn!("剪贴板导出任务异常: {error}");
            Json(ExportResponse {
                ok: false,
                message: "Copy failed. Please manually select and copy.".to_string(),
            })
        }
    }
}

async fn generate_post(
    State(app): State<AppState>,
    Json(request): Json<GeneratePostRequest>,
) -> Json<GenerateResponse> {
    let run_id = app.post.generate(&request.topic).await;
    Json(GenerateResponse {
        started: run_id.is_some(),
        run_id,
    })
}

async fn post_state(State(app): State<AppState>) -> Json<PostBuilderState> {
    Json(app.post.snapshot().await)
}

async fn post_preview(State(app): State<AppState>) -> Html<String> {
    Html(render_post_preview(&app.post.snapshot().await))
}

// ============================================================================
// 测试
// ============================================================================
