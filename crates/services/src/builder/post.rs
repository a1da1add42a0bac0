//! 小红书图文工作流控制器
//!
//! 与文章工作流同一套运行模式；配图槽位来自生成端约定的
//! 4 条提示词，按下标独立结算。

use std::sync::Arc;

use redgreen_core::types::{Post, RunPhase};
use redgreen_providers::{ImageGenerator, TextGenerator};
use serde::Serialize;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::now_millis;
use super::slots::SlotMap;

/// 图文工作流状态快照
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostBuilderState {
    pub run_id: Option<Uuid>,
    pub phase: RunPhase,
    pub post: Option<Post>,
    pub images: SlotMap,
    pub updated_at: i64,
}

impl Default for PostBuilderState {
    fn default() -> Self {
        Self {
            run_id: None,
            phase: RunPhase::Idle,
            post: None,
            images: SlotMap::default(),
            updated_at: now_millis(),
        }
    }
}

/// 图文工作流服务
///
/// 状态树归本服务独占，与文章工作流互不共享。
pub struct PostBuilderService {
    text: Arc<dyn TextGenerator>,
    image: Arc<dyn ImageGenerator>,
    state: Arc<RwLock<PostBuilderState>>,
}

impl PostBuilderService {
    pub fn new(text: Arc<dyn TextGenerator>, image: Arc<dyn ImageGenerator>) -> Self {
        Self {
            text,
            image,
            state: Arc::new(RwLock::new(PostBuilderState::default())),
        }
    }

    /// 提交一次生成
    ///
    /// 空白主题视为无效提交：不改状态、不发请求、返回 None。
    pub async fn generate(&self, topic: &str) -> Option<Uuid> {
        let topic = topic.trim();
        if topic.is_empty() {
            return None;
        }

        let run_id = Uuid::new_v4();
        {
            let mut state = self.state.write().await;
            state.run_id = Some(run_id);
            state.phase = RunPhase::GeneratingText;
            state.post = None;
            state.images.clear();
            state.updated_at = now_millis();
        }
        info!("图文生成开始: run_id={run_id} topic={topic}");

        let text = self.text.clone();
        let image = self.image.clone();
        let state = self.state.clone();
        let topic = topic.to_string();
        tokio::spawn(async move {
            run_post(text, image, state, run_id, topic).await;
        });

        Some(run_id)
    }

    /// 当前状态快照
    pub async fn snapshot(&self) -> PostBuilderState {
        self.state.read().await.clone()
    }
}

/// 单轮图文生成驱动
async fn run_post(
    text: Arc<dyn TextGenerator>,
    image: Arc<dyn ImageGenerator>,
    state: Arc<RwLock<PostBuilderState>>,
    run_id: Uuid,
    topic: String,
) {
    let post = match text.generate_post(&topic).await {
        Ok(post) => post,
        Err(error) => {
            warn!("图文内容生成失败: run_id={run_id} err={error}");
            let mut state = state.write().await;
            if state.run_id == Some(run_id) {
                state.phase = RunPhase::Error;
                state.updated_at = now_millis();
            }
            return;
        }
    };

    let prompts = post.image_slots();
    {
        let mut state = state.write().await;
        if state.run_id != Some(run_id) {
            debug!("图文结果已过期，丢弃: run_id={run_id}");
            return;
        }
        state.post = Some(post);
        state.phase = RunPhase::GeneratingImages;
        for (index, prompt) in &prompts {
            state.images.init_loading(*index, prompt);
        }
        state.updated_at = now_millis();
    }

    let mut tasks = Vec::with_capacity(prompts.len());
    for (index, prompt) in prompts {
        let image = image.clone();
        let state = state.clone();
        tasks.push(tokio::spawn(async move {
            let result = image.generate_image(&prompt).await;
            let mut state = state.write().await;
            if state.run_id != Some(run_id) {
                debug!("配图结果已过期，丢弃: run_id={run_id} slot={index}");
                return;
            }
            match result {
                Ok(url) => state.images.resolve(index, url),
                Err(error) => state.images.fail(index, error.to_string()),
            }
            state.updated_at = now_millis();
        }));
    }
    for task in tasks {
        let _ = task.await;
    }

    let mut state = state.write().await;
    if state.run_id == Some(run_id) && state.phase == RunPhase::GeneratingImages {
        state.phase = RunPhase::Complete;
        state.updated_at = now_millis();
        info!(
            "图文生成完成: run_id={run_id} 配图成功={} 失败={}",
            state.images.resolved_count(),
            state.images.failed_count()
        );
    }
}

// ============================================================================
// 测试
// ============================================================================
