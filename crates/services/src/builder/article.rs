//! 公众号文章工作流控制器
//!
//! 状态机：idle → generating_text → generating_images → complete，
//! 正文生成失败转入 error 终态；配图失败只标记对应槽位，不影响完成。

use std::sync::Arc;

use redgreen_core::types::{Article, RunPhase};
use redgreen_providers::{ImageGenerator, TextGenerator};
use serde::Serialize;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::now_millis;
use super::slots::SlotMap;

/// 文章工作流状态快照
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ArticleBuilderState {
    pub run_id: Option<Uuid>,
    pub phase: RunPhase,
    pub article: Option<Article>,
    pub images: SlotMap,
    pub updated_at: i64,
}

impl Default for ArticleBuilderState {
    fn default() -> Self {
        Self {
            run_id: None,
            phase: RunPhase::Idle,
            article: None,
            images: SlotMap::default(),
            updated_at: now_millis(),
        }
    }
}

/// 文章工作流服务
///
/// 状态树归本服务独占，与图文工作流互不共享。
pub struct ArticleBuilderService {
    text: Arc<dyn TextGenerator>,
    image: Arc<dyn ImageGenerator>,
    state: Arc<RwLock<ArticleBuilderState>>,
}

impl ArticleBuilderService {
    pub fn new(text: Arc<dyn TextGenerator>, image: Arc<dyn ImageGenerator>) -> Self {
        Self {
            text,
            image,
            state: Arc::new(RwLock::new(ArticleBuilderState::default())),
        }
    }

    /// 提交一次生成
    ///
    /// 空白主题视为无效提交：不改状态、不发请求、返回 None。
    /// 有效提交会替换当前 run_id 并清空上一轮内容，
    /// 被取代运行的在途结果之后都会被丢弃。
    pub async fn generate(&self, topic: &str, image_count: usize) -> Option<Uuid> {
        let topic = topic.trim();
        if topic.is_empty() {
            return None;
        }

        let run_id = Uuid::new_v4();
        {
            let mut state = self.state.write().await;
            state.run_id = Some(run_id);
            state.phase = RunPhase::GeneratingText;
            state.article = None;
            state.images.clear();
            state.updated_at = now_millis();
        }
        info!("文章生成开始: run_id={run_id} topic={topic}");

        let text = self.text.clone();
        let image = self.image.clone();
        let state = self.state.clone();
        let topic = topic.to_string();
        tokio::spawn(async move {
            run_article(text, image, state, run_id, topic, image_count).await;
        });

        Some(run_id)
    }

    /// 当前状态快照
    pub async fn snapshot(&self) -> ArticleBuilderState {
        self.state.read().await.clone()
    }
}

/// 单轮文章生成驱动
async fn run_article(
    text: Arc<dyn TextGenerator>,
    image: Arc<dyn ImageGenerator>,
    state: Arc<RwLock<ArticleBuilderState>>,
    run_id: Uuid,
    topic: String,
    image_count: usize,
) {
    // 1. 正文结构（硬依赖）
    let article = match text.generate_article(&topic, image_count).await {
        Ok(article) => article,
        Err(error) => {
            warn!("文章结构生成失败: run_id={run_id} err={error}");
            let mut state = state.write().await;
            if state.run_id == Some(run_id) {
                state.phase = RunPhase::Error;
                state.updated_at = now_millis();
            }
            return;
        }
    };

    // 2. 登记结构与配图槽位
    let prompts = article.image_slots();
    {
        let mut state = state.write().await;
        if state.run_id != Some(run_id) {
            debug!("文章结果已过期，丢弃: run_id={run_id}");
            return;
        }
        state.article = Some(article);
        state.phase = RunPhase::GeneratingImages;
        for (index, prompt) in &prompts {
            state.images.init_loading(*index, prompt);
        }
        state.updated_at = now_millis();
    }

    // 3. 配图并发扇出，各槽位独立结算
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

    // 4. 全部结算后收尾（配图失败不阻止完成）
    let mut state = state.write().await;
    if state.run_id == Some(run_id) && state.phase == RunPhase::GeneratingImages {
        state.phase = RunPhase::Complete;
        state.updated_at = now_millis();
        info!(
            "文章生成完成: run_id={run_id} 配图成功={} 失败={}",
            state.images.resolved_count(),
            state.images.failed_count()
        );
    }
}

// ============================================================================
// 测试
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::test_support::{
        sample_article, wait_until, MockImage, MockText,
    };
    use std::sync::atomic::Ordering;

    fn build_service(
        text: MockText,
        image: MockImage,
    ) -> (ArticleBuilderService, Arc<MockText>, Arc<MockImage>) {
        let text = Arc::new(text);
        let image = Arc::new(image);
        let service = ArticleBuilderService::new(text.clone(), image.clone());
        (service, text, image)
    }

    #[tokio::test]
    async fn test_empty_topic_is_noop() {
        let (service, text, image) =
            build_service(MockText::articles(vec![Ok(sample_article(&["p1"]))]), MockImage::ok());

        assert!(service.generate("", 2).await.is_none());
        assert!(service.generate("   ", 2).await.is_none());

        let state = service.snapshot().await;
        assert_eq!(state.phase, RunPhase::Idle);
        assert!(state.run_id.is_none());
        assert_eq!(text.calls.load(Ordering::SeqCst), 0);
        assert_eq!(image.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_full_run_reaches_complete() {
        let (service, _text, image) = build_service(
            MockText::articles(vec![Ok(sample_article(&["p1", "p2"]))]),
            MockImage::ok(),
        );

        let run_id = service.generate("夏日健康生活", 2).await.unwrap();
        let state = wait_until(|| service.snapshot(), |s| s.phase == RunPhase::Complete).await;

        assert_eq!(state.run_id, Some(run_id));
        assert!(state.article.is_some());
        // 槽位数与配图调用数都等于 image_prompt 段落数
        assert_eq!(state.images.len(), 2);
        assert_eq!(image.calls.load(Ordering::SeqCst), 2);
        assert_eq!(state.images.resolved_count(), 2);
    }

    #[tokio::test]
    async fn test_text_failure_sets_error_without_image_calls() {
        let (service, _text, image) = build_service(MockText::articles(vec![Err(())]), MockImage::ok());

        service.generate("topic", 2).await.unwrap();
        let state = wait_until(|| service.snapshot(), |s| s.phase == RunPhase::Error).await;

        assert!(state.article.is_none());
        assert!(state.images.is_empty());
        assert_eq!(image.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_image_failures_do_not_block_completion() {
        let (service, _text, image) = build_service(
            MockText::articles(vec![Ok(sample_article(&["ok-1", "bad-2", "ok-3"]))]),
            MockImage::failing_on("bad"),
        );

        service.generate("topic", 3).await.unwrap();
        let state = wait_until(|| service.snapshot(), |s| s.phase == RunPhase::Complete).await;

        assert_eq!(image.calls.load(Ordering::SeqCst), 3);
        assert_eq!(state.images.resolved_count(), 2);
        assert_eq!(state.images.failed_count(), 1);
        // 失败槽位保留错误信息，成功槽位保留 URL
        let failed = state
            .images
            .iter()
            .find(|(_, slot)| slot.is_failed())
            .unwrap()
            .1;
        assert!(failed.error.is_some());
        assert!(failed.url.is_none());
    }

    #[tokio::test]
    async fn test_all_image_failures_still_reach_complete() {
        let (service, _text, image) = build_service(
            MockText::articles(vec![Ok(sample_article(&["bad-1", "bad-2", "bad-3"]))]),
            MockImage::failing_on("bad"),
        );

        service.generate("topic", 3).await.unwrap();
        let state = wait_until(|| service.snapshot(), |s| s.phase == RunPhase::Complete).await;

        // 配图全军覆没也不阻止完成，文章结构保留
        assert_eq!(image.calls.load(Ordering::SeqCst), 3);
        assert_eq!(state.images.resolved_count(), 0);
        assert_eq!(state.images.failed_count(), 3);
        assert!(state.article.is_some());
    }

    #[tokio::test]
    async fn test_stale_run_results_are_discarded() {
        let old_article = sample_article(&["old-a", "old-b"]);
        let new_article = sample_article(&["new-a"]);
        let image = MockImage::gated_on("old");
        let gate = image.gate();
        let (service, _text, image) = build_service(
            MockText::articles(vec![Ok(old_article), Ok(new_article)]),
            image,
        );

        // 第一轮：配图被闸门拦住，停在 generating_images
        let run_1 = service.generate("old topic", 2).await.unwrap();
        wait_until(
            || service.snapshot(),
            |s| s.phase == RunPhase::GeneratingImages,
        )
        .await;

        // 第二轮提交后替换 run_id，第一轮的在途配图成为孤儿
        let run_2 = service.generate("new topic", 1).await.unwrap();
        assert_ne!(run_1, run_2);
        let state = wait_until(|| service.snapshot(), |s| s.phase == RunPhase::Complete).await;
        assert_eq!(state.run_id, Some(run_2));

        // 放行第一轮的迟到结果，确认它们被丢弃
        gate.add_permits(2);
        wait_until(
            || async { image.completed.load(Ordering::SeqCst) },
            |completed| *completed == 3,
        )
        .await;
        tokio::time::sleep(std::time::Duration::from_millis(50)).await;

        let state = service.snapshot().await;
        assert_eq!(state.run_id, Some(run_2));
        assert_eq!(state.phase, RunPhase::Complete);
        assert_eq!(state.images.len(), 1);
        let (_, slot) = state.images.iter().next().unwrap();
        assert_eq!(slot.prompt, "new-a");
        assert!(slot.is_resolved());
    }
}
