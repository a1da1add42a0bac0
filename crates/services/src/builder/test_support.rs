//! 工作流测试替身
//!
//! Mock 生成器：可按队列返回结果、按提示词标记失败、
//! 用信号量闸门拦住指定提示词的配图调用以构造交错场景。

use std::collections::VecDeque;
use std::future::Future;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use redgreen_core::errors::GenerationError;
use redgreen_core::types::{Article, ArticleSection, Post};
use redgreen_providers::{ImageGenerator, TextGenerator};
use tokio::sync::Semaphore;

/// 按队列出结果的文本生成替身（队列耗尽后返回失败）
pub struct MockText {
    articles: Mutex<VecDeque<Result<Article, ()>>>,
    posts: Mutex<VecDeque<Result<Post, ()>>>,
    pub calls: AtomicUsize,
}

impl MockText {
    pub fn articles(items: Vec<Result<Article, ()>>) -> Self {
        Self {
            articles: Mutex::new(items.into()),
            posts: Mutex::new(VecDeque::new()),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn posts(items: Vec<Result<Post, ()>>) -> Self {
        Self {
            articles: Mutex::new(VecDeque::new()),
            posts: Mutex::new(items.into()),
            calls: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl TextGenerator for MockText {
    async fn generate_article(
        &self,
        _topic: &str,
        _image_slots: usize,
    ) -> Result<Article, GenerationError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match self.articles.lock().unwrap().pop_front() {
            Some(Ok(article)) => Ok(article),
            _ => Err(GenerationError::EmptyResponse),
        }
    }

    async fn generate_post(&self, _topic: &str) -> Result<Post, GenerationError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match self.posts.lock().unwrap().pop_front() {
            Some(Ok(post)) => Ok(post),
            _ => Err(GenerationError::EmptyResponse),
        }
    }
}

/// 可注入失败与闸门的图像生成替身
pub struct MockImage {
    /// 已发起的调用数
    pub calls: AtomicUsize,
    /// 已返回的调用数
    pub completed: AtomicUsize,
    fail_marker: Option<String>,
    gate_marker: Option<String>,
    gate: Arc<Semaphore>,
}

impl MockImage {
    /// 全部成功
    pub fn ok() -> Self {
        Self::build(None, None)
    }

    /// 提示词包含 `marker` 的调用返回 Err
    pub fn failing_on(marker: &str) -> Self {
        Self::build(Some(marker.to_string()), None)
    }

    /// 提示词包含 `marker` 的调用阻塞在闸门上，等测试放行
    pub fn gated_on(marker: &str) -> Self {
        Self::build(None, Some(marker.to_string()))
    }

    fn build(fail_marker: Option<String>, gate_marker: Option<String>) -> Self {
        Self {
            calls: AtomicUsize::new(0),
            completed: AtomicUsize::new(0),
            fail_marker,
            gate_marker,
            gate: Arc::new(Semaphore::new(0)),
        }
    }

    /// 闸门句柄，`add_permits(n)` 放行 n 个被拦住的调用
    pub fn gate(&self) -> Arc<Semaphore> {
        self.gate.clone()
    }
}

#[async_trait]
impl ImageGenerator for MockImage {
    async fn generate_image(&self, prompt: &str) -> Result<String, GenerationError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(marker) = &self.gate_marker {
            if prompt.contains(marker) {
                let permit = self.gate.acquire().await.expect("闸门已关闭");
                permit.forget();
            }
        }
        let result = if self
            .fail_marker
            .as_ref()
            .is_some_and(|marker| prompt.contains(marker))
        {
            Err(GenerationError::EmptyResponse)
        } else {
            Ok(format!("mock://image/{prompt}"))
        };
        self.completed.fetch_add(1, Ordering::SeqCst);
        result
    }
}

/// 构造含指定配图提示词的文章：开头一个标题段，之后每个提示词前配一个正文段
pub fn sample_article(prompts: &[&str]) -> Article {
    let mut sections = vec![ArticleSection::Heading {
        content: "开篇".to_string(),
        style: Some("font-weight: bold;".to_string()),
    }];
    for prompt in prompts {
        sections.push(ArticleSection::Paragraph {
            content: "正文段落".to_string(),
            style: None,
        });
        sections.push(ArticleSection::ImagePrompt {
            content: (*prompt).to_string(),
        });
    }
    Article {
        title: "测试文章".to_string(),
        sections,
    }
}

/// 构造含指定配图提示词的图文
pub fn sample_post(prompts: &[&str]) -> Post {
    Post {
        title: "测试图文✨".to_string(),
        content: "第一段\n第二段".to_string(),
        tags: vec!["#tag1".to_string(), "#tag2".to_string()],
        image_prompts: prompts.iter().map(|p| (*p).to_string()).collect(),
    }
}

/// 轮询直到快照满足条件，2 秒超时
pub async fn wait_until<F, Fut, T, P>(mut poll: F, predicate: P) -> T
where
    F: FnMut() -> Fut,
    Fut: Future<Output = T>,
    P: Fn(&T) -> bool,
{
    tokio::time::timeout(Duration::from_secs(2), async {
        loop {
            let value = poll().await;
            if predicate(&value) {
                return value;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    })
    .await
    .expect("等待状态超时")
}
