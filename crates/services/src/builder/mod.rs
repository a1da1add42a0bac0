//! 生成工作流控制器
//!
//! 两套工作流（公众号文章 / 小红书图文）共用同一套运行模式：
//! 校验输入 → 生成正文 → 并发生成配图（按槽位独立结算）→ 聚合完成。
//!
//! 每轮运行带一个 run_id，所有状态写入都先核对 run_id：
//! 新提交会替换 run_id，被取代的运行在途结果一律丢弃，不会覆盖新状态。

pub mod article;
pub mod post;
pub mod slots;

#[cfg(test)]
pub(crate) mod test_support;

/// 当前毫秒时间戳
pub(crate) fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}
