//! 错误类型模块
//!
//! 定义生成链路与导出链路的错误类型：
//! - `GenerationError`：文本/图像生成接口错误（对文本生成是致命错误）
//! - `ExportError`：剪贴板导出错误（仅提示用户，不影响工作流状态）

use thiserror::Error;

/// 生成接口错误
///
/// 文本生成的任何失败都会让当前运行进入 error 终态；
/// 图像生成的失败只标记单个槽位，不会中断运行。
#[derive(Error, Debug)]
pub enum GenerationError {
    /// 请求未能送达上游（网络、超时等）
    #[error("生成接口请求失败: {0}")]
    Request(String),

    /// 上游返回非 2xx 状态
    #[error("上游返回错误 ({status}): {message}")]
    Upstream { status: u16, message: String },

    /// 响应中没有可用的文本内容
    #[error("生成结果为空")]
    EmptyResponse,

    /// 响应文本不符合约定的 JSON 结构
    #[error("生成结果不符合约定结构: {0}")]
    InvalidSchema(#[from] serde_json::Error),
}

impl From<GenerationError> for String {
    fn from(err: GenerationError) -> Self {
        err.to_string()
    }
}

/// 剪贴板导出错误
#[derive(Error, Debug)]
pub enum ExportError {
    /// 当前没有渲染完成的文章可导出
    #[error("没有可导出的内容")]
    NothingToExport,

    /// 剪贴板不可用或写入失败
    #[error("剪贴板写入失败: {0}")]
    Clipboard(String),
}

impl From<ExportError> for String {
    fn from(err: ExportError) -> Self {
        err.to_string()
    }
}
