use shared::error::AppError;
use thiserror::Error;

/// 启动/运行阶段的服务器错误
///
/// 请求级错误使用 [`AppError`]，这里只覆盖进程生命周期。
#[derive(Error, Debug)]
pub enum ServerError {
    #[error("初始化失败: {0}")]
    Init(#[from] AppError),

    #[error("端口绑定失败: {0}")]
    Bind(#[source] std::io::Error),

    #[error("内部服务器错误: {0}")]
    Internal(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, ServerError>;
