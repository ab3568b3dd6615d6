// error.rs — 错误类型定义
// 校验、元数据获取、下载三个阶段各自一个错误枚举，统一使用 thiserror 派生

use thiserror::Error;

/// 搜索参数校验失败
///
/// 在发起任何网络请求之前产生，直接报告给用户，不会重试。
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    /// categories / purity 不是合法的 3 位开关串
    #[error("{value} is not a valid {field} setting")]
    InvalidFlags { field: &'static str, value: String },

    /// resolutions / ratios / atleast 中的某一项不是 `WxH` 格式
    #[error("{value} is not a valid {field} value, expected WxH[,WxH...]")]
    InvalidDimensions { field: &'static str, value: String },

    #[error("{0} is not a valid sorting type")]
    InvalidSorting(String),

    #[error("{0} is not a valid sorting order")]
    InvalidOrder(String),

    #[error("{0} is not a valid time range")]
    InvalidTopRange(String),

    #[error("page count must be greater than zero")]
    InvalidPages,

    #[error("{0} is not a valid wallpaper ID")]
    InvalidWallpaperId(String),

    #[error("{0} is not a valid wallpaper extension, use png or jpg")]
    InvalidFileType(String),

    #[error("an API key is required when the NSFW purity flag is set")]
    NsfwRequiresApiKey,

    #[error("top range can only be used with toplist sorting")]
    TopRangeRequiresToplist,
}

/// 获取搜索结果页失败
///
/// 任意一页失败都会让整个聚合结果作废。
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("failed to fetch page {page}: {source}")]
    Request {
        page: u32,
        #[source]
        source: reqwest::Error,
    },

    #[error("page {page} request returned HTTP {status}")]
    Status {
        page: u32,
        status: reqwest::StatusCode,
    },

    /// 并发任务 panic 或被取消
    #[error("page fetch task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

/// 下载壁纸文件失败
#[derive(Debug, Error)]
pub enum DownloadError {
    /// 远端返回的 id 不能安全地用作文件名
    #[error("{0:?} is not a valid wallpaper id")]
    InvalidId(String),

    #[error("failed to download wallpaper: {0}")]
    Request(#[from] reqwest::Error),

    #[error("failed to write wallpaper file: {0}")]
    Io(#[from] std::io::Error),
}
