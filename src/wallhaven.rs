// wallhaven.rs — Wallhaven API 异步客户端模块
// 负责与 Wallhaven API 交互：获取单页搜索结果和下载图片

use crate::error::{DownloadError, FetchError};
use crate::search::{SearchConfig, build_url};
use crate::source::{Page, WallpaperMetadata, WallpaperSource};
use async_trait::async_trait;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::fs::{self, File};
use tokio::io::AsyncWriteExt;
use tracing::{debug, info, warn};
use url::Url;

/// Wallhaven 搜索接口的固定地址
pub const SEARCH_URL: &str = "https://wallhaven.cc/api/v1/search";

/// 搜索响应的顶层结构
///
/// 只提取需要的字段，多余字段由 serde 自动忽略。
/// 字段缺失或为 null 时取默认值。
#[derive(Deserialize, Debug, Default)]
struct SearchResponse {
    #[serde(default)]
    data: Option<Vec<WallpaperMetadata>>,
    #[serde(default)]
    meta: Option<SearchMeta>,
}

#[derive(Deserialize, Debug, Default)]
struct SearchMeta {
    /// 仅在随机排序时有值
    #[serde(default)]
    seed: Option<String>,
}

/// Wallhaven API 异步客户端
///
/// `reqwest::Client` 内部维护连接池，所有页请求和下载共用同一个实例。
pub struct WallhavenClient {
    client: reqwest::Client,
    search_url: Url,
    /// 单个搜索页请求的总时限
    timeout: Duration,
}

impl WallhavenClient {
    /// 创建客户端
    ///
    /// 搜索页请求整体受 `timeout` 限制；下载的图片可能很大，
    /// 只限制建立连接和两次读取之间的间隔，不限制总耗时。
    pub fn new(timeout: Duration) -> Result<Self, Box<dyn std::error::Error>> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("wallrand/", env!("CARGO_PKG_VERSION")))
            .connect_timeout(timeout)
            .read_timeout(timeout)
            .build()?;

        Ok(Self {
            client,
            search_url: Url::parse(SEARCH_URL)?,
            timeout,
        })
    }

    /// 替换搜索接口地址（镜像站或测试用的本地桩服务）
    pub fn with_search_url(mut self, search_url: Url) -> Self {
        self.search_url = search_url;
        self
    }
}

/// 解析响应体
///
/// 整体不是合法 JSON 时只记录警告并当作空页处理，不让调用方失败。
fn parse_page(page: u32, body: &[u8]) -> Page {
    let response = match serde_json::from_slice::<SearchResponse>(body) {
        Ok(response) => response,
        Err(err) => {
            warn!(page, error = %err, "ignoring malformed search response");
            SearchResponse::default()
        }
    };

    Page {
        items: response.data.unwrap_or_default(),
        seed: response
            .meta
            .and_then(|meta| meta.seed)
            .filter(|seed| !seed.is_empty()),
    }
}

/// 根据 MIME 类型决定文件名，PNG 以外一律按 jpg 保存
///
/// id 来自远端，只接受 ASCII 字母和数字，防止路径穿越到保存目录之外。
pub fn file_name_for(item: &WallpaperMetadata) -> Result<String, DownloadError> {
    if item.id.is_empty() || !item.id.bytes().all(|b| b.is_ascii_alphanumeric()) {
        return Err(DownloadError::InvalidId(item.id.clone()));
    }

    let ext = if item.file_type == "image/png" {
        "png"
    } else {
        "jpg"
    };
    Ok(format!("Wallhaven-{}.{}", item.id, ext))
}

/// 逐块写入响应体
async fn write_body(response: &mut reqwest::Response, path: &Path) -> Result<(), DownloadError> {
    let mut file = File::create(path).await?;
    while let Some(chunk) = response.chunk().await? {
        file.write_all(&chunk).await?;
    }
    file.flush().await?;
    Ok(())
}

#[async_trait]
impl WallpaperSource for WallhavenClient {
    async fn fetch_page(
        &self,
        config: &SearchConfig,
        page: u32,
        seed: Option<&str>,
    ) -> Result<Page, FetchError> {
        let url = build_url(&self.search_url, config, page, seed);
        // URL 里可能带 apikey，日志里只记录页码和种子
        debug!(page, seed = seed.unwrap_or_default(), "requesting search page");

        let response = self
            .client
            .get(url)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|source| FetchError::Request { page, source })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status { page, status });
        }

        let body = response
            .bytes()
            .await
            .map_err(|source| FetchError::Request { page, source })?;

        let parsed = parse_page(page, &body);
        debug!(page, count = parsed.items.len(), "received search page");
        Ok(parsed)
    }

    async fn download(
        &self,
        item: &WallpaperMetadata,
        save_dir: &Path,
    ) -> Result<PathBuf, DownloadError> {
        let file_name = file_name_for(item)?;
        let save_path = std::path::absolute(save_dir.join(&file_name))?;

        // 已经下载过就直接复用
        if fs::try_exists(&save_path).await? {
            debug!(path = %save_path.display(), "wallpaper already downloaded");
            return Ok(save_path);
        }

        let mut response = self.client.get(&item.path).send().await?.error_for_status()?;

        // 先写到 .part 临时文件，完整写完后再改名，
        // 中途失败不会在最终路径上留下半截文件
        let part_path = save_path.with_file_name(format!("{file_name}.part"));
        if let Err(err) = write_body(&mut response, &part_path).await {
            let _ = fs::remove_file(&part_path).await;
            return Err(err);
        }
        fs::rename(&part_path, &save_path).await?;

        info!(id = %item.id, path = %save_path.display(), "downloaded wallpaper");
        Ok(save_path)
    }
}
