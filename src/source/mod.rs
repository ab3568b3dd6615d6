// source/mod.rs — 壁纸源抽象与分页聚合
// 定义壁纸源需要实现的 Trait，以及基于随机种子的多页并发获取流程

pub mod select;

use crate::error::{DownloadError, FetchError};
use crate::search::SearchConfig;
use async_trait::async_trait;
use serde::{Deserialize, Deserializer};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::task::JoinSet;
use tracing::{debug, info};

pub use select::select_random;

/// 单张壁纸的元数据
///
/// 远端 API 不完全受我们控制，所以字段缺失或为 null 时一律当作空字符串，
/// 而不是让整页解析失败。
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct WallpaperMetadata {
    /// 原图的直接下载 URL
    #[serde(default, deserialize_with = "null_as_empty")]
    pub path: String,
    /// 壁纸唯一标识符（如 "94x38z"）
    #[serde(default, deserialize_with = "null_as_empty")]
    pub id: String,
    /// MIME 类型（如 "image/png"）
    #[serde(default, deserialize_with = "null_as_empty")]
    pub file_type: String,
}

/// 一页搜索结果
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Page {
    pub items: Vec<WallpaperMetadata>,
    /// 服务端回传的随机种子，非随机排序时为 None
    pub seed: Option<String>,
}

pub(crate) fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// 壁纸源的抽象 Trait
///
/// 聚合流程只依赖这两个操作，测试时可以换成内存里的假实现。
#[async_trait]
pub trait WallpaperSource: Send + Sync {
    /// 获取第 `page` 页，`seed` 为 None 时由服务端决定随机顺序
    async fn fetch_page(
        &self,
        config: &SearchConfig,
        page: u32,
        seed: Option<&str>,
    ) -> Result<Page, FetchError>;

    /// 下载壁纸到 `save_dir`，返回保存后的绝对路径
    async fn download(
        &self,
        item: &WallpaperMetadata,
        save_dir: &Path,
    ) -> Result<PathBuf, DownloadError>;
}

/// 获取 `config.pages` 页结果并合并
///
/// 第一页同步获取，拿到种子后，其余每页各开一个任务并发获取，全部使用同一个种子，
/// 保证各页来自同一个随机排列，不会重复也不会遗漏。
/// 用户指定了固定种子时优先使用固定种子，否则使用第一页回传的种子。
///
/// 必须等所有任务结束才返回。任意一页失败则整体失败，不返回部分结果。
/// 多页同时失败时返回最先完成的那个错误，具体是哪一页不确定。
/// 结果中各页的先后顺序同样不确定。
pub async fn fetch_all<S>(
    source: Arc<S>,
    config: &SearchConfig,
) -> Result<Vec<WallpaperMetadata>, FetchError>
where
    S: WallpaperSource + 'static,
{
    let fixed_seed = config.fixed_seed();
    let first = source.fetch_page(config, 1, fixed_seed).await?;
    let mut wallpapers = first.items;

    if config.pages <= 1 {
        info!(count = wallpapers.len(), "fetched single page");
        return Ok(wallpapers);
    }

    let seed: Option<Arc<str>> = fixed_seed
        .map(Arc::<str>::from)
        .or_else(|| first.seed.filter(|s| !s.is_empty()).map(Arc::<str>::from));
    debug!(seed = ?seed, pages = config.pages, "fetching remaining pages");

    let shared_config = Arc::new(config.clone());
    let mut tasks = JoinSet::new();

    for page in 2..=config.pages {
        let source = Arc::clone(&source);
        let config = Arc::clone(&shared_config);
        let seed = seed.clone();
        tasks.spawn(async move { source.fetch_page(&config, page, seed.as_deref()).await });
    }

    let mut failure = None;
    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok(Ok(page)) => {
                if failure.is_none() {
                    wallpapers.extend(page.items);
                }
            }
            Ok(Err(err)) => {
                failure.get_or_insert(err);
            }
            Err(err) => {
                failure.get_or_insert(FetchError::Task(err));
            }
        }
    }

    match failure {
        Some(err) => Err(err),
        None => {
            info!(count = wallpapers.len(), pages = config.pages, "fetched all pages");
            Ok(wallpapers)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// 内存中的假壁纸源，记录每次请求的页码和种子
    struct ScriptedSource {
        pages: HashMap<u32, Result<Page, u16>>,
        calls: Mutex<Vec<(u32, Option<String>)>>,
    }

    impl ScriptedSource {
        fn new(pages: impl IntoIterator<Item = (u32, Result<Page, u16>)>) -> Arc<Self> {
            Arc::new(Self {
                pages: pages.into_iter().collect(),
                calls: Mutex::new(Vec::new()),
            })
        }

        fn calls(&self) -> Vec<(u32, Option<String>)> {
            let mut calls = self.calls.lock().unwrap().clone();
            calls.sort();
            calls
        }
    }

    #[async_trait]
    impl WallpaperSource for ScriptedSource {
        async fn fetch_page(
            &self,
            _config: &SearchConfig,
            page: u32,
            seed: Option<&str>,
        ) -> Result<Page, FetchError> {
            self.calls
                .lock()
                .unwrap()
                .push((page, seed.map(str::to_string)));

            match &self.pages[&page] {
                Ok(result) => Ok(result.clone()),
                Err(code) => Err(FetchError::Status {
                    page,
                    status: reqwest::StatusCode::from_u16(*code).unwrap(),
                }),
            }
        }

        async fn download(
            &self,
            _item: &WallpaperMetadata,
            _save_dir: &Path,
        ) -> Result<PathBuf, DownloadError> {
            unreachable!("aggregation never downloads")
        }
    }

    fn item(id: &str) -> WallpaperMetadata {
        WallpaperMetadata {
            path: format!("https://w.wallhaven.cc/full/{id}.jpg"),
            id: id.to_string(),
            file_type: "image/jpeg".to_string(),
        }
    }

    fn page(ids: &[&str], seed: Option<&str>) -> Result<Page, u16> {
        Ok(Page {
            items: ids.iter().map(|id| item(id)).collect(),
            seed: seed.map(str::to_string),
        })
    }

    fn config(pages: u32) -> SearchConfig {
        SearchConfig {
            pages,
            ..Default::default()
        }
    }

    fn sorted_ids(items: &[WallpaperMetadata]) -> Vec<String> {
        let mut ids: Vec<String> = items.iter().map(|w| w.id.clone()).collect();
        ids.sort();
        ids
    }

    #[tokio::test]
    async fn single_page_returns_first_page_only() {
        let source = ScriptedSource::new([(1, page(&["a", "b"], Some("s1")))]);

        let result = fetch_all(Arc::clone(&source), &config(1)).await.unwrap();

        assert_eq!(sorted_ids(&result), ["a", "b"]);
        assert_eq!(source.calls(), [(1, None)]);
    }

    #[tokio::test]
    async fn later_pages_reuse_the_first_page_seed() {
        let source = ScriptedSource::new([
            (1, page(&["a1", "a2"], Some("xyz"))),
            (2, page(&["b1"], Some("xyz"))),
            (3, page(&["c1", "c2", "c3"], Some("xyz"))),
            (4, page(&[], Some("xyz"))),
        ]);

        let result = fetch_all(Arc::clone(&source), &config(4)).await.unwrap();

        assert_eq!(result.len(), 6);
        assert_eq!(sorted_ids(&result), ["a1", "a2", "b1", "c1", "c2", "c3"]);
        assert_eq!(
            source.calls(),
            [
                (1, None),
                (2, Some("xyz".to_string())),
                (3, Some("xyz".to_string())),
                (4, Some("xyz".to_string())),
            ]
        );
    }

    #[tokio::test]
    async fn fixed_seed_is_used_for_every_page() {
        let source = ScriptedSource::new([
            (1, page(&["a"], Some("server"))),
            (2, page(&["b"], None)),
        ]);
        let config = SearchConfig {
            seed: Some("mine".to_string()),
            ..config(2)
        };

        fetch_all(Arc::clone(&source), &config).await.unwrap();

        assert_eq!(
            source.calls(),
            [(1, Some("mine".to_string())), (2, Some("mine".to_string()))]
        );
    }

    #[tokio::test]
    async fn missing_seed_is_not_sent_to_later_pages() {
        let source = ScriptedSource::new([(1, page(&["a"], None)), (2, page(&["b"], None))]);

        fetch_all(Arc::clone(&source), &config(2)).await.unwrap();

        assert_eq!(source.calls(), [(1, None), (2, None)]);
    }

    #[tokio::test]
    async fn any_failed_page_fails_the_whole_result() {
        let source = ScriptedSource::new([
            (1, page(&["a"], Some("xyz"))),
            (2, page(&["b"], Some("xyz"))),
            (3, Err(500)),
            (4, page(&["d"], Some("xyz"))),
        ]);

        let err = fetch_all(Arc::clone(&source), &config(4)).await.unwrap_err();

        assert!(matches!(err, FetchError::Status { page: 3, .. }));
        // 失败不会取消其他任务，所有页都被请求过
        assert_eq!(source.calls().len(), 4);
    }

    #[tokio::test]
    async fn first_page_failure_spawns_nothing() {
        let source = ScriptedSource::new([(1, Err(404)), (2, page(&["b"], None))]);

        let err = fetch_all(Arc::clone(&source), &config(2)).await.unwrap_err();

        assert!(matches!(err, FetchError::Status { page: 1, .. }));
        assert_eq!(source.calls(), [(1, None)]);
    }

    #[tokio::test]
    async fn empty_result_is_not_an_error() {
        let source = ScriptedSource::new([(1, page(&[], Some("s"))), (2, page(&[], Some("s")))]);

        let result = fetch_all(source, &config(2)).await.unwrap();

        assert!(result.is_empty());
    }

    #[test]
    fn metadata_tolerates_missing_and_null_fields() {
        let item: WallpaperMetadata =
            serde_json::from_str(r#"{"id": "abc", "path": null, "extra": 1}"#).unwrap();
        assert_eq!(
            item,
            WallpaperMetadata {
                id: "abc".to_string(),
                ..Default::default()
            }
        );
    }
}
