// config.rs — 配置管理模块
// 遵循 Unix 风格：优先从 ~/.config/wallrand/config.toml 读取配置

use rust_i18n::t; // 引入翻译宏
use schemars::JsonSchema; // 引入用于生成 JSON Schema 的 trait
use serde::{Deserialize, Serialize}; // 引入序列化与反序列化 trait
use shellexpand::tilde; // 用于展开 ~ 和环境变量
use std::env;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// 展开路径中的 ~ 和环境变量，相对路径则相对于 `home`
fn resolve_path(path_str: &str, home: &Path) -> PathBuf {
    let expanded = PathBuf::from(tilde(path_str).into_owned());
    if expanded.is_absolute() {
        expanded
    } else {
        home.join(expanded)
    }
}

/// 映射 config.toml 文件内容的嵌套结构体
#[derive(Debug, Deserialize, Serialize, Default, JsonSchema)]
struct ConfigFile {
    #[serde(default)]
    common: CommonConfig,
    #[serde(default)]
    source: SourceConfigs,
}

#[derive(Debug, Deserialize, Serialize, JsonSchema)]
struct CommonConfig {
    /// 壁纸保存目录 (支持 ~、$HOME 等环境变量，相对路径则相对于 $HOME)
    wallpaper_dir: Option<String>,
    /// 单个请求的超时时间（秒）
    #[serde(default = "default_request_timeout")]
    request_timeout: u64,
    /// 默认搜索参数
    #[serde(default)]
    search: SearchDefaults,
}

impl Default for CommonConfig {
    fn default() -> Self {
        Self {
            wallpaper_dir: None,
            request_timeout: default_request_timeout(),
            search: SearchDefaults::default(),
        }
    }
}

/// 默认搜索参数，命令行未指定时使用
#[derive(Debug, Clone, Deserialize, Serialize, JsonSchema)]
pub struct SearchDefaults {
    /// 默认搜索关键词
    #[serde(default)]
    pub query: Option<String>,
    #[serde(default = "default_categories")]
    pub categories: String,
    #[serde(default = "default_purity")]
    pub purity: String,
    #[serde(default = "default_sorting")]
    pub sorting: String,
    #[serde(default = "default_order")]
    pub order: String,
    /// toplist 时间范围 (1d/3d/1w/1M/3M/6M/1y)
    #[serde(default)]
    pub top_range: String,
    #[serde(default)]
    pub atleast: String,
    #[serde(default)]
    pub resolutions: String,
    #[serde(default)]
    pub ratios: String,
    #[serde(default = "default_pages")]
    pub pages: u32,
}

impl Default for SearchDefaults {
    fn default() -> Self {
        Self {
            query: None,
            categories: default_categories(),
            purity: default_purity(),
            sorting: default_sorting(),
            order: default_order(),
            top_range: String::new(),
            atleast: String::new(),
            resolutions: String::new(),
            ratios: String::new(),
            pages: default_pages(),
        }
    }
}

fn default_categories() -> String {
    "111".to_string()
}
fn default_purity() -> String {
    "100".to_string()
}
fn default_sorting() -> String {
    "date_added".to_string()
}
fn default_order() -> String {
    "desc".to_string()
}
fn default_pages() -> u32 {
    1
}
fn default_request_timeout() -> u64 {
    30
}

#[derive(Debug, Deserialize, Serialize, Default, JsonSchema)]
struct SourceConfigs {
    #[serde(default)]
    wallhaven: WallhavenConfig,
}

#[derive(Debug, Deserialize, Serialize, Default, JsonSchema)]
struct WallhavenConfig {
    api_key: Option<String>,
    /// 搜索接口地址，不配置则使用官方地址
    api_url: Option<String>,
}

/// dump 输出中代替 API Key 的占位串
const MASKED_KEY: &str = "********";

/// 应用全局配置项
pub struct AppConfig {
    /// Wallhaven API Key (优先级：ENV > TOML)
    pub api_key: Option<String>,
    /// 配置文件中的 API Key，保存时只写回这一项
    file_api_key: Option<String>,
    /// 来自 WALLHAVEN_API_KEY 的 API Key，不落盘
    env_api_key: Option<String>,
    /// 自定义搜索接口地址
    pub api_url: Option<String>,
    /// 壁纸保存目录
    pub wallpaper_dir: PathBuf,
    /// 单个请求的超时时间
    pub request_timeout: Duration,
    /// 配置文件所在路径
    pub config_path: PathBuf,
    /// 默认搜索参数
    pub search_defaults: SearchDefaults,
    /// 用于解析相对路径
    home: PathBuf,
}

impl AppConfig {
    /// 读取 $HOME 和 WALLHAVEN_API_KEY 后加载配置
    pub fn load() -> io::Result<Self> {
        let home = env::var_os("HOME")
            .map(PathBuf::from)
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "$HOME is not set"))?;
        let env_api_key = env::var("WALLHAVEN_API_KEY").ok().filter(|k| !k.is_empty());

        Ok(Self::load_from(&home, env_api_key))
    }

    /// 以指定的 home 目录加载配置
    ///
    /// 配置文件不存在或格式错误时使用默认值。
    pub fn load_from(home: &Path, env_api_key: Option<String>) -> Self {
        let config_path = home.join(".config").join("wallrand").join("config.toml");
        let config_file = Self::load_config_from_file(&config_path).unwrap_or_default();

        let SourceConfigs { wallhaven } = config_file.source;
        let common = config_file.common;

        // 未配置时默认使用 $HOME/Pictures/wallrand
        let wallpaper_dir = match common.wallpaper_dir {
            Some(dir) => resolve_path(&dir, home),
            None => home.join("Pictures").join("wallrand"),
        };

        Self {
            // 优先级：环境变量 > 配置文件内容
            api_key: env_api_key.clone().or_else(|| wallhaven.api_key.clone()),
            file_api_key: wallhaven.api_key,
            env_api_key,
            api_url: wallhaven.api_url,
            wallpaper_dir,
            request_timeout: Duration::from_secs(common.request_timeout),
            config_path,
            search_defaults: common.search,
            home: home.to_path_buf(),
        }
    }

    /// 辅助函数：解析 TOML 配置文件
    fn load_config_from_file(path: &Path) -> Option<ConfigFile> {
        fs::read_to_string(path)
            .ok()
            .and_then(|content| toml::from_str(&content).ok())
    }

    /// 确保配置目录和壁纸目录存在
    pub fn ensure_dirs(&self) -> io::Result<()> {
        if let Some(parent) = self.config_path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::create_dir_all(&self.wallpaper_dir)
    }

    fn to_config_file(&self) -> ConfigFile {
        ConfigFile {
            common: CommonConfig {
                wallpaper_dir: Some(self.wallpaper_dir.to_string_lossy().to_string()),
                request_timeout: self.request_timeout.as_secs(),
                search: self.search_defaults.clone(),
            },
            source: SourceConfigs {
                wallhaven: WallhavenConfig {
                    api_key: self.file_api_key.clone(),
                    api_url: self.api_url.clone(),
                },
            },
        }
    }

    /// 将配置保存回文件
    pub fn save(&self) -> io::Result<()> {
        let toml_str = toml::to_string_pretty(&self.to_config_file()).map_err(io::Error::other)?;
        if let Some(parent) = self.config_path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.config_path, toml_str)
    }

    /// 修改一项配置（仅内存中，调用 `save` 才会写回文件）
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), Box<dyn std::error::Error>> {
        let search = &mut self.search_defaults;
        match key {
            "query" | "q" => search.query = Some(value.to_string()).filter(|v| !v.is_empty()),
            "categories" => search.categories = value.to_string(),
            "purity" => search.purity = value.to_string(),
            "sorting" => search.sorting = value.to_string(),
            "order" => search.order = value.to_string(),
            "top_range" | "top-range" => search.top_range = value.to_string(),
            "atleast" => search.atleast = value.to_string(),
            "res" | "resolutions" => search.resolutions = value.to_string(),
            "ratios" => search.ratios = value.to_string(),
            "pages" => search.pages = value.parse()?,
            "wallpaper_dir" => self.wallpaper_dir = resolve_path(value, &self.home),
            "api_key" => {
                self.file_api_key = Some(value.to_string()).filter(|v| !v.is_empty());
                self.api_key = self.env_api_key.clone().or_else(|| self.file_api_key.clone());
            }
            _ => return Err(t!("config_error_unknown_key", key => key).into()),
        }
        Ok(())
    }

    /// 获取配置文件的 JSON Schema
    pub fn get_schema() -> Result<String, serde_json::Error> {
        let schema = schemars::schema_for!(ConfigFile);
        serde_json::to_string_pretty(&schema)
    }

    /// 将当前配置转换为 TOML 字符串，API Key 以掩码显示
    pub fn to_toml(&self) -> String {
        let mut config_file = self.to_config_file();
        let api_key = &mut config_file.source.wallhaven.api_key;
        if api_key.is_some() {
            *api_key = Some(MASKED_KEY.to_string());
        }

        toml::to_string_pretty(&config_file)
            .unwrap_or_else(|_| "# Error serializing config".to_string())
    }
}
