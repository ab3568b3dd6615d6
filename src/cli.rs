// cli.rs — 命令行接口定义模块
// 使用 clap 的 derive 模式定义所有子命令和参数

use clap::{ArgAction, Args, Parser, Subcommand}; // Parser: 解析命令行参数; Subcommand: 子命令; Args: 可复用的参数组
use clap_complete::Shell; // Shell 枚举：Bash, Zsh, Fish, Elvish, PowerShell

/// 随机壁纸工具
///
/// 从 Wallhaven 搜索壁纸，随机挑选一张下载并设置为桌面背景。
#[derive(Parser)]
#[command(name = "wallrand")]
#[command(version)] // 自动从 Cargo.toml 读取 version 字段
#[command(author)] // 自动从 Cargo.toml 读取 authors 字段（如有）
#[command(about = "随机壁纸工具 — 从 Wallhaven 随机挑选一张壁纸并设置为桌面背景")]
pub struct Cli {
    /// 输出更详细的日志（-v 为 info，-vv 为 debug）
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

/// 搜索相关参数，未指定时使用配置文件中的默认值
#[derive(Args, Debug, Default)]
pub struct SearchArgs {
    /// 分类开关 (general/anime/people)，如 "111"=全部, "100"=仅general
    #[arg(short, long)]
    pub categories: Option<String>,

    /// 内容纯净度开关 (sfw/sketchy/nsfw)，如 "100"=仅SFW，nsfw 需要 API Key
    #[arg(short, long)]
    pub purity: Option<String>,

    /// 排序方式 (date_added/relevance/random/views/favorites/toplist/hot)
    #[arg(short, long)]
    pub sorting: Option<String>,

    /// 排序顺序 (asc/desc)
    #[arg(long)]
    pub order: Option<String>,

    /// toplist 时间范围 (1d/3d/1w/1M/3M/6M/1y)，仅配合 --sorting toplist 使用
    #[arg(short = 'r', long)]
    pub top_range: Option<String>,

    /// 最小分辨率，如 "1920x1080"
    #[arg(short, long)]
    pub atleast: Option<String>,

    /// 分辨率列表，如 "1920x1080,2560x1440"
    #[arg(long)]
    pub resolutions: Option<String>,

    /// 宽高比列表，如 "16x9,16x10"
    #[arg(long)]
    pub ratios: Option<String>,

    /// 要获取的页数，多页会并发获取
    #[arg(long, value_name = "N")]
    pub pages: Option<u32>,

    /// 随机排序使用的种子
    #[arg(long)]
    pub seed: Option<String>,

    /// 搜索关键词（如 "nature", "id:123", "type:png"）
    #[arg(short, long)]
    pub query: Option<String>,

    /// Wallhaven API Key（优先于环境变量 WALLHAVEN_API_KEY）
    #[arg(short = 'k', long)]
    pub api_key: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// 随机下载一张壁纸并设置为桌面背景
    ///
    /// 用法示例:
    ///   wallrand set --query nature
    ///   wallrand set -s toplist -r 1M --pages 3
    ///   wallrand set --atleast 2560x1440 --dry-run
    Set {
        #[command(flatten)]
        search: SearchArgs,

        /// 壁纸保存目录（不指定则使用配置中的 wallpaper_dir）
        #[arg(short, long)]
        output: Option<String>,

        /// 只下载，不设置桌面背景
        #[arg(long)]
        dry_run: bool,
    },

    /// 随机下载一张壁纸，不设置桌面背景
    ///
    /// 用法示例:
    ///   wallrand fetch -q anime --pages 2
    Fetch {
        #[command(flatten)]
        search: SearchArgs,

        /// 壁纸保存目录
        #[arg(short, long)]
        output: Option<String>,
    },

    /// 生成 shell 补全脚本（支持 bash, zsh, fish, elvish, powershell）
    ///
    /// 用法示例：
    ///   wallrand completions zsh > ~/.zsh/completions/_wallrand
    Completions {
        /// 目标 shell 类型
        shell: Shell,
    },

    /// 配置管理操作
    ///
    /// 用法示例:
    ///   wallrand config show
    ///   wallrand config set sorting random
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// 清理壁纸目录中所有 Wallhaven- 开头的文件
    Clean,
}

/// 配置管理操作
#[derive(Subcommand)]
pub enum ConfigAction {
    /// 查看当前所有配置简报
    Show,
    /// 生成配置文件对应的 JSON Schema
    Schema,
    /// 以 TOML 格式打印当前完整配置内容
    Dump,
    /// 设置配置项的值
    Set {
        /// 要设置的键 (query, categories, purity, sorting, order, top_range,
        /// atleast, resolutions, ratios, pages, wallpaper_dir, api_key)
        key: String,
        /// 要设置的值
        value: String,
    },
}
