// main.rs — 程序入口
// 负责初始化日志与异步运行时、解析命令行参数、分发子命令

mod cli; // 命令行参数定义
mod config; // 配置文件与环境变量
mod error; // 错误类型
mod search; // 搜索参数、校验与 URL 构建
mod setter; // 设置桌面壁纸
mod source; // 壁纸源抽象、分页聚合与随机挑选
#[cfg(test)]
mod test_support;
mod wallhaven; // Wallhaven API 客户端

// 初始化多语言支持，嵌入 locales 目录下的所有翻译
rust_i18n::i18n!("locales");

use clap::{CommandFactory, Parser}; // Parser 提供 parse(); CommandFactory 用于生成补全脚本
use clap_complete::generate;
use cli::{Cli, Commands, ConfigAction, SearchArgs};
use config::AppConfig;
use rust_i18n::t;
use search::SearchConfig;
use source::WallpaperSource;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;
use wallhaven::WallhavenClient;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 自动检测系统语言并设置
    let locale = std::env::var("LANG").unwrap_or_else(|_| "en".to_string());
    if locale.starts_with("zh") {
        rust_i18n::set_locale("zh-CN");
    } else {
        rust_i18n::set_locale("en");
    }

    let cli = Cli::parse();
    init_logging(cli.verbose);

    let mut config = AppConfig::load()?;

    match cli.command {
        Commands::Set {
            search,
            output,
            dry_run,
        } => {
            let image_path = handle_fetch(&config, &search, output.as_deref()).await?;

            if dry_run {
                println!("{}", t!("dry_run_skip"));
            } else {
                println!("{}", t!("setting_wallpaper"));
                setter::set_from_path(&image_path)?;
                println!("{}", t!("set_done"));
            }
        }

        Commands::Fetch { search, output } => {
            handle_fetch(&config, &search, output.as_deref()).await?;
        }

        Commands::Completions { shell } => {
            generate(
                shell,
                &mut Cli::command(),
                "wallrand",
                &mut std::io::stdout(),
            );
        }

        Commands::Config { action } => {
            handle_config(&mut config, &action)?;
        }

        Commands::Clean => {
            handle_clean(&config)?;
        }
    }

    Ok(())
}

/// 初始化 tracing 日志，输出到 stderr
///
/// 设置了 RUST_LOG 时以环境变量为准，否则根据 -v 的次数决定级别。
fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("wallrand={level}")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// 合并命令行参数与配置文件默认值，得到本次搜索的完整参数
///
/// API Key 优先级：命令行 > 环境变量 > 配置文件
fn build_search_config(config: &AppConfig, args: &SearchArgs) -> SearchConfig {
    let defaults = &config.search_defaults;
    let pick = |arg: &Option<String>, default: &String| arg.clone().unwrap_or_else(|| default.clone());

    SearchConfig {
        categories: pick(&args.categories, &defaults.categories),
        purity: pick(&args.purity, &defaults.purity),
        sorting: pick(&args.sorting, &defaults.sorting),
        order: pick(&args.order, &defaults.order),
        top_range: pick(&args.top_range, &defaults.top_range),
        atleast: pick(&args.atleast, &defaults.atleast),
        resolutions: pick(&args.resolutions, &defaults.resolutions),
        ratios: pick(&args.ratios, &defaults.ratios),
        pages: args.pages.unwrap_or(defaults.pages),
        seed: args.seed.clone(),
        query: args.query.clone().or_else(|| defaults.query.clone()),
        api_key: args.api_key.clone().or_else(|| config.api_key.clone()),
    }
}

/// 搜索、随机挑选并下载一张壁纸，返回保存路径
async fn handle_fetch(
    config: &AppConfig,
    args: &SearchArgs,
    output: Option<&str>,
) -> Result<PathBuf, Box<dyn std::error::Error>> {
    let search_config = build_search_config(config, args);
    search::validate(&search_config)?;

    let save_dir = match output {
        Some(dir) => PathBuf::from(shellexpand::tilde(dir).into_owned()),
        None => config.wallpaper_dir.clone(),
    };
    std::fs::create_dir_all(&save_dir)?;

    let mut client = WallhavenClient::new(config.request_timeout)?;
    if let Some(api_url) = config.api_url.as_deref() {
        client = client.with_search_url(api_url.parse()?);
    }
    let client = Arc::new(client);

    println!("{}", t!("search_start", pages => search_config.pages));
    let wallpapers = source::fetch_all(Arc::clone(&client), &search_config).await?;

    let wallpaper = source::select_random(&wallpapers, &mut rand::thread_rng())
        .ok_or(t!("error_no_wallpapers"))?;

    println!(
        "{}",
        t!(
            "download_info",
            id => wallpaper.id,
            total => wallpapers.len()
        )
    );

    let save_path = client.download(wallpaper, &save_dir).await?;
    println!("{}", t!("save_path", path => save_path.display()));

    Ok(save_path)
}

/// 处理 config 子命令：查看或修改配置
fn handle_config(
    config: &mut AppConfig,
    action: &ConfigAction,
) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        ConfigAction::Show => {
            let defaults = &config.search_defaults;
            println!("{}", t!("config_title"));
            println!("{}", t!("config_path", path => config.config_path.display()));
            println!(
                "{}",
                t!("config_wallpaper_dir", path => config.wallpaper_dir.display())
            );
            let key_state = if config.api_key.is_some() {
                t!("config_key_set")
            } else {
                t!("config_key_unset")
            };
            println!("{}", t!("config_api_key", state => key_state));
            println!("{}", t!("config_search_defaults"));
            let query_str = defaults.query.as_deref().unwrap_or("None");
            println!("{}", t!("config_query", query => query_str));
            println!(
                "{}",
                t!(
                    "config_filters",
                    categories => defaults.categories,
                    purity => defaults.purity
                )
            );
            println!(
                "{}",
                t!("config_sorting", sorting => defaults.sorting, order => defaults.order)
            );
            println!("{}", t!("config_pages", pages => defaults.pages));
        }
        ConfigAction::Schema => {
            println!("{}", AppConfig::get_schema()?);
        }
        ConfigAction::Dump => {
            println!("{}", config.to_toml());
        }
        ConfigAction::Set { key, value } => {
            config.set(key, value)?;
            config.ensure_dirs()?;
            config.save()?;
            println!("{}", t!("config_updated", key => key, value => value));
        }
    }
    Ok(())
}

/// 处理 clean 子命令：清理壁纸目录中所有 Wallhaven- 开头的文件
fn handle_clean(config: &AppConfig) -> Result<(), Box<dyn std::error::Error>> {
    let dir = &config.wallpaper_dir;
    let mut deleted_count = 0;

    if dir.exists() {
        println!("{}", t!("cleaning_dir", path => dir.display()));

        for entry in std::fs::read_dir(dir)? {
            let path = entry?.path();
            if !path.is_file() {
                continue;
            }

            if let Some(filename) = path.file_name().and_then(|n| n.to_str()) {
                if filename.starts_with("Wallhaven-") {
                    std::fs::remove_file(&path)?;
                    deleted_count += 1;
                    println!("  {} {}", t!("deleted"), filename);
                }
            }
        }
    }

    println!("{}", t!("clean_done", count => deleted_count));
    Ok(())
}
