// setter.rs — 系统壁纸设置模块

use rust_i18n::t;
use std::path::Path;
use tracing::debug;

/// 将指定路径的图片设置为系统壁纸
///
/// # 参数
/// - `path`: 图片的绝对路径（由下载流程返回）
pub fn set_from_path(path: impl AsRef<Path>) -> Result<(), Box<dyn std::error::Error>> {
    let path_ref = path.as_ref();
    if !path_ref.is_file() {
        return Err(t!("error_not_a_file", path => path_ref.display()).into());
    }
    let path_str = path_ref.to_str().ok_or(t!("error_utf8"))?;

    debug!(path = %path_ref.display(), "applying desktop wallpaper");

    // wallpaper 库会自动识别桌面环境并调用相应的接口
    wallpaper::set_from_path(path_str)
        .map_err(|e| t!("error_set_failed", reason => e.to_string()).into())
}
