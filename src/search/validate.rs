// search/validate.rs — 搜索参数校验
// 纯函数，只检查参数本身是否合法、是否自洽，不做任何 I/O

use super::{Order, SearchConfig, Sorting, TopRange, UnknownValue};
use crate::error::ValidationError;
use tracing::debug;

/// 合法的 3 位开关组合（全部关闭的 "000" 不合法）
const VALID_FLAGS: [&str; 7] = ["100", "010", "001", "110", "101", "011", "111"];

/// 校验一次搜索的全部参数
///
/// 按从简单到复杂的顺序逐项检查，遇到第一个错误立即返回。
pub fn validate(config: &SearchConfig) -> Result<(), ValidationError> {
    if config.pages == 0 {
        return Err(ValidationError::InvalidPages);
    }

    validate_flags("categories", &config.categories)?;
    validate_flags("purity", &config.purity)?;

    validate_dimensions("resolutions", &config.resolutions)?;
    validate_dimensions("ratios", &config.ratios)?;
    validate_dimensions("atleast", &config.atleast)?;

    let sorting = parse_optional::<Sorting>(&config.sorting)
        .map_err(|UnknownValue(value)| ValidationError::InvalidSorting(value))?;
    let order = parse_optional::<Order>(&config.order)
        .map_err(|UnknownValue(value)| ValidationError::InvalidOrder(value))?;
    let top_range = parse_optional::<TopRange>(&config.top_range)
        .map_err(|UnknownValue(value)| ValidationError::InvalidTopRange(value))?;

    if let Some(query) = config.query.as_deref() {
        validate_query(query)?;
    }

    // NSFW 内容必须登录才能看到
    if config.purity.as_bytes().get(2) == Some(&b'1') && config.api_key().is_none() {
        return Err(ValidationError::NsfwRequiresApiKey);
    }

    // 时间范围只对 toplist 排序有意义
    if top_range.is_some() && sorting != Some(Sorting::Toplist) {
        return Err(ValidationError::TopRangeRequiresToplist);
    }

    debug!(?sorting, ?order, ?top_range, pages = config.pages, "search config is valid");
    Ok(())
}

/// 空字符串表示未设置，返回 None
fn parse_optional<T: std::str::FromStr>(value: &str) -> Result<Option<T>, T::Err> {
    if value.is_empty() {
        Ok(None)
    } else {
        value.parse().map(Some)
    }
}

fn validate_flags(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.is_empty() || VALID_FLAGS.contains(&value) {
        Ok(())
    } else {
        Err(ValidationError::InvalidFlags {
            field,
            value: value.to_string(),
        })
    }
}

/// 逗号分隔的 `WxH` 列表，每一项必须恰好是两个十进制数
fn validate_dimensions(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.is_empty() {
        return Ok(());
    }

    for token in value.split(',') {
        let mut parts = token.split('x');
        let well_formed = match (parts.next(), parts.next(), parts.next()) {
            (Some(w), Some(h), None) => is_number(w) && is_number(h),
            _ => false,
        };

        if !well_formed {
            return Err(ValidationError::InvalidDimensions {
                field,
                value: token.to_string(),
            });
        }
    }

    Ok(())
}

fn is_number(s: &str) -> bool {
    s.parse::<u32>().is_ok()
}

/// 查询串中的 `id:` 与 `type:` 前缀项需要额外检查，其余关键词原样放行
fn validate_query(query: &str) -> Result<(), ValidationError> {
    for token in query.split(',') {
        if let Some(id) = token.strip_prefix("id:") {
            if id.parse::<u64>().is_err() {
                return Err(ValidationError::InvalidWallpaperId(id.to_string()));
            }
        } else if let Some(ext) = token.strip_prefix("type:") {
            if ext != "png" && ext != "jpg" {
                return Err(ValidationError::InvalidFileType(ext.to_string()));
            }
        }
    }

    Ok(())
}
