// search/mod.rs — 搜索参数模块
// 定义一次搜索所需的全部参数，以及排序、顺序、时间范围这几个受限取值

pub mod query;
pub mod validate;

use std::str::FromStr;

pub use query::build_url;
pub use validate::validate;

/// 一次搜索的完整参数
///
/// 由命令行参数和配置文件合并得到，构造之后只读。
/// 受限字段保留用户输入的原始字符串，校验时再解析，
/// 这样错误信息里能原样回显用户写了什么。
/// 空字符串表示"使用服务端默认值"，不会出现在请求参数里。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchConfig {
    /// 分类开关 (general/anime/people)，如 "111"
    pub categories: String,
    /// 纯净度开关 (sfw/sketchy/nsfw)，如 "100"
    pub purity: String,
    pub sorting: String,
    pub order: String,
    /// 仅在 toplist 排序下生效
    pub top_range: String,
    /// 最小分辨率，如 "1920x1080"
    pub atleast: String,
    /// 分辨率列表，如 "1920x1080,2560x1440"
    pub resolutions: String,
    /// 宽高比列表，如 "16x9,16x10"
    pub ratios: String,
    /// 要获取的页数，至少为 1
    pub pages: u32,
    /// 用户指定的固定随机种子
    pub seed: Option<String>,
    pub query: Option<String>,
    pub api_key: Option<String>,
}

impl SearchConfig {
    /// 非空的 API Key
    pub fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref().filter(|k| !k.is_empty())
    }

    /// 非空的固定种子
    pub fn fixed_seed(&self) -> Option<&str> {
        self.seed.as_deref().filter(|s| !s.is_empty())
    }
}

/// 受限取值解析失败时携带原始输入
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownValue(pub String);

/// 排序方式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sorting {
    DateAdded,
    Relevance,
    Random,
    Views,
    Favorites,
    Toplist,
    Hot,
}

impl FromStr for Sorting {
    type Err = UnknownValue;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "date_added" => Ok(Sorting::DateAdded),
            "relevance" => Ok(Sorting::Relevance),
            "random" => Ok(Sorting::Random),
            "views" => Ok(Sorting::Views),
            "favorites" => Ok(Sorting::Favorites),
            "toplist" => Ok(Sorting::Toplist),
            "hot" => Ok(Sorting::Hot),
            other => Err(UnknownValue(other.to_string())),
        }
    }
}

/// 排序顺序
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Order {
    Asc,
    Desc,
}

impl FromStr for Order {
    type Err = UnknownValue;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "asc" => Ok(Order::Asc),
            "desc" => Ok(Order::Desc),
            other => Err(UnknownValue(other.to_string())),
        }
    }
}

/// toplist 的统计时间范围
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TopRange {
    OneDay,
    ThreeDays,
    OneWeek,
    OneMonth,
    ThreeMonths,
    SixMonths,
    OneYear,
}

impl FromStr for TopRange {
    type Err = UnknownValue;

    // 注意大小写敏感：1M 是一个月，1m 不合法
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "1d" => Ok(TopRange::OneDay),
            "3d" => Ok(TopRange::ThreeDays),
            "1w" => Ok(TopRange::OneWeek),
            "1M" => Ok(TopRange::OneMonth),
            "3M" => Ok(TopRange::ThreeMonths),
            "6M" => Ok(TopRange::SixMonths),
            "1y" => Ok(TopRange::OneYear),
            other => Err(UnknownValue(other.to_string())),
        }
    }
}
