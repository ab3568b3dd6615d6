// search/query.rs — 搜索请求 URL 构建

use super::SearchConfig;
use url::Url;

/// 为指定页构建搜索请求 URL
///
/// 参数按固定顺序追加，空字段直接跳过，所以相同输入总是得到逐字节相同的 URL。
/// `page` 总会带上；`seed` 只在非空时带上，第一页不带种子时由服务端生成新种子。
///
/// 这里不做任何校验，调用前应先通过 [`super::validate`]。
pub fn build_url(base: &Url, config: &SearchConfig, page: u32, seed: Option<&str>) -> Url {
    let mut url = base.clone();

    {
        let mut pairs = url.query_pairs_mut();
        pairs.clear();

        let fields = [
            ("categories", config.categories.as_str()),
            ("purity", config.purity.as_str()),
            ("sorting", config.sorting.as_str()),
            ("order", config.order.as_str()),
            ("topRange", config.top_range.as_str()),
            ("atleast", config.atleast.as_str()),
            ("resolutions", config.resolutions.as_str()),
            ("ratios", config.ratios.as_str()),
            ("apikey", config.api_key.as_deref().unwrap_or_default()),
            ("q", config.query.as_deref().unwrap_or_default()),
        ];

        for (key, value) in fields {
            if !value.is_empty() {
                pairs.append_pair(key, value);
            }
        }

        pairs.append_pair("page", &page.to_string());

        if let Some(seed) = seed.filter(|s| !s.is_empty()) {
            pairs.append_pair("seed", seed);
        }
    }

    url
}
