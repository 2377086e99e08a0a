// src/extractor/urls.rs

use crate::{constants::api::paths, models::DerivedUrlSet};
use regex::Regex;
use std::sync::LazyLock;

static DOMAIN_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^(https?://[^/]+)").unwrap());

/// 从页面链接中取出 `scheme://host[:port]`
pub fn extract_domain(page_url: &str) -> Option<String> {
    DOMAIN_RE
        .captures(page_url)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

/// 拼接五个固定链接。OID 或域名为空时返回 `None`，调用方需自行检查。
pub fn build_urls(oid: &str, domain: &str) -> Option<DerivedUrlSet> {
    if oid.is_empty() || domain.is_empty() {
        return None;
    }
    let permalink = format!("{}{}{}/", domain, paths::PERMALINK, oid);
    Some(DerivedUrlSet {
        domain: domain.to_string(),
        hls_playlist: format!("{}{}{}", domain, paths::HLS_PLAYLIST, oid),
        media_info: format!("{}{}{}", domain, paths::MEDIA_INFO, oid),
        resources_info: format!("{}{}{}", domain, paths::RESOURCES_INFO, oid),
        iframe_embed: format!("{}{}", permalink, paths::IFRAME_SUFFIX),
        permalink,
    })
}
