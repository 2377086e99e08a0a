// src/extractor/strategies.rs

use super::OidStrategy;
use crate::{constants::selectors, models::MediaOid, page::PageContext};
use regex::Regex;
use scraper::{Html, Selector};
use std::sync::LazyLock;

// 所有正则都只取第一个匹配，键名大小写敏感
static INLINE_MEDIA_OID_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"mediaOID:\s*["']([^"']+)["']"#).unwrap());
static PERMALINK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"/permalink/([^/]+)").unwrap());
static VIDEOS_PATH_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"/videos/[^/]+").unwrap());
static SCRIPT_OID_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"["']oid["']:\s*["']([^"']+)["']"#).unwrap());

static SCRIPT_SEL: LazyLock<Selector> = LazyLock::new(|| Selector::parse(selectors::SCRIPTS).unwrap());
static DATA_OID_SEL: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(selectors::DATA_OID).unwrap());

fn first_capture(re: &Regex, haystack: &str) -> Option<MediaOid> {
    re.captures(haystack)
        .and_then(|caps| caps.get(1))
        .and_then(|m| MediaOid::new(m.as_str()))
}

/// 页面运行时的 player 对象，最可靠
pub struct RuntimePlayerProbe;

impl OidStrategy for RuntimePlayerProbe {
    fn name(&self) -> &'static str {
        "runtime-player"
    }

    fn find(&self, page: &PageContext, _: &Html) -> Option<MediaOid> {
        page.globals()?.player_media_oid().and_then(MediaOid::new)
    }
}

/// 内联播放器配置中的 `mediaOID: "..."`
pub struct InlineMediaOid;

impl OidStrategy for InlineMediaOid {
    fn name(&self) -> &'static str {
        "inline-media-oid"
    }

    fn find(&self, page: &PageContext, _: &Html) -> Option<MediaOid> {
        first_capture(&INLINE_MEDIA_OID_RE, page.markup())
    }
}

/// 页面链接中的 `/permalink/<oid>`
pub struct PermalinkPath;

impl OidStrategy for PermalinkPath {
    fn name(&self) -> &'static str {
        "permalink-path"
    }

    fn find(&self, page: &PageContext, _: &Html) -> Option<MediaOid> {
        first_capture(&PERMALINK_RE, page.url())
    }
}

/// `/videos/<slug>` 页面：逐个扫描 `<script>` 中的 `"oid": "..."`
pub struct VideosPageScript;

impl OidStrategy for VideosPageScript {
    fn name(&self) -> &'static str {
        "videos-page-script"
    }

    fn find(&self, page: &PageContext, document: &Html) -> Option<MediaOid> {
        if !VIDEOS_PATH_RE.is_match(page.url()) {
            return None;
        }
        document.select(&SCRIPT_SEL).find_map(|script| {
            let text: String = script.text().collect();
            first_capture(&SCRIPT_OID_RE, &text)
        })
    }
}

/// 第一个带 `data-oid` 属性的元素，覆盖面最广但最不可靠
pub struct DataOidAttribute;

impl OidStrategy for DataOidAttribute {
    fn name(&self) -> &'static str {
        "data-oid-attribute"
    }

    fn find(&self, _: &PageContext, document: &Html) -> Option<MediaOid> {
        document
            .select(&DATA_OID_SEL)
            .next()?
            .value()
            .attr("data-oid")
            .and_then(MediaOid::new)
    }
}
