// src/extractor/detect.rs

use crate::{
    constants::{markers, selectors},
    page::PageContext,
};
use log::debug;
use scraper::{Html, Selector};
use std::sync::LazyLock;

static UBICAST_SCRIPT_SEL: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(selectors::UBICAST_SCRIPT).unwrap());
static PLAYER_UI_SEL: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(selectors::PLAYER_UI).unwrap());

/// 判断页面是否由 UbiCast 平台提供，任意一个特征命中即可
pub fn is_ubicast_page(page: &PageContext, document: &Html) -> bool {
    let markup = page.markup();
    let hit = if markup.contains(markers::POWERED_BY) {
        Some("powered-by")
    } else if markup.contains(markers::BRAND) {
        Some("brand")
    } else if document.select(&UBICAST_SCRIPT_SEL).next().is_some() {
        Some("script-src")
    } else if document.select(&PLAYER_UI_SEL).next().is_some() {
        Some("player-ui")
    } else if page.globals().is_some_and(|g| g.has_player()) {
        Some("runtime-player")
    } else if markup.contains(markers::MEDIA_OID) {
        Some("media-oid")
    } else {
        None
    };

    match hit {
        Some(marker) => {
            debug!("页面 {} 识别为 UbiCast 页面 (特征: {})", page.url(), marker);
            true
        }
        None => false,
    }
}
