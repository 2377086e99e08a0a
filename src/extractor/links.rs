// src/extractor/links.rs

use crate::{
    constants::{UNKNOWN_LABEL, link_classes, selectors},
    models::{AudioLink, DownloadLinks, VideoLink},
};
use log::debug;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use std::sync::LazyLock;

static ANCHOR_SEL: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(selectors::DOWNLOAD_ANCHORS).unwrap());
static QUALITY_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"([0-9]+p)").unwrap());
static SIZE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"([0-9.]+\s*[GM]B)").unwrap());

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LinkKind {
    Video,
    Audio,
    Slides,
    Hls,
}

// 先看 class，再看 href；同一个链接只归入一类
const CLASS_RULES: [(&str, LinkKind); 4] = [
    (link_classes::MP4, LinkKind::Video),
    (link_classes::MP3, LinkKind::Audio),
    (link_classes::SLIDES, LinkKind::Slides),
    (link_classes::HLS, LinkKind::Hls),
];
const HREF_RULES: [(&str, LinkKind); 3] = [
    (".mp4", LinkKind::Video),
    (".mp3", LinkKind::Audio),
    ("playlist", LinkKind::Hls),
];

fn classify(anchor: &ElementRef, href: &str) -> Option<LinkKind> {
    let element = anchor.value();
    CLASS_RULES
        .iter()
        .find(|(class, _)| element.classes().any(|c| c == *class))
        .or_else(|| HREF_RULES.iter().find(|(needle, _)| href.contains(needle)))
        .map(|(_, kind)| *kind)
}

fn resolve_href(href: &str, domain: &str) -> String {
    if href.starts_with("http") {
        href.to_string()
    } else {
        format!("{}{}", domain, href)
    }
}

fn capture_label(re: &Regex, text: &str) -> String {
    re.captures(text)
        .and_then(|caps| caps.get(1))
        .map_or_else(|| UNKNOWN_LABEL.to_string(), |m| m.as_str().to_string())
}

/// 按文档顺序扫描下载链接并分类
pub fn extract_download_links(document: &Html, domain: &str) -> DownloadLinks {
    let mut links = DownloadLinks::default();

    for anchor in document.select(&ANCHOR_SEL) {
        let Some(href) = anchor.value().attr("href").filter(|h| !h.is_empty()) else {
            continue;
        };
        let Some(kind) = classify(&anchor, href) else {
            debug!("忽略无法归类的下载链接: {}", href);
            continue;
        };

        let url = resolve_href(href, domain);
        let text: String = anchor.text().collect();

        match kind {
            LinkKind::Video => links.video.push(VideoLink {
                url,
                quality: capture_label(&QUALITY_RE, &text),
                size: capture_label(&SIZE_RE, &text),
                full_text: text.trim().to_string(),
            }),
            LinkKind::Audio => links.audio.push(AudioLink {
                url,
                size: capture_label(&SIZE_RE, &text),
            }),
            LinkKind::Slides => links.slides = Some(url),
            LinkKind::Hls => links.hls = Some(url),
        }
    }

    debug!(
        "下载链接: {} 个视频, {} 个音频, 幻灯片: {}, HLS: {}",
        links.video.len(),
        links.audio.len(),
        links.slides.is_some(),
        links.hls.is_some()
    );
    links
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOMAIN: &str = "https://video.example.org";

    fn extract(markup: &str) -> DownloadLinks {
        extract_download_links(&Html::parse_document(markup), DOMAIN)
    }

    #[test]
    fn test_video_link_labels() {
        let links = extract(r#"<a class="download-mp4" href="/downloads/file.mp4">720p (1.2GB)</a>"#);
        assert_eq!(
            links.video,
            vec![VideoLink {
                url: "https://video.example.org/downloads/file.mp4".into(),
                quality: "720p".into(),
                size: "1.2GB".into(),
                full_text: "720p (1.2GB)".into(),
            }]
        );
    }

    #[test]
    fn test_missing_labels_are_unknown() {
        let links = extract(
            r#"<a class="download download-mp4" href="/downloads/file/v.mp4">Télécharger</a>
               <a class="download download-mp3" href="/downloads/file/a.mp3">Audio</a>"#,
        );
        assert_eq!(links.video[0].quality, "unknown");
        assert_eq!(links.video[0].size, "unknown");
        assert_eq!(links.audio[0].size, "unknown");
    }

    #[test]
    fn test_classification_and_document_order() {
        let links = extract(
            r#"<a class="download" href="/downloads/file/low.mp4">360p - 120 MB</a>
               <a href="https://cdn.example.org/downloads/file/audio.mp3">Audio 12.5 MB</a>
               <a class="download download-slides" href="/downloads/file/slides.zip">Slides</a>
               <a class="download" href="/api/v2/medias/playlist/?oid=v1">HLS</a>
               <a class="download" href="/downloads/file/high.mp4">1080p - 2 GB</a>
               <a class="download" href="/downloads/file/readme.txt">Readme</a>
               <a class="download">no href</a>
               <a href="/other/file.mp4">not a download</a>"#,
        );
        let video_urls: Vec<_> = links.video.iter().map(|v| v.url.as_str()).collect();
        assert_eq!(
            video_urls,
            vec![
                "https://video.example.org/downloads/file/low.mp4",
                "https://video.example.org/downloads/file/high.mp4"
            ]
        );
        assert_eq!(links.video[0].size, "120 MB");
        assert_eq!(links.video[1].quality, "1080p");
        assert_eq!(links.audio[0].url, "https://cdn.example.org/downloads/file/audio.mp3");
        assert_eq!(links.audio[0].size, "12.5 MB");
        assert_eq!(
            links.slides.as_deref(),
            Some("https://video.example.org/downloads/file/slides.zip")
        );
        assert_eq!(
            links.hls.as_deref(),
            Some("https://video.example.org/api/v2/medias/playlist/?oid=v1")
        );
    }

    #[test]
    fn test_class_takes_priority_over_href() {
        let links = extract(r#"<a class="download download-mp3" href="/downloads/file/track.mp4">64 MB</a>"#);
        assert!(links.video.is_empty());
        assert_eq!(links.audio.len(), 1);
    }

    #[test]
    fn test_labels_only_match_ascii_digits() {
        let links = extract(r#"<a class="download-mp4" href="/downloads/file/v.mp4">٧٢٠p (١٫٢ GB)</a>"#);
        assert_eq!(links.video[0].quality, "unknown");
        assert_eq!(links.video[0].size, "unknown");
    }

    #[test]
    fn test_no_anchors() {
        assert!(extract("<p>rien</p>").is_empty());
    }
}
