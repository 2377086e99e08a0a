// src/models.rs

use crate::constants;
use serde::Serialize;
use serde_json::Value;
use std::fmt;

/// 平台内部的视频标识符 (OID)。不透明、非空，原样拼入派生链接。
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct MediaOid(String);

impl MediaOid {
    /// 空字符串不是合法的 OID
    pub fn new(value: impl Into<String>) -> Option<Self> {
        let value = value.into();
        if value.is_empty() { None } else { Some(Self(value)) }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MediaOid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// 由站点域名和 OID 拼接出的五个固定链接，只能通过
/// [`crate::extractor::urls::build_urls`] 构造。
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DerivedUrlSet {
    pub(crate) domain: String,
    pub(crate) hls_playlist: String,
    pub(crate) media_info: String,
    pub(crate) resources_info: String,
    pub(crate) iframe_embed: String,
    pub(crate) permalink: String,
}

impl DerivedUrlSet {
    pub fn domain(&self) -> &str {
        &self.domain
    }
    pub fn hls_playlist(&self) -> &str {
        &self.hls_playlist
    }
    pub fn media_info(&self) -> &str {
        &self.media_info
    }
    pub fn resources_info(&self) -> &str {
        &self.resources_info
    }
    pub fn iframe_embed(&self) -> &str {
        &self.iframe_embed
    }
    pub fn permalink(&self) -> &str {
        &self.permalink
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VideoLink {
    pub url: String,
    pub quality: String,
    pub size: String,
    pub full_text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AudioLink {
    pub url: String,
    pub size: String,
}

/// 页面中的下载链接，按文档顺序收集
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DownloadLinks {
    pub video: Vec<VideoLink>,
    pub audio: Vec<AudioLink>,
    pub slides: Option<String>,
    pub hls: Option<String>,
}

impl DownloadLinks {
    pub fn is_empty(&self) -> bool {
        self.video.is_empty() && self.audio.is_empty() && self.slides.is_none() && self.hls.is_none()
    }
}

/// 媒体信息 API 的响应。任何 JSON 形态都接受，只读取可选的 `title`。
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MediaInfo {
    pub title: Option<String>,
    pub raw: Value,
}

impl MediaInfo {
    pub fn from_value(raw: Value) -> Self {
        let title = raw
            .get(constants::api::json_keys::TITLE)
            .and_then(Value::as_str)
            .filter(|t| !t.trim().is_empty())
            .map(str::to_string);
        Self { title, raw }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExtractedMedia {
    pub oid: MediaOid,
    pub domain: String,
    pub urls: DerivedUrlSet,
    pub downloads: DownloadLinks,
    pub media_info: Option<MediaInfo>,
    pub title: String,
}

/// 一次解析请求的最终结果，交给展示层后即被消费
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ExtractionResult {
    Success(Box<ExtractedMedia>),
    Failure { reason: String },
}

impl ExtractionResult {
    pub fn is_success(&self) -> bool {
        matches!(self, ExtractionResult::Success(_))
    }

    pub fn media(&self) -> Option<&ExtractedMedia> {
        match self {
            ExtractionResult::Success(media) => Some(media),
            ExtractionResult::Failure { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_media_oid_rejects_empty() {
        assert!(MediaOid::new("").is_none());
        assert_eq!(MediaOid::new("v1234").unwrap().as_str(), "v1234");
    }

    #[test]
    fn test_media_info_tolerates_any_shape() {
        let info = MediaInfo::from_value(json!({"title": "Cours 1", "duration": 12}));
        assert_eq!(info.title.as_deref(), Some("Cours 1"));

        assert_eq!(MediaInfo::from_value(json!([1, 2, 3])).title, None);
        assert_eq!(MediaInfo::from_value(json!({"title": 42})).title, None);
        assert_eq!(MediaInfo::from_value(json!({"success": true})).title, None);
    }

    #[test]
    fn test_failure_serializes_with_status_tag() {
        let result = ExtractionResult::Failure { reason: "nope".into() };
        let value = serde_json::to_value(&result).unwrap();
        assert_eq!(value, json!({"status": "failure", "reason": "nope"}));
    }
}
