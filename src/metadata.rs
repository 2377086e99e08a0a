// src/metadata.rs

use crate::{
    client::RobustClient,
    error::{AppError, AppResult},
    models::MediaInfo,
};
use async_trait::async_trait;
use log::{debug, warn};
use serde_json::Value;

/// 媒体信息来源。正常运行时是平台的 HTTP API，测试中可替换。
#[async_trait]
pub trait MetadataSource: Send + Sync {
    async fn fetch_media_info(&self, url: &str) -> AppResult<MediaInfo>;
}

/// 只请求一次，不做任何重试。
/// 非 2xx 响应只要响应体是 JSON，仍然作为媒体信息返回。
#[async_trait]
impl MetadataSource for RobustClient {
    async fn fetch_media_info(&self, url: &str) -> AppResult<MediaInfo> {
        let res = self
            .get_once(url)
            .await
            .map_err(|e| AppError::MetadataFetch(e.to_string()))?;
        let status = res.status();
        if !status.is_success() {
            warn!("媒体信息接口返回 {}: {}", status, url);
        }
        let body = res
            .text()
            .await
            .map_err(|e| AppError::MetadataFetch(e.to_string()))?;
        let value: Value = serde_json::from_str(&body).map_err(|source| AppError::ApiParseFailed {
            url: url.to_string(),
            source,
        })?;
        debug!("媒体信息响应 ({} 字节) 来自 {}", body.len(), url);
        Ok(MediaInfo::from_value(value))
    }
}
