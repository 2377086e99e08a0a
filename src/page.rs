// src/page.rs

use crate::{
    client::RobustClient,
    constants::api::json_keys,
    error::{AppError, AppResult},
};
use anyhow::Context;
use log::{debug, info};
use scraper::Html;
use serde_json::Value;
use std::{fmt, fs, path::Path, sync::Arc};
use url::Url;

/// 页面运行时全局对象的访问接口。
///
/// 浏览器中这对应 `window.player`；命令行下由 `--globals` 提供的 JSON 快照实现。
/// 解析器只通过这个接口读取全局状态。
pub trait RuntimeGlobals: Send + Sync {
    /// 页面是否定义了全局 player 对象
    fn has_player(&self) -> bool;
    /// player 对象上的 `mediaOID` 字段 (仅当其为真值时)
    fn player_media_oid(&self) -> Option<String>;
}

/// 以 JSON 文档表示的全局对象快照，形如 `{"player": {"mediaOID": "..."}}`
#[derive(Debug, Clone)]
pub struct JsonGlobals(Value);

impl JsonGlobals {
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    pub fn from_file(path: &Path) -> AppResult<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("读取全局对象文件 '{}' 失败", path.display()))?;
        let value = serde_json::from_str(&content)
            .with_context(|| format!("解析全局对象文件 '{}' 失败", path.display()))?;
        Ok(Self(value))
    }
}

impl RuntimeGlobals for JsonGlobals {
    fn has_player(&self) -> bool {
        self.0.get(json_keys::PLAYER).is_some()
    }

    fn player_media_oid(&self) -> Option<String> {
        match self.0.get(json_keys::PLAYER)?.get(json_keys::MEDIA_OID)? {
            Value::String(s) if !s.is_empty() => Some(s.clone()),
            Value::Number(n) if n.as_f64() != Some(0.0) => Some(n.to_string()),
            _ => None,
        }
    }
}

/// 一次解析请求的只读输入：页面链接、页面 HTML 与可选的运行时全局对象
#[derive(Clone)]
pub struct PageContext {
    url: String,
    markup: String,
    globals: Option<Arc<dyn RuntimeGlobals>>,
}

impl fmt::Debug for PageContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PageContext")
            .field("url", &self.url)
            .field("markup_len", &self.markup.len())
            .field("has_globals", &self.globals.is_some())
            .finish()
    }
}

impl PageContext {
    pub fn new(url: impl Into<String>, markup: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            markup: markup.into(),
            globals: None,
        }
    }

    pub fn with_globals(mut self, globals: Arc<dyn RuntimeGlobals>) -> Self {
        self.globals = Some(globals);
        self
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn markup(&self) -> &str {
        &self.markup
    }

    pub fn globals(&self) -> Option<&dyn RuntimeGlobals> {
        self.globals.as_deref()
    }

    /// 解析 DOM。`Html` 不是 `Send`，不要跨越 await 持有。
    pub fn document(&self) -> Html {
        Html::parse_document(&self.markup)
    }
}

/// 页面链接必须是绝对的 http(s) 链接
pub fn validate_page_url(input: &str) -> AppResult<Url> {
    let url = Url::parse(input.trim())
        .map_err(|_| AppError::UserInputError(format!("输入 '{}' 不是有效链接。", input)))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(AppError::UserInputError(format!(
            "不支持的链接协议 '{}': {}",
            other, input
        ))),
    }
}

/// 抓取视频页面。重定向后的最终链接作为页面链接。
pub async fn fetch_page(client: &RobustClient, input: &str) -> AppResult<PageContext> {
    let url = validate_page_url(input)?;
    info!("抓取页面: {}", url);
    let res = client.get(url).await?;
    let final_url = res.url().to_string();
    let markup = res.text().await?;
    debug!("页面 {} 共 {} 字节", final_url, markup.len());
    Ok(PageContext::new(final_url, markup))
}

/// 读取本地保存的页面
pub fn read_page(path: &Path, page_url: &str) -> AppResult<PageContext> {
    let url = validate_page_url(page_url)?;
    let markup = fs::read_to_string(path)
        .with_context(|| format!("读取页面文件 '{}' 失败", path.display()))?;
    info!("读取本地页面 '{}' ({} 字节)", path.display(), markup.len());
    Ok(PageContext::new(url.to_string(), markup))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_json_globals_media_oid() {
        let globals = JsonGlobals::new(json!({"player": {"mediaOID": "v125f4"}}));
        assert!(globals.has_player());
        assert_eq!(globals.player_media_oid().as_deref(), Some("v125f4"));

        // 空字符串不是真值
        let globals = JsonGlobals::new(json!({"player": {"mediaOID": ""}}));
        assert!(globals.has_player());
        assert_eq!(globals.player_media_oid(), None);

        let globals = JsonGlobals::new(json!({"player": null}));
        assert!(globals.has_player());
        assert_eq!(globals.player_media_oid(), None);

        let globals = JsonGlobals::new(json!({}));
        assert!(!globals.has_player());
    }

    #[test]
    fn test_validate_page_url() {
        assert!(validate_page_url("https://video.example.org/permalink/v1/").is_ok());
        assert!(matches!(
            validate_page_url("ftp://video.example.org/"),
            Err(AppError::UserInputError(_))
        ));
        assert!(matches!(
            validate_page_url("not a url"),
            Err(AppError::UserInputError(_))
        ));
    }
}
