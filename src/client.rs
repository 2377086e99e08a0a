// src/client.rs

use crate::{config::AppConfig, error::*};
use log::debug;
use reqwest::{IntoUrl, Response};
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use reqwest_retry::{RetryTransientMiddleware, policies::ExponentialBackoff};
use std::sync::Arc;

/// HTTP 客户端。
///
/// `client` 带有瞬时错误重试中间件，用于抓取视频页面；
/// `plain` 不带重试，用于媒体信息 API (失败一次即放弃)。
#[derive(Clone)]
pub struct RobustClient {
    pub client: ClientWithMiddleware,
    pub plain: reqwest::Client,
}

impl RobustClient {
    pub fn new(config: Arc<AppConfig>) -> AppResult<Self> {
        let plain = reqwest::Client::builder()
            .user_agent(config.user_agent.clone())
            .connect_timeout(config.connect_timeout)
            .timeout(config.timeout)
            .pool_max_idle_per_host(config.max_workers * 2)
            .build()?;

        let retry_policy =
            ExponentialBackoff::builder().build_with_max_retries(config.page_max_retries);
        let client = ClientBuilder::new(plain.clone())
            .with(RetryTransientMiddleware::new_with_policy(retry_policy))
            .build();

        Ok(Self { client, plain })
    }

    /// 带重试的 GET，非 2xx 状态码视为错误
    pub async fn get<T: IntoUrl>(&self, url: T) -> AppResult<Response> {
        let res = self.client.get(url).send().await?;
        debug!("GET {} -> {}", res.url(), res.status());
        Ok(res.error_for_status()?)
    }

    /// 不重试的 GET，只发出一次请求。不检查状态码，由调用方决定如何处理响应体。
    pub async fn get_once<T: IntoUrl>(&self, url: T) -> AppResult<Response> {
        let res = self.plain.get(url).send().await?;
        debug!("GET (once) {} -> {}", res.url(), res.status());
        Ok(res)
    }
}
