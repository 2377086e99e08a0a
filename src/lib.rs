// src/lib.rs

pub mod cli;
pub mod client;
pub mod config;
pub mod constants;
pub mod error;
pub mod extractor;
pub mod logger;
pub mod metadata;
pub mod models;
pub mod page;
pub mod symbols;
pub mod ui;
pub mod utils;
pub mod workflows;

use crate::{
    cli::Cli,
    client::RobustClient,
    config::AppConfig,
    error::{AppError, AppResult},
    extractor::IdentifierResolver,
    metadata::MetadataSource,
    page::{JsonGlobals, PageContext, RuntimeGlobals},
};
use log::{debug, info};
use std::sync::Arc;

/// 核心的执行上下文，包含所有任务所需的状态和工具
#[derive(Clone)]
pub struct ExtractJobContext {
    pub config: Arc<AppConfig>,
    pub http_client: Arc<RobustClient>,
    pub args: Arc<Cli>,
    pub resolver: Arc<IdentifierResolver>,
    pub globals: Option<Arc<dyn RuntimeGlobals>>,
}

impl ExtractJobContext {
    pub fn new(args: Arc<Cli>, config: Arc<AppConfig>) -> AppResult<Self> {
        let globals: Option<Arc<dyn RuntimeGlobals>> = match &args.globals {
            Some(path) => {
                info!("从 '{}' 加载页面全局对象", path.display());
                Some(Arc::new(JsonGlobals::from_file(path)?))
            }
            None => None,
        };
        Ok(Self {
            http_client: Arc::new(RobustClient::new(config.clone())?),
            config,
            args,
            resolver: Arc::new(IdentifierResolver::default()),
            globals,
        })
    }

    pub fn attach_globals(&self, page: PageContext) -> PageContext {
        match &self.globals {
            Some(globals) => page.with_globals(globals.clone()),
            None => page,
        }
    }

    /// `--no-metadata` 时不请求媒体信息
    pub fn metadata_source(&self) -> Option<Arc<dyn MetadataSource>> {
        if self.args.no_metadata {
            None
        } else {
            Some(self.http_client.clone() as Arc<dyn MetadataSource>)
        }
    }
}

/// 库的公共入口点，由 `main.rs` 调用。返回值表示所有页面是否都解析成功。
pub async fn run_from_cli(args: Arc<Cli>) -> AppResult<bool> {
    debug!("CLI 参数: {:?}", args);

    let config = Arc::new(AppConfig::new(&args)?);
    debug!("加载的应用配置: {:?}", config);

    let context = ExtractJobContext::new(args.clone(), config)?;

    if args.interactive {
        workflows::run_interactive(context).await
    } else if let Some(batch_file) = &args.batch_file {
        workflows::run_batch(context, batch_file).await
    } else if let Some(html) = &args.html {
        // clap 已保证 --html 与 --page-url 同时出现
        let page_url = args.page_url.as_deref().ok_or_else(|| {
            AppError::UserInputError("使用 --html 时必须提供 --page-url。".into())
        })?;
        workflows::run_html_file(context, html, page_url).await
    } else if let Some(url) = &args.url {
        workflows::run_single(context, url).await
    } else {
        Err(AppError::UserInputError("未指定运行模式。".into()))
    }
}
