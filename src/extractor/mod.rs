// src/extractor/mod.rs

pub mod detect;
pub mod links;
pub mod strategies;
pub mod urls;

use crate::{
    error::{AppError, AppResult},
    models::MediaOid,
    page::PageContext,
};
use log::{debug, info};
use scraper::Html;

/// 一种从页面中寻找视频 OID 的启发式方法
pub trait OidStrategy: Send + Sync {
    /// 用于日志的名称
    fn name(&self) -> &'static str;
    /// 命中则返回 OID；未命中不是错误
    fn find(&self, page: &PageContext, document: &Html) -> Option<MediaOid>;
}

/// 按固定优先级依次尝试各个启发式方法，返回第一个命中的 OID。
///
/// 顺序本身就是约定：同时满足多个方法的页面总是由排在最前的方法决定结果。
/// 新方法只能追加到末尾。
pub struct IdentifierResolver {
    strategies: Vec<Box<dyn OidStrategy>>,
}

impl Default for IdentifierResolver {
    fn default() -> Self {
        Self::empty()
            .with_strategy(strategies::RuntimePlayerProbe)
            .with_strategy(strategies::InlineMediaOid)
            .with_strategy(strategies::PermalinkPath)
            .with_strategy(strategies::VideosPageScript)
            .with_strategy(strategies::DataOidAttribute)
    }
}

impl IdentifierResolver {
    pub fn empty() -> Self {
        Self { strategies: Vec::new() }
    }

    /// 在末尾追加一个方法
    pub fn with_strategy(mut self, strategy: impl OidStrategy + 'static) -> Self {
        self.strategies.push(Box::new(strategy));
        self
    }

    pub fn strategy_names(&self) -> Vec<&'static str> {
        self.strategies.iter().map(|s| s.name()).collect()
    }

    pub fn resolve(&self, page: &PageContext) -> AppResult<MediaOid> {
        let document = page.document();
        self.resolve_in(page, &document)
    }

    /// 使用已解析好的 DOM 进行查找，避免重复解析
    pub fn resolve_in(&self, page: &PageContext, document: &Html) -> AppResult<MediaOid> {
        for strategy in &self.strategies {
            match strategy.find(page, document) {
                Some(oid) => {
                    info!("通过 '{}' 找到视频 OID: {}", strategy.name(), oid);
                    return Ok(oid);
                }
                None => debug!("'{}' 未命中", strategy.name()),
            }
        }
        debug!("所有方法均未找到 OID: {}", page.url());
        Err(AppError::IdentifierNotFound)
    }
}
