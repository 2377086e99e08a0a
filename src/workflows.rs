// src/workflows.rs

use crate::{
    ExtractJobContext,
    constants::{self, selectors},
    error::{AppError, AppResult},
    extractor::{
        IdentifierResolver, detect,
        links::extract_download_links,
        urls::{build_urls, extract_domain},
    },
    metadata::MetadataSource,
    models::{DerivedUrlSet, DownloadLinks, ExtractedMedia, ExtractionResult, MediaOid},
    page::{self, PageContext},
    symbols, ui, utils,
};
use colored::*;
use futures::{StreamExt, stream};
use log::{debug, info, warn};
use scraper::Selector;
use serde::Serialize;
use std::{
    future::Future,
    path::Path,
    sync::{Arc, LazyLock, Mutex},
};
use tokio::task::{AbortHandle, JoinHandle};

static TITLE_SEL: LazyLock<Selector> = LazyLock::new(|| Selector::parse(selectors::TITLE).unwrap());

/// 同步阶段从页面中得到的全部信息
struct PageFindings {
    oid: MediaOid,
    domain: String,
    urls: DerivedUrlSet,
    downloads: DownloadLinks,
    document_title: String,
}

// DOM 只在这里存活，不会跨越 await
fn inspect_page(page: &PageContext, resolver: &IdentifierResolver) -> AppResult<PageFindings> {
    let document = page.document();
    let oid = resolver.resolve_in(page, &document)?;

    let domain =
        extract_domain(page.url()).ok_or_else(|| AppError::MissingDomain(page.url().to_string()))?;
    let urls = build_urls(oid.as_str(), &domain)
        .ok_or_else(|| AppError::MissingDomain(page.url().to_string()))?;
    let downloads = extract_download_links(&document, &domain);
    let document_title = document
        .select(&TITLE_SEL)
        .next()
        .map(|t| t.text().collect::<String>().trim().to_string())
        .unwrap_or_default();

    Ok(PageFindings {
        oid,
        domain,
        urls,
        downloads,
        document_title,
    })
}

/// 完整的解析流程: 查找 OID → 拼接链接 / 收集下载链接 → 请求媒体信息。
///
/// 找不到 OID 时直接返回 `Failure`，不会发出任何网络请求。
/// 媒体信息请求失败只会被记录，结果仍然是 `Success`。
/// 其他错误原样向上传递。
pub async fn extract_all(
    page: &PageContext,
    resolver: &IdentifierResolver,
    metadata: Option<&dyn MetadataSource>,
) -> AppResult<ExtractionResult> {
    info!("开始解析页面: {}", page.url());

    let findings = match inspect_page(page, resolver) {
        Ok(findings) => findings,
        Err(e @ AppError::IdentifierNotFound) => {
            warn!("页面 {} 解析失败: {}", page.url(), e);
            return Ok(ExtractionResult::Failure {
                reason: e.to_string(),
            });
        }
        Err(e) => return Err(e),
    };

    let media_info = match metadata {
        Some(source) => match source.fetch_media_info(findings.urls.media_info()).await {
            Ok(info) => Some(info),
            Err(e) => {
                warn!("无法获取媒体信息 ({}): {}", findings.urls.media_info(), e);
                None
            }
        },
        None => {
            debug!("已跳过媒体信息请求");
            None
        }
    };

    let title = media_info
        .as_ref()
        .and_then(|info| info.title.clone())
        .unwrap_or(findings.document_title);

    Ok(ExtractionResult::Success(Box::new(ExtractedMedia {
        oid: findings.oid,
        domain: findings.domain,
        urls: findings.urls,
        downloads: findings.downloads,
        media_info,
        title,
    })))
}

/// 非 UbiCast 页面默认拒绝解析
pub fn ensure_ubicast_page(page: &PageContext, force: bool) -> AppResult<()> {
    let document = page.document();
    if detect::is_ubicast_page(page, &document) {
        return Ok(());
    }
    if force {
        warn!("页面 {} 未被识别为 UbiCast 页面，按 --force 继续", page.url());
        Ok(())
    } else {
        Err(AppError::NotUbicastPage(page.url().to_string()))
    }
}

/// 展示层接口
pub trait ResultSink: Send + Sync {
    fn render(&self, source: &str, outcome: &AppResult<ExtractionResult>);
}

/// 单飞触发器：同一时刻只有最新的一次请求有效。
///
/// 新请求会中止仍在进行的旧请求；即使旧请求已经完成，
/// 只要不是最新一代，其结果也会被丢弃而不会渲染。
pub struct SingleFlight {
    resolver: Arc<IdentifierResolver>,
    metadata: Option<Arc<dyn MetadataSource>>,
    sink: Arc<dyn ResultSink>,
    // 渲染时持有此锁，保证检查代数与渲染之间不会插入新请求
    generation: Arc<Mutex<u64>>,
    in_flight: Mutex<Option<AbortHandle>>,
}

impl SingleFlight {
    pub fn new(
        resolver: Arc<IdentifierResolver>,
        metadata: Option<Arc<dyn MetadataSource>>,
        sink: Arc<dyn ResultSink>,
    ) -> Self {
        Self {
            resolver,
            metadata,
            sink,
            generation: Arc::new(Mutex::new(0)),
            in_flight: Mutex::new(None),
        }
    }

    /// 发起一次解析。返回的句柄在结果被渲染时得到 `true`，被丢弃时得到 `false`；
    /// 被中止的任务其句柄返回 `JoinError`。
    pub fn trigger<F>(&self, source: impl Into<String>, load: F) -> JoinHandle<bool>
    where
        F: Future<Output = AppResult<PageContext>> + Send + 'static,
    {
        let source = source.into();
        let my_generation = {
            let mut generation = self.generation.lock().unwrap_or_else(|e| e.into_inner());
            *generation += 1;
            *generation
        };
        debug!("触发第 {} 次解析: {}", my_generation, source);

        let resolver = self.resolver.clone();
        let metadata = self.metadata.clone();
        let sink = self.sink.clone();
        let generation = self.generation.clone();

        let task = tokio::spawn(async move {
            let outcome = match load.await {
                Ok(page) => extract_all(&page, &resolver, metadata.as_deref()).await,
                Err(e) => Err(e),
            };

            let current = generation.lock().unwrap_or_else(|e| e.into_inner());
            if *current != my_generation {
                info!("丢弃过期的解析结果 (第 {} 次，当前第 {} 次): {}", my_generation, *current, source);
                return false;
            }
            sink.render(&source, &outcome);
            true
        });

        let previous = self
            .in_flight
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .replace(task.abort_handle());
        if let Some(previous) = previous {
            previous.abort();
        }
        task
    }
}

// ---------------------------------------------------------------------------
// 运行模式
// ---------------------------------------------------------------------------

async fn load_page(context: &ExtractJobContext, input: &str) -> AppResult<PageContext> {
    let page = page::fetch_page(&context.http_client, input).await?;
    Ok(context.attach_globals(page))
}

async fn extract_checked(context: &ExtractJobContext, page: &PageContext) -> AppResult<ExtractionResult> {
    ensure_ubicast_page(page, context.args.force)?;
    let metadata = context.metadata_source();
    extract_all(page, &context.resolver, metadata.as_deref()).await
}

fn present(context: &ExtractJobContext, source: &str, result: &ExtractionResult) -> AppResult<bool> {
    if context.args.json {
        ui::print_json(result)?;
    } else {
        ui::render_result(source, result);
    }
    Ok(result.is_success())
}

/// 运行单页面模式 (--url)
pub(crate) async fn run_single(context: ExtractJobContext, url: &str) -> AppResult<bool> {
    let page = load_page(&context, url).await?;
    let result = extract_checked(&context, &page).await?;
    present(&context, url, &result)
}

/// 运行本地页面模式 (--html)
pub(crate) async fn run_html_file(
    context: ExtractJobContext,
    path: &Path,
    page_url: &str,
) -> AppResult<bool> {
    let page = context.attach_globals(page::read_page(path, page_url)?);
    let result = extract_checked(&context, &page).await?;
    present(&context, &path.display().to_string(), &result)
}

#[derive(Serialize)]
struct BatchEntry {
    source: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    result: Option<ExtractionResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

/// 运行批量模式，各页面互不影响，按完成顺序汇报
pub(crate) async fn run_batch(context: ExtractJobContext, batch_file: &Path) -> AppResult<bool> {
    let content = std::fs::read_to_string(batch_file).map_err(|e| {
        log::error!("读取批量文件 '{}' 失败: {}", batch_file.display(), e);
        AppError::from(e)
    })?;
    let tasks = utils::parse_batch_lines(&content);
    if tasks.is_empty() {
        ui::warn("批量文件为空。");
        return Ok(true);
    }

    if !context.args.json {
        ui::print_header(&format!("批量解析页面 (共 {} 个)", tasks.len()));
    }
    let pbar = ui::new_tasks_progress_bar(tasks.len() as u64, "解析");

    let mut stream = stream::iter(tasks.clone())
        .map(|task| {
            let context = context.clone();
            async move {
                let outcome = async {
                    let page = load_page(&context, &task).await?;
                    extract_checked(&context, &page).await
                }
                .await;
                (task, outcome)
            }
        })
        .buffer_unordered(context.config.max_workers);

    let mut entries = Vec::with_capacity(tasks.len());
    let (mut success, mut failed) = (0usize, 0usize);
    while let Some((task, outcome)) = stream.next().await {
        let short = utils::truncate_text(&task, constants::URL_TRUNCATE_LENGTH);
        match &outcome {
            Ok(ExtractionResult::Success(media)) => {
                success += 1;
                pbar.println(format!("{} {} (OID: {})", *symbols::OK, short, media.oid));
            }
            Ok(ExtractionResult::Failure { reason }) => {
                failed += 1;
                pbar.println(format!("{} {} ({})", *symbols::WARN, short, reason));
            }
            Err(e) => {
                failed += 1;
                log::error!("批量任务 '{}' 失败: {}", task, e);
                pbar.println(format!("{} {} ({})", *symbols::ERROR, short, e));
            }
        }
        pbar.inc(1);
        entries.push(match outcome {
            Ok(result) => BatchEntry { source: task, result: Some(result), error: None },
            Err(e) => BatchEntry { source: task, result: None, error: Some(e.to_string()) },
        });
    }
    pbar.finish_and_clear();

    if context.args.json {
        ui::print_json(&entries)?;
    } else {
        for entry in &entries {
            if let Some(result @ ExtractionResult::Success(_)) = &entry.result {
                ui::render_result(&entry.source, result);
            }
        }
        ui::print_header("批量任务报告");
        println!(
            "{} | {} | 总计: {}",
            format!("成功: {}", success).green(),
            format!("失败: {}", failed).red(),
            tasks.len()
        );
    }
    Ok(failed == 0)
}

/// 运行交互模式。每输入一个链接就触发一次解析，新的输入会取代仍未完成的旧请求。
pub(crate) async fn run_interactive(context: ExtractJobContext) -> AppResult<bool> {
    ui::print_header("交互模式");
    ui::plain(&format!(
        "在此模式下，你可以逐一输入视频页面链接。直接按回车或 {} 退出。",
        *symbols::CTRL_C
    ));

    const PROMPT: &str = "请输入视频页面链接";
    let pending = Arc::new(ui::PendingPrompt::default());
    let sink = Arc::new(ui::TerminalSink::new(context.args.json).with_pending_prompt(pending.clone()));
    let flight = SingleFlight::new(context.resolver.clone(), context.metadata_source(), sink);
    let mut last: Option<JoinHandle<bool>> = None;

    loop {
        pending.begin(PROMPT);
        let input = tokio::task::spawn_blocking(|| ui::prompt(PROMPT, None)).await;
        pending.end();
        let input = input.map_err(|e| AppError::Other(e.into()))?;
        match input {
            Ok(input) if !input.is_empty() => {
                if let Err(e) = page::validate_page_url(&input) {
                    ui::warn(&e.to_string());
                    continue;
                }
                let task_context = context.clone();
                let url = input.clone();
                last = Some(flight.trigger(input, async move {
                    let page = load_page(&task_context, &url).await?;
                    ensure_ubicast_page(&page, task_context.args.force)?;
                    Ok::<_, AppError>(page)
                }));
            }
            // 空行或 stdin 关闭
            Ok(_) => break,
            Err(e) => {
                log::error!("读取输入失败: {}", e);
                ui::error(&format!("读取输入失败: {}", e));
                break;
            }
        }
    }

    // 退出前等待最后一次请求完成
    if let Some(handle) = last {
        let _ = handle.await;
    }
    ui::plain("");
    ui::info("退出交互模式。");
    Ok(true)
}
