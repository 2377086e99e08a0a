// src/ui.rs

use crate::{
    constants,
    error::AppResult,
    models::{ExtractedMedia, ExtractionResult},
    symbols,
    workflows::ResultSink,
};
use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use std::{
    io::{self, Write},
    sync::{Arc, Mutex},
    time::Duration,
};

pub fn print_header(title: &str) {
    println!("\n{}", "═".repeat(constants::UI_WIDTH));
    println!(" {}", title.cyan().bold());
    println!("{}", "═".repeat(constants::UI_WIDTH));
}

pub fn plain(message: &str) {
    println!("{}", message);
}

pub fn info(message: &str) {
    println!("{} {}", *symbols::INFO, message);
}

pub fn warn(message: &str) {
    eprintln!("{} {}", *symbols::WARN, message.yellow());
}

pub fn error(message: &str) {
    eprintln!("{} {}", *symbols::ERROR, message.red());
}

pub fn box_message(title: &str, content: &[&str], color_func: fn(ColoredString) -> ColoredString) {
    println!("\n┌{}┐", "─".repeat(constants::UI_WIDTH - 2));
    println!("  {}", color_func(title.bold()));
    println!("├{}┤", "─".repeat(constants::UI_WIDTH - 2));
    for line in content {
        println!("  {}", line);
    }
    println!("└{}┘", "─".repeat(constants::UI_WIDTH - 2));
}

fn print_prompt_line(message: &str, default: Option<&str>) -> io::Result<()> {
    let default_str = default.map_or("".to_string(), |d| format!(" (默认: {})", d));
    print!("\n>>> {}{}: ", message, default_str);
    io::stdout().flush()
}

/// 读取一行输入。stdin 关闭时返回空字符串。
pub fn prompt(message: &str, default: Option<&str>) -> io::Result<String> {
    print_prompt_line(message, default)?;
    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    let input = input.trim().to_string();
    if input.is_empty() {
        Ok(default.unwrap_or("").to_string())
    } else {
        Ok(input)
    }
}

pub fn new_tasks_progress_bar(total: u64, prefix: &str) -> ProgressBar {
    let style = ProgressStyle::with_template(
        "{prefix:7.bold.cyan} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos:>3}/{len:3} ({percent:>3}%)",
    )
    .unwrap_or_else(|_| ProgressStyle::default_bar())
    .progress_chars("#>-");
    let pbar = ProgressBar::new(total);
    pbar.set_style(style);
    pbar.set_prefix(prefix.to_string());
    pbar.enable_steady_tick(Duration::from_millis(100));
    pbar
}

pub fn print_json<T: Serialize>(value: &T) -> AppResult<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// 以文本面板展示一次解析结果
pub fn render_result(source: &str, result: &ExtractionResult) {
    match result {
        ExtractionResult::Success(media) => render_media(media),
        ExtractionResult::Failure { reason } => {
            let page_line = format!("页面: {}", source);
            let reason_line = format!("原因: {}", reason);
            box_message(
                "解析失败",
                &[
                    page_line.as_str(),
                    reason_line.as_str(),
                    "该页面可能不是视频页面，或者使用了不同的页面结构。",
                ],
                |s| s.red(),
            );
        }
    }
}

fn render_media(media: &ExtractedMedia) {
    let urls = &media.urls;
    let mut lines = vec![
        format!("{} {}", "视频 OID:".bold(), media.oid.as_str().green()),
        format!("{} {}", "标题:".bold(), media.title),
        format!("{} {}", "站点:".bold(), media.domain),
        String::new(),
        format!("{} {}", *symbols::HLS, urls.hls_playlist()),
        format!("{} {}", "媒体信息:".dimmed(), urls.media_info()),
        format!("{} {}", "资源信息:".dimmed(), urls.resources_info()),
        format!("{} {}", "嵌入播放:".dimmed(), urls.iframe_embed()),
        format!("{} {}", "永久链接:".dimmed(), urls.permalink()),
    ];

    let downloads = &media.downloads;
    if !downloads.video.is_empty() {
        lines.push(String::new());
        lines.push("MP4 下载:".bold().to_string());
        for v in &downloads.video {
            lines.push(format!("  {} {} ({})", *symbols::VIDEO, v.quality, v.size));
            lines.push(format!("      {}", v.url));
        }
    }
    if !downloads.audio.is_empty() {
        lines.push(String::new());
        lines.push("音频下载:".bold().to_string());
        for a in &downloads.audio {
            lines.push(format!("  {} {}", *symbols::AUDIO, a.size));
            lines.push(format!("      {}", a.url));
        }
    }
    if let Some(slides) = &downloads.slides {
        lines.push(format!("  {} {}", *symbols::SLIDES, slides));
    }
    if let Some(hls) = &downloads.hls {
        lines.push(format!("  {} {}", *symbols::HLS, hls));
    }
    if media.media_info.is_none() {
        lines.push(String::new());
        lines.push(format!("{} 媒体信息不可用", *symbols::WARN));
    }
    lines.push(String::new());
    lines.push(constants::HLS_PLAYER_TIP.dimmed().to_string());

    let content: Vec<&str> = lines.iter().map(String::as_str).collect();
    box_message("视频解析结果", &content, |s| s.cyan());
}

/// 当前正在等待用户输入的提示语
#[derive(Debug, Default)]
pub struct PendingPrompt {
    message: Mutex<Option<String>>,
}

impl PendingPrompt {
    pub fn begin(&self, message: &str) {
        *self.message.lock().unwrap_or_else(|e| e.into_inner()) = Some(message.to_string());
    }

    pub fn end(&self) {
        self.message.lock().unwrap_or_else(|e| e.into_inner()).take();
    }

    pub fn current(&self) -> Option<String> {
        self.message.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }
}

/// 终端展示层。
///
/// 设置了 `pending` 时，结果若在等待输入期间到达，会先换行再输出，
/// 输出完毕后重新打印提示行。
pub struct TerminalSink {
    pub json: bool,
    pub pending: Option<Arc<PendingPrompt>>,
}

impl TerminalSink {
    pub fn new(json: bool) -> Self {
        Self { json, pending: None }
    }

    pub fn with_pending_prompt(mut self, pending: Arc<PendingPrompt>) -> Self {
        self.pending = Some(pending);
        self
    }

    fn render_outcome(&self, source: &str, outcome: &AppResult<ExtractionResult>) {
        match outcome {
            Ok(result) if self.json => {
                if let Err(e) = print_json(result) {
                    error(&format!("输出 JSON 失败: {}", e));
                }
            }
            Ok(result) => render_result(source, result),
            Err(e) => {
                log::error!("解析 '{}' 时发生错误: {}", source, e);
                error(&format!("处理 '{}' 时发生错误: {}", source, e));
            }
        }
    }
}

impl ResultSink for TerminalSink {
    fn render(&self, source: &str, outcome: &AppResult<ExtractionResult>) {
        let waiting = self.pending.as_ref().and_then(|p| p.current());
        if waiting.is_some() {
            println!();
        }
        self.render_outcome(source, outcome);
        if let Some(message) = waiting {
            if let Err(e) = print_prompt_line(&message, None) {
                log::warn!("重新打印提示行失败: {}", e);
            }
        }
    }
}
