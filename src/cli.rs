// src/cli.rs

use clap::{Parser, ValueEnum, command, crate_version};
use std::path::PathBuf;

/// 定义日志输出级别
#[derive(ValueEnum, Copy, Clone, Debug, PartialEq, Eq)]
pub enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for log::LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Off => log::LevelFilter::Off,
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

#[derive(Parser, Debug, Clone)]
#[command(
    version = crate_version!(),
    about,
    long_about = None,
    arg_required_else_help = true,
    disable_help_flag = true,
    disable_version_flag = true,
)]
#[command(group(
    clap::ArgGroup::new("mode")
        .required(true)
        .args(&["interactive", "url", "html", "batch_file"]),
))]
pub struct Cli {
    // --- 运行模式 (Mode) ---
    /// 启动交互式会话，逐一输入视频页面链接
    #[arg(short, long, action = clap::ArgAction::SetTrue, help_heading = "Mode")]
    pub interactive: bool,
    /// 抓取并解析单个视频页面
    #[arg(long, help_heading = "Mode")]
    pub url: Option<String>,
    /// 解析本地保存的页面 HTML (需配合 --page-url 使用)
    #[arg(long, value_name = "FILE", help_heading = "Mode", requires = "page_url")]
    pub html: Option<PathBuf>,
    /// 从文本文件批量解析多个页面链接 (每行一个)
    #[arg(short, long, value_name = "FILE", help_heading = "Mode")]
    pub batch_file: Option<PathBuf>,

    // --- 解析选项 (Options) ---
    /// [HTML模式] 本地页面对应的原始链接，用于推导站点域名
    #[arg(long, value_name = "URL", help_heading = "Options")]
    pub page_url: Option<String>,
    /// 页面运行时全局对象的 JSON 快照 (例如 {"player": {"mediaOID": "..."}})
    #[arg(long, value_name = "FILE", help_heading = "Options")]
    pub globals: Option<PathBuf>,
    /// 以 JSON 格式输出解析结果
    #[arg(long, action = clap::ArgAction::SetTrue, help_heading = "Options")]
    pub json: bool,
    /// 即使页面未被识别为 UbiCast 页面也强制解析
    #[arg(long, action = clap::ArgAction::SetTrue, help_heading = "Options")]
    pub force: bool,
    /// 跳过媒体信息 API 请求
    #[arg(long, action = clap::ArgAction::SetTrue, help_heading = "Options")]
    pub no_metadata: bool,
    /// [批量模式] 设置最大并发解析数
    #[arg(short, long, value_parser = clap::value_parser!(usize), help_heading = "Options")]
    pub workers: Option<usize>,

    // --- 通用选项 (General) ---
    /// 显示此帮助信息并退出
    #[arg(short = 'h', long, action = clap::ArgAction::Help, global = true, help_heading = "General")]
    _help: Option<bool>,
    /// 显示版本信息并退出
    #[arg(short = 'V', long, action = clap::ArgAction::Version, global = true, help_heading = "General")]
    _version: Option<bool>,
    /// (隐藏参数) 设置日志文件的输出级别，用于调试
    #[arg(long, value_enum, default_value_t = LogLevel::Off, global = true, hide = true)]
    pub log_level: LogLevel,
}
