// src/main.rs

use clap::{CommandFactory, FromArgMatches};
use colored::*;
use std::{env, sync::Arc, time::Duration};
use ubicast_dl::{cli::Cli, error::AppError, logger, run_from_cli};

#[tokio::main]
async fn main() {
    // 为 Windows 终端启用 ANSI 颜色支持。
    #[cfg(windows)]
    {
        colored::control::set_virtual_terminal(true).ok();
    }
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            println!("\n{} 用户强制中断程序。", "[!]".yellow());
            tokio::time::sleep(Duration::from_millis(100)).await;
            std::process::exit(130);
        }
    });

    let bin_name = env::var("CARGO_BIN_NAME").unwrap_or_else(|_| "ubicast-dl".to_string());

    let after_help = format!(
        "示例:\n  # 解析单个视频页面\n  {bin} --url \"https://video.example.org/permalink/v1234/\"\n\n  # 解析本地保存的页面\n  {bin} --html page.html --page-url \"https://video.example.org/videos/cours-1/\"\n\n  # 批量解析并以 JSON 输出\n  {bin} -b links.txt --json\n\n  # 交互模式\n  {bin} -i",
        bin = bin_name
    );

    let cmd = Cli::command().after_help(after_help);
    let args = match Cli::from_arg_matches(&cmd.get_matches()) {
        Ok(args) => Arc::new(args),
        Err(e) => e.exit(),
    };

    logger::init_logger(args.log_level);

    match run_from_cli(args).await {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(AppError::UserInterrupt) => std::process::exit(130),
        Err(e) => {
            log::error!("程序执行出错: {}", e);
            eprintln!("\n{} {}", "[X]".red(), format!("程序执行出错: {}", e).red());
            std::process::exit(1);
        }
    }
}
