// src/symbols.rs

use colored::{ColoredString, Colorize};
use std::sync::LazyLock;

// 状态提示
pub static OK: LazyLock<ColoredString> = LazyLock::new(|| "[OK]".green());
pub static ERROR: LazyLock<ColoredString> = LazyLock::new(|| "[X]".red());
pub static INFO: LazyLock<ColoredString> = LazyLock::new(|| "[i]".cyan());
pub static WARN: LazyLock<ColoredString> = LazyLock::new(|| "[!]".yellow());
pub static CTRL_C: LazyLock<ColoredString> = LazyLock::new(|| "Ctrl+C".yellow());

// 结果面板中各类链接的标签
pub static HLS: LazyLock<ColoredString> = LazyLock::new(|| "[HLS]".magenta());
pub static VIDEO: LazyLock<ColoredString> = LazyLock::new(|| "[MP4]".blue());
pub static AUDIO: LazyLock<ColoredString> = LazyLock::new(|| "[MP3]".blue());
pub static SLIDES: LazyLock<ColoredString> = LazyLock::new(|| "[PPT]".blue());
