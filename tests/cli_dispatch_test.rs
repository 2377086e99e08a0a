// tests/cli_dispatch_test.rs

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs::File;
use std::io::Write;
use std::time::Duration;
use tempfile::{TempDir, tempdir};

// 辅助函数：隔离 HOME，避免在用户目录下创建配置文件
fn main_command(home: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin(env!("CARGO_PKG_NAME")).unwrap();
    cmd.env("HOME", home.path());
    cmd
}

// --- 测试基本 CLI 行为 ---

#[test]
fn test_help_flag() {
    let home = tempdir().unwrap();
    main_command(&home)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("显示此帮助信息并退出"));
}

#[test]
fn test_missing_mode_shows_help() {
    let home = tempdir().unwrap();
    main_command(&home)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Usage:"));
}

#[test]
fn test_html_mode_requires_page_url() {
    let home = tempdir().unwrap();
    main_command(&home)
        .arg("--html")
        .arg("tests/fixtures/video_page.html")
        .assert()
        .failure()
        .stderr(predicate::str::contains("--page-url <URL>"));
}

// --- 测试核心分发逻辑 ---

#[test]
fn test_html_mode_outputs_json() {
    let home = tempdir().unwrap();
    main_command(&home)
        .args([
            "--html",
            "tests/fixtures/video_page.html",
            "--page-url",
            "https://video.example.org/videos/amphi-b/",
            "--no-metadata",
            "--json",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""oid": "v1b2c3d4e5f6""#))
        .stdout(predicate::str::contains(
            "https://video.example.org/api/v2/medias/playlist/?oid=v1b2c3d4e5f6",
        ))
        .stdout(predicate::str::contains(r#""quality": "720p""#))
        .stdout(predicate::str::contains("Introduction à l'algorithmique"));

    // 首次运行会创建默认配置文件
    assert!(home.path().join(".ubicast-dl").join("config.json").is_file());
}

#[test]
fn test_html_mode_uses_runtime_globals() {
    let home = tempdir().unwrap();
    let globals_path = home.path().join("globals.json");
    let mut file = File::create(&globals_path).unwrap();
    writeln!(file, r#"{{"player": {{"mediaOID": "v-from-player"}}}}"#).unwrap();

    main_command(&home)
        .args([
            "--html",
            "tests/fixtures/video_page.html",
            "--page-url",
            "https://video.example.org/videos/amphi-b/",
            "--no-metadata",
            "--json",
            "--globals",
        ])
        .arg(&globals_path)
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""oid": "v-from-player""#));
}

#[test]
fn test_non_ubicast_page_is_rejected() {
    let home = tempdir().unwrap();
    main_command(&home)
        .args([
            "--html",
            "tests/fixtures/not_ubicast.html",
            "--page-url",
            "https://blog.example.org/post/1",
            "--no-metadata",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("不是 UbiCast 视频页面"));
}

#[test]
fn test_force_parses_non_ubicast_page() {
    let home = tempdir().unwrap();
    main_command(&home)
        .args([
            "--html",
            "tests/fixtures/not_ubicast.html",
            "--page-url",
            "https://blog.example.org/post/1",
            "--no-metadata",
            "--force",
            "--json",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""oid": "v-blog""#));
}

#[test]
fn test_failure_result_exits_non_zero() {
    let home = tempdir().unwrap();
    let page_path = home.path().join("page.html");
    let mut file = File::create(&page_path).unwrap();
    writeln!(file, "<html><body><footer>Powered by UBICAST</footer></body></html>").unwrap();

    main_command(&home)
        .arg("--html")
        .arg(&page_path)
        .args(["--page-url", "https://video.example.org/", "--json"])
        .assert()
        .failure()
        .stdout(predicate::str::contains(r#""status": "failure""#));
}

#[test]
fn test_batch_mode_reports_unreachable_pages() {
    let home = tempdir().unwrap();
    let file_path = home.path().join("links.txt");
    let mut file = File::create(&file_path).unwrap();
    writeln!(file, "# 注释行会被忽略").unwrap();
    writeln!(file, "http://127.0.0.1:9/permalink/v1/").unwrap();

    main_command(&home)
        .arg("-b")
        .arg(&file_path)
        .assert()
        .failure()
        .stdout(predicate::str::contains("失败: 1"));
}

// --- 测试交互模式 ---

#[test]
fn test_interactive_waits_for_pending_request_on_eof() {
    let home = tempdir().unwrap();
    let mut server = mockito::Server::new();
    // 响应体延迟返回，stdin 在请求完成之前就已关闭
    let page_mock = server
        .mock("GET", "/permalink/v-interactive/")
        .with_status(200)
        .with_chunked_body(|w| {
            std::thread::sleep(Duration::from_millis(500));
            w.write_all(b"<html><body><footer>Powered by UBICAST</footer></body></html>")
        })
        .expect(1)
        .create();

    main_command(&home)
        .args(["-i", "--no-metadata", "--json"])
        .write_stdin(format!("{}/permalink/v-interactive/\n", server.url()))
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""oid": "v-interactive""#))
        .stdout(predicate::str::contains("退出交互模式"));

    page_mock.assert();
}

#[test]
fn test_interactive_exits_cleanly_on_empty_stdin() {
    let home = tempdir().unwrap();
    main_command(&home)
        .arg("-i")
        .write_stdin("")
        .assert()
        .success()
        .stdout(predicate::str::contains("退出交互模式"));
}

#[test]
fn test_interactive_rejects_invalid_link_and_continues() {
    let home = tempdir().unwrap();
    main_command(&home)
        .arg("-i")
        .write_stdin("ftp://video.example.org/permalink/v1/\n\n")
        .assert()
        .success()
        .stderr(predicate::str::contains("不支持的链接协议"))
        .stdout(predicate::str::contains("退出交互模式"));
}
