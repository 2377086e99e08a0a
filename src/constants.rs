// src/constants.rs

pub const UI_WIDTH: usize = 88;
pub const URL_TRUNCATE_LENGTH: usize = 60;
pub const CONFIG_DIR_NAME: &str = concat!(".", clap::crate_name!());
pub const CONFIG_FILE_NAME: &str = "config.json";
pub const LOG_FILE_NAME: &str = concat!(clap::crate_name!(), ".log");
pub const LOG_FALLBACK_FILE_NAME: &str = "fallback.log";
pub const DEFAULT_MAX_WORKERS: usize = 5;
pub const UNKNOWN_LABEL: &str = "unknown";
pub const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

pub const HLS_PLAYER_TIP: &str = "提示: 可使用 VLC 或任意支持 HLS 的播放器打开 HLS 链接";

pub mod api {
    /// 派生链接的路径前缀，直接拼接在站点域名与 OID 之间
    pub mod paths {
        pub const HLS_PLAYLIST: &str = "/api/v2/medias/playlist/?oid=";
        pub const MEDIA_INFO: &str = "/api/v2/medias/get/?oid=";
        pub const RESOURCES_INFO: &str = "/api/v2/medias/resources-info/?oid=";
        pub const PERMALINK: &str = "/permalink/";
        pub const IFRAME_SUFFIX: &str = "iframe/";
    }
    pub mod json_keys {
        pub const TITLE: &str = "title";
        pub const PLAYER: &str = "player";
        pub const MEDIA_OID: &str = "mediaOID";
    }
}

pub mod markers {
    pub const POWERED_BY: &str = "Powered by UBICAST";
    pub const BRAND: &str = "UbiCast";
    pub const MEDIA_OID: &str = "mediaOID";
}

pub mod selectors {
    pub const DOWNLOAD_ANCHORS: &str = r#"a.download, a[href*="downloads/file"]"#;
    pub const SCRIPTS: &str = "script";
    pub const UBICAST_SCRIPT: &str = r#"script[src*="ubicast"]"#;
    pub const PLAYER_UI: &str = ".player-ui";
    pub const DATA_OID: &str = "[data-oid]";
    pub const TITLE: &str = "title";
}

pub mod link_classes {
    pub const MP4: &str = "download-mp4";
    pub const MP3: &str = "download-mp3";
    pub const SLIDES: &str = "download-slides";
    pub const HLS: &str = "download-hls";
}
