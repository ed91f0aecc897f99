use anyhow::Result;
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct Config {
    /// 永続化ディレクトリの上書き。未指定ならOSのデータディレクトリ
    pub data_dir: Option<PathBuf>,
    pub log_file: String,
}

impl Config {
    pub fn load() -> Result<Self> {
        dotenv::dotenv().ok();

        let data_dir = std::env::var("DOTUI_DATA_DIR").ok().map(PathBuf::from);
        let log_file = std::env::var("DOTUI_LOG_FILE")
            .unwrap_or_else(|_| "dotui_debug.log".to_string());

        Ok(Config { data_dir, log_file })
    }
}
