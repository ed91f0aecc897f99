use anyhow::Result;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use std::path::PathBuf;

use crate::debug_log;

/// キー単位のJSONファイルとして値を永続化するストア
///
/// 書き込みはベストエフォート: 失敗はログに残すだけで呼び出し側には
/// 伝播しない。メモリ上の状態がロールバックされることもない。
#[derive(Debug, Clone)]
pub struct Storage {
    dir: PathBuf,
}

impl Storage {
    /// dirがNoneならOSのデータディレクトリ配下にdotui/を作成する
    pub fn new(dir: Option<PathBuf>) -> Result<Self> {
        let dir = match dir {
            Some(dir) => dir,
            None => {
                let mut dir = dirs::data_dir()
                    .ok_or_else(|| anyhow::anyhow!("Cannot find data directory"))?;
                dir.push("dotui");
                dir
            }
        };
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    fn key_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }

    /// キーの値を読み込む。未書き込み・読み込み失敗・破損はすべてNone
    /// （初回起動と同じ扱い）。失敗時はログのみ
    pub async fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let path = self.key_path(key);
        let content = match tokio::fs::read_to_string(&path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return None,
            Err(e) => {
                debug_log!("Storage: failed to read key '{}': {}", key, e);
                return None;
            }
        };
        match serde_json::from_str(&content) {
            Ok(value) => Some(value),
            Err(e) => {
                debug_log!("Storage: corrupt value for key '{}': {}", key, e);
                None
            }
        }
    }

    /// キーの値を書き込み、完了を待つ
    pub async fn set<T: Serialize>(&self, key: &str, value: &T) -> Result<()> {
        let json = serde_json::to_string_pretty(value)?;
        tokio::fs::write(self.key_path(key), json).await?;
        Ok(())
    }

    /// fire-and-forget書き込み。シリアライズは呼び出し時点で同期的に行い
    /// （変更時点のスナップショットを確定させる）、書き込みだけを
    /// 別タスクに投げる。失敗はログして握りつぶす
    pub fn set_detached<T: Serialize>(&self, key: &str, value: &T) {
        let json = match serde_json::to_string_pretty(value) {
            Ok(json) => json,
            Err(e) => {
                debug_log!("Storage: failed to serialize key '{}': {}", key, e);
                return;
            }
        };
        let path = self.key_path(key);
        let key = key.to_string();
        tokio::spawn(async move {
            if let Err(e) = tokio::fs::write(&path, json).await {
                debug_log!("Storage: failed to write key '{}': {}", key, e);
            }
        });
    }
}
