//! # ローカルログストア
//!
//! 通信履歴ログを 1 つの JSON ファイルとして読み書きする。
//!
//! ## 設計方針
//!
//! - **trait による抽象化**: [`LogStore`] trait でファイル操作を抽象化し、
//!   テスト時はメモリ実装に差し替え可能にする
//! - **全体置換**: 書き込みは常にコレクション全体の上書き。
//!   部分書き込みされたファイルが残ることはない
//! - **人間可読**: 目視確認のため pretty-print で書き出す
//! - **空と不在の同一視**: ファイルが存在しない・空である場合は
//!   空のログとして読み出す（エラーにしない）
//!
//! ファイルハンドルは各操作のスコープ内で開閉され、エラー経路でも
//! リークしない（`tokio::fs` の関数単位 API を使用）。

use std::path::PathBuf;

use async_trait::async_trait;
use mailtrail_domain::{CommunicationLog, CommunicationLogEntry};

use crate::InfraError;

/// ローカルログストアのインターフェース
///
/// 読み書きの対象は常にログ全体。`append_entry` だけが
/// 読み出し→マージ→書き戻しの複合操作を行う。
///
/// 複合操作同士の直列化はこの層では行わない。呼び出し側が
/// 同期サイクル全体を排他制御すること。
#[async_trait]
pub trait LogStore: Send + Sync {
    /// ログファイルを読み出してパースする
    ///
    /// ファイルが存在しない・空の場合は空のログを返す。
    /// スキーマに合わない内容は `MalformedLog` エラーになる。
    async fn read(&self) -> Result<CommunicationLog, InfraError>;

    /// コレクション全体をシリアライズして上書きする
    async fn write_collection(&self, log: &CommunicationLog) -> Result<(), InfraError>;

    /// リモートから取得したバイト列でファイルを置き換える
    async fn write_raw(&self, bytes: &[u8]) -> Result<(), InfraError>;

    /// ファイルのバイト列をそのまま読み出す（アップロード用）
    ///
    /// ファイルが存在しない場合は空のコレクションのバイト列を返す。
    async fn read_raw(&self) -> Result<Vec<u8>, InfraError>;

    /// 読み出し→マージ→書き戻しで新規エントリを追記する
    async fn append_entry(
        &self,
        recipient_email: &str,
        entry: CommunicationLogEntry,
    ) -> Result<(), InfraError>;

    /// ファイルを空のコレクションで上書きする
    async fn truncate(&self) -> Result<(), InfraError>;
}

/// JSON ファイルを使用した [`LogStore`] の実装
pub struct JsonFileLogStore {
    path: PathBuf,
}

impl JsonFileLogStore {
    /// 指定パスのファイルを対象とするストアを作成する
    ///
    /// ファイルは最初の書き込み時に作成される。
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl LogStore for JsonFileLogStore {
    async fn read(&self) -> Result<CommunicationLog, InfraError> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Ok(CommunicationLog::new());
            }
            Err(e) => return Err(e.into()),
        };

        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(CommunicationLog::new());
        }

        let log = serde_json::from_slice(&bytes)?;
        Ok(log)
    }

    async fn write_collection(&self, log: &CommunicationLog) -> Result<(), InfraError> {
        let bytes = serde_json::to_vec_pretty(log)?;
        tokio::fs::write(&self.path, bytes).await?;
        Ok(())
    }

    async fn write_raw(&self, bytes: &[u8]) -> Result<(), InfraError> {
        tokio::fs::write(&self.path, bytes).await?;
        Ok(())
    }

    async fn read_raw(&self) -> Result<Vec<u8>, InfraError> {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) => Ok(bytes),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(b"[]".to_vec()),
            Err(e) => Err(e.into()),
        }
    }

    async fn append_entry(
        &self,
        recipient_email: &str,
        entry: CommunicationLogEntry,
    ) -> Result<(), InfraError> {
        let mut log = self.read().await?;
        log.merge(recipient_email, entry);
        self.write_collection(&log).await
    }

    async fn truncate(&self) -> Result<(), InfraError> {
        self.write_collection(&CommunicationLog::new()).await
    }
}
