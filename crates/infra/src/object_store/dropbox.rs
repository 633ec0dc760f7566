//! # Dropbox クライアント
//!
//! Dropbox HTTP API を使用した [`ObjectStore`] の実装。
//!
//! ## 設計方針
//!
//! - **本番環境**: 既定のエンドポイント（`api.dropboxapi.com` /
//!   `content.dropboxapi.com`）に接続する
//! - **テスト**: `with_endpoints` でスタブサーバーへ向け替え可能
//! - **トークン検証**: `connect` は `users/get_current_account` の成否で
//!   トークンの有効性を判定する
//! - **エラー分類**: HTTP ステータスと `error_summary` から
//!   [`InfraErrorKind`](crate::InfraErrorKind) へ写像する。リトライはしない

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;

use super::{ObjectStore, StorageSession};
use crate::InfraError;

/// RPC 系エンドポイントの既定 URL
const DEFAULT_API_URL: &str = "https://api.dropboxapi.com";

/// コンテンツ系エンドポイント（upload / download）の既定 URL
const DEFAULT_CONTENT_URL: &str = "https://content.dropboxapi.com";

/// Dropbox クライアント
///
/// 対象は構築時に渡された固定リモートパスのみ。
pub struct DropboxStore {
    http:        reqwest::Client,
    api_url:     String,
    content_url: String,
    remote_path: String,
}

impl DropboxStore {
    /// 既定エンドポイントに接続するクライアントを作成する
    ///
    /// # 引数
    ///
    /// * `remote_path` - 操作対象の固定リモートパス（例: `/users.json`）
    pub fn new(remote_path: impl Into<String>) -> Self {
        Self::with_endpoints(DEFAULT_API_URL, DEFAULT_CONTENT_URL, remote_path)
    }

    /// エンドポイントを指定してクライアントを作成する
    ///
    /// テストでスタブサーバーへ向ける場合に使用する。
    pub fn with_endpoints(
        api_url: &str,
        content_url: &str,
        remote_path: impl Into<String>,
    ) -> Self {
        Self {
            http:        reqwest::Client::new(),
            api_url:     api_url.trim_end_matches('/').to_string(),
            content_url: content_url.trim_end_matches('/').to_string(),
            remote_path: remote_path.into(),
        }
    }

    /// 操作対象の固定リモートパス
    pub fn remote_path(&self) -> &str {
        &self.remote_path
    }
}

#[async_trait]
impl ObjectStore for DropboxStore {
    async fn connect(&self, token: &str) -> Result<StorageSession, InfraError> {
        let response = self
            .http
            .post(format!("{}/2/users/get_current_account", self.api_url))
            .bearer_auth(token)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(classify_connect_failure(status, &body));
        }

        let account: AccountInfo = response.json().await?;
        Ok(StorageSession::new(token, account.name.display_name))
    }

    async fn upload(&self, session: &StorageSession, bytes: Vec<u8>) -> Result<(), InfraError> {
        let response = self
            .http
            .post(format!("{}/2/files/upload", self.content_url))
            .bearer_auth(session.token())
            .header("Dropbox-API-Arg", upload_arg(&self.remote_path))
            .header(reqwest::header::CONTENT_TYPE, "application/octet-stream")
            .body(bytes)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(classify_api_failure("アップロード", status, &body));
        }
        Ok(())
    }

    async fn download(&self, session: &StorageSession) -> Result<Vec<u8>, InfraError> {
        let response = self
            .http
            .post(format!("{}/2/files/download", self.content_url))
            .bearer_auth(session.token())
            .header("Dropbox-API-Arg", path_arg(&self.remote_path))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(classify_api_failure("ダウンロード", status, &body));
        }

        let bytes = response.bytes().await?;
        Ok(bytes.to_vec())
    }

    async fn delete(&self, session: &StorageSession) -> Result<(), InfraError> {
        let response = self
            .http
            .post(format!("{}/2/files/delete_v2", self.api_url))
            .bearer_auth(session.token())
            .json(&serde_json::json!({ "path": self.remote_path }))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(classify_api_failure("削除", status, &body));
        }
        Ok(())
    }
}

// ===== API 引数・エラー分類ヘルパー =====

/// `users/get_current_account` のレスポンスのうち使用する部分
#[derive(Debug, Deserialize)]
struct AccountInfo {
    name: AccountName,
}

#[derive(Debug, Deserialize)]
struct AccountName {
    display_name: String,
}

/// Dropbox API のエラーレスポンスのうち使用する部分
#[derive(Debug, Deserialize)]
struct DropboxApiError {
    error_summary: String,
}

/// `Dropbox-API-Arg` ヘッダー用のパス引数を構築する
fn path_arg(path: &str) -> String {
    serde_json::json!({ "path": path }).to_string()
}

/// アップロード用の API 引数を構築する（上書きモード）
fn upload_arg(path: &str) -> String {
    serde_json::json!({ "path": path, "mode": "overwrite", "mute": true }).to_string()
}

/// エラーボディから `error_summary` を取り出す
///
/// JSON でない場合はボディをそのまま返す。
fn error_summary(body: &str) -> String {
    serde_json::from_str::<DropboxApiError>(body)
        .map(|e| e.error_summary)
        .unwrap_or_else(|_| body.to_string())
}

/// トークン検証の失敗を分類する
fn classify_connect_failure(status: StatusCode, body: &str) -> InfraError {
    let summary = error_summary(body);
    match status {
        StatusCode::UNAUTHORIZED => {
            InfraError::auth("アクセストークンが無効または期限切れです")
        }
        StatusCode::BAD_REQUEST => {
            InfraError::invalid_input(format!("トークンがサービスに拒否されました: {summary}"))
        }
        _ => InfraError::unexpected(format!("トークン検証に失敗しました (HTTP {status}): {summary}")),
    }
}

/// ファイル操作の失敗を分類する
///
/// 409 で `error_summary` が `not_found` を含む場合のみ `NotFound` とし、
/// 他のすべての失敗と区別する。
fn classify_api_failure(operation: &str, status: StatusCode, body: &str) -> InfraError {
    let summary = error_summary(body);
    if status == StatusCode::CONFLICT && summary.contains("not_found") {
        return InfraError::not_found(format!("リモートパスが存在しません: {summary}"));
    }
    match status {
        StatusCode::UNAUTHORIZED => {
            InfraError::auth("アクセストークンが無効または期限切れです")
        }
        StatusCode::BAD_REQUEST => {
            InfraError::invalid_input(format!("{operation}の引数が拒否されました: {summary}"))
        }
        _ => InfraError::unexpected(format!("{operation}に失敗しました (HTTP {status}): {summary}")),
    }
}
