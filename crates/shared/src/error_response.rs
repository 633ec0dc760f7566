//! # エラーレスポンス
//!
//! 全エンドポイント共通の失敗レスポンス構造体を提供する。
//!
//! ## 設計
//!
//! - `ErrorResponse` は純粋なデータ構造（`Serialize` / `Deserialize` のみ）
//! - axum の `IntoResponse` 変換は API 側の責務（shared に axum 依存を入れない）
//! - `status` は常に `false`。HTTP ステータスコードはボディとは別に API 側が決める
//! - `error` は失敗の分類・原因、`message` は利用者向けの補足（任意）

use serde::{Deserialize, Serialize};

/// 失敗レスポンス
///
/// すべての失敗は `{ "status": false, "error": ..., "message": ... }` 形式で返す。
/// `message` は省略可能で、省略時はシリアライズされない。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub status:  bool,
    pub error:   String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ErrorResponse {
    /// エラー内容のみの失敗レスポンスを作成する
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            status:  false,
            error:   error.into(),
            message: None,
        }
    }

    /// 利用者向け補足メッセージ付きの失敗レスポンスを作成する
    pub fn with_message(error: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            status:  false,
            error:   error.into(),
            message: Some(message.into()),
        }
    }
}
