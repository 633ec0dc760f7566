//! # API エラーハンドリング
//!
//! HTTP API のエラー定義と、axum レスポンスへの変換。
//!
//! すべての失敗は `{ "status": false, "error": ..., "message": ... }` 形式の
//! JSON ボディと、失敗の種類に応じた HTTP ステータスコードに変換される。
//! ハンドラから未処理のエラーが漏れることはない。

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use mailtrail_domain::notification::NotificationError;
use mailtrail_infra::{InfraError, InfraErrorKind};
use mailtrail_shared::ErrorResponse;
use thiserror::Error;

/// API 層で発生するエラー
///
/// ユースケースの各段階の失敗を区別して保持し、`IntoResponse` で
/// ステータスコードとレスポンスボディに写像する。
#[derive(Debug, Error)]
pub enum ApiError {
    /// リクエストボディの検証失敗（400）
    #[error("{0}")]
    Validation(String),

    /// リモートストレージセッションを確立できない（503）
    ///
    /// 送信前のゲート。メールは 1 通も送信されていない。
    #[error("リモートストレージに接続できません: {0}")]
    RemoteUnavailable(#[source] InfraError),

    /// メール送信の失敗（502）
    ///
    /// 履歴ログには一切触れていない。
    #[error("{0}")]
    SendFailed(#[source] NotificationError),

    /// アクセストークンの更新が拒否された（401 / 400 / 502）
    #[error("アクセストークンが拒否されました: {0}")]
    TokenRejected(#[source] InfraError),

    /// ログ同期サイクルの失敗
    ///
    /// `mail_sent` が true の場合、メール自体は送信済みで履歴の同期のみが
    /// 失敗している。この不整合は隠さず呼び出し側へ報告する。
    #[error("履歴ログの同期に失敗しました: {source}")]
    Sync {
        #[source]
        source:    InfraError,
        mail_sent: bool,
    },
}

impl ApiError {
    /// 送信前の同期失敗を生成する（管理者向け履歴取得など）
    pub fn sync(source: InfraError) -> Self {
        Self::Sync {
            source,
            mail_sent: false,
        }
    }

    /// 送信後の同期失敗を生成する
    pub fn sync_after_send(source: InfraError) -> Self {
        Self::Sync {
            source,
            mail_sent: true,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Validation(detail) => {
                (StatusCode::BAD_REQUEST, Json(ErrorResponse::new(detail))).into_response()
            }
            ApiError::RemoteUnavailable(source) => {
                tracing::error!(
                    error.kind = "remote_session",
                    "リモートセッション確立に失敗: {}",
                    source
                );
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    Json(ErrorResponse::with_message(
                        source.to_string(),
                        "リモートストレージに接続できません。アクセストークンを確認してください",
                    )),
                )
                    .into_response()
            }
            ApiError::SendFailed(source) => {
                tracing::error!(error.kind = "notification", "メール送信に失敗: {}", source);
                (
                    StatusCode::BAD_GATEWAY,
                    Json(ErrorResponse::with_message(
                        source.to_string(),
                        "メールを送信できませんでした。しばらくしてからもう一度お試しください",
                    )),
                )
                    .into_response()
            }
            ApiError::TokenRejected(source) => {
                let status = match source.kind() {
                    InfraErrorKind::Auth(_) => StatusCode::UNAUTHORIZED,
                    InfraErrorKind::InvalidInput(_) => StatusCode::BAD_REQUEST,
                    _ => StatusCode::BAD_GATEWAY,
                };
                (
                    status,
                    Json(ErrorResponse::with_message(
                        source.to_string(),
                        "アクセストークンを更新できませんでした。有効なトークンを指定してください",
                    )),
                )
                    .into_response()
            }
            ApiError::Sync { source, mail_sent } => {
                tracing::error!(
                    error.kind = "log_sync",
                    mail_sent,
                    "履歴ログの同期に失敗: {}",
                    source
                );
                let status = if source.is_not_found() {
                    StatusCode::NOT_FOUND
                } else {
                    StatusCode::BAD_GATEWAY
                };
                let body = if mail_sent {
                    ErrorResponse::with_message(
                        source.to_string(),
                        "メールは送信されましたが、履歴ログの同期に失敗しました",
                    )
                } else {
                    ErrorResponse::new(source.to_string())
                };
                (status, Json(body)).into_response()
            }
        }
    }
}
