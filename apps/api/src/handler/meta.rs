//! # API メタ情報ハンドラ
//!
//! ルート一覧・使い方の案内と、未定義ルートの 404 フォールバック。

use axum::{Json, http::StatusCode, response::IntoResponse};
use mailtrail_shared::ErrorResponse;

/// API のメタ情報を返す（`GET /`）
pub async fn get_info() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "version": env!("CARGO_PKG_VERSION"),
        "description": "通知メールの送信と、通信履歴の Dropbox 保存を行う API",
        "routes": {
            "/user/email/send": "通知メールを送信し、履歴を Dropbox へ同期する",
            "/help": "各ルートの使い方を返す",
            "/admin/dropbox/update-token": "Dropbox アクセストークンを更新する",
            "/admin/dropbox/email-log": "Dropbox 上のメール履歴を取得する",
            "/health": "サーバーの稼働状態を返す"
        }
    }))
}

/// 各ルートの使い方を返す（`GET /help`）
pub async fn get_help() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "/user/email/send": {
            "description": "通知メールを送信し、送信記録を Dropbox 上の履歴ログへ追記する",
            "method": "POST",
            "request_body": {
                "name": "宛先の表示名",
                "email": "宛先メールアドレス",
                "subject": "メールの件名",
                "message": "メールの本文"
            },
            "response": {
                "status": "操作の成否",
                "message": "成功またはエラーの説明"
            }
        },
        "/admin/dropbox/update-token": {
            "description": "Dropbox アクセストークンを検証して更新する（Basic 認証必須）",
            "method": "POST",
            "request_body": {
                "key": "新しいアクセストークン"
            },
            "response": {
                "status": "操作の成否",
                "message": "成功またはエラーの説明"
            }
        },
        "/admin/dropbox/email-log": {
            "description": "Dropbox 上のメール履歴全体を取得する（Basic 認証必須）",
            "method": "GET",
            "response": {
                "status": "操作の成否",
                "message": "成功またはエラーの説明",
                "data": "宛先ごとの送信履歴の一覧"
            }
        }
    }))
}

/// 未定義ルートのフォールバック（404）
pub async fn route_not_found() -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorResponse::new(
            "ルートが見つかりません。リクエスト URL を確認してください",
        )),
    )
}
