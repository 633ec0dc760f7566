//! # 通知メール送信ハンドラ
//!
//! `POST /user/email/send` のボディ検証とユースケース呼び出し。

use std::sync::Arc;

use axum::{Json, extract::State};
use mailtrail_shared::ApiResponse;

use crate::{app_builder::AppState, error::ApiError, usecase::SendEmailRequest};

/// 必須フィールド（これ以外のフィールドは受け付けない）
const REQUIRED_FIELDS: [&str; 4] = ["name", "email", "subject", "message"];

/// 通知メールを送信し、履歴ログをリモートへ同期する
pub async fn send_email(
    State(state): State<Arc<AppState>>,
    Json(body): Json<serde_json::Value>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    let request = parse_send_request(&body)?;
    let message = state.usecase.send_and_log(request).await?;
    Ok(Json(ApiResponse::ok(message)))
}

/// リクエストボディを検証して [`SendEmailRequest`] に変換する
///
/// 4 フィールド（name, email, subject, message）が過不足なく、
/// すべて非空の文字列であることを要求する。
fn parse_send_request(body: &serde_json::Value) -> Result<SendEmailRequest, ApiError> {
    let fields_error = || {
        ApiError::Validation(
            "フィールド（name, email, subject, message）はすべて必須です".to_string(),
        )
    };

    let object = body.as_object().ok_or_else(fields_error)?;
    if object.len() != REQUIRED_FIELDS.len() {
        return Err(fields_error());
    }

    let field = |name: &str| {
        object
            .get(name)
            .and_then(serde_json::Value::as_str)
            .filter(|s| !s.trim().is_empty())
            .map(str::to_string)
            .ok_or_else(fields_error)
    };

    Ok(SendEmailRequest {
        name:    field("name")?,
        email:   field("email")?,
        subject: field("subject")?,
        message: field("message")?,
    })
}
