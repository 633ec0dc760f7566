//! # 管理者向けハンドラ
//!
//! アクセストークンの更新と履歴ログの取得。
//! どちらのルートも Basic 認証ミドルウェアの内側に配置される。

use std::sync::Arc;

use axum::{Json, extract::State};
use mailtrail_domain::CommunicationLog;
use mailtrail_shared::ApiResponse;

use crate::{app_builder::AppState, error::ApiError};

/// リモートストレージのアクセストークンを更新する
///
/// 候補トークンをリモートサービスで検証し、成功した場合のみ置き換える。
pub async fn update_token(
    State(state): State<Arc<AppState>>,
    Json(body): Json<serde_json::Value>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    let key = body
        .as_object()
        .filter(|object| !object.is_empty())
        .and_then(|object| object.get("key"))
        .and_then(serde_json::Value::as_str)
        .filter(|key| !key.trim().is_empty())
        .ok_or_else(|| {
            ApiError::Validation(
                "アクセストークンがありません。key フィールドに有効なトークンを指定してください"
                    .to_string(),
            )
        })?;

    state.usecase.update_token(key.to_string()).await?;
    Ok(Json(ApiResponse::ok("アクセストークンを更新しました")))
}

/// リモートの履歴ログ全体を取得する
///
/// 取得後、ローカルの作業コピーは空に戻される。
pub async fn email_log(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<CommunicationLog>>, ApiError> {
    let log = state.usecase.fetch_log().await?;
    Ok(Json(ApiResponse::with_data("メール履歴を取得しました", log)))
}
