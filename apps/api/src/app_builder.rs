//! # アプリケーション構築
//!
//! State の初期化とルーター構築を担当する。
//! `main.rs` はインフラ初期化とサーバー起動に集中する。
//! 統合テストもここからルーターを組み立てる。

use std::sync::Arc;

use axum::{
    Router,
    middleware::from_fn_with_state,
    routing::{get, post},
};
use mailtrail_shared::{
    canonical_log::CanonicalLogLineLayer,
    observability::{MakeRequestUuidV7, make_request_span},
};
use tower_http::{
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};

use crate::{
    handler::{
        email_log,
        get_help,
        get_info,
        health_check,
        route_not_found,
        send_email,
        update_token,
    },
    middleware::{BasicAuthState, require_basic_auth},
    usecase::EmailLogUseCase,
};

/// アプリケーション全体の共有 State
pub struct AppState {
    pub usecase: Arc<EmailLogUseCase>,
}

/// ルーターを構築する
///
/// `/admin` 配下のルートだけを Basic 認証ミドルウェアで包む。
/// レイヤーは外側から Request ID 付与 → リクエストスパン →
/// Request ID 伝搬 → Canonical Log の順に適用される。
pub fn build_app(state: Arc<AppState>, auth: BasicAuthState) -> Router {
    let admin_routes = Router::new()
        .route("/admin/dropbox/update-token", post(update_token))
        .route("/admin/dropbox/email-log", get(email_log))
        .layer(from_fn_with_state(auth, require_basic_auth));

    Router::new()
        .route("/", get(get_info))
        .route("/help", get(get_help))
        .route("/health", get(health_check))
        .route("/user/email/send", post(send_email))
        .merge(admin_routes)
        .fallback(route_not_found)
        .with_state(state)
        .layer(CanonicalLogLineLayer)
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(TraceLayer::new_for_http().make_span_with(make_request_span))
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuidV7))
}
