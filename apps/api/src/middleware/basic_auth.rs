//! # Basic 認証ミドルウェア
//!
//! 管理者ルート（`/admin/...`）を HTTP Basic 認証で保護する。
//!
//! ## 使い方
//!
//! ```rust,ignore
//! use axum::middleware::from_fn_with_state;
//!
//! let auth_state = BasicAuthState {
//!     username: config.admin_username.clone(),
//!     password: config.admin_password.clone(),
//! };
//!
//! Router::new()
//!     .route("/admin/dropbox/email-log", get(email_log))
//!     .layer(from_fn_with_state(auth_state, require_basic_auth))
//! ```
//!
//! 資格情報の比較は `subtle` による定数時間比較で行う。

use axum::{
    Json,
    body::Body,
    extract::State,
    http::{Request, StatusCode, header},
    middleware::Next,
    response::{IntoResponse, Response},
};
use base64::{Engine as _, engine::general_purpose::STANDARD as BASE64};
use mailtrail_shared::ErrorResponse;
use subtle::ConstantTimeEq;

/// Basic 認証の状態
#[derive(Clone)]
pub struct BasicAuthState {
    pub username: String,
    pub password: String,
}

/// 認証要求レスポンス（401 + WWW-Authenticate）
fn unauthorized_response() -> Response {
    (
        StatusCode::UNAUTHORIZED,
        [(header::WWW_AUTHENTICATE, r#"Basic realm="admin""#)],
        Json(ErrorResponse::with_message(
            "認証が必要です",
            "このリソースへのアクセスには正しい管理者認証情報が必要です",
        )),
    )
        .into_response()
}

/// `Authorization: Basic ...` ヘッダーから資格情報を取り出す
fn parse_basic_credentials(header_value: &str) -> Option<(String, String)> {
    let encoded = header_value.strip_prefix("Basic ")?;
    let decoded = BASE64.decode(encoded.trim()).ok()?;
    let decoded = String::from_utf8(decoded).ok()?;
    let (username, password) = decoded.split_once(':')?;
    Some((username.to_string(), password.to_string()))
}

/// Basic 認証ミドルウェア
///
/// 資格情報が欠けている・一致しない場合は 401 を返し、
/// `WWW-Authenticate` ヘッダーで認証方式を示す。
pub async fn require_basic_auth(
    State(state): State<BasicAuthState>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let Some(header_value) = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
    else {
        return unauthorized_response();
    };

    let Some((username, password)) = parse_basic_credentials(header_value) else {
        return unauthorized_response();
    };

    let username_ok: bool = username
        .as_bytes()
        .ct_eq(state.username.as_bytes())
        .into();
    let password_ok: bool = password
        .as_bytes()
        .ct_eq(state.password.as_bytes())
        .into();

    if !(username_ok && password_ok) {
        return unauthorized_response();
    }

    next.run(request).await
}

#[cfg(test)]
mod tests {
    use axum::{
        Router,
        http::Method,
        middleware::from_fn_with_state,
        routing::get,
    };
    use tower::ServiceExt;

    use super::*;

    /// テスト用のダミーハンドラ
    async fn dummy_handler() -> impl IntoResponse {
        StatusCode::OK
    }

    fn test_app() -> Router {
        let state = BasicAuthState {
            username: "admin".to_string(),
            password: "correct-password".to_string(),
        };
        Router::new()
            .route("/admin/resource", get(dummy_handler))
            .layer(from_fn_with_state(state, require_basic_auth))
    }

    fn basic_header(username: &str, password: &str) -> String {
        format!("Basic {}", BASE64.encode(format!("{username}:{password}")))
    }

    async fn request_with_header(app: Router, auth: Option<&str>) -> Response {
        let mut builder = Request::builder()
            .method(Method::GET)
            .uri("/admin/resource");
        if let Some(value) = auth {
            builder = builder.header(header::AUTHORIZATION, value);
        }
        app.oneshot(builder.body(Body::empty()).unwrap())
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn 認証ヘッダーなしは401になる() {
        let response = request_with_header(test_app(), None).await;

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert!(
            response.headers().contains_key(header::WWW_AUTHENTICATE),
            "WWW-Authenticate ヘッダーが含まれること"
        );
    }

    #[tokio::test]
    async fn 不正なパスワードは401になる() {
        let auth = basic_header("admin", "wrong-password");
        let response = request_with_header(test_app(), Some(&auth)).await;

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn 不正なユーザー名は401になる() {
        let auth = basic_header("intruder", "correct-password");
        let response = request_with_header(test_app(), Some(&auth)).await;

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn base64として不正なヘッダーは401になる() {
        let response = request_with_header(test_app(), Some("Basic %%%%")).await;

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn 正しい資格情報で通過する() {
        let auth = basic_header("admin", "correct-password");
        let response = request_with_header(test_app(), Some(&auth)).await;

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[test]
    fn parse_basic_credentialsが資格情報を取り出す() {
        let header_value = basic_header("user", "pass:word");

        let (username, password) = parse_basic_credentials(&header_value).unwrap();

        assert_eq!(username, "user");
        // パスワード側のコロンは区切りにしない
        assert_eq!(password, "pass:word");
    }

    #[test]
    fn parse_basic_credentialsはbasic以外の方式を拒否する() {
        assert!(parse_basic_credentials("Bearer abc").is_none());
    }
}
