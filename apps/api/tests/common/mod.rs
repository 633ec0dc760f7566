//! テスト共通フィクスチャ
//!
//! API 統合テストで共通利用するスタブ実装とアプリ構築ヘルパー。
//! Rust の統合テスト規約に従い `tests/common/mod.rs` に配置。

// 各テストファイルが独立したクレートとしてコンパイルされるため、
// 使用しない関数に dead_code 警告が出る。モジュール全体で抑制する。
#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use base64::{Engine as _, engine::general_purpose::STANDARD as BASE64};
use chrono::{TimeZone, Utc};
use mailtrail_api::{
    app_builder::{AppState, build_app},
    middleware::BasicAuthState,
    usecase::{EmailLogUseCase, TemplateRenderer},
};
use mailtrail_domain::{
    CommunicationLog,
    clock::FixedClock,
    notification::{EmailMessage, NotificationError},
};
use mailtrail_infra::{
    InfraError,
    JsonFileLogStore,
    LogStore,
    ObjectStore,
    StorageSession,
    notification::NotificationSender,
};
use tower::ServiceExt;

/// スタブが受理するアクセストークン
pub const VALID_TOKEN: &str = "sl.valid-token";

/// 管理者 Basic 認証のユーザー名
pub const ADMIN_USER: &str = "admin";

/// 管理者 Basic 認証のパスワード
pub const ADMIN_PASS: &str = "admin-secret";

// =============================================================================
// スタブ実装
// =============================================================================

/// 送信されたメールを記録するスタブ送信者
pub struct RecordingSender {
    sent: Mutex<Vec<EmailMessage>>,
    fail: bool,
}

impl RecordingSender {
    /// 常に成功する送信者を作成する
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            sent: Mutex::new(Vec::new()),
            fail: false,
        })
    }

    /// 常に失敗する送信者を作成する
    pub fn failing() -> Arc<Self> {
        Arc::new(Self {
            sent: Mutex::new(Vec::new()),
            fail: true,
        })
    }

    /// 送信されたメールの件数
    pub fn sent_count(&self) -> usize {
        self.sent.lock().unwrap().len()
    }

    /// 送信されたメールのコピー
    pub fn sent_emails(&self) -> Vec<EmailMessage> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl NotificationSender for RecordingSender {
    async fn send_email(&self, email: &EmailMessage) -> Result<(), NotificationError> {
        if self.fail {
            return Err(NotificationError::SendFailed("スタブ送信失敗".to_string()));
        }
        self.sent.lock().unwrap().push(email.clone());
        Ok(())
    }
}

/// メモリ上のリモートオブジェクトを模すスタブストア
///
/// [`VALID_TOKEN`] のみを受理し、オブジェクトは 1 つだけ保持する。
pub struct StubObjectStore {
    remote:        Mutex<Option<Vec<u8>>>,
    fail_download: bool,
}

impl StubObjectStore {
    /// オブジェクト未初期化のストアを作成する
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            remote:        Mutex::new(None),
            fail_download: false,
        })
    }

    /// 指定の内容でオブジェクトを初期化済みのストアを作成する
    pub fn with_remote(bytes: Vec<u8>) -> Arc<Self> {
        Arc::new(Self {
            remote:        Mutex::new(Some(bytes)),
            fail_download: false,
        })
    }

    /// ダウンロードが常に失敗するストアを作成する
    pub fn failing_download() -> Arc<Self> {
        Arc::new(Self {
            remote:        Mutex::new(None),
            fail_download: true,
        })
    }

    /// リモートオブジェクトの現在値
    pub fn remote_bytes(&self) -> Option<Vec<u8>> {
        self.remote.lock().unwrap().clone()
    }

    /// リモートオブジェクトを履歴ログとしてパースする
    pub fn remote_log(&self) -> Option<CommunicationLog> {
        self.remote_bytes()
            .map(|bytes| serde_json::from_slice(&bytes).expect("リモートの内容がログであること"))
    }
}

#[async_trait]
impl ObjectStore for StubObjectStore {
    async fn connect(&self, token: &str) -> Result<StorageSession, InfraError> {
        if token == VALID_TOKEN {
            Ok(StorageSession::new(token, "スタブアカウント"))
        } else {
            Err(InfraError::auth("アクセストークンが無効または期限切れです"))
        }
    }

    async fn upload(&self, _session: &StorageSession, bytes: Vec<u8>) -> Result<(), InfraError> {
        *self.remote.lock().unwrap() = Some(bytes);
        Ok(())
    }

    async fn download(&self, _session: &StorageSession) -> Result<Vec<u8>, InfraError> {
        if self.fail_download {
            return Err(InfraError::unexpected("スタブダウンロード失敗"));
        }
        self.remote
            .lock()
            .unwrap()
            .clone()
            .ok_or_else(|| InfraError::not_found("リモートパスが存在しません"))
    }

    async fn delete(&self, _session: &StorageSession) -> Result<(), InfraError> {
        *self.remote.lock().unwrap() = None;
        Ok(())
    }
}

// =============================================================================
// アプリ構築ヘルパー
// =============================================================================

/// 統合テスト用に構築したアプリ一式
pub struct TestApp {
    pub app:     Router,
    pub usecase: Arc<EmailLogUseCase>,
    /// ローカルログファイルのパス
    pub log_path: std::path::PathBuf,
    // TempDir は drop でディレクトリごと消えるため保持する
    _tempdir: tempfile::TempDir,
}

impl TestApp {
    /// ローカルログファイルの現在値を読み出す
    pub async fn local_log(&self) -> CommunicationLog {
        let store = JsonFileLogStore::new(self.log_path.clone());
        store.read().await.expect("ローカルログが読めること")
    }
}

/// スタブを注入してアプリを構築する
///
/// `with_valid_token` が true の場合、[`VALID_TOKEN`] を設定済みの状態にする。
pub async fn build_test_app(
    sender: Arc<RecordingSender>,
    object_store: Arc<StubObjectStore>,
    with_valid_token: bool,
) -> TestApp {
    let tempdir = tempfile::tempdir().unwrap();
    let log_path = tempdir.path().join("log.json");
    let log_store: Arc<dyn LogStore> = Arc::new(JsonFileLogStore::new(log_path.clone()));
    let clock = Arc::new(FixedClock::new(
        Utc.with_ymd_and_hms(2024, 5, 1, 12, 34, 56).unwrap(),
    ));

    let usecase = Arc::new(EmailLogUseCase::new(
        sender,
        TemplateRenderer::new().unwrap(),
        log_store,
        object_store,
        clock,
    ));
    if with_valid_token {
        usecase
            .update_token(VALID_TOKEN.to_string())
            .await
            .expect("スタブはVALID_TOKENを受理すること");
    }

    let state = Arc::new(AppState {
        usecase: Arc::clone(&usecase),
    });
    let auth = BasicAuthState {
        username: ADMIN_USER.to_string(),
        password: ADMIN_PASS.to_string(),
    };

    TestApp {
        app: build_app(state, auth),
        usecase,
        log_path,
        _tempdir: tempdir,
    }
}

// =============================================================================
// リクエストヘルパー
// =============================================================================

/// Basic 認証ヘッダーの値を作る
pub fn basic_auth_header(username: &str, password: &str) -> String {
    format!("Basic {}", BASE64.encode(format!("{username}:{password}")))
}

/// レスポンスボディを JSON として読み出す
pub async fn response_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

/// JSON ボディ付き POST を送る
pub async fn post_json(
    app: Router,
    uri: &str,
    body: &serde_json::Value,
) -> (StatusCode, serde_json::Value) {
    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(serde_json::to_vec(body).unwrap()))
                .unwrap(),
        )
        .await
        .unwrap();

    let status = response.status();
    (status, response_json(response).await)
}

/// Basic 認証付きでリクエストを送る
pub async fn request_with_basic_auth(
    app: Router,
    method: &str,
    uri: &str,
    body: Option<&serde_json::Value>,
    username: &str,
    password: &str,
) -> (StatusCode, serde_json::Value) {
    let builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::AUTHORIZATION, basic_auth_header(username, password));

    let request = match body {
        Some(value) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(serde_json::to_vec(value).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    (status, response_json(response).await)
}
