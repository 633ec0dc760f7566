//! # MailTrail API サーバー
//!
//! 通知メールの送信と、通信履歴ログの Dropbox 同期を提供する HTTP API。
//!
//! ## 役割
//!
//! - **通知メール送信**: `/user/email/send` でテンプレートメールを SMTP 送信
//! - **履歴ログ同期**: 送信成功のたびに Dropbox 上の固定パスの JSON ログへ
//!   ダウンロード → マージ → アップロードで追記
//! - **管理者操作**: Basic 認証下でのアクセストークン更新と履歴取得
//!
//! ## 環境変数
//!
//! | 変数名 | 必須 | 説明 |
//! |--------|------|------|
//! | `API_HOST` | No | バインドアドレス（デフォルト: `0.0.0.0`） |
//! | `API_PORT` | **Yes** | ポート番号 |
//! | `ADMIN_USERNAME` | **Yes** | 管理者ルートの Basic 認証ユーザー名 |
//! | `ADMIN_PASSWORD` | **Yes** | 管理者ルートの Basic 認証パスワード |
//! | `SMTP_HOST` | **Yes** | SMTP サーバーのホスト名 |
//! | `SMTP_PORT` | **Yes** | SMTP サーバーのポート番号 |
//! | `SMTP_USERNAME` | No | SMTP 認証ユーザー名（未設定なら TLS なしで接続） |
//! | `SMTP_PASSWORD` | No | SMTP 認証パスワード |
//! | `SMTP_FROM` | **Yes** | 送信元メールアドレス |
//! | `LOG_FILE_PATH` | **Yes** | ローカルログファイルのパス |
//! | `REMOTE_LOG_PATH` | No | リモート固定パス（デフォルト: `/users.json`） |
//! | `DROPBOX_API_URL` | No | RPC エンドポイントの上書き（テスト用） |
//! | `DROPBOX_CONTENT_URL` | No | コンテンツエンドポイントの上書き（テスト用） |
//!
//! ## 起動方法
//!
//! ```bash
//! API_PORT=13000 ADMIN_USERNAME=admin ADMIN_PASSWORD=... \
//!     SMTP_HOST=localhost SMTP_PORT=1025 SMTP_FROM=noreply@example.com \
//!     LOG_FILE_PATH=logs/log.json cargo run -p mailtrail-api
//! ```
//!
//! Dropbox のアクセストークンは起動後に `/admin/dropbox/update-token` で
//! 供給する。供給されるまで `/user/email/send` は 503 を返す。

use std::{net::SocketAddr, sync::Arc};

use mailtrail_api::{
    app_builder::{AppState, build_app},
    config::ApiConfig,
    middleware::BasicAuthState,
    usecase::{EmailLogUseCase, TemplateRenderer},
};
use mailtrail_domain::clock::{Clock, SystemClock};
use mailtrail_infra::{
    DropboxStore,
    JsonFileLogStore,
    LogStore,
    ObjectStore,
    notification::{NotificationSender, SmtpNotificationSender},
};
use mailtrail_shared::observability::TracingConfig;
use tokio::net::TcpListener;

/// API サーバーのエントリーポイント
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // .env ファイルを読み込む（存在する場合）
    dotenvy::dotenv().ok();

    // トレーシング初期化
    let tracing_config = TracingConfig::from_env("api");
    mailtrail_shared::observability::init_tracing(tracing_config);
    let _tracing_guard = tracing::info_span!("app", service = "api").entered();

    // 設定読み込み
    let config = ApiConfig::from_env().expect("設定の読み込みに失敗しました");

    tracing::info!(
        "API サーバーを起動します: {}:{}",
        config.host,
        config.port
    );

    // 依存コンポーネントを初期化
    let sender: Arc<dyn NotificationSender> = match (&config.smtp.username, &config.smtp.password)
    {
        (Some(username), Some(password)) => Arc::new(
            SmtpNotificationSender::with_credentials(
                &config.smtp.host,
                config.smtp.port,
                config.smtp.from.clone(),
                username.clone(),
                password.clone(),
            )
            .expect("SMTP リレーの設定に失敗しました"),
        ),
        _ => Arc::new(SmtpNotificationSender::new(
            &config.smtp.host,
            config.smtp.port,
            config.smtp.from.clone(),
        )),
    };

    let renderer = TemplateRenderer::new().expect("テンプレートの初期化に失敗しました");
    let log_store: Arc<dyn LogStore> =
        Arc::new(JsonFileLogStore::new(config.log_file_path.clone()));
    let object_store: Arc<dyn ObjectStore> =
        match (&config.dropbox_api_url, &config.dropbox_content_url) {
            (Some(api_url), Some(content_url)) => Arc::new(DropboxStore::with_endpoints(
                api_url,
                content_url,
                config.remote_log_path.clone(),
            )),
            _ => Arc::new(DropboxStore::new(config.remote_log_path.clone())),
        };
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);

    let usecase = Arc::new(EmailLogUseCase::new(
        sender,
        renderer,
        log_store,
        object_store,
        clock,
    ));
    let state = Arc::new(AppState { usecase });
    let auth_state = BasicAuthState {
        username: config.admin_username.clone(),
        password: config.admin_password.clone(),
    };

    // ルーター構築
    let app = build_app(state, auth_state);

    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .expect("アドレスのパースに失敗しました");

    let listener = TcpListener::bind(addr).await?;
    tracing::info!("API サーバーが起動しました: {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
