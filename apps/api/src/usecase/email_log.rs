//! # メール送信・履歴同期ユースケース
//!
//! 通知メールの送信と、送信記録のリモート同期サイクル
//! （ダウンロード → マージ → アップロード → ローカル消去）を統合する。
//!
//! ## 設計方針
//!
//! - **依存性注入**: 送信・ファイル・リモートストレージはすべて trait で
//!   抽象化し、`Arc<dyn>` で受け取る
//! - **同期サイクルの直列化**: ダウンロードからローカル消去までは
//!   1 本の `tokio::sync::Mutex` の中で実行する。2 つのリクエストの
//!   サイクルが交差すると片方の記録が失われるため
//! - **送信失敗時はログに触れない**: 実際に届いていないメールが
//!   履歴に残ることはない
//! - **アクセストークンは操作単位で読む**: トークン更新は稀な人手操作
//!   なので、処理中のリクエストとの競合は意図的に許容する（排他しない）

use std::sync::Arc;

use mailtrail_domain::{
    CommunicationLog,
    CommunicationLogEntry,
    clock::Clock,
};
use mailtrail_infra::{
    InfraError,
    log_store::LogStore,
    notification::NotificationSender,
    object_store::{ObjectStore, StorageSession},
};
use tokio::sync::{Mutex, RwLock};

use super::TemplateRenderer;
use crate::error::ApiError;

/// メール送信リクエスト
///
/// `/user/email/send` のボディ検証を通過した値。4 フィールドすべて非空。
#[derive(Debug, Clone)]
pub struct SendEmailRequest {
    pub name:    String,
    pub email:   String,
    pub subject: String,
    pub message: String,
}

/// メール送信・履歴同期ユースケース
///
/// アクセストークンはプロセス全体で 1 つだけ保持し、
/// 管理者の更新操作で実行時に置き換えられる（初期値は未設定）。
pub struct EmailLogUseCase {
    sender:       Arc<dyn NotificationSender>,
    renderer:     TemplateRenderer,
    log_store:    Arc<dyn LogStore>,
    object_store: Arc<dyn ObjectStore>,
    clock:        Arc<dyn Clock>,
    access_token: RwLock<String>,
    sync_lock:    Mutex<()>,
}

impl EmailLogUseCase {
    pub fn new(
        sender: Arc<dyn NotificationSender>,
        renderer: TemplateRenderer,
        log_store: Arc<dyn LogStore>,
        object_store: Arc<dyn ObjectStore>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            sender,
            renderer,
            log_store,
            object_store,
            clock,
            access_token: RwLock::new(String::new()),
            sync_lock: Mutex::new(()),
        }
    }

    /// 現在のアクセストークンでリモートセッションを確立する
    ///
    /// 送信処理の前段ゲートとしても使う。トークン未設定なら必ず失敗する。
    pub async fn current_session(&self) -> Result<StorageSession, InfraError> {
        let token = self.access_token.read().await.clone();
        self.object_store.connect(&token).await
    }

    /// アクセストークンを検証して置き換える
    ///
    /// 検証に失敗した場合は既存のトークンを維持する。
    pub async fn update_token(&self, key: String) -> Result<StorageSession, ApiError> {
        let session = self
            .object_store
            .connect(&key)
            .await
            .map_err(ApiError::TokenRejected)?;

        *self.access_token.write().await = key;
        tracing::info!(account = %session.account(), "アクセストークンを更新しました");
        Ok(session)
    }

    /// 通知メールを送信し、成功時に履歴ログをリモートへ同期する
    ///
    /// 1. リモートセッションを確認する（失敗なら何も送信せず中断）
    /// 2. テンプレートをレンダリングして送信する（失敗ならログに触れず中断）
    /// 3. 同期サイクルを直列化して実行する
    pub async fn send_and_log(&self, request: SendEmailRequest) -> Result<String, ApiError> {
        let session = self
            .current_session()
            .await
            .map_err(ApiError::RemoteUnavailable)?;

        let sent_at = self.clock.now();
        let email = self
            .renderer
            .render(&request, sent_at)
            .map_err(ApiError::SendFailed)?;
        self.sender
            .send_email(&email)
            .await
            .map_err(ApiError::SendFailed)?;
        tracing::info!(to = %request.email, "通知メールを送信しました");

        let entry = CommunicationLogEntry {
            name:     request.name,
            datetime: sent_at,
            message:  request.message,
        };
        self.sync_entry(&session, &request.email, entry).await?;

        Ok("メールを送信しました".to_string())
    }

    /// 管理者向けに履歴ログ全体を取得する
    ///
    /// ダウンロード → ローカル読み出し → ローカル消去の順で実行し、
    /// メモリ上のスナップショットを返す。ダウンロードに失敗した場合は
    /// ローカルファイルに一切触れない。
    pub async fn fetch_log(&self) -> Result<CommunicationLog, ApiError> {
        let session = self
            .current_session()
            .await
            .map_err(ApiError::RemoteUnavailable)?;

        let _guard = self.sync_lock.lock().await;

        let bytes = self
            .object_store
            .download(&session)
            .await
            .map_err(ApiError::sync)?;

        self.log_store.write_raw(&bytes).await.map_err(ApiError::sync)?;
        let log = self.log_store.read().await.map_err(ApiError::sync)?;
        self.log_store.truncate().await.map_err(ApiError::sync)?;

        Ok(log)
    }

    /// 同期サイクル本体（ダウンロード → マージ → アップロード → ローカル消去）
    ///
    /// サイクル全体を `sync_lock` で直列化する。個々のファイル操作単位の
    /// 排他では不十分で、サイクルが交差した時点で更新が失われる
    /// （`log_store` の回帰テスト参照）。
    async fn sync_entry(
        &self,
        session: &StorageSession,
        recipient_email: &str,
        entry: CommunicationLogEntry,
    ) -> Result<(), ApiError> {
        let _guard = self.sync_lock.lock().await;

        // リモートの現在値をローカルへ。未初期化（NotFound）は空として扱う
        match self.object_store.download(session).await {
            Ok(bytes) => self
                .log_store
                .write_raw(&bytes)
                .await
                .map_err(ApiError::sync_after_send)?,
            Err(e) if e.is_not_found() => self
                .log_store
                .truncate()
                .await
                .map_err(ApiError::sync_after_send)?,
            Err(e) => return Err(ApiError::sync_after_send(e)),
        }

        self.log_store
            .append_entry(recipient_email, entry)
            .await
            .map_err(ApiError::sync_after_send)?;

        let bytes = self
            .log_store
            .read_raw()
            .await
            .map_err(ApiError::sync_after_send)?;
        let upload_result = self.object_store.upload(session, bytes).await;

        // アップロードの成否に関わらずローカルは消去する
        let truncate_result = self.log_store.truncate().await;

        upload_result.map_err(ApiError::sync_after_send)?;
        truncate_result.map_err(ApiError::sync_after_send)?;
        Ok(())
    }
}
