//! # 通知送信
//!
//! メール通知の送信を担当するインフラストラクチャモジュール。
//!
//! ## 設計方針
//!
//! - **trait による抽象化**: `NotificationSender` trait でメール送信を抽象化
//! - **2 つの実装**: SMTP（本番・開発用）、Noop（テスト・送信無効化用）
//! - **送信は 1 回限り**: 失敗してもこの層ではリトライしない

mod noop;
mod smtp;

use async_trait::async_trait;
use mailtrail_domain::notification::{EmailMessage, NotificationError};
pub use noop::NoopNotificationSender;
pub use smtp::SmtpNotificationSender;

/// メール送信トレイト
///
/// 通知送信の具体的な方法を抽象化する。
/// 送信の成否だけを返し、履歴の記録には関与しない。
#[async_trait]
pub trait NotificationSender: Send + Sync {
    /// メールを送信する
    async fn send_email(&self, email: &EmailMessage) -> Result<(), NotificationError>;
}
