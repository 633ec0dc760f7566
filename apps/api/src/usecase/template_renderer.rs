//! # テンプレートレンダラー
//!
//! tera テンプレートエンジンで通知メールを HTML/plaintext 両形式で生成する。
//!
//! ## 設計方針
//!
//! - **`include_str!` によるコンパイル時埋め込み**: テンプレートはバイナリに埋め込まれる
//! - **件名はリクエストそのまま**: テンプレートが整形するのは本文のみ
//! - **送信時刻の形式**: 履歴ログと同じ `%Y-%m-%d %H:%M:%S` で本文に表示する

use chrono::{DateTime, Utc};
use mailtrail_domain::{
    communication_log::entry_datetime,
    notification::{EmailMessage, NotificationError},
};
use tera::{Context, Tera};

use super::SendEmailRequest;

/// テンプレートレンダラー
///
/// tera テンプレートエンジンをラップし、[`SendEmailRequest`] から
/// [`EmailMessage`] を生成する。
pub struct TemplateRenderer {
    engine: Tera,
}

impl TemplateRenderer {
    /// 新しいレンダラーインスタンスを作成
    ///
    /// `include_str!` で埋め込んだテンプレートを tera に登録する。
    pub fn new() -> Result<Self, NotificationError> {
        let mut engine = Tera::default();

        engine
            .add_raw_templates(vec![
                (
                    "notification_email.html",
                    include_str!("../../templates/notification_email.html"),
                ),
                (
                    "notification_email.txt",
                    include_str!("../../templates/notification_email.txt"),
                ),
            ])
            .map_err(|e| NotificationError::TemplateFailed(e.to_string()))?;

        Ok(Self { engine })
    }

    /// 送信リクエストからメールメッセージを生成する
    ///
    /// # 引数
    ///
    /// - `request`: 検証済みの送信リクエスト
    /// - `sent_at`: 送信時刻（本文の表示と履歴エントリで同じ値を使う）
    pub fn render(
        &self,
        request: &SendEmailRequest,
        sent_at: DateTime<Utc>,
    ) -> Result<EmailMessage, NotificationError> {
        let mut context = Context::new();
        context.insert("name", &request.name);
        context.insert("email", &request.email);
        context.insert("subject", &request.subject);
        context.insert("message", &request.message);
        context.insert(
            "datetime",
            &sent_at.format(entry_datetime::FORMAT).to_string(),
        );

        let html_body = self
            .engine
            .render("notification_email.html", &context)
            .map_err(|e| NotificationError::TemplateFailed(e.to_string()))?;

        let text_body = self
            .engine
            .render("notification_email.txt", &context)
            .map_err(|e| NotificationError::TemplateFailed(e.to_string()))?;

        Ok(EmailMessage {
            to: request.email.clone(),
            subject: request.subject.clone(),
            html_body,
            text_body,
        })
    }
}
