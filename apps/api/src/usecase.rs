//! # ユースケース層
//!
//! API ハンドラから呼ばれるビジネスロジックを集約する。
//!
//! - [`email_log`] - メール送信と履歴ログ同期のオーケストレーション
//! - [`template_renderer`] - 通知メールのテンプレートレンダリング

pub mod email_log;
pub mod template_renderer;

pub use email_log::{EmailLogUseCase, SendEmailRequest};
pub use template_renderer::TemplateRenderer;
