//! # HTTP リクエストハンドラ
//!
//! axum のルートに対応するハンドラ関数を定義する。
//!
//! ## 設計方針
//!
//! - 各ハンドラはサブモジュールに配置
//! - 親モジュールで re-export し、フラットな API を提供
//! - ハンドラは薄く保ち、ビジネスロジックは usecase 層に委譲
//!
//! ## ハンドラ一覧
//!
//! - `email`: 通知メール送信
//! - `admin`: 管理者向け（アクセストークン更新、履歴取得）
//! - `meta`: API メタ情報（`/`, `/help`）と 404 フォールバック
//! - `health`: ヘルスチェック

pub mod admin;
pub mod email;
pub mod health;
pub mod meta;

pub use admin::{email_log, update_token};
pub use email::send_email;
pub use health::health_check;
pub use meta::{get_help, get_info, route_not_found};
