//! # MailTrail インフラ層
//!
//! 外部システムとの接続・通信を担当するインフラストラクチャ層。
//!
//! ## 責務
//!
//! - **ローカルログストア**: 通信履歴ログの JSON ファイル読み書き
//! - **リモートオブジェクトストア**: Dropbox 上の固定パスへの
//!   アップロード / ダウンロード / 削除
//! - **通知送信**: SMTP によるメール送信
//!
//! ## 依存関係
//!
//! ```text
//! api → infra → domain
//! ```
//!
//! インフラ層は `domain` に依存する。
//! ドメイン層はインフラ層に依存しない（依存性逆転の原則）。
//!
//! ## モジュール構成
//!
//! - [`error`] - インフラ層エラー定義
//! - [`log_store`] - ローカルログストア
//! - [`object_store`] - リモートオブジェクトストアクライアント
//! - [`notification`] - 通知送信

pub mod error;
pub mod log_store;
pub mod notification;
pub mod object_store;

pub use error::{InfraError, InfraErrorKind};
pub use log_store::{JsonFileLogStore, LogStore};
pub use object_store::{DropboxStore, ObjectStore, StorageSession};
