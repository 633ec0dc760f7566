//! # MailTrail ドメイン層
//!
//! 通信履歴ログのモデルとマージ処理、通知メッセージのモデルを定義する。
//!
//! ## 設計方針
//!
//! - **純粋なデータ操作**: このクレートは I/O を一切行わない。
//!   履歴のマージはメモリ上のコレクション操作として完結する
//! - **ワイヤフォーマットの固定**: ローカルファイルとリモートオブジェクトは
//!   同一の JSON スキーマを共有するため、シリアライズ形状をここで確定する
//!
//! ## 依存関係の方向
//!
//! ```text
//! api → infra → domain
//! ```
//!
//! ドメイン層はインフラ層（ファイル、外部サービス）に一切依存しない。
//!
//! ## モジュール構成
//!
//! - [`communication_log`] - 通信履歴ログのモデルとマージエンジン
//! - [`notification`] - メール通知のモデルとエラー
//! - [`clock`] - 時刻プロバイダ（テスト時の固定時刻注入用）

pub mod clock;
pub mod communication_log;
pub mod notification;

pub use communication_log::{CommunicationLog, CommunicationLogEntry, RecipientHistory};
pub use notification::{EmailMessage, NotificationError};
