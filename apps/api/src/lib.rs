//! # MailTrail API ライブラリ
//!
//! 通知メール送信 API のコアモジュール。
//!
//! ## モジュール構成
//!
//! - `app_builder`: State 初期化とルーター構築
//! - `config`: 環境変数からの設定読み込み
//! - `error`: API エラーとレスポンス変換
//! - `handler`: HTTP ハンドラ
//! - `middleware`: ミドルウェア（Basic 認証）
//! - `usecase`: メール送信・履歴同期のオーケストレーション

pub mod app_builder;
pub mod config;
pub mod error;
pub mod handler;
pub mod middleware;
pub mod usecase;
