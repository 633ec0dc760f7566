//! # ミドルウェア
//!
//! - [`basic_auth`] - 管理者ルートの HTTP Basic 認証

pub mod basic_auth;

pub use basic_auth::{BasicAuthState, require_basic_auth};
