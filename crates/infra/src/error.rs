//! # インフラ層エラー定義
//!
//! ローカルファイルや外部サービスとの通信で発生するエラーを表現する。
//!
//! ## 設計方針
//!
//! - **エラーの変換**: reqwest::Error, std::io::Error などをラップ
//! - **種別の明示**: 認証失敗・入力不正・対象未検出を呼び出し側が
//!   パターンマッチで区別できるようにする
//! - **SpanTrace 自動捕捉**: `From` 実装や convenience constructor で
//!   エラー生成時の呼び出し経路を自動記録する
//!
//! ## 構造
//!
//! `std::io::Error` と同じ struct + enum パターンを採用:
//! - [`InfraError`]: エラー種別（[`InfraErrorKind`]）と [`SpanTrace`] を保持するラッパー
//! - [`InfraErrorKind`]: エラーの具体的な種別（Auth, NotFound, Transport 等）

use std::fmt;

use derive_more::Display;
use thiserror::Error;
use tracing_error::SpanTrace;

/// インフラ層で発生するエラー
///
/// エラー種別（[`InfraErrorKind`]）と [`SpanTrace`]（呼び出し経路）を保持する。
/// `From<reqwest::Error>` 等の変換や convenience constructor でエラーを生成すると、
/// その時点のスパン情報が自動的にキャプチャされる。
///
/// ## パターンマッチ
///
/// エラー種別に応じた処理には [`kind()`](InfraError::kind) を使用する:
///
/// ```ignore
/// match error.kind() {
///     InfraErrorKind::NotFound(_) => { /* リモートログ未初期化として扱う */ }
///     _ => { /* その他 */ }
/// }
/// ```
#[derive(Display)]
#[display("{kind}")]
pub struct InfraError {
    kind:       InfraErrorKind,
    span_trace: SpanTrace,
}

/// インフラ層エラーの種別
///
/// ファイル操作・リモートストレージ API 呼び出し・メール送信などで発生する
/// エラーの具体的な種別。API 層でこのエラー種別に応じて適切な
/// HTTP レスポンスに変換する。
#[derive(Debug, Error)]
pub enum InfraErrorKind {
    /// 認証エラー
    ///
    /// アクセストークンが無効または期限切れの場合。
    #[error("認証エラー: {0}")]
    Auth(String),

    /// 入力エラー
    ///
    /// トークンの形式不正など、リモートサービスがプロトコルレベルで
    /// 入力を拒否した場合。
    #[error("入力エラー: {0}")]
    InvalidInput(String),

    /// 対象未検出
    ///
    /// リモートの固定パスにオブジェクトが存在しない場合。
    /// ログ同期の文脈では「リモートログ未初期化」を意味し、致命的ではない。
    #[error("対象が見つかりません: {0}")]
    NotFound(String),

    /// 通信エラー
    ///
    /// HTTP トランスポートレベルの失敗（接続不可、タイムアウト等）。
    #[error("通信エラー: {0}")]
    Transport(#[source] reqwest::Error),

    /// ログ形式エラー
    ///
    /// ローカルログファイルが期待するスキーマの JSON として
    /// パースできない場合。
    #[error("ログ形式エラー: {0}")]
    MalformedLog(#[source] serde_json::Error),

    /// 入出力エラー
    ///
    /// ローカルファイルの読み書きに失敗した場合。
    #[error("入出力エラー: {0}")]
    Io(#[source] std::io::Error),

    /// 予期しないエラー
    ///
    /// 上記に分類できない予期しないエラー。
    #[error("予期しないエラー: {0}")]
    Unexpected(String),
}

// ===== InfraError のメソッド =====

impl InfraError {
    /// エラー種別を取得する
    pub fn kind(&self) -> &InfraErrorKind {
        &self.kind
    }

    /// SpanTrace を取得する
    pub fn span_trace(&self) -> &SpanTrace {
        &self.span_trace
    }

    /// 対象未検出エラーかどうか
    ///
    /// ダウンロード時の「リモートログ未初期化」判定に使う。
    pub fn is_not_found(&self) -> bool {
        matches!(self.kind, InfraErrorKind::NotFound(_))
    }

    // ===== Convenience constructors =====

    /// 認証エラーを生成する
    pub fn auth(msg: impl Into<String>) -> Self {
        Self {
            kind:       InfraErrorKind::Auth(msg.into()),
            span_trace: SpanTrace::capture(),
        }
    }

    /// 入力エラーを生成する
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self {
            kind:       InfraErrorKind::InvalidInput(msg.into()),
            span_trace: SpanTrace::capture(),
        }
    }

    /// 対象未検出エラーを生成する
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self {
            kind:       InfraErrorKind::NotFound(msg.into()),
            span_trace: SpanTrace::capture(),
        }
    }

    /// 予期しないエラーを生成する
    pub fn unexpected(msg: impl Into<String>) -> Self {
        Self {
            kind:       InfraErrorKind::Unexpected(msg.into()),
            span_trace: SpanTrace::capture(),
        }
    }
}

// ===== トレイト実装 =====

impl fmt::Debug for InfraError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InfraError")
            .field("kind", &self.kind)
            .field("span_trace", &self.span_trace)
            .finish()
    }
}

impl std::error::Error for InfraError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.kind.source()
    }
}

// ===== From 実装（SpanTrace 自動キャプチャ） =====

impl From<reqwest::Error> for InfraError {
    fn from(source: reqwest::Error) -> Self {
        Self {
            kind:       InfraErrorKind::Transport(source),
            span_trace: SpanTrace::capture(),
        }
    }
}

impl From<serde_json::Error> for InfraError {
    fn from(source: serde_json::Error) -> Self {
        Self {
            kind:       InfraErrorKind::MalformedLog(source),
            span_trace: SpanTrace::capture(),
        }
    }
}

impl From<std::io::Error> for InfraError {
    fn from(source: std::io::Error) -> Self {
        Self {
            kind:       InfraErrorKind::Io(source),
            span_trace: SpanTrace::capture(),
        }
    }
}

#[cfg(test)]
mod tests {
    use tracing_subscriber::layer::SubscriberExt as _;

    use super::*;

    /// テスト用に ErrorLayer 付き subscriber を設定する
    fn with_error_layer(f: impl FnOnce()) {
        let subscriber = tracing_subscriber::registry().with(tracing_error::ErrorLayer::default());
        let _guard = tracing::subscriber::set_default(subscriber);
        f();
    }

    // ===== From 実装のテスト =====

    #[test]
    fn test_from_serde_json_errorでmalformed_logになる() {
        with_error_layer(|| {
            let span = tracing::info_span!("test_log_store");
            let _enter = span.enter();

            let json_err = serde_json::from_str::<String>("invalid").unwrap_err();
            let err: InfraError = json_err.into();

            assert!(matches!(err.kind(), InfraErrorKind::MalformedLog(_)));
            let trace_str = format!("{}", err.span_trace());
            assert!(
                trace_str.contains("test_log_store"),
                "SpanTrace がスパン名を含むこと: {trace_str}",
            );
        });
    }

    #[test]
    fn test_from_io_errorでioになる() {
        with_error_layer(|| {
            let span = tracing::info_span!("test_io");
            let _enter = span.enter();

            let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "拒否");
            let err: InfraError = io_err.into();

            assert!(matches!(err.kind(), InfraErrorKind::Io(_)));
            let trace_str = format!("{}", err.span_trace());
            assert!(trace_str.contains("test_io"));
        });
    }

    // ===== Convenience constructor のテスト =====

    #[test]
    fn test_authでspan_traceがキャプチャされる() {
        with_error_layer(|| {
            let span = tracing::info_span!("test_connect");
            let _enter = span.enter();

            let err = InfraError::auth("トークン無効");

            assert!(matches!(err.kind(), InfraErrorKind::Auth(msg) if msg == "トークン無効"));
            let trace_str = format!("{}", err.span_trace());
            assert!(trace_str.contains("test_connect"));
        });
    }

    #[test]
    fn test_invalid_inputで種別が正しい() {
        with_error_layer(|| {
            let err = InfraError::invalid_input("不正な入力");
            assert!(matches!(
                err.kind(),
                InfraErrorKind::InvalidInput(msg) if msg == "不正な入力"
            ));
        });
    }

    #[test]
    fn test_not_foundで種別が正しい() {
        with_error_layer(|| {
            let err = InfraError::not_found("/users.json");
            assert!(matches!(
                err.kind(),
                InfraErrorKind::NotFound(msg) if msg == "/users.json"
            ));
        });
    }

    #[test]
    fn test_unexpectedで種別が正しい() {
        with_error_layer(|| {
            let err = InfraError::unexpected("予期しないエラー");
            assert!(matches!(
                err.kind(),
                InfraErrorKind::Unexpected(msg) if msg == "予期しないエラー"
            ));
        });
    }

    // ===== is_not_found のテスト =====

    #[test]
    fn test_is_not_foundはnot_foundでのみtrueを返す() {
        assert!(InfraError::not_found("x").is_not_found());
        assert!(!InfraError::auth("x").is_not_found());
        assert!(!InfraError::unexpected("x").is_not_found());
    }

    // ===== Display / source のテスト =====

    #[test]
    fn test_displayがinfra_error_kindのメッセージを出力する() {
        let err = InfraError::auth("トークン無効");
        assert_eq!(format!("{err}"), "認証エラー: トークン無効");
    }

    #[test]
    fn test_sourceがinfra_error_kindに委譲する() {
        use std::error::Error;

        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "なし");
        let err: InfraError = io_err.into();

        // Io variant は std::io::Error を source として持つ
        assert!(err.source().is_some());
    }
}
