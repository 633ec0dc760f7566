//! # API サーバー設定
//!
//! 環境変数から API サーバーの設定を読み込む。
//!
//! 認証情報類（管理者パスワード、SMTP パスワード）はすべて実行時に
//! 外部から供給する。ソース内に既定値は置かない。

use std::{env, path::PathBuf};

/// SMTP 接続設定
///
/// `username` / `password` が両方設定されていれば STARTTLS + 認証で接続し、
/// どちらか欠けていれば TLS なし（ローカル SMTP 向け）で接続する。
#[derive(Debug, Clone)]
pub struct SmtpConfig {
   /// SMTP サーバーのホスト名
   pub host:     String,
   /// SMTP サーバーのポート番号
   pub port:     u16,
   /// SMTP 認証ユーザー名（任意）
   pub username: Option<String>,
   /// SMTP 認証パスワード（任意）
   pub password: Option<String>,
   /// 送信元メールアドレス
   pub from:     String,
}

/// API サーバーの設定
#[derive(Debug, Clone)]
pub struct ApiConfig {
   /// バインドアドレス
   pub host:            String,
   /// ポート番号
   pub port:            u16,
   /// 管理者ルートの Basic 認証ユーザー名
   pub admin_username:  String,
   /// 管理者ルートの Basic 認証パスワード
   pub admin_password:  String,
   /// SMTP 接続設定
   pub smtp:            SmtpConfig,
   /// ローカルログファイルのパス
   pub log_file_path:   PathBuf,
   /// リモートストレージ上の固定パス
   pub remote_log_path: String,
   /// Dropbox RPC エンドポイントの上書き（任意、テスト用）
   pub dropbox_api_url:     Option<String>,
   /// Dropbox コンテンツエンドポイントの上書き（任意、テスト用）
   pub dropbox_content_url: Option<String>,
}

impl ApiConfig {
   /// 環境変数から設定を読み込む
   pub fn from_env() -> Result<Self, env::VarError> {
      Ok(Self {
         host:            env::var("API_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
         port:            env::var("API_PORT")
            .expect("API_PORT が設定されていません")
            .parse()
            .expect("API_PORT は有効なポート番号である必要があります"),
         admin_username:  env::var("ADMIN_USERNAME")
            .expect("ADMIN_USERNAME が設定されていません"),
         admin_password:  env::var("ADMIN_PASSWORD")
            .expect("ADMIN_PASSWORD が設定されていません"),
         smtp:            SmtpConfig {
            host:     env::var("SMTP_HOST").expect("SMTP_HOST が設定されていません"),
            port:     env::var("SMTP_PORT")
               .expect("SMTP_PORT が設定されていません")
               .parse()
               .expect("SMTP_PORT は有効なポート番号である必要があります"),
            username: env::var("SMTP_USERNAME").ok(),
            password: env::var("SMTP_PASSWORD").ok(),
            from:     env::var("SMTP_FROM").expect("SMTP_FROM が設定されていません"),
         },
         log_file_path:   env::var("LOG_FILE_PATH")
            .expect("LOG_FILE_PATH が設定されていません")
            .into(),
         remote_log_path: env::var("REMOTE_LOG_PATH").unwrap_or_else(|_| "/users.json".to_string()),
         dropbox_api_url:     env::var("DROPBOX_API_URL").ok(),
         dropbox_content_url: env::var("DROPBOX_CONTENT_URL").ok(),
      })
   }
}
