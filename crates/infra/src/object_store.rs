//! # リモートオブジェクトストア
//!
//! 通信履歴ログのバイト列を、リモートストレージ上の 1 つの固定パスとの間で
//! 移動させるクライアントを定義する。
//!
//! ## 設計方針
//!
//! - **trait による抽象化**: [`ObjectStore`] trait で操作を抽象化し、
//!   テスト時はスタブに差し替え可能にする
//! - **実行時トークン**: アクセストークンはビルド時ではなく実行時に
//!   管理者が供給する。`connect` がトークンを検証して [`StorageSession`]
//!   を発行し、以後の操作はセッションを明示的に受け取る
//! - **1 回限りの試行**: リトライ・バックオフ・セッションプールは持たない。
//!   失敗の扱いは呼び出し側が決める

mod dropbox;

use async_trait::async_trait;
pub use dropbox::DropboxStore;

use crate::InfraError;

/// 検証済みのリモートストレージセッション
///
/// [`ObjectStore::connect`] がトークン検証に成功したときだけ発行される。
/// 保持するのは検証済みトークンと、検証時にサービスが返した
/// アカウント表示名のみ。プロセス内で受け渡される値であり、永続化しない。
#[derive(Debug, Clone)]
pub struct StorageSession {
    token:   String,
    account: String,
}

impl StorageSession {
    /// 検証済みトークンからセッションを作成する
    ///
    /// [`ObjectStore::connect`] の実装だけが呼ぶ想定。
    pub fn new(token: impl Into<String>, account: impl Into<String>) -> Self {
        Self {
            token:   token.into(),
            account: account.into(),
        }
    }

    /// 検証済みアクセストークン
    pub fn token(&self) -> &str {
        &self.token
    }

    /// 検証時に取得したアカウント表示名
    pub fn account(&self) -> &str {
        &self.account
    }
}

/// リモートオブジェクトストアのインターフェース
///
/// 対象は常に固定の 1 パス。書き込みは上書きモードのみで、
/// 部分適用は起こらない。
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// トークンをリモートサービスに対して検証し、セッションを発行する
    ///
    /// # エラー
    ///
    /// - `Auth` - トークンが無効または期限切れ
    /// - `InvalidInput` - トークン形式不正などプロトコルレベルの拒否
    /// - `Transport` / `Unexpected` - 通信失敗・その他
    async fn connect(&self, token: &str) -> Result<StorageSession, InfraError>;

    /// バイト列を固定パスへ上書きアップロードする
    async fn upload(&self, session: &StorageSession, bytes: Vec<u8>) -> Result<(), InfraError>;

    /// 固定パスのバイト列を取得する
    ///
    /// # エラー
    ///
    /// パスが存在しない場合は `NotFound`。呼び出し側はこれを
    /// 「リモートログ未初期化（空）」として扱い、致命的エラーと区別する。
    async fn download(&self, session: &StorageSession) -> Result<Vec<u8>, InfraError>;

    /// 固定パスのオブジェクトを削除する
    async fn delete(&self, session: &StorageSession) -> Result<(), InfraError>;
}
