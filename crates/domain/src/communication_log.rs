//! # 通信履歴ログ
//!
//! 送信済みメールの履歴を宛先メールアドレス単位で保持するモデルと、
//! 新規エントリのマージ処理を定義する。
//!
//! ## ドメイン用語
//!
//! | 型 | ドメイン用語 | 内容 |
//! |---|------------|------|
//! | [`CommunicationLogEntry`] | 履歴エントリ | 1 通の送信記録（name, datetime, message） |
//! | [`RecipientHistory`] | 宛先履歴 | 1 宛先分の送信記録列（追記のみ、挿入順） |
//! | [`CommunicationLog`] | 通信履歴ログ | 全宛先の履歴コレクション。email で一意 |
//!
//! ## 設計方針
//!
//! - **全体置換**: ログは常にコレクション全体として読み書きされる。
//!   部分更新のプロトコルは存在しない
//! - **線形走査**: コレクションは小規模想定のため索引構造を持たない
//! - **ワイヤフォーマット**: JSON 配列。`datetime` は `%Y-%m-%d %H:%M:%S`（UTC）

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 履歴エントリの `datetime` フィールドのワイヤフォーマット
///
/// ローカルファイルとリモートオブジェクトの両方でこの形式を使用する。
pub mod entry_datetime {
    use chrono::{DateTime, NaiveDateTime, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    /// `2024-05-01 12:34:56` 形式
    pub const FORMAT: &str = "%Y-%m-%d %H:%M:%S";

    pub fn serialize<S>(datetime: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&datetime.format(FORMAT).to_string())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        NaiveDateTime::parse_from_str(&s, FORMAT)
            .map(|naive| naive.and_utc())
            .map_err(serde::de::Error::custom)
    }
}

/// 履歴エントリ（1 通の送信記録）
///
/// 送信成功時に作成され、以後変更されない。
/// 宛先メールアドレスはエントリ自身ではなく [`RecipientHistory`] が保持する。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommunicationLogEntry {
    /// 宛先の表示名
    pub name:     String,
    /// 送信時刻（UTC）
    #[serde(with = "entry_datetime")]
    pub datetime: DateTime<Utc>,
    /// 送信した本文
    pub message:  String,
}

/// 宛先履歴（1 宛先分の送信記録列）
///
/// `history` は追記のみで、挿入順を保持する。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecipientHistory {
    /// 宛先メールアドレス（ログ内で一意）
    pub email:   String,
    /// 送信記録列（追記のみ、挿入順）
    pub history: Vec<CommunicationLogEntry>,
}

/// 通信履歴ログ（全宛先の履歴コレクション）
///
/// JSON 配列としてシリアライズされ、ローカルファイルとリモートオブジェクトの
/// 両方でこの形状を共有する。
///
/// # 不変条件
///
/// - `email` はログ内で一意
/// - 既存宛先への新規エントリはその宛先の `history` 末尾に追記される
/// - 未知の宛先への新規エントリは要素数 1 の履歴を持つ新規 [`RecipientHistory`] になる
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CommunicationLog(Vec<RecipientHistory>);

impl CommunicationLog {
    /// 空のログを作成する
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// 宛先数を返す
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// ログが空かどうか
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// 全宛先履歴への参照を返す
    pub fn recipients(&self) -> &[RecipientHistory] {
        &self.0
    }

    /// 指定メールアドレスの宛先履歴を探す（線形走査）
    pub fn recipient(&self, email: &str) -> Option<&RecipientHistory> {
        self.0.iter().find(|r| r.email == email)
    }

    /// 新規エントリをログへマージする
    ///
    /// `recipient_email` が既存ならその履歴末尾へ追記し、
    /// 未知なら要素数 1 の履歴を持つ宛先を末尾へ追加する。
    /// 1 回の呼び出しで起こるのは必ずどちらか一方のみ。
    pub fn merge(&mut self, recipient_email: &str, entry: CommunicationLogEntry) {
        match self.0.iter_mut().find(|r| r.email == recipient_email) {
            Some(recipient) => recipient.history.push(entry),
            None => self.0.push(RecipientHistory {
                email:   recipient_email.to_string(),
                history: vec![entry],
            }),
        };
    }
}
