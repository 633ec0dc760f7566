//! # API レスポンスエンベロープ
//!
//! 公開 API の統一成功レスポンス形式 `{ "status": true, "message": ..., "data": ... }` を提供する。

use serde::{Deserialize, Serialize};

/// 公開 API の統一成功レスポンス型
///
/// すべてのエンドポイントは成功時に `status: true` とメッセージを返す。
/// ペイロードを伴う操作（履歴取得など）は `data` フィールドに載せ、
/// 伴わない操作では `data` はシリアライズされない。
///
/// ## 使用例
///
/// ```
/// use mailtrail_shared::ApiResponse;
///
/// let response: ApiResponse<()> = ApiResponse::ok("送信しました");
/// assert!(response.status);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub status:  bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data:    Option<T>,
}

impl<T> ApiResponse<T> {
    /// データなしの成功レスポンスを作成する
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            status:  true,
            message: message.into(),
            data:    None,
        }
    }

    /// データ付きの成功レスポンスを作成する
    pub fn with_data(message: impl Into<String>, data: T) -> Self {
        Self {
            status:  true,
            message: message.into(),
            data:    Some(data),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_okはdataフィールドをシリアライズしない() {
        let response: ApiResponse<()> = ApiResponse::ok("完了");
        let json = serde_json::to_value(&response).unwrap();

        assert_eq!(json, serde_json::json!({ "status": true, "message": "完了" }));
    }

    #[test]
    fn test_with_dataはdataフィールドを含める() {
        let response = ApiResponse::with_data("取得しました", vec!["a", "b"]);
        let json = serde_json::to_value(&response).unwrap();

        assert_eq!(
            json,
            serde_json::json!({
                "status": true,
                "message": "取得しました",
                "data": ["a", "b"]
            })
        );
    }

    #[test]
    fn test_deserializeでjsonからオブジェクトに変換する() {
        let json = r#"{"status": true, "message": "ok", "data": 42}"#;
        let response: ApiResponse<i32> = serde_json::from_str(json).unwrap();

        assert!(response.status);
        assert_eq!(response.message, "ok");
        assert_eq!(response.data, Some(42));
    }

    #[test]
    fn test_dataなしのjsonもdeserializeできる() {
        let json = r#"{"status": true, "message": "ok"}"#;
        let response: ApiResponse<i32> = serde_json::from_str(json).unwrap();

        assert_eq!(response.data, None);
    }
}
