/// Lambdaへ返却するHTTP形式のレスポンス
///
/// `{statusCode, headers, body}`の形で呼び出し元環境にシリアライズされる。
/// ボディは常にJSON文字列（204のみ空文字列）。
use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::{json, Value};

use super::item::Item;

/// Content-Typeヘッダー値
pub const CONTENT_TYPE_JSON: &str = "application/json";

/// レスポンスエンベロープ
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse {
    pub status_code: u16,
    pub headers: BTreeMap<String, String>,
    pub body: String,
}

impl ApiResponse {
    /// JSONペイロードをエンコードしたレスポンスを作成
    pub fn json(status_code: u16, payload: &Value) -> Self {
        Self {
            status_code,
            headers: Self::default_headers(),
            body: payload.to_string(),
        }
    }

    /// 204 No Content（ボディは空文字列）
    pub fn no_content() -> Self {
        Self {
            status_code: 204,
            headers: Self::default_headers(),
            body: String::new(),
        }
    }

    /// 201 作成完了
    pub fn created(item: &Item) -> Self {
        Self::json(201, &json!({ "message": "Created", "item": item }))
    }

    /// 200 任意のペイロード
    pub fn ok(payload: &Value) -> Self {
        Self::json(200, payload)
    }

    /// 200 更新完了
    pub fn updated(item: &Item) -> Self {
        Self::json(200, &json!({ "message": "Updated", "item": item }))
    }

    /// 404 アイテムが存在しない
    pub fn not_found() -> Self {
        Self::json(404, &json!({ "message": "Not Found" }))
    }

    /// 404 ルートが存在しない
    pub fn route_not_found() -> Self {
        Self::json(404, &json!({ "message": "Route Not Found" }))
    }

    /// 400 更新対象フィールドが無い
    pub fn no_updatable_fields() -> Self {
        Self::json(400, &json!({ "message": "No updatable fields" }))
    }

    /// ボディをJSONとして解釈
    #[cfg(test)]
    pub fn body_json(&self) -> Option<Value> {
        serde_json::from_str(&self.body).ok()
    }

    fn default_headers() -> BTreeMap<String, String> {
        BTreeMap::from([("Content-Type".to_string(), CONTENT_TYPE_JSON.to_string())])
    }
}
