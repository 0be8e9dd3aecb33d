/// Lambdaイベントからのリクエスト抽出
///
/// API Gateway HTTP API (v2) とREST API (v1) の両方のイベント形式を受け付け、
/// メソッド・パス・クエリパラメータ・ボディを取り出す。
use std::collections::HashMap;

use serde_json::Value;

use crate::domain::{BodyError, Item, Route};

/// ボディ未指定時に使うJSON
const EMPTY_BODY: &str = "{}";

/// 件数制限のクエリパラメータ名
const LIMIT_PARAM: &str = "limit";

/// イベントから抽出したリクエスト
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ParsedRequest {
    /// HTTPメソッド（見つからなければNone）
    pub method: Option<String>,
    /// リクエストパス
    pub path: String,
    /// クエリパラメータ
    pub query: HashMap<String, String>,
    /// 生の`body`フィールド（本来はJSONエンコード済み文字列）
    pub body: Option<Value>,
}

impl ParsedRequest {
    /// Lambdaイベントからリクエストを抽出
    ///
    /// # 抽出ルール
    /// - メソッド: `requestContext.http.method`（v2）、無ければ`httpMethod`（v1）
    /// - パス: `rawPath`、無ければ`path`、どちらも無ければ`/`
    /// - クエリ: `queryStringParameters`（null・欠落は空マップ）
    /// - ボディ: `body`（null・欠落・空文字列は`{}`として扱う）
    pub fn from_event(event: &Value) -> Self {
        Self {
            method: Self::extract_method(event),
            path: Self::extract_path(event),
            query: Self::extract_query(event),
            body: event.get("body").cloned(),
        }
    }

    fn extract_method(event: &Value) -> Option<String> {
        // v2形式のhttpコンテキストがあればフラットなhttpMethodは見ない
        let http_context = event
            .get("requestContext")
            .and_then(|ctx| ctx.get("http"));

        let method = match http_context {
            Some(http) => http.get("method"),
            None => event.get("httpMethod"),
        };

        method.and_then(|v| v.as_str()).map(str::to_string)
    }

    fn extract_path(event: &Value) -> String {
        ["rawPath", "path"]
            .iter()
            .filter_map(|key| event.get(*key).and_then(|v| v.as_str()))
            .find(|path| !path.is_empty())
            .unwrap_or("/")
            .to_string()
    }

    fn extract_query(event: &Value) -> HashMap<String, String> {
        event
            .get("queryStringParameters")
            .and_then(|v| v.as_object())
            .map(|params| {
                params
                    .iter()
                    .filter_map(|(k, v)| v.as_str().map(|s| (k.clone(), s.to_string())))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// ルーティングテーブルでルートを解決
    pub fn route(&self) -> Route {
        Route::resolve(self.method.as_deref(), &self.path)
    }

    /// ボディをJSONとしてパース
    ///
    /// 欠落・null・空文字列のみ`{}`として扱い、文字列以外の`body`はエラー。
    pub fn body_json(&self) -> Result<Value, BodyError> {
        let raw = match &self.body {
            None | Some(Value::Null) => EMPTY_BODY,
            Some(Value::String(text)) if text.is_empty() => EMPTY_BODY,
            Some(Value::String(text)) => text.as_str(),
            Some(_) => return Err(BodyError::NotAString),
        };
        serde_json::from_str(raw).map_err(|e| BodyError::InvalidJson(e.to_string()))
    }

    /// ボディをアイテム（JSONオブジェクト）としてパース
    pub fn body_item(&self) -> Result<Item, BodyError> {
        Item::from_json(self.body_json()?)
    }

    /// `limit`クエリパラメータを取得
    ///
    /// 整数として解釈できない値、空文字列、0以下の値はすべて「制限なし」（None）。
    pub fn limit(&self) -> Option<i32> {
        self.query
            .get(LIMIT_PARAM)
            .and_then(|raw| raw.trim().parse::<i32>().ok())
            .filter(|limit| *limit > 0)
    }
}
