/// アイテムのドメインモデル
///
/// テーブルに保存される1レコードを表す。主キー`id`以外はスキーマレスで、
/// 任意のフィールド（文字列、数値、真偽値、ネストしたJSON）を持てる。
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;
use uuid::Uuid;

/// 主キーのフィールド名
pub const ID_FIELD: &str = "id";

/// リクエストボディの解釈エラー
#[derive(Debug, Error, Clone, PartialEq)]
pub enum BodyError {
    /// JSONとしてパースできない
    #[error("Invalid JSON body: {0}")]
    InvalidJson(String),

    /// JSONオブジェクト以外の値（配列、文字列など）
    #[error("Request body must be a JSON object")]
    NotAnObject,

    /// `body`がJSONエンコード済み文字列ではない
    #[error("Request body must be a JSON-encoded string")]
    NotAString,
}

/// 1件のアイテム（フィールド名 -> 値）
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Item(Map<String, Value>);

impl Item {
    /// JSON値からアイテムを作成
    ///
    /// JSONオブジェクト以外は`BodyError::NotAnObject`
    pub fn from_json(value: Value) -> Result<Self, BodyError> {
        match value {
            Value::Object(map) => Ok(Self(map)),
            _ => Err(BodyError::NotAnObject),
        }
    }

    /// `id`が無ければv4 UUIDを生成して付与する
    ///
    /// 明示的に指定された`id`はそのまま保持する（`null`も指定済みとみなす）。
    pub fn ensure_id(&mut self) {
        if !self.0.contains_key(ID_FIELD) {
            self.0
                .insert(ID_FIELD.to_string(), Value::String(Uuid::new_v4().to_string()));
        }
    }

    /// 文字列の`id`を取得
    pub fn id(&self) -> Option<&str> {
        self.0.get(ID_FIELD).and_then(|v| v.as_str())
    }

    /// フィールド値を取得
    #[cfg(test)]
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    pub fn into_fields(self) -> Map<String, Value> {
        self.0
    }
}

impl From<Map<String, Value>> for Item {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

/// 部分更新で書き込むフィールド集合
///
/// 主キー`id`は常に除外される。`id`の変更要求はエラーにせず黙って捨てる。
#[derive(Debug, Clone, PartialEq, Default)]
pub struct UpdateFields(Map<String, Value>);

impl UpdateFields {
    /// リクエストボディから更新対象フィールドを抽出
    pub fn from_body(body: Item) -> Self {
        let mut fields = body.into_fields();
        fields.remove(ID_FIELD);
        Self(fields)
    }

    /// 更新対象が無い
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// (フィールド名, 値)のイテレーター
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }
}
