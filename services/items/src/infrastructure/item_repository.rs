/// DynamoDBでアイテムを管理するためのアイテムリポジトリ
///
/// アイテムのJSON表現とDynamoDBの`AttributeValue`の相互変換には
/// serde_dynamoを使用する。
use std::collections::HashMap;

use async_trait::async_trait;
use aws_sdk_dynamodb::Client as DynamoDbClient;
use aws_sdk_dynamodb::types::{AttributeValue, ReturnValue};
use serde_dynamo::aws_sdk_dynamodb_1::{from_item, to_attribute_value, to_item};
use thiserror::Error;

use crate::domain::{ID_FIELD, Item, UpdateFields};

/// リポジトリ操作のエラー型
#[derive(Debug, Error, Clone, PartialEq)]
pub enum RepositoryError {
    /// DynamoDBへの書き込みに失敗
    #[error("Write error: {0}")]
    WriteError(String),

    /// DynamoDBからの読み取りに失敗
    #[error("Read error: {0}")]
    ReadError(String),

    /// JSONとAttributeValueの変換に失敗
    #[error("Serialization error: {0}")]
    SerializationError(String),
}

/// スキャン1ページ分の結果
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ScanPage {
    /// 取得したアイテム（順序はストア依存）
    pub items: Vec<Item>,
    /// 続きがある場合の再開キー
    ///
    /// 現状は1ページ目のみを返すため、後続ページの取得には使用していない。
    pub last_evaluated_key: Option<Item>,
}

impl ScanPage {
    /// 後続ページが存在するか
    pub fn is_truncated(&self) -> bool {
        self.last_evaluated_key.is_some()
    }
}

/// アイテム永続化用トレイト
///
/// 実際のDynamoDB実装とテスト用モックを差し替え可能にする。
#[async_trait]
pub trait ItemRepository: Send + Sync {
    /// アイテムを丸ごと保存（同一IDは上書き、マージしない）
    async fn put(&self, item: &Item) -> Result<(), RepositoryError>;

    /// IDでアイテムを取得
    ///
    /// # 戻り値
    /// * 見つかった場合は`Ok(Some(Item))`
    /// * 見つからなかった場合は`Ok(None)`
    async fn get(&self, id: &str) -> Result<Option<Item>, RepositoryError>;

    /// テーブルを1ページ分スキャン
    ///
    /// `limit`が指定されていれば最大その件数まで。
    async fn scan(&self, limit: Option<i32>) -> Result<ScanPage, RepositoryError>;

    /// 指定フィールドのみを書き換え、更新後のアイテム全体を返す
    ///
    /// アイテムが存在しない場合はIDと更新フィールドのみのアイテムが作成される。
    async fn update_fields(
        &self,
        id: &str,
        fields: &UpdateFields,
    ) -> Result<Item, RepositoryError>;

    /// IDでアイテムを削除（存在しなくても成功）
    async fn delete(&self, id: &str) -> Result<(), RepositoryError>;
}

/// `SET #f0 = :v0, ...`形式の更新式
#[derive(Debug, Clone, PartialEq)]
struct UpdateExpression {
    expression: String,
    names: HashMap<String, String>,
    values: HashMap<String, AttributeValue>,
}

impl UpdateExpression {
    /// 更新フィールドから更新式を構築
    ///
    /// プレースホルダーは連番で振るため、予約語や記号を含むフィールド名も扱える。
    fn build(fields: &UpdateFields) -> Result<Self, RepositoryError> {
        let mut set_parts = Vec::with_capacity(fields.len());
        let mut names = HashMap::with_capacity(fields.len());
        let mut values = HashMap::with_capacity(fields.len());

        for (index, (field, value)) in fields.iter().enumerate() {
            let name_placeholder = format!("#f{}", index);
            let value_placeholder = format!(":v{}", index);

            let attribute = to_attribute_value(value)
                .map_err(|e| RepositoryError::SerializationError(e.to_string()))?;

            set_parts.push(format!("{} = {}", name_placeholder, value_placeholder));
            names.insert(name_placeholder, field.clone());
            values.insert(value_placeholder, attribute);
        }

        Ok(Self {
            expression: format!("SET {}", set_parts.join(", ")),
            names,
            values,
        })
    }
}

/// ItemRepositoryのDynamoDB実装
#[derive(Debug, Clone)]
pub struct DynamoItemRepository {
    /// DynamoDBクライアント
    client: DynamoDbClient,
    /// アイテムテーブル名
    table_name: String,
}

impl DynamoItemRepository {
    /// 新しいDynamoItemRepositoryを作成
    pub fn new(client: DynamoDbClient, table_name: String) -> Self {
        Self { client, table_name }
    }

    /// テーブル名を取得
    #[cfg(test)]
    pub fn table_name(&self) -> &str {
        &self.table_name
    }

    fn key_value(id: &str) -> AttributeValue {
        AttributeValue::S(id.to_string())
    }

    fn decode_item(attributes: HashMap<String, AttributeValue>) -> Result<Item, RepositoryError> {
        from_item(attributes).map_err(|e| RepositoryError::SerializationError(e.to_string()))
    }
}

#[async_trait]
impl ItemRepository for DynamoItemRepository {
    async fn put(&self, item: &Item) -> Result<(), RepositoryError> {
        let attributes: HashMap<String, AttributeValue> =
            to_item(item).map_err(|e| RepositoryError::SerializationError(e.to_string()))?;

        self.client
            .put_item()
            .table_name(&self.table_name)
            .set_item(Some(attributes))
            .send()
            .await
            .map_err(|e| RepositoryError::WriteError(e.into_service_error().to_string()))?;

        Ok(())
    }

    async fn get(&self, id: &str) -> Result<Option<Item>, RepositoryError> {
        let result = self
            .client
            .get_item()
            .table_name(&self.table_name)
            .key(ID_FIELD, Self::key_value(id))
            .send()
            .await
            .map_err(|e| RepositoryError::ReadError(e.into_service_error().to_string()))?;

        result.item.map(Self::decode_item).transpose()
    }

    async fn scan(&self, limit: Option<i32>) -> Result<ScanPage, RepositoryError> {
        let result = self
            .client
            .scan()
            .table_name(&self.table_name)
            .set_limit(limit)
            .send()
            .await
            .map_err(|e| RepositoryError::ReadError(e.into_service_error().to_string()))?;

        let items = result
            .items
            .unwrap_or_default()
            .into_iter()
            .map(Self::decode_item)
            .collect::<Result<Vec<_>, _>>()?;

        let last_evaluated_key = result
            .last_evaluated_key
            .filter(|key| !key.is_empty())
            .map(Self::decode_item)
            .transpose()?;

        Ok(ScanPage {
            items,
            last_evaluated_key,
        })
    }

    async fn update_fields(
        &self,
        id: &str,
        fields: &UpdateFields,
    ) -> Result<Item, RepositoryError> {
        let update = UpdateExpression::build(fields)?;

        let result = self
            .client
            .update_item()
            .table_name(&self.table_name)
            .key(ID_FIELD, Self::key_value(id))
            .update_expression(update.expression)
            .set_expression_attribute_names(Some(update.names))
            .set_expression_attribute_values(Some(update.values))
            .return_values(ReturnValue::AllNew)
            .send()
            .await
            .map_err(|e| RepositoryError::WriteError(e.into_service_error().to_string()))?;

        Self::decode_item(result.attributes.unwrap_or_default())
    }

    async fn delete(&self, id: &str) -> Result<(), RepositoryError> {
        self.client
            .delete_item()
            .table_name(&self.table_name)
            .key(ID_FIELD, Self::key_value(id))
            .send()
            .await
            .map_err(|e| RepositoryError::WriteError(e.into_service_error().to_string()))?;

        Ok(())
    }
}
