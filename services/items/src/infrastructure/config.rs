/// アイテムテーブルの接続設定
///
/// テーブル名は環境変数`TABLE_NAME`から読み込み、未設定時は`crud_items`を使う。
use aws_sdk_dynamodb::Client as DynamoDbClient;
use thiserror::Error;

use super::item_repository::DynamoItemRepository;

/// テーブル名を指定する環境変数
pub const TABLE_NAME_ENV: &str = "TABLE_NAME";

/// `TABLE_NAME`未設定時のテーブル名
pub const DEFAULT_TABLE_NAME: &str = "crud_items";

/// 設定のエラー型
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ItemsTableConfigError {
    /// テーブル名が空文字列
    #[error("Table name must not be empty ({0})")]
    EmptyTableName(String),
}

/// テーブル名とクライアントを持つDynamoDB設定
///
/// 起動時に1回だけ構築し、以降の呼び出しで使い回す。
#[derive(Debug, Clone)]
pub struct ItemsTableConfig {
    /// DynamoDBクライアントインスタンス
    client: DynamoDbClient,
    /// アイテムテーブル名
    table_name: String,
}

impl ItemsTableConfig {
    /// 環境からAWS設定とテーブル名を読み込んで設定を作成
    ///
    /// 環境変数:
    /// - AWS認証情報: aws-configにより自動読み込み
    /// - TABLE_NAME: アイテム用DynamoDBテーブル名（省略時`crud_items`）
    pub async fn from_env() -> Result<Self, ItemsTableConfigError> {
        let table_name = Self::table_name_from_env()?;

        // 環境からAWS設定を読み込み（認証情報、リージョンなど）
        let aws_config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
        let client = DynamoDbClient::new(&aws_config);

        Ok(Self { client, table_name })
    }

    /// 環境変数からテーブル名のみを解決
    pub fn table_name_from_env() -> Result<String, ItemsTableConfigError> {
        match std::env::var(TABLE_NAME_ENV) {
            Ok(name) if name.trim().is_empty() => {
                Err(ItemsTableConfigError::EmptyTableName(TABLE_NAME_ENV.to_string()))
            }
            Ok(name) => Ok(name),
            Err(_) => Ok(DEFAULT_TABLE_NAME.to_string()),
        }
    }

    /// 明示的な値で新しい設定を作成（テスト用）
    #[cfg(test)]
    pub fn new(client: DynamoDbClient, table_name: String) -> Self {
        Self { client, table_name }
    }

    /// DynamoDBクライアントへの参照を取得
    #[cfg(test)]
    pub fn client(&self) -> &DynamoDbClient {
        &self.client
    }

    /// テーブル名を取得
    pub fn table_name(&self) -> &str {
        &self.table_name
    }

    /// この設定でアイテムリポジトリを作成
    pub fn item_repository(&self) -> DynamoItemRepository {
        DynamoItemRepository::new(self.client.clone(), self.table_name.clone())
    }
}
