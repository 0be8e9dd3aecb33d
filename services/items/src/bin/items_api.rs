/// アイテムCRUD API Lambdaエントリポイント
///
/// API Gateway（HTTP API / REST API）経由のリクエストを受け取り、
/// `/items`コレクションに対するCRUD操作をDynamoDBテーブルに対して実行する。
///
/// DynamoDBクライアントは起動時に1回だけ構築し、warm start時も同じ
/// ハンドラーを使い回す。
use items::application::ItemsHandler;
use items::domain::ApiResponse;
use items::infrastructure::{init_logging, DynamoItemRepository, ItemRepository, ItemsTableConfig};
use lambda_runtime::{service_fn, Error, LambdaEvent};
use serde_json::Value;
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<(), Error> {
    // 構造化ログを初期化
    init_logging();

    let config = ItemsTableConfig::from_env().await.map_err(|err| {
        error!(error = %err, "テーブル設定読み込み失敗");
        err
    })?;

    info!(table_name = config.table_name(), "アイテムAPI Lambda関数を初期化");

    let items_handler: ItemsHandler<DynamoItemRepository> =
        ItemsHandler::new(config.item_repository());

    lambda_runtime::run(service_fn(|event: LambdaEvent<Value>| {
        let items_handler = &items_handler;
        async move { handler(items_handler, event).await }
    }))
    .await
}

/// Lambda関数のメインハンドラー
///
/// # 処理フロー
/// 1. 受信イベント全体をログ出力
/// 2. ItemsHandlerでルーティングとストア操作を実行
/// 3. 成功時はレスポンスを返却、失敗時は呼び出しエラーとして伝播
///
/// 不正なJSONボディやDynamoDBのエラーは構造化レスポンスにせず、
/// Lambdaの呼び出しエラーとして呼び出し元環境に返す。
async fn handler<R>(items_handler: &ItemsHandler<R>, event: LambdaEvent<Value>) -> Result<ApiResponse, Error>
where
    R: ItemRepository,
{
    let request_id = event.context.request_id.clone();

    info!(
        request_id = %request_id,
        event = %event.payload,
        "Event received"
    );

    match items_handler.handle(&event.payload).await {
        Ok(response) => {
            info!(
                request_id = %request_id,
                status_code = response.status_code,
                "レスポンス返却"
            );
            Ok(response)
        }
        Err(err) => {
            error!(
                request_id = %request_id,
                error = %err,
                "リクエスト処理エラー"
            );
            Err(err.into())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use items::domain::{Item, UpdateFields};
    use items::infrastructure::{RepositoryError, ScanPage};
    use lambda_runtime::Context;
    use serde_json::json;

    /// ストアに到達したら失敗するリポジトリ
    struct UnreachableRepository;

    #[async_trait]
    impl ItemRepository for UnreachableRepository {
        async fn put(&self, _item: &Item) -> Result<(), RepositoryError> {
            Err(RepositoryError::WriteError("store unreachable".to_string()))
        }

        async fn get(&self, _id: &str) -> Result<Option<Item>, RepositoryError> {
            Err(RepositoryError::ReadError("store unreachable".to_string()))
        }

        async fn scan(&self, _limit: Option<i32>) -> Result<ScanPage, RepositoryError> {
            Err(RepositoryError::ReadError("store unreachable".to_string()))
        }

        async fn update_fields(
            &self,
            _id: &str,
            _fields: &UpdateFields,
        ) -> Result<Item, RepositoryError> {
            Err(RepositoryError::WriteError("store unreachable".to_string()))
        }

        async fn delete(&self, _id: &str) -> Result<(), RepositoryError> {
            Err(RepositoryError::WriteError("store unreachable".to_string()))
        }
    }

    fn lambda_event(payload: Value) -> LambdaEvent<Value> {
        LambdaEvent::new(payload, Context::default())
    }

    #[tokio::test]
    async fn test_unmatched_route_returns_envelope() {
        let items_handler = ItemsHandler::new(UnreachableRepository);
        let event = lambda_event(json!({
            "rawPath": "/widgets",
            "requestContext": {"http": {"method": "GET"}}
        }));

        let response = handler(&items_handler, event).await.unwrap();

        assert_eq!(
            serde_json::to_value(&response).unwrap(),
            json!({
                "statusCode": 404,
                "headers": {"Content-Type": "application/json"},
                "body": "{\"message\":\"Route Not Found\"}"
            })
        );
    }

    #[tokio::test]
    async fn test_empty_update_is_answered_without_store_access() {
        let items_handler = ItemsHandler::new(UnreachableRepository);
        let event = lambda_event(json!({
            "rawPath": "/items/y",
            "requestContext": {"http": {"method": "PUT"}},
            "body": "{\"id\":\"y\"}"
        }));

        let response = handler(&items_handler, event).await.unwrap();

        assert_eq!(response.status_code, 400);
    }

    #[tokio::test]
    async fn test_malformed_body_is_invocation_error() {
        let items_handler = ItemsHandler::new(UnreachableRepository);
        let event = lambda_event(json!({
            "rawPath": "/items",
            "requestContext": {"http": {"method": "POST"}},
            "body": "{oops"
        }));

        let err = handler(&items_handler, event).await.unwrap_err();

        assert!(err.to_string().starts_with("Invalid JSON body"));
    }

    #[tokio::test]
    async fn test_store_failure_is_invocation_error() {
        let items_handler = ItemsHandler::new(UnreachableRepository);
        let event = lambda_event(json!({
            "httpMethod": "DELETE",
            "path": "/items/x"
        }));

        let err = handler(&items_handler, event).await.unwrap_err();

        assert_eq!(err.to_string(), "Write error: store unreachable");
    }
}
