/// アイテムCRUDハンドラー
///
/// Lambdaイベントをルーティングテーブルでディスパッチし、
/// 対応するストア操作を1回だけ実行してレスポンスを組み立てる。
/// ハンドラー自体は呼び出しをまたぐ状態を持たない。
use serde_json::{json, Value};
use thiserror::Error;
use tracing::{debug, warn};

use super::request_parser::ParsedRequest;
use crate::domain::{ApiResponse, BodyError, Route, UpdateFields};
use crate::infrastructure::{ItemRepository, RepositoryError};

/// ハンドラーのエラー型
///
/// どちらのエラーも構造化レスポンスには変換せず、呼び出しエラーとして
/// Lambdaランタイムへ伝播させる。
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ItemsHandlerError {
    /// リクエストボディが不正（文字列以外、JSONパース失敗、オブジェクト以外）
    #[error(transparent)]
    InvalidBody(#[from] BodyError),

    /// ストア操作エラー
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// アイテムAPIのリクエストディスパッチャー
pub struct ItemsHandler<R>
where
    R: ItemRepository,
{
    /// アイテムリポジトリ
    item_repo: R,
}

impl<R> ItemsHandler<R>
where
    R: ItemRepository,
{
    /// 新しいItemsHandlerを作成
    pub fn new(item_repo: R) -> Self {
        Self { item_repo }
    }

    /// Lambdaイベントを処理
    ///
    /// # 処理フロー
    /// 1. イベントからメソッド・パス・クエリ・ボディを抽出
    /// 2. ルーティングテーブルでルートを解決
    /// 3. ルートに対応するアクションを実行
    pub async fn handle(&self, event: &Value) -> Result<ApiResponse, ItemsHandlerError> {
        let request = ParsedRequest::from_event(event);
        self.handle_request(&request).await
    }

    /// 抽出済みリクエストを処理
    pub async fn handle_request(
        &self,
        request: &ParsedRequest,
    ) -> Result<ApiResponse, ItemsHandlerError> {
        let route = request.route();

        debug!(
            method = request.method.as_deref().unwrap_or("(none)"),
            path = %request.path,
            route = route.name(),
            "ルート解決完了"
        );

        match route {
            Route::CreateItem => self.create_item(request).await,
            Route::ListItems => self.list_items(request).await,
            Route::GetItem(id) => self.get_item(&id).await,
            Route::UpdateItem(id) => self.update_item(&id, request).await,
            Route::DeleteItem(id) => self.delete_item(&id).await,
            Route::NotFound => Ok(ApiResponse::route_not_found()),
        }
    }

    /// POST /items
    async fn create_item(&self, request: &ParsedRequest) -> Result<ApiResponse, ItemsHandlerError> {
        let mut item = request.body_item()?;
        item.ensure_id();

        self.item_repo.put(&item).await?;

        debug!(item_id = item.id().unwrap_or("(non-string)"), "アイテム作成");
        Ok(ApiResponse::created(&item))
    }

    /// GET /items
    ///
    /// 1ページ目のみを返す。続きがあっても後続ページは取得しない。
    async fn list_items(&self, request: &ParsedRequest) -> Result<ApiResponse, ItemsHandlerError> {
        let limit = request.limit();
        let page = self.item_repo.scan(limit).await?;

        if page.is_truncated() {
            warn!(
                returned = page.items.len(),
                limit = ?limit,
                "スキャン結果に続きがあるが1ページ目のみ返却"
            );
        }

        Ok(ApiResponse::ok(&json!({ "items": page.items })))
    }

    /// GET /items/{id}
    async fn get_item(&self, id: &str) -> Result<ApiResponse, ItemsHandlerError> {
        match self.item_repo.get(id).await? {
            Some(item) => Ok(ApiResponse::ok(&json!(item))),
            None => Ok(ApiResponse::not_found()),
        }
    }

    /// PUT /items/{id}
    ///
    /// 存在確認は行わない（存在しなければストア側で作成される）。
    async fn update_item(
        &self,
        id: &str,
        request: &ParsedRequest,
    ) -> Result<ApiResponse, ItemsHandlerError> {
        let fields = UpdateFields::from_body(request.body_item()?);
        if fields.is_empty() {
            return Ok(ApiResponse::no_updatable_fields());
        }

        let item = self.item_repo.update_fields(id, &fields).await?;

        debug!(item_id = id, field_count = fields.len(), "アイテム更新");
        Ok(ApiResponse::updated(&item))
    }

    /// DELETE /items/{id}
    async fn delete_item(&self, id: &str) -> Result<ApiResponse, ItemsHandlerError> {
        self.item_repo.delete(id).await?;
        Ok(ApiResponse::no_content())
    }
}
