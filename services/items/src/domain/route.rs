/// ルーティングテーブル
///
/// HTTPメソッドとパスの組から実行するアクションを決定する。
/// 評価順は固定で、最初にマッチしたルートが採用される。
///
/// | メソッド | パス | ルート |
/// |---|---|---|
/// | POST | `/items` | [`Route::CreateItem`] |
/// | GET | `/items` | [`Route::ListItems`] |
/// | GET | `/items/{id}` | [`Route::GetItem`] |
/// | PUT | `/items/{id}` | [`Route::UpdateItem`] |
/// | DELETE | `/items/{id}` | [`Route::DeleteItem`] |
use percent_encoding::percent_decode_str;

/// コレクションのパス
const COLLECTION_PATH: &str = "/items";

/// 個別アイテムのパスプレフィックス
const ITEM_PATH_PREFIX: &str = "/items/";

/// ディスパッチ先のルート
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    /// POST /items
    CreateItem,
    /// GET /items
    ListItems,
    /// GET /items/{id}（IDはデコード済み）
    GetItem(String),
    /// PUT /items/{id}
    UpdateItem(String),
    /// DELETE /items/{id}
    DeleteItem(String),
    /// どのルートにもマッチしない
    NotFound,
}

impl Route {
    /// メソッドとパスからルートを解決
    ///
    /// メソッドが無い場合は常に`NotFound`。
    pub fn resolve(method: Option<&str>, path: &str) -> Self {
        let Some(method) = method else {
            return Route::NotFound;
        };

        match (method, path) {
            ("POST", COLLECTION_PATH) => return Route::CreateItem,
            ("GET", COLLECTION_PATH) => return Route::ListItems,
            _ => {}
        }

        let Some(item_id) = Self::match_item_path(path) else {
            return Route::NotFound;
        };

        match method {
            "GET" => Route::GetItem(item_id),
            "PUT" => Route::UpdateItem(item_id),
            "DELETE" => Route::DeleteItem(item_id),
            _ => Route::NotFound,
        }
    }

    /// `/items/{id}`にマッチすればパーセントデコードしたIDを返す
    ///
    /// `{id}`は空でない単一セグメント（`/`を含まない）に限る。
    fn match_item_path(path: &str) -> Option<String> {
        let segment = path.strip_prefix(ITEM_PATH_PREFIX)?;
        if segment.is_empty() || segment.contains('/') {
            return None;
        }
        Some(percent_decode_str(segment).decode_utf8_lossy().into_owned())
    }

    /// ログ用のルート名
    pub fn name(&self) -> &'static str {
        match self {
            Route::CreateItem => "create_item",
            Route::ListItems => "list_items",
            Route::GetItem(_) => "get_item",
            Route::UpdateItem(_) => "update_item",
            Route::DeleteItem(_) => "delete_item",
            Route::NotFound => "not_found",
        }
    }
}
