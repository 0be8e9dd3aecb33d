/// ログ基盤モジュール
///
/// CloudWatch Logsに1行1JSONで出力する。イベント固有のフィールドは
/// トップレベルに展開し、`route`や`item_id`でそのまま検索できるようにする。
use std::sync::Once;

use tracing::Subscriber;
use tracing_subscriber::{
    fmt::MakeWriter, layer::SubscriberExt, registry::LookupSpan, util::SubscriberInitExt,
    EnvFilter, Layer,
};

static INIT: Once = Once::new();

/// `RUST_LOG`からフィルターを構築する（未設定・不正値なら`default_level`）
fn env_filter(default_level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level))
}

/// 出力先を差し替え可能なJSONレイヤー
fn json_layer<S, W>(make_writer: W) -> impl Layer<S>
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    tracing_subscriber::fmt::layer()
        .json()
        .with_writer(make_writer)
        .with_target(true)
        .with_file(true)
        .with_line_number(true)
        .flatten_event(true)
        .with_current_span(false)
}

/// Lambda環境向けのログサブスクライバーを初期化する
///
/// 複数回呼び出しても最初の1回のみ初期化を行う。
///
/// # 使用例
/// ```ignore
/// use items::infrastructure::init_logging;
///
/// init_logging();
/// tracing::info!(table_name = "crud_items", "起動");
/// ```
pub fn init_logging() {
    INIT.call_once(|| {
        // 別のサブスクライバーが既に登録済みでもパニックしない
        let _ = tracing_subscriber::registry()
            .with(env_filter("info"))
            .with(json_layer(std::io::stdout))
            .try_init();
    });
}

/// テスト用のログサブスクライバーを初期化する（人間が読みやすい形式）
#[cfg(test)]
pub fn init_test_logging() {
    static TEST_INIT: Once = Once::new();

    TEST_INIT.call_once(|| {
        let fmt_layer = tracing_subscriber::fmt::layer()
            .with_test_writer()
            .with_target(true)
            .compact();

        let _ = tracing_subscriber::registry()
            .with(env_filter("debug"))
            .with(fmt_layer)
            .try_init();
    });
}
