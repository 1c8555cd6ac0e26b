use chrono::NaiveDate;
use horizon_core::common::{Symbol, Timeframe};
use horizon_core::config::ApiConfig;
use horizon_core::market::error::MarketError;
use horizon_core::market::port::{PriceHistoryProvider, TickerDirectory};
use horizon_feed::horizon::HorizonProvider;
use std::sync::{Arc, Mutex};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

/// # Summary
/// 单次应答的本地 HTTP 桩服务。
///
/// # Logic
/// 1. 绑定随机端口。
/// 2. 接受一个连接，记录请求行，返回预设的状态码与响应体后关闭。
async fn stub_server(status: u16, body: &'static str) -> (String, Arc<Mutex<String>>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let request_line = Arc::new(Mutex::new(String::new()));
    let captured = request_line.clone();

    tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut buf = vec![0u8; 8192];
        let mut read = 0;
        loop {
            let n = socket.read(&mut buf[read..]).await.unwrap();
            read += n;
            if n == 0 || buf[..read].windows(4).any(|w| w == b"\r\n\r\n") {
                break;
            }
        }
        let text = String::from_utf8_lossy(&buf[..read]).to_string();
        *captured.lock().unwrap() = text.lines().next().unwrap_or_default().to_string();

        let response = format!(
            "HTTP/1.1 {} STUB\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{}",
            status,
            body.len(),
            body
        );
        socket.write_all(response.as_bytes()).await.unwrap();
        socket.shutdown().await.ok();
    });

    (format!("http://{}", addr), request_line)
}

fn provider(base_url: String) -> HorizonProvider {
    let config = ApiConfig {
        base_url,
        ..ApiConfig::default()
    };
    HorizonProvider::new(&config).unwrap()
}

/// # Summary
/// 验证聚合接口的请求参数与信封解析。
#[tokio::test]
async fn test_fetch_aggregates_builds_query_and_parses() -> anyhow::Result<()> {
    let (base, request_line) = stub_server(
        200,
        r#"{"data":{"results":[{"timestamp":1700000000000,"close":100},{"timestamp":1700086400000,"close":102}]}}"#,
    )
    .await;

    let today = NaiveDate::from_ymd_opt(2024, 6, 30).unwrap();
    let range = Timeframe::SixMonths.range_ending(today);
    let points = provider(base)
        .fetch_aggregates(&Symbol::new("aapl"), range, 730)
        .await?;

    assert_eq!(points.len(), 2);
    assert_eq!(points[1].close, 102.0);

    let line = request_line.lock().unwrap().clone();
    assert!(line.starts_with("GET /stocks/aggregates/AAPL?"), "{}", line);
    assert!(line.contains("multiplier=1"));
    assert!(line.contains("timespan=day"));
    assert!(line.contains("from=2024-01-02"));
    assert!(line.contains("to=2024-06-30"));
    assert!(line.contains("limit=730"));
    Ok(())
}

#[tokio::test]
async fn test_http_error_maps_to_api_error() {
    let (base, _) = stub_server(404, r#"{"message":"Ticker not found"}"#).await;
    let today = NaiveDate::from_ymd_opt(2024, 6, 30).unwrap();

    let result = provider(base)
        .fetch_aggregates(&Symbol::new("NOPE"), Timeframe::OneMonth.range_ending(today), 730)
        .await;

    match result {
        Err(MarketError::Api(msg)) => assert_eq!(msg, "Ticker not found"),
        other => panic!("unexpected result: {:?}", other),
    }
}

#[tokio::test]
async fn test_invalid_json_maps_to_malformed() {
    let (base, _) = stub_server(200, "<html>oops</html>").await;
    let today = NaiveDate::from_ymd_opt(2024, 6, 30).unwrap();

    let result = provider(base)
        .fetch_aggregates(&Symbol::new("AAPL"), Timeframe::OneMonth.range_ending(today), 730)
        .await;

    assert!(matches!(result, Err(MarketError::Malformed(_))));
}

#[tokio::test]
async fn test_unreachable_host_maps_to_network_error() {
    // 先绑定再释放端口，确保连接被拒绝
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let today = NaiveDate::from_ymd_opt(2024, 6, 30).unwrap();
    let result = provider(format!("http://{}", addr))
        .fetch_aggregates(&Symbol::new("AAPL"), Timeframe::OneMonth.range_ending(today), 730)
        .await;

    assert!(matches!(result, Err(MarketError::Network(_))));
}

#[tokio::test]
async fn test_search_request() -> anyhow::Result<()> {
    let (base, request_line) = stub_server(
        200,
        r#"{"results":[{"ticker":"MSFT","name":"Microsoft Corp","primary_exchange":"XNAS"}]}"#,
    )
    .await;

    let matches = provider(base).search("micro", 5).await?;
    assert_eq!(matches.len(), 1);
    assert_eq!(matches[0].ticker, Symbol::new("MSFT"));

    let line = request_line.lock().unwrap().clone();
    assert!(line.starts_with("GET /stocks/search?search=micro&active=true&market=stocks&limit=5"));
    Ok(())
}

#[tokio::test]
async fn test_overview_unwraps_data() -> anyhow::Result<()> {
    let (base, _) = stub_server(
        200,
        r#"{"data":{"ticker":"AAPL","name":"Apple Inc.","type":"CS","market_cap":3.0e12,"branding":{}}}"#,
    )
    .await;

    let overview = provider(base).overview(&Symbol::new("AAPL")).await?;
    assert_eq!(overview.name.as_deref(), Some("Apple Inc."));
    assert!(overview.is_common_stock());
    Ok(())
}
