use tokio::net::TcpListener;

/// Echo server for manual testing of the API client.
#[tokio::main]
async fn main() -> Result<(), std::io::Error> {
    let host = std::env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
    let port = std::env::var("PORT").unwrap_or_else(|_| "3000".to_string());
    let addr = format!("{host}:{port}");
    let listener = TcpListener::bind(&addr).await?;
    println!("echo server listening on {addr} (try /status/{{code}} and /delay/{{ms}})");
    mock_server::run(listener).await
}
