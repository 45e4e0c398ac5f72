//! Resolve the base URL from the environment and issue one request.
//!
//! ```bash
//! APP_API_URL=api.example.com APP_MODE=development cargo run --example ping -- /health
//! ```

use app_http::prelude::*;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt::init();

    let path = std::env::args().nth(1).unwrap_or_else(|| "/health".to_string());
    let client = ApiClient::builder()
        .environment(&Environment::from_env())
        .session_listener(|e: &NormalizedError| {
            println!("Session invalidated, the app would now navigate to {:?}", e.redirect_to());
        })
        .build()?;

    println!("Base URL: {:?}", client.base_url());

    match client.get::<serde_json::Value>(&path).await {
        Ok(body) => println!("{}", serde_json::to_string_pretty(&body)?),
        Err(e) if e.error_code == codes::NETWORK_ERROR => {
            println!("Network error: {}", e.message.as_deref().unwrap_or("-"));
        }
        Err(e) => println!("Request failed ({}): {}", e.error_code, e),
    }

    Ok(())
}
