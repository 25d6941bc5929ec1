use image_search::{ImageSearchClient, ImageSearchConfig};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let term = std::env::args().nth(1).unwrap_or_else(|| "recipe".to_string());
    let client = ImageSearchClient::new(ImageSearchConfig::from_env()?);

    println!("Searching {} for '{}'...", client.config().provider, term);
    let urls = client.search(&term).await?;

    if urls.is_empty() {
        println!("No images found.");
    }
    for (i, url) in urls.iter().take(5).enumerate() {
        println!("{}. {}", i + 1, url);
    }

    Ok(())
}
