//! # image-search
//!
//! Async image-search client used to find a picture for a recipe title.
//!
//! ## Features
//!
//! - **Two providers**: Pixabay (`hits[].webformatURL`) and Unsplash
//!   (`results[].urls.regular`)
//! - **Environment configuration** via `PIXABAY_API_KEY` or `UNSPLASH_ACCESS_KEY`
//! - **Tolerant parsing**: hits without a usable URL are skipped, alternative
//!   URL fields are tried in order
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use image_search::{ImageSearchClient, ImageSearchConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = ImageSearchClient::new(ImageSearchConfig::from_env()?);
//!     match client.first_image("chicken curry").await? {
//!         Some(url) => println!("Image: {}", url),
//!         None => println!("No image found"),
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Parsing
//!
//! ```rust
//! use image_search::{first_image_url, Provider};
//! use serde_json::json;
//!
//! let resp = json!({"hits": [{"webformatURL": "https://pixabay.com/get/a.jpg"}]});
//! assert_eq!(
//!     first_image_url(Provider::Pixabay, &resp).as_deref(),
//!     Some("https://pixabay.com/get/a.jpg"),
//! );
//! ```

pub mod client;
pub mod error;
pub mod parser;
pub mod types;

pub use client::ImageSearchClient;
pub use error::{Result, SearchError};
pub use parser::{first_image_url, parse_image_urls};
pub use types::{ImageSearchConfig, Provider};
