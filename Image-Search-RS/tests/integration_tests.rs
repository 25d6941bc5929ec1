use image_search::*;
use serde_json::json;
use std::time::Duration;

#[test]
fn test_provider_endpoints() {
    assert_eq!(Provider::Pixabay.default_endpoint(), "https://pixabay.com/api/");
    assert_eq!(
        Provider::Unsplash.default_endpoint(),
        "https://api.unsplash.com/search/photos"
    );
    assert_eq!(Provider::Unsplash.to_string(), "unsplash");
}

#[test]
fn test_config_defaults() {
    let config = ImageSearchConfig::unsplash("key");
    assert_eq!(config.timeout, Duration::from_secs(10));
    assert_eq!(config.api_key, "key");
}

#[test]
fn test_parse_full_pixabay_payload() {
    let resp = json!({
        "total": 4692,
        "totalHits": 500,
        "hits": [
            {
                "id": 195893,
                "pageURL": "https://pixabay.com/en/blossom-bloom-flower-195893/",
                "type": "photo",
                "previewURL": "https://cdn.pixabay.com/photo/2013/10/15/09/12/flower-195893_150.jpg",
                "webformatURL": "https://pixabay.com/get/35bbf209e13e39d2_640.jpg",
                "largeImageURL": "https://pixabay.com/get/ed6a99fd0a76647_1280.jpg"
            }
        ]
    });
    let urls = parse_image_urls(Provider::Pixabay, &resp).unwrap();
    assert_eq!(urls, vec!["https://pixabay.com/get/35bbf209e13e39d2_640.jpg"]);
}

#[test]
fn test_parse_full_unsplash_payload() {
    let resp = json!({
        "total": 133,
        "total_pages": 7,
        "results": [
            {
                "id": "eOLpJytrbsQ",
                "urls": {
                    "raw": "https://images.unsplash.com/photo-1416339306562-f3d12fefd36f",
                    "full": "https://images.unsplash.com/photo-1416339306562-f3d12fefd36f?q=75&fm=jpg",
                    "regular": "https://images.unsplash.com/photo-1416339306562-f3d12fefd36f?w=1080",
                    "small": "https://images.unsplash.com/photo-1416339306562-f3d12fefd36f?w=400"
                }
            }
        ]
    });
    assert_eq!(
        first_image_url(Provider::Unsplash, &resp).as_deref(),
        Some("https://images.unsplash.com/photo-1416339306562-f3d12fefd36f?w=1080")
    );
}

#[tokio::test]
async fn test_unreachable_endpoint_is_network_error() {
    let config = ImageSearchConfig::pixabay("key")
        .endpoint("http://127.0.0.1:1/api/")
        .timeout(Duration::from_secs(2));
    let client = ImageSearchClient::new(config);
    let err = client.first_image("soup").await.unwrap_err();
    assert!(matches!(err, SearchError::Network { .. }));
}
