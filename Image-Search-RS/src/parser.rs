//! Tolerant extraction of image URLs from provider search responses.
//!
//! Each provider nests its hits differently:
//! 1. Pixabay: `{"hits": [{"webformatURL": ..., "largeImageURL": ..., "previewURL": ...}]}`
//! 2. Unsplash: `{"results": [{"urls": {"regular": ..., "full": ..., "small": ...}}]}`
//!
//! Hits missing every known URL field are skipped rather than failing the
//! whole response.

use crate::types::Provider;
use serde_json::Value;

const PIXABAY_URL_FIELDS: [&str; 3] = ["webformatURL", "largeImageURL", "previewURL"];
const UNSPLASH_URL_FIELDS: [&str; 4] = ["regular", "full", "small", "raw"];

/// Extract every usable image URL from a search response, in hit order.
///
/// Returns `None` when the response lacks the provider's hit array entirely,
/// which callers treat as an invalid response. An empty array yields
/// `Some(vec![])`.
pub fn parse_image_urls(provider: Provider, response: &Value) -> Option<Vec<String>> {
    match provider {
        Provider::Pixabay => {
            let hits = response.get("hits")?.as_array()?;
            Some(
                hits.iter()
                    .filter_map(|hit| first_url(hit, &PIXABAY_URL_FIELDS))
                    .collect(),
            )
        }
        Provider::Unsplash => {
            let results = response.get("results")?.as_array()?;
            Some(
                results
                    .iter()
                    .filter_map(|r| r.get("urls"))
                    .filter_map(|urls| first_url(urls, &UNSPLASH_URL_FIELDS))
                    .collect(),
            )
        }
    }
}

/// First image URL of a search response, if any.
pub fn first_image_url(provider: Provider, response: &Value) -> Option<String> {
    parse_image_urls(provider, response)?.into_iter().next()
}

fn first_url(obj: &Value, fields: &[&str]) -> Option<String> {
    fields
        .iter()
        .filter_map(|f| obj.get(*f).and_then(|v| v.as_str()))
        .map(str::trim)
        .find(|s| s.starts_with("http"))
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    // ── Pixabay ──

    #[test]
    fn pixabay_first_hit() {
        let resp = json!({
            "total": 2,
            "hits": [
                {"webformatURL": "https://pixabay.com/get/a.jpg"},
                {"webformatURL": "https://pixabay.com/get/b.jpg"}
            ]
        });
        assert_eq!(
            first_image_url(Provider::Pixabay, &resp).as_deref(),
            Some("https://pixabay.com/get/a.jpg")
        );
    }

    #[test]
    fn pixabay_falls_back_to_large_image() {
        let resp = json!({"hits": [{"webformatURL": "", "largeImageURL": "https://x/large.jpg"}]});
        assert_eq!(
            first_image_url(Provider::Pixabay, &resp).as_deref(),
            Some("https://x/large.jpg")
        );
    }

    #[test]
    fn pixabay_skips_hits_without_urls() {
        let resp = json!({"hits": [{"id": 1}, {"previewURL": "https://x/p.jpg"}]});
        assert_eq!(
            parse_image_urls(Provider::Pixabay, &resp).unwrap(),
            vec!["https://x/p.jpg"]
        );
    }

    #[test]
    fn pixabay_no_hits() {
        let resp = json!({"total": 0, "hits": []});
        assert_eq!(parse_image_urls(Provider::Pixabay, &resp), Some(vec![]));
        assert!(first_image_url(Provider::Pixabay, &resp).is_none());
    }

    // ── Unsplash ──

    #[test]
    fn unsplash_regular_url() {
        let resp = json!({
            "results": [{"urls": {"raw": "https://u/raw", "regular": "https://u/regular"}}]
        });
        assert_eq!(
            first_image_url(Provider::Unsplash, &resp).as_deref(),
            Some("https://u/regular")
        );
    }

    #[test]
    fn unsplash_missing_urls_object() {
        let resp = json!({"results": [{"id": "abc"}]});
        assert_eq!(parse_image_urls(Provider::Unsplash, &resp), Some(vec![]));
    }

    // ── Edge cases ──

    #[test]
    fn wrong_shape_is_none() {
        let resp = json!({"errors": ["OAuth error: The access token is invalid"]});
        assert!(parse_image_urls(Provider::Unsplash, &resp).is_none());
        assert!(parse_image_urls(Provider::Pixabay, &resp).is_none());
    }

    #[test]
    fn non_http_values_ignored() {
        let resp = json!({"hits": [{"webformatURL": "not a url"}]});
        assert!(first_image_url(Provider::Pixabay, &resp).is_none());
    }
}
