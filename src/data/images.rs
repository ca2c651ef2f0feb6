//! Remote image source
//!
//! `ImageSource` is the upstream the image cache calls on a miss.
//! `HttpImageSource` downloads with reqwest and only accepts bodies that look
//! like an image.

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::{Client, StatusCode, Url};
use tracing::debug;

use super::LaunchError;

/// Fetches raw image bytes for a URL
#[async_trait]
pub trait ImageSource: Send + Sync {
    async fn fetch_image(&self, url: &str) -> Result<Bytes, LaunchError>;
}

/// Image formats we know how to recognise from their leading bytes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    Png,
    Jpeg,
    Gif,
    WebP,
}

/// Sniffs the image format from the magic number at the start of `data`
pub fn sniff_format(data: &[u8]) -> Option<ImageFormat> {
    match data {
        [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, ..] => Some(ImageFormat::Png),
        [0xFF, 0xD8, 0xFF, ..] => Some(ImageFormat::Jpeg),
        [b'G', b'I', b'F', b'8', ..] => Some(ImageFormat::Gif),
        [b'R', b'I', b'F', b'F', _, _, _, _, b'W', b'E', b'B', b'P', ..] => Some(ImageFormat::WebP),
        _ => None,
    }
}

/// Downloads images over HTTP
#[derive(Debug, Clone, Default)]
pub struct HttpImageSource {
    client: Client,
}

impl HttpImageSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ImageSource for HttpImageSource {
    async fn fetch_image(&self, url: &str) -> Result<Bytes, LaunchError> {
        let target = Url::parse(url)
            .map_err(|e| LaunchError::InvalidRequestTarget(format!("{url}: {e}")))?;

        let response = self.client.get(target).send().await?;
        if response.status() != StatusCode::OK {
            return Err(LaunchError::status(response.status().as_u16()));
        }

        let body = response.bytes().await?;
        if body.is_empty() {
            return Err(LaunchError::InvalidPayload("empty image body".to_string()));
        }
        let format = sniff_format(&body)
            .ok_or_else(|| LaunchError::InvalidPayload(format!("{url} is not a recognised image")))?;

        debug!(url, ?format, size = body.len(), "downloaded image");
        Ok(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sniff_known_formats() {
        assert_eq!(
            sniff_format(&[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 0x00]),
            Some(ImageFormat::Png)
        );
        assert_eq!(sniff_format(&[0xFF, 0xD8, 0xFF, 0xE0]), Some(ImageFormat::Jpeg));
        assert_eq!(sniff_format(b"GIF89a...."), Some(ImageFormat::Gif));
        assert_eq!(sniff_format(b"RIFF\x10\x00\x00\x00WEBPVP8 "), Some(ImageFormat::WebP));
    }

    #[test]
    fn test_sniff_rejects_non_images() {
        assert_eq!(sniff_format(b"<html><body>404</body></html>"), None);
        assert_eq!(sniff_format(b""), None);
        assert_eq!(sniff_format(&[0x89, b'P']), None);
    }

    #[tokio::test]
    async fn test_unparseable_url_is_invalid_request_target() {
        let source = HttpImageSource::new();
        let result = source.fetch_image("img ://bad").await;
        assert!(matches!(result, Err(LaunchError::InvalidRequestTarget(_))));
    }
}
