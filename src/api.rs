//! HTTP client for the profile, character and image endpoints.

use crate::config::{Config, normalize_base_url};
use crate::error::FetchError;
use crate::model::{CharacterRecord, UserProfile};
use crate::texture::Texture;

/// Cheap to clone; every fetch task holds its own copy.
#[derive(Debug, Clone)]
pub struct DeckClient {
    http: reqwest::Client,
    user_base_url: String,
    character_base_url: String,
}

impl DeckClient {
    pub fn new(config: &Config) -> Result<Self, FetchError> {
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout())
            .user_agent(concat!("deck-tui/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self::with_client(
            http,
            &config.user_base_url,
            &config.character_base_url,
        ))
    }

    pub fn with_client(http: reqwest::Client, user_base_url: &str, character_base_url: &str) -> Self {
        Self {
            http,
            user_base_url: normalize_base_url(user_base_url),
            character_base_url: normalize_base_url(character_base_url),
        }
    }

    pub fn profile_url(&self, user_id: u32) -> String {
        format!("{}{}", self.user_base_url, user_id)
    }

    pub fn character_url(&self, character_id: i64) -> String {
        format!("{}{}", self.character_base_url, character_id)
    }

    pub async fn fetch_profile(&self, user_id: u32) -> Result<UserProfile, FetchError> {
        let body = self.get_bytes(&self.profile_url(user_id)).await?;
        tracing::debug!("[USER JSON] {}", String::from_utf8_lossy(&body));
        Ok(serde_json::from_slice(&body)?)
    }

    pub async fn fetch_character(&self, character_id: i64) -> Result<CharacterRecord, FetchError> {
        let body = self.get_bytes(&self.character_url(character_id)).await?;
        Ok(serde_json::from_slice(&body)?)
    }

    pub async fn fetch_image(&self, url: &str) -> Result<Texture, FetchError> {
        let body = self.get_bytes(url).await?;
        Ok(Texture::decode(&body)?)
    }

    async fn get_bytes(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        let response = self.http.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }
        Ok(response.bytes().await?.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{DynamicImage, ImageFormat, RgbImage};
    use std::io::Cursor;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// Serves exactly one canned response and returns the base URL.
    async fn serve_once(status_line: &'static str, body: Vec<u8>) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut request = Vec::new();
            let mut buf = [0u8; 1024];
            while !request.windows(4).any(|window| window == b"\r\n\r\n") {
                let read = socket.read(&mut buf).await.unwrap();
                if read == 0 {
                    break;
                }
                request.extend_from_slice(&buf[..read]);
            }
            let head = format!(
                "{status_line}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
                body.len()
            );
            socket.write_all(head.as_bytes()).await.unwrap();
            socket.write_all(&body).await.unwrap();
            let _ = socket.shutdown().await;
        });
        format!("http://{addr}")
    }

    fn client_for(base: &str) -> DeckClient {
        let http = reqwest::Client::builder().no_proxy().build().unwrap();
        DeckClient::with_client(http, base, base)
    }

    #[test]
    fn test_urls_are_normalized() {
        let client = client_for("http://localhost:1/users");
        assert_eq!(client.profile_url(3), "http://localhost:1/users/3");
        assert_eq!(client.character_url(47), "http://localhost:1/users/47");
    }

    #[tokio::test]
    async fn test_fetch_profile() {
        let base = serve_once(
            "HTTP/1.1 200 OK",
            br#"{ "id": 1, "username": "wendy", "deck": [1, 2] }"#.to_vec(),
        )
        .await;
        let profile = client_for(&base).fetch_profile(1).await.unwrap();
        assert_eq!(profile.display_name(), "wendy");
        assert_eq!(profile.deck_ids(), Some(&[1, 2][..]));
    }

    #[tokio::test]
    async fn test_fetch_profile_not_found() {
        let base = serve_once("HTTP/1.1 404 Not Found", b"{}".to_vec()).await;
        let err = client_for(&base).fetch_profile(9).await.unwrap_err();
        match err {
            FetchError::Status { url, status } => {
                assert_eq!(status, 404);
                assert!(url.ends_with("/9"));
            }
            other => panic!("expected status error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_fetch_character_malformed_json() {
        let base = serve_once("HTTP/1.1 200 OK", b"<html>oops</html>".to_vec()).await;
        let err = client_for(&base).fetch_character(2).await.unwrap_err();
        assert!(matches!(err, FetchError::Parse(_)));
    }

    #[tokio::test]
    async fn test_fetch_image() {
        let mut png = Vec::new();
        DynamicImage::ImageRgb8(RgbImage::new(4, 2))
            .write_to(&mut Cursor::new(&mut png), ImageFormat::Png)
            .unwrap();
        let base = serve_once("HTTP/1.1 200 OK", png).await;
        let texture = client_for(&base)
            .fetch_image(&format!("{base}/2.png"))
            .await
            .unwrap();
        assert_eq!((texture.width(), texture.height()), (4, 2));
    }

    #[tokio::test]
    async fn test_fetch_image_undecodable() {
        let base = serve_once("HTTP/1.1 200 OK", b"not a png".to_vec()).await;
        let err = client_for(&base)
            .fetch_image(&format!("{base}/2.png"))
            .await
            .unwrap_err();
        assert!(matches!(err, FetchError::Image(_)));
    }
}
