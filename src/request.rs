//! Turns the raw HTTP method, query string and body into an [`IncomingRequest`].

use axum::body::{Body, Bytes};
use axum::http::Method;
use url::form_urlencoded;

use crate::error::ApiError;
use crate::models::ExtractRequest;

/// Largest `POST` body that is buffered; anything bigger is treated as bad JSON.
pub const MAX_BODY_BYTES: usize = 2 * 1024 * 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transport {
    Query,
    JsonBody,
}

/// One decoded call, before validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IncomingRequest {
    pub transport: Transport,
    pub raw_url: String,
    pub format: Option<String>,
    pub quality: Option<String>,
}

/// Buffers the body of a `POST`. Other methods never read it.
pub async fn read_body(method: &Method, body: Body) -> Result<Bytes, ApiError> {
    if *method != Method::POST {
        return Ok(Bytes::new());
    }
    axum::body::to_bytes(body, MAX_BODY_BYTES)
        .await
        .map_err(|_| ApiError::MalformedInput)
}

/// Decodes a request. The body is only looked at for `POST`.
pub fn decode(method: &Method, query: Option<&str>, body: &[u8]) -> Result<IncomingRequest, ApiError> {
    if *method == Method::GET {
        Ok(decode_query(query.unwrap_or("")))
    } else if *method == Method::POST {
        decode_body(body)
    } else {
        Err(ApiError::MethodNotAllowed)
    }
}

fn decode_query(query: &str) -> IncomingRequest {
    let mut raw_url = None;
    let mut format = None;
    let mut quality = None;

    for (key, value) in form_urlencoded::parse(query.as_bytes()) {
        let slot = match &*key {
            "url" => &mut raw_url,
            "format" => &mut format,
            "quality" => &mut quality,
            _ => continue,
        };
        if slot.is_none() {
            *slot = Some(value.into_owned());
        }
    }

    IncomingRequest {
        transport: Transport::Query,
        raw_url: raw_url.unwrap_or_default(),
        format,
        quality,
    }
}

fn decode_body(body: &[u8]) -> Result<IncomingRequest, ApiError> {
    let req: ExtractRequest = serde_json::from_slice(body).map_err(|_| ApiError::MalformedInput)?;
    Ok(IncomingRequest {
        transport: Transport::JsonBody,
        raw_url: req.url.unwrap_or_default(),
        format: req.format,
        quality: req.quality,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn get_reads_query_params() {
        let req = decode(
            &Method::GET,
            Some("url=https%3A%2F%2Fexample.com%2Fv&format=mp4&quality=1080p"),
            b"",
        )
        .unwrap();
        assert_eq!(req.transport, Transport::Query);
        assert_eq!(req.raw_url, "https://example.com/v");
        assert_eq!(req.format.as_deref(), Some("mp4"));
        assert_eq!(req.quality.as_deref(), Some("1080p"));
    }

    #[test]
    fn get_without_query_has_empty_url() {
        let req = decode(&Method::GET, None, b"").unwrap();
        assert!(req.raw_url.is_empty());
        assert!(req.format.is_none());
        assert!(req.quality.is_none());
    }

    #[test]
    fn get_first_repeated_key_wins() {
        let req = decode(&Method::GET, Some("url=a&url=b"), b"").unwrap();
        assert_eq!(req.raw_url, "a");
    }

    #[test]
    fn get_ignores_body() {
        let req = decode(&Method::GET, Some("url=x"), b"not json").unwrap();
        assert_eq!(req.raw_url, "x");
    }

    #[test]
    fn post_reads_json_body() {
        let body = br#"{"url":"https://example.com/v","format":"webm","extra":1}"#;
        let req = decode(&Method::POST, Some("url=ignored"), body).unwrap();
        assert_eq!(req.transport, Transport::JsonBody);
        assert_eq!(req.raw_url, "https://example.com/v");
        assert_eq!(req.format.as_deref(), Some("webm"));
        assert!(req.quality.is_none());
    }

    #[test]
    fn post_without_url_key_decodes_to_empty_url() {
        let req = decode(&Method::POST, None, b"{}").unwrap();
        assert!(req.raw_url.is_empty());
    }

    #[test]
    fn post_rejects_bad_json() {
        let bodies: [&[u8]; 5] = [b"{", b"", b"null", b"\"x\"", br#"{"url":5}"#];
        for body in bodies {
            let err = decode(&Method::POST, None, body).unwrap_err();
            assert!(matches!(err, ApiError::MalformedInput), "body {body:?}");
        }
    }

    #[tokio::test]
    async fn read_body_skips_non_post() {
        let oversized = Body::from(vec![b'x'; MAX_BODY_BYTES + 1]);
        let bytes = read_body(&Method::GET, oversized).await.unwrap();
        assert!(bytes.is_empty());
    }

    #[tokio::test]
    async fn read_body_buffers_post() {
        let bytes = read_body(&Method::POST, Body::from(r#"{"url":"x"}"#)).await.unwrap();
        assert_eq!(&bytes[..], br#"{"url":"x"}"#);
    }

    #[tokio::test]
    async fn oversized_post_body_is_malformed() {
        let oversized = Body::from(vec![b' '; MAX_BODY_BYTES + 1]);
        let err = read_body(&Method::POST, oversized).await.unwrap_err();
        assert!(matches!(err, ApiError::MalformedInput));
    }

    #[test]
    fn other_methods_are_rejected() {
        for method in [Method::PUT, Method::DELETE, Method::PATCH, Method::HEAD, Method::OPTIONS] {
            let err = decode(&method, Some("url=x"), b"").unwrap_err();
            assert!(matches!(err, ApiError::MethodNotAllowed));
        }
    }
}
