//! Accepted request integration tests.

#[cfg(test)]
mod tests {
    use aksk_auth::{AuthConfig, EncodingKind, HashKind};
    use reqwest::header::HeaderMap;

    use crate::{ACCESS_KEY, signer, start_server, start_server_with, url};

    #[tokio::test]
    async fn test_should_accept_signed_json_post() {
        let addr = start_server().await.unwrap();
        let body = br#"{"param":"a"}"#;

        let mut headers = HeaderMap::new();
        signer(&AuthConfig::new())
            .sign_headers(body)
            .unwrap()
            .apply(&mut headers);

        let resp = reqwest::Client::new()
            .post(url(addr, "/api/test"))
            .headers(headers)
            .body(body.to_vec())
            .send()
            .await
            .unwrap();

        assert_eq!(resp.status(), reqwest::StatusCode::OK);
        assert!(resp.headers().contains_key("x-request-id"));
        let json: serde_json::Value = resp.json().await.unwrap();
        assert_eq!(json["accessKey"], ACCESS_KEY);
        assert_eq!(json["path"], "/api/test");
        assert_eq!(json["body"], r#"{"param":"a"}"#);
        assert_eq!(json["buffered"], true);
    }

    #[tokio::test]
    async fn test_should_accept_signed_get_without_body() {
        let addr = start_server().await.unwrap();

        let mut headers = HeaderMap::new();
        let signed = signer(&AuthConfig::new()).sign_headers(b"").unwrap();
        assert!(signed.body_hash().is_none());
        signed.apply(&mut headers);

        let resp = reqwest::Client::new()
            .get(url(addr, "/health"))
            .headers(headers)
            .send()
            .await
            .unwrap();

        assert_eq!(resp.status(), reqwest::StatusCode::OK);
    }

    #[tokio::test]
    async fn test_should_accept_with_alternative_algorithms() {
        let config = || {
            let config = AuthConfig::new();
            config
                .set_hash(Some(HashKind::Sha512.algorithm()))
                .unwrap();
            config
                .set_encoding(Some(EncodingKind::Base64.encoding()))
                .unwrap();
            config
        };
        let addr = start_server_with(config(), false).await.unwrap();
        let body = b"payload";

        let mut headers = HeaderMap::new();
        signer(&config())
            .sign_headers(body)
            .unwrap()
            .apply(&mut headers);

        let resp = reqwest::Client::new()
            .put(url(addr, "/upload"))
            .headers(headers)
            .body(body.to_vec())
            .send()
            .await
            .unwrap();

        assert_eq!(resp.status(), reqwest::StatusCode::OK);
    }

    #[tokio::test]
    async fn test_should_accept_changed_body_when_skipping_body_check() {
        let addr = start_server_with(AuthConfig::new(), true).await.unwrap();

        let mut headers = HeaderMap::new();
        signer(&AuthConfig::new())
            .sign_headers(br#"{"param":"a"}"#)
            .unwrap()
            .apply(&mut headers);

        let resp = reqwest::Client::new()
            .post(url(addr, "/api/test"))
            .headers(headers)
            .body(r#"{"param":"b"}"#)
            .send()
            .await
            .unwrap();

        assert_eq!(resp.status(), reqwest::StatusCode::OK);
        let json: serde_json::Value = resp.json().await.unwrap();
        assert_eq!(json["body"], r#"{"param":"b"}"#);
        assert_eq!(json["buffered"], false);
    }
}
