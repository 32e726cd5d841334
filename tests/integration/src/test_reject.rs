//! Rejected request integration tests.

#[cfg(test)]
mod tests {
    use aksk_auth::{AuthConfig, Signer};
    use reqwest::header::{HeaderMap, HeaderValue};

    use crate::{signer, start_server, url};

    async fn assert_rejected(resp: reqwest::Response, message: &str) {
        assert_eq!(resp.status(), reqwest::StatusCode::UNAUTHORIZED);
        assert!(resp.headers().contains_key("x-request-id"));
        let json: serde_json::Value = resp.json().await.unwrap();
        assert_eq!(json, serde_json::json!({ "message": message }));
    }

    #[tokio::test]
    async fn test_should_reject_tampered_body() {
        let addr = start_server().await.unwrap();

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

        assert_rejected(resp, "request body is invalid").await;
    }

    #[tokio::test]
    async fn test_should_reject_unsigned_request() {
        let addr = start_server().await.unwrap();

        let resp = reqwest::Client::new()
            .get(url(addr, "/"))
            .send()
            .await
            .unwrap();

        assert_rejected(resp, "access key is empty").await;
    }

    #[tokio::test]
    async fn test_should_reject_unknown_access_key() {
        let addr = start_server().await.unwrap();

        let mut headers = HeaderMap::new();
        Signer::new(&AuthConfig::new(), "stranger", "secret")
            .unwrap()
            .sign_headers(b"")
            .unwrap()
            .apply(&mut headers);

        let resp = reqwest::Client::new()
            .get(url(addr, "/"))
            .headers(headers)
            .send()
            .await
            .unwrap();

        assert_rejected(resp, "access key is invalid").await;
    }

    #[tokio::test]
    async fn test_should_reject_forged_signature() {
        let addr = start_server().await.unwrap();

        let mut headers = HeaderMap::new();
        signer(&AuthConfig::new())
            .sign_headers(b"")
            .unwrap()
            .apply(&mut headers);
        headers.insert("x-auth-signature", HeaderValue::from_static("00ff00ff"));

        let resp = reqwest::Client::new()
            .get(url(addr, "/"))
            .headers(headers)
            .send()
            .await
            .unwrap();

        assert_rejected(resp, "request signature is invalid").await;
    }

    #[tokio::test]
    async fn test_should_reject_expired_timestamp() {
        let addr = start_server().await.unwrap();

        let mut headers = HeaderMap::new();
        signer(&AuthConfig::new())
            .sign_headers(b"")
            .unwrap()
            .apply(&mut headers);
        headers.insert("x-auth-timestamp", HeaderValue::from_static("1000000000"));

        let resp = reqwest::Client::new()
            .get(url(addr, "/"))
            .headers(headers)
            .send()
            .await
            .unwrap();

        assert_rejected(resp, "request timestamp has expired").await;
    }

    #[tokio::test]
    async fn test_should_reject_missing_signature() {
        let addr = start_server().await.unwrap();

        let mut headers = HeaderMap::new();
        signer(&AuthConfig::new())
            .sign_headers(b"")
            .unwrap()
            .apply(&mut headers);
        headers.remove("x-auth-signature");

        let resp = reqwest::Client::new()
            .get(url(addr, "/"))
            .headers(headers)
            .send()
            .await
            .unwrap();

        assert_rejected(resp, "request signature is missing").await;
    }
}
