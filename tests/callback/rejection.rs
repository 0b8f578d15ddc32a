use crate::callback_harness::{
    BOT, GatewayTestServer, NONCE, TIMESTAMP, platform_codec, text_message,
};
use reqwest::StatusCode;
use serde_json::json;

#[tokio::test]
async fn missing_query_parameters_are_rejected() {
    let server = GatewayTestServer::start(10).await;
    let url = server.url(&format!("/callback/{BOT}?timestamp={TIMESTAMP}&nonce={NONCE}"));

    let response = reqwest::Client::new()
        .post(url)
        .body(r#"{"encrypt":"AAAA"}"#)
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn tampered_ciphertext_fails_signature_check() {
    let server = GatewayTestServer::start(10).await;
    let ciphertext = platform_codec()
        .encrypt(&text_message("hello").to_string(), "")
        .unwrap();
    let url = server.callback_url(&ciphertext);
    let mut tampered = ciphertext.into_bytes();
    tampered[0] = if tampered[0] == b'A' { b'B' } else { b'A' };
    let tampered = String::from_utf8(tampered).unwrap();

    let response = reqwest::Client::new()
        .post(url)
        .body(json!({ "encrypt": tampered }).to_string())
        .send()
        .await
        .unwrap();

    assert!(response.status().is_client_error());
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn signed_garbage_is_a_generic_decrypt_failure() {
    let server = GatewayTestServer::start(10).await;
    let ciphertext = "bm90IGEgcmVhbCBlbnZlbG9wZQ==";

    let response = reqwest::Client::new()
        .post(server.callback_url(ciphertext))
        .body(json!({ "encrypt": ciphertext }).to_string())
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(response.text().await.unwrap(), "decryption failed");
}

#[tokio::test]
async fn oversized_body_is_rejected() {
    let server = GatewayTestServer::start(10).await;
    let ciphertext = "A".repeat(70_000);

    let response = reqwest::Client::new()
        .post(server.callback_url(&ciphertext))
        .body(ciphertext)
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
}

#[tokio::test]
async fn unsupported_type_is_acknowledged() {
    let server = GatewayTestServer::start(10).await;

    let response = server
        .post_message(&json!({"msgtype": "voice", "voice": {"url": "x"}}))
        .await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.text().await.unwrap(), "");
}
