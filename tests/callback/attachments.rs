use crate::callback_harness::{GatewayTestServer, open_reply};
use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// AES-256-CBC of `PLAIN` under the harness key, IV = key[..16], 32-byte padding.
const CIPHERTEXT_HEX: &str = "7f779084f6f126fcd656fcc68962394dcd93785bc84b3d59dd2c35c33ef1442d41f1427c5501139e535afa72ece67a32056c815c8a6b5c83280cd1fc4074e7c5";
const PLAIN: &[u8] = b"\x89PNG\r\n\x1a\nstreamgate attachment fixture";

fn image_message(url: &str) -> serde_json::Value {
    json!({"msgid": "m-3", "msgtype": "image", "image": {"url": url}})
}

#[tokio::test]
async fn image_is_downloaded_decrypted_and_echoed() {
    let files = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/media/1"))
        .respond_with(
            ResponseTemplate::new(200).set_body_bytes(hex::decode(CIPHERTEXT_HEX).unwrap()),
        )
        .expect(1)
        .mount(&files)
        .await;
    let server = GatewayTestServer::start(10).await;

    let stream = open_reply(
        server
            .post_message(&image_message(&format!("{}/media/1", files.uri())))
            .await,
    )
    .await;

    assert_eq!(stream["finish"], true);
    let item = &stream["msg_item"][0];
    assert_eq!(item["msgtype"], "image");
    assert_eq!(item["image"]["base64"], BASE64_STANDARD.encode(PLAIN));
    assert_eq!(item["image"]["md5"], "adcb8f09cd4e12bac3b1332bc8a42b40");
}

#[tokio::test]
async fn missing_image_gets_an_apology() {
    let files = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&files)
        .await;
    let server = GatewayTestServer::start(10).await;

    let stream = open_reply(
        server
            .post_message(&image_message(&format!("{}/media/gone", files.uri())))
            .await,
    )
    .await;

    assert_eq!(stream["finish"], true);
    assert_eq!(stream["content"], "Sorry, the image could not be processed.");
}

#[tokio::test]
async fn oversized_image_gets_an_apology() {
    let files = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(vec![0u8; 4096]))
        .mount(&files)
        .await;
    let server = GatewayTestServer::start_with(|config| config.attachments.max_bytes = 1024).await;

    let stream = open_reply(
        server
            .post_message(&image_message(&format!("{}/media/big", files.uri())))
            .await,
    )
    .await;

    assert_eq!(stream["content"], "Sorry, the image could not be processed.");
}
