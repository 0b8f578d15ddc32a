use crate::callback_harness::{
    BOT, GatewayTestServer, NONCE, TIMESTAMP, TOKEN, encode_query_value, platform_codec,
};
use reqwest::StatusCode;
use streamgate::security::signature::sign;

fn verify_url(server: &GatewayTestServer, signature: &str, echostr: &str) -> String {
    server.url(&format!(
        "/callback/{BOT}?msg_signature={signature}&timestamp={TIMESTAMP}&nonce={NONCE}&echostr={}",
        encode_query_value(echostr)
    ))
}

#[tokio::test]
async fn handshake_returns_decrypted_echostr() {
    let server = GatewayTestServer::start(10).await;
    let echostr = platform_codec().encrypt("6150271186254735894", "").unwrap();
    let signature = sign(TOKEN, TIMESTAMP, NONCE, &echostr);

    let response = reqwest::get(verify_url(&server, &signature, &echostr))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.text().await.unwrap(), "6150271186254735894");
}

#[tokio::test]
async fn handshake_failure_is_still_200() {
    let server = GatewayTestServer::start(10).await;
    let echostr = platform_codec().encrypt("6150271186254735894", "").unwrap();
    let forged = sign("wrong-token", TIMESTAMP, NONCE, &echostr);

    let response = reqwest::get(verify_url(&server, &forged, &echostr))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.text().await.unwrap(), "verify fail");
}

#[tokio::test]
async fn handshake_without_echostr_fails_softly() {
    let server = GatewayTestServer::start(10).await;
    let url = server.url(&format!(
        "/callback/{BOT}?msg_signature=abc&timestamp={TIMESTAMP}&nonce={NONCE}"
    ));

    let response = reqwest::get(url).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.text().await.unwrap(), "verify fail");
}
