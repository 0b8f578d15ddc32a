use crate::callback_harness::test_config;
use std::sync::Arc;
use streamgate::transport::{run_gateway, run_gateway_with_listener};
use tempfile::TempDir;

#[tokio::test]
async fn public_bind_is_refused_without_opt_in() {
    let workspace = TempDir::new().unwrap();
    let config = Arc::new(test_config(&workspace));

    let err = run_gateway("0.0.0.0", 0, config).await.unwrap_err();

    assert!(err.to_string().contains("Refusing to bind"));
}

#[tokio::test]
async fn invalid_key_stops_startup() {
    let workspace = TempDir::new().unwrap();
    let mut config = test_config(&workspace);
    config.encoding_aes_key = "dG9vLXNob3J0".into();
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();

    let err = run_gateway_with_listener("127.0.0.1", listener, Arc::new(config))
        .await
        .unwrap_err();

    assert!(format!("{err:#}").contains("encoding_aes_key"));
}

#[tokio::test]
async fn empty_token_stops_startup() {
    let workspace = TempDir::new().unwrap();
    let mut config = test_config(&workspace);
    config.token.clear();
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();

    let err = run_gateway_with_listener("127.0.0.1", listener, Arc::new(config))
        .await
        .unwrap_err();

    assert!(format!("{err:#}").contains("token"));
}
