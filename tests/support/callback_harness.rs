use reqwest::StatusCode;
use serde_json::{Value, json};
use std::sync::Arc;
use std::time::Duration;
use streamgate::Config;
use streamgate::security::signature::{sign, verify};
use streamgate::security::{CryptoMaterial, EnvelopeCodec, ReplyPacket, ThreadRngTokenSource};
use streamgate::transport::run_gateway_with_listener;
use tempfile::TempDir;

pub const TOKEN: &str = "QDG6eK";
pub const ENCODING_KEY: &str = "jWmYm7qr5nMoAUwZRjGtBxmz3KA1tkAj3ykkR6q2B2C";
pub const TIMESTAMP: &str = "1409659813";
pub const NONCE: &str = "1372623149";
pub const BOT: &str = "bot-1";

pub struct GatewayTestServer {
    port: u16,
    handle: tokio::task::JoinHandle<anyhow::Result<()>>,
    _workspace: TempDir,
}

impl GatewayTestServer {
    pub async fn start(max_steps: u32) -> Self {
        Self::start_with(|config| config.engine.max_steps = max_steps).await
    }

    pub async fn start_with(configure: impl FnOnce(&mut Config)) -> Self {
        let workspace = TempDir::new().expect("temp workspace should be created");
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("ephemeral gateway listener should bind");
        let port = listener
            .local_addr()
            .expect("ephemeral gateway listener should expose local address")
            .port();

        let mut config = test_config(&workspace);
        configure(&mut config);

        let host = "127.0.0.1".to_string();
        let config = Arc::new(config);
        let handle =
            tokio::spawn(async move { run_gateway_with_listener(&host, listener, config).await });

        wait_until_gateway_ready(port).await;

        Self {
            port,
            handle,
            _workspace: workspace,
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("http://127.0.0.1:{}{path}", self.port)
    }

    /// Callback URL for `BOT` signed over `ciphertext`.
    pub fn callback_url(&self, ciphertext: &str) -> String {
        let signature = sign(TOKEN, TIMESTAMP, NONCE, ciphertext);
        self.url(&format!(
            "/callback/{BOT}?msg_signature={signature}&timestamp={TIMESTAMP}&nonce={NONCE}"
        ))
    }

    /// Encrypt `message` as the platform would and POST it.
    pub async fn post_message(&self, message: &Value) -> reqwest::Response {
        let ciphertext = platform_codec()
            .encrypt(&message.to_string(), "")
            .expect("platform side should encrypt");
        reqwest::Client::new()
            .post(self.callback_url(&ciphertext))
            .header("content-type", "application/json")
            .body(json!({ "encrypt": ciphertext }).to_string())
            .send()
            .await
            .expect("callback request should complete")
    }
}

impl Drop for GatewayTestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

pub fn test_config(workspace: &TempDir) -> Config {
    let mut config = Config::default();
    config.workspace_dir = workspace.path().to_path_buf();
    config.config_path = workspace.path().join("config.toml");
    config.token = TOKEN.to_string();
    config.encoding_aes_key = ENCODING_KEY.to_string();
    config
}

async fn wait_until_gateway_ready(port: u16) {
    let client = reqwest::Client::builder()
        .timeout(Duration::from_millis(200))
        .build()
        .expect("reqwest client should be built");

    for _ in 0..80 {
        let health = client
            .get(format!("http://127.0.0.1:{port}/health"))
            .send()
            .await;
        if matches!(health, Ok(resp) if resp.status() == StatusCode::OK) {
            return;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }

    panic!("gateway did not become ready on port {port}");
}

pub fn platform_codec() -> EnvelopeCodec {
    let material = CryptoMaterial::new(TOKEN, ENCODING_KEY, "").expect("fixture key is valid");
    EnvelopeCodec::new(Arc::new(material), Arc::new(ThreadRngTokenSource))
}

/// Percent-encode a base64 value for a query string.
pub fn encode_query_value(value: &str) -> String {
    value
        .replace('+', "%2B")
        .replace('/', "%2F")
        .replace('=', "%3D")
}

/// Verify and decrypt a callback reply; returns the `stream` object.
pub async fn open_reply(response: reqwest::Response) -> Value {
    assert_eq!(response.status(), StatusCode::OK);
    let body = response.text().await.expect("reply body should be text");
    let packet: ReplyPacket = serde_json::from_str(&body).expect("reply should be a packet");
    assert_eq!(packet.timestamp, TIMESTAMP);
    assert_eq!(packet.nonce, NONCE);
    assert!(
        verify(
            TOKEN,
            &packet.timestamp,
            &packet.nonce,
            &packet.encrypt,
            &packet.msgsignature
        ),
        "reply signature should verify"
    );
    let plain = platform_codec()
        .decrypt(&packet.encrypt)
        .expect("reply should decrypt");
    let value: Value = serde_json::from_str(&plain).expect("reply should be json");
    assert_eq!(value["msgtype"], "stream");
    value["stream"].clone()
}

pub fn text_message(content: &str) -> Value {
    json!({
        "msgid": "m-1",
        "aibotid": BOT,
        "chattype": "single",
        "from": {"userid": "zhangsan"},
        "msgtype": "text",
        "text": {"content": content}
    })
}

pub fn stream_poll(id: &str) -> Value {
    json!({"msgid": "m-2", "aibotid": BOT, "msgtype": "stream", "stream": {"id": id}})
}
