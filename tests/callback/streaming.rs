use crate::callback_harness::{GatewayTestServer, open_reply, stream_poll, text_message};

#[tokio::test]
async fn text_answer_streams_until_finished() {
    let max_steps = 4;
    let server = GatewayTestServer::start(max_steps).await;

    let first = open_reply(server.post_message(&text_message("hello")).await).await;
    let stream_id = first["id"].as_str().expect("stream id").to_string();
    assert_eq!(stream_id.len(), 10);
    assert!(stream_id.chars().all(|c| c.is_ascii_alphanumeric()));
    assert_eq!(first["finish"], false);
    assert_eq!(
        first["content"],
        "Received question: hello\nProcessing step 0: completed\n"
    );

    let mut last = first;
    for _ in 0..max_steps - 1 {
        assert_eq!(last["finish"], false);
        last = open_reply(server.post_message(&stream_poll(&stream_id)).await).await;
        assert_eq!(last["id"], stream_id.as_str());
    }
    assert_eq!(last["finish"], true);
    assert!(
        last["content"]
            .as_str()
            .unwrap()
            .ends_with("Processing step 3: completed\n")
    );

    // Polling past the end stays finished at the last step.
    let again = open_reply(server.post_message(&stream_poll(&stream_id)).await).await;
    assert_eq!(again["finish"], true);
    assert_eq!(again["content"], last["content"]);
}

#[tokio::test]
async fn concurrent_polls_do_not_lose_steps() {
    let server = GatewayTestServer::start(8).await;
    let first = open_reply(server.post_message(&text_message("race")).await).await;
    let stream_id = first["id"].as_str().unwrap().to_string();

    let poll = stream_poll(&stream_id);
    let responses = tokio::join!(
        server.post_message(&poll),
        server.post_message(&poll),
        server.post_message(&poll),
        server.post_message(&poll),
        server.post_message(&poll),
    );
    for response in [responses.0, responses.1, responses.2, responses.3, responses.4] {
        assert_eq!(response.status(), reqwest::StatusCode::OK);
    }

    // 1 (create) + 5 concurrent polls + this one.
    let latest = open_reply(server.post_message(&poll).await).await;
    assert_eq!(latest["content"].as_str().unwrap().lines().count(), 1 + 7);
    assert_eq!(latest["finish"], false);
}

#[tokio::test]
async fn unknown_stream_is_reported_expired() {
    let server = GatewayTestServer::start(10).await;
    let reply = open_reply(server.post_message(&stream_poll("Zz9Zz9Zz9Z")).await).await;

    assert_eq!(reply["id"], "Zz9Zz9Zz9Z");
    assert_eq!(reply["finish"], true);
    assert_eq!(reply["content"], "Task not found or expired.");
}

#[tokio::test]
async fn sqlite_store_serves_the_same_flow() {
    let server = GatewayTestServer::start_with(|config| {
        config.engine.store = "sqlite".into();
        config.engine.max_steps = 2;
    })
    .await;

    let first = open_reply(server.post_message(&text_message("persisted")).await).await;
    assert_eq!(first["finish"], false);
    let id = first["id"].as_str().unwrap().to_string();

    let second = open_reply(server.post_message(&stream_poll(&id)).await).await;
    assert_eq!(second["finish"], true);
}
