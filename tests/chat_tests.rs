//! Integration tests for chat sessions.

use integrations_vertexai::fixtures::{load_fixture, load_stream_fixture};
use integrations_vertexai::mocks::MockHttpTransport;
use integrations_vertexai::observability::create_noop_stack;
use integrations_vertexai::streaming::IteratorState;
use integrations_vertexai::transport::TransportError;
use integrations_vertexai::types::{Content, Part, Role};
use integrations_vertexai::VertexClient;
use bytes::Bytes;
use pretty_assertions::assert_eq;
use secrecy::SecretString;
use serde_json::json;
use std::sync::Arc;

fn create_test_client(transport: Arc<MockHttpTransport>) -> VertexClient {
    let (logger, tracer) = create_noop_stack();
    VertexClient::builder()
        .project_id("my-project")
        .location("us-central1")
        .access_token(SecretString::new("test-token".into()))
        .transport(transport)
        .logger(logger)
        .tracer(tracer)
        .build()
        .unwrap()
}

fn text_body(texts: &[&str]) -> Vec<Bytes> {
    let chunks: Vec<_> = texts
        .iter()
        .map(|text| {
            json!({"candidates": [{"index": 0, "content": {"role": "model", "parts": [{"text": text}]}}]})
        })
        .collect();
    vec![Bytes::from(serde_json::Value::Array(chunks).to_string())]
}

#[tokio::test]
async fn test_send_message_records_both_turns() {
    // Arrange
    let transport = Arc::new(MockHttpTransport::new());
    transport.enqueue_streaming_response(load_stream_fixture("stream/sky.json", 64));
    let client = create_test_client(transport.clone());
    let mut chat = client.generative_model("gemini-pro").start_chat();

    // Act
    let reply = chat
        .send_message(vec![Part::text("What colour is the sky?")])
        .await
        .unwrap();

    // Assert
    assert_eq!(reply.text().as_deref(), Some("The sky is blue."));
    assert_eq!(
        chat.history(),
        vec![
            Content::user(vec![Part::text("What colour is the sky?")]),
            Content::model(vec![Part::text("The sky is blue.")]),
        ]
    );

    let body = transport.request_body(0).unwrap();
    assert_eq!(body["generationConfig"]["candidateCount"], json!(1));
    assert_eq!(body["contents"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_second_message_sends_full_history() {
    // Arrange
    let transport = Arc::new(MockHttpTransport::new());
    transport.enqueue_streaming_response(text_body(&["Blue.", " Mostly."]));
    transport.enqueue_streaming_response(text_body(&["Black, at night."]));
    let client = create_test_client(transport.clone());
    let mut chat = client.generative_model("gemini-pro").start_chat();

    // Act
    chat.send_message(vec![Part::text("Sky colour?")]).await.unwrap();
    let reply = chat
        .send_message(vec![Part::text("And at night?")])
        .await
        .unwrap();

    // Assert
    assert_eq!(reply.text().as_deref(), Some("Black, at night."));
    let roles: Vec<_> = chat.history().into_iter().map(|c| c.role).collect();
    assert_eq!(
        roles,
        vec![Some(Role::User), Some(Role::Model), Some(Role::User), Some(Role::Model)]
    );

    let body = transport.request_body(1).unwrap();
    assert_eq!(
        body["contents"],
        json!([
            {"role": "user", "parts": [{"text": "Sky colour?"}]},
            {"role": "model", "parts": [{"text": "Blue. Mostly."}]},
            {"role": "user", "parts": [{"text": "And at night?"}]}
        ])
    );
    assert_eq!(body["generationConfig"]["candidateCount"], json!(1));
}

#[tokio::test]
async fn test_streamed_reply_recorded_only_at_end() {
    // Arrange
    let transport = Arc::new(MockHttpTransport::new());
    transport.enqueue_streaming_response(load_stream_fixture("stream/sky.json", 7));
    let client = create_test_client(transport);
    let mut chat = client.generative_model("gemini-pro").start_chat();

    // Act
    let mut iterator = chat
        .send_message_stream(vec![Part::text("What colour is the sky?")])
        .await;
    let first = iterator.next().await.unwrap().unwrap();
    let mid_stream_len = chat.history().len();
    while iterator.next().await.unwrap().is_some() {}

    // Assert
    assert_eq!(first.text().as_deref(), Some("The sky"));
    assert_eq!(mid_stream_len, 1);
    assert_eq!(iterator.state(), IteratorState::Done);
    assert_eq!(chat.history().len(), 2);
    assert_eq!(chat.history()[1].text(), "The sky is blue.");
}

#[tokio::test]
async fn test_blocked_reply_leaves_no_model_turn() {
    // Arrange
    let transport = Arc::new(MockHttpTransport::new());
    transport.enqueue_streaming_response(vec![Bytes::from(load_fixture("stream/candidate_blocked.json"))]);
    let client = create_test_client(transport);
    let mut chat = client.generative_model("gemini-pro").start_chat();

    // Act
    let err = chat
        .send_message(vec![Part::text("something borderline")])
        .await
        .unwrap_err();

    // Assert
    assert!(err.is_blocked());
    assert_eq!(
        chat.history(),
        vec![Content::user(vec![Part::text("something borderline")])]
    );
}

#[tokio::test]
async fn test_failed_call_keeps_user_turn() {
    // Arrange
    let transport = Arc::new(MockHttpTransport::new());
    transport.enqueue_streaming_error(TransportError::Connection("refused".to_string()));
    transport.enqueue_streaming_response(text_body(&["Hello again."]));
    let client = create_test_client(transport.clone());
    let mut chat = client.generative_model("gemini-pro").start_chat();

    // Act
    let first = chat.send_message(vec![Part::text("Hello?")]).await;
    let second = chat.send_message(vec![Part::text("Hello?")]).await.unwrap();

    // Assert
    assert!(first.is_err());
    assert_eq!(second.text().as_deref(), Some("Hello again."));
    assert_eq!(chat.history().len(), 3);
    assert_eq!(
        transport.request_body(1).unwrap()["contents"].as_array().unwrap().len(),
        2
    );
}

#[tokio::test]
async fn test_abandoned_stream_leaves_no_model_turn() {
    // Arrange
    let transport = Arc::new(MockHttpTransport::new());
    transport.enqueue_streaming_response(load_stream_fixture("stream/sky.json", 4096));
    let client = create_test_client(transport);
    let mut chat = client.generative_model("gemini-pro").start_chat();

    // Act
    {
        let mut iterator = chat.send_message_stream(vec![Part::text("Hi")]).await;
        iterator.next().await.unwrap();
    }

    // Assert
    assert_eq!(chat.history().len(), 1);
}
