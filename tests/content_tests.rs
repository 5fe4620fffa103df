//! Integration tests for content generation through the client facade.

use integrations_vertexai::fixtures::{load_fixture, load_stream_fixture};
use integrations_vertexai::mocks::MockHttpTransport;
use integrations_vertexai::observability::create_noop_stack;
use integrations_vertexai::streaming::IteratorState;
use integrations_vertexai::transport::{HttpMethod, TransportError};
use integrations_vertexai::types::{
    Blob, FinishReason, HarmBlockThreshold, HarmCategory, Part, SafetySetting,
};
use integrations_vertexai::{
    NetworkError, RequestError, ResourceError, VertexClient, VertexError,
};
use bytes::Bytes;
use pretty_assertions::assert_eq;
use secrecy::SecretString;
use serde_json::json;
use std::sync::Arc;

const STREAM_URL: &str =
    "https://us-central1-aiplatform.googleapis.com/v1beta1/projects/my-project/locations/us-central1/publishers/google/models/gemini-pro:streamGenerateContent";

/// Helper to create a client over a mock transport.
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

#[tokio::test]
async fn test_generate_content_merges_stream() {
    // Arrange
    let transport = Arc::new(MockHttpTransport::new());
    transport.enqueue_streaming_response(load_stream_fixture("stream/sky.json", 16));
    let client = create_test_client(transport.clone());

    // Act
    let response = client
        .generative_model("gemini-pro")
        .generate_content(vec![Part::text("What colour is the sky?")])
        .await
        .unwrap();

    // Assert
    assert_eq!(response.candidates.len(), 1);
    assert_eq!(response.text().as_deref(), Some("The sky is blue."));
    assert_eq!(response.candidates[0].finish_reason, FinishReason::Stop);

    transport.verify_request_count(1);
    let request = transport.last_request().unwrap();
    assert_eq!(request.method, HttpMethod::Post);
    assert_eq!(request.url, STREAM_URL);
    transport.verify_header(0, "Authorization", "Bearer test-token");
    transport.verify_header(0, "Content-Type", "application/json");
}

#[tokio::test]
async fn test_request_body_shape() {
    // Arrange
    let transport = Arc::new(MockHttpTransport::new());
    transport.enqueue_streaming_response(load_stream_fixture("stream/sky.json", 4096));
    let client = create_test_client(transport.clone());
    let mut model = client.generative_model("gemini-pro");
    model.generation_config.temperature = Some(0.5);
    model.safety_settings.push(SafetySetting {
        category: HarmCategory::DangerousContent,
        threshold: HarmBlockThreshold::BlockOnlyHigh,
    });

    // Act
    model
        .generate_content(vec![
            Part::text("Describe this"),
            Part::Blob(Blob {
                mime_type: "image/png".to_string(),
                data: vec![0x89, 0x50, 0x4e, 0x47],
            }),
        ])
        .await
        .unwrap();

    // Assert
    let body = transport.request_body(0).unwrap();
    assert_eq!(
        body,
        json!({
            "contents": [{
                "role": "user",
                "parts": [
                    {"text": "Describe this"},
                    {"inlineData": {"mimeType": "image/png", "data": "iVBORw=="}}
                ]
            }],
            "safetySettings": [{
                "category": "HARM_CATEGORY_DANGEROUS_CONTENT",
                "threshold": "BLOCK_ONLY_HIGH"
            }],
            "generationConfig": {
                "temperature": 0.5,
                "topK": 3,
                "maxOutputTokens": 2048
            }
        })
    );
}

#[tokio::test]
async fn test_generate_content_stream_yields_each_chunk() {
    // Arrange
    let transport = Arc::new(MockHttpTransport::new());
    transport.enqueue_streaming_response(load_stream_fixture("stream/sky.json", 5));
    let client = create_test_client(transport.clone());

    // Act
    let mut iterator = client
        .generative_model("gemini-pro")
        .generate_content_stream(vec![Part::text("What colour is the sky?")])
        .await;
    let mut texts = Vec::new();
    while let Some(chunk) = iterator.next().await.unwrap() {
        texts.push(chunk.text().unwrap());
    }

    // Assert
    assert_eq!(texts, vec!["The sky", " is", " blue."]);
    assert_eq!(iterator.state(), IteratorState::Done);
    assert!(iterator.next().await.unwrap().is_none());
    assert_eq!(iterator.merged().unwrap().text().as_deref(), Some("The sky is blue."));
    transport.verify_request_count(1);
}

#[tokio::test]
async fn test_prompt_blocked() {
    // Arrange
    let transport = Arc::new(MockHttpTransport::new());
    transport.enqueue_streaming_response(vec![Bytes::from(load_fixture("stream/prompt_blocked.json"))]);
    let client = create_test_client(transport);

    // Act
    let err = client
        .generative_model("gemini-pro")
        .generate_content(vec![Part::text("something unsafe")])
        .await
        .unwrap_err();

    // Assert
    let blocked = err.as_blocked().unwrap();
    assert!(blocked.candidate.is_none());
    assert!(err.to_string().starts_with("blocked: prompt: SAFETY"));
}

#[tokio::test]
async fn test_candidate_blocked() {
    // Arrange
    let transport = Arc::new(MockHttpTransport::new());
    transport.enqueue_streaming_response(vec![Bytes::from(load_fixture("stream/candidate_blocked.json"))]);
    let client = create_test_client(transport);

    // Act
    let err = client
        .generative_model("gemini-pro")
        .generate_content(vec![Part::text("something borderline")])
        .await
        .unwrap_err();

    // Assert
    let candidate = err.as_blocked().unwrap().candidate.as_ref().unwrap();
    assert_eq!(candidate.finish_reason, FinishReason::Safety);
    assert!(candidate.safety_ratings[0].blocked);
}

#[tokio::test]
async fn test_model_not_found() {
    // Arrange
    let transport = Arc::new(MockHttpTransport::new());
    transport.enqueue_streaming_error(TransportError::Status {
        status: 404,
        body: Bytes::from(load_fixture("errors/not_found.json")),
    });
    let client = create_test_client(transport);

    // Act
    let mut iterator = client
        .generative_model("gemini-nope")
        .generate_content_stream(vec![Part::text("Hello")])
        .await;

    // Assert
    assert_eq!(iterator.state(), IteratorState::Failed);
    match iterator.next().await.unwrap_err() {
        VertexError::Resource(ResourceError::ModelNotFound { model }) => {
            assert_eq!(
                model,
                "projects/my-project/locations/us-central1/publishers/google/models/gemini-nope"
            );
        }
        other => panic!("unexpected error: {:?}", other),
    }
}

#[tokio::test]
async fn test_cancellation_surfaces_as_failure() {
    // Arrange
    let transport = Arc::new(MockHttpTransport::new());
    transport.enqueue_streaming_items(vec![
        Ok(Bytes::from(r#"[{"candidates":[{"index":0,"content":{"parts":[{"text":"partial"}]}}]}"#)),
        Err(TransportError::Cancelled),
    ]);
    let client = create_test_client(transport.clone());

    // Act
    let result = client
        .generative_model("gemini-pro")
        .generate_content(vec![Part::text("Hello")])
        .await;

    // Assert
    assert!(matches!(
        result,
        Err(VertexError::Network(NetworkError::Cancelled))
    ));
    transport.verify_request_count(1);
}

#[tokio::test]
async fn test_invalid_config_rejected_before_io() {
    // Arrange
    let transport = Arc::new(MockHttpTransport::new());
    let client = create_test_client(transport.clone());
    let mut model = client.generative_model("gemini-pro");
    model.generation_config.top_p = Some(1.5);

    // Act
    let err = model
        .generate_content(vec![Part::text("Hello")])
        .await
        .unwrap_err();

    // Assert
    match err {
        VertexError::Request(RequestError::ValidationError { details, .. }) => {
            assert_eq!(details.len(), 1);
            assert_eq!(details[0].field, "generation_config.top_p");
        }
        other => panic!("unexpected error: {:?}", other),
    }
    transport.verify_request_count(0);
}

#[tokio::test]
async fn test_count_tokens() {
    // Arrange
    let transport = Arc::new(MockHttpTransport::new());
    transport.enqueue_json_response(200, &load_fixture("count_tokens/success.json"));
    let client = create_test_client(transport.clone());

    // Act
    let response = client
        .generative_model("gemini-pro")
        .count_tokens(vec![Part::text("How many tokens is this?")])
        .await
        .unwrap();

    // Assert
    assert_eq!(response.total_tokens, 7);
    assert_eq!(response.total_billable_characters, 28);
    transport.verify_request(0, HttpMethod::Post, "models/gemini-pro:countTokens");
    assert_eq!(
        transport.request_body(0).unwrap(),
        json!({"contents": [{"role": "user", "parts": [{"text": "How many tokens is this?"}]}]})
    );
}

#[tokio::test]
async fn test_concurrent_calls_are_independent() {
    // Arrange
    let transport = Arc::new(MockHttpTransport::new());
    transport.enqueue_streaming_response(load_stream_fixture("stream/sky.json", 32));
    transport.enqueue_streaming_response(load_stream_fixture("stream/sky.json", 32));
    let client = Arc::new(create_test_client(transport.clone()));

    // Act
    let handles: Vec<_> = (0..2)
        .map(|_| {
            let client = Arc::clone(&client);
            tokio::spawn(async move {
                client
                    .generative_model("gemini-pro")
                    .generate_content(vec![Part::text("What colour is the sky?")])
                    .await
            })
        })
        .collect();

    // Assert
    for handle in handles {
        let response = handle.await.unwrap().unwrap();
        assert_eq!(response.text().as_deref(), Some("The sky is blue."));
    }
    transport.verify_request_count(2);
}
