//! Rewrite backend tests

use std::sync::Arc;
use std::time::Duration;

use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::core::error::CheckError;
use crate::core::rewrite::{HuggingFaceRewriter, OllamaRewriter, RewriteGenerator, RewriteService};

const MODEL: &str = "vennify/t5-base-grammar-correction";

#[tokio::test]
async fn test_huggingface_generation() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(format!("/models/{MODEL}")))
        .and(header("Authorization", "Bearer hf_secret"))
        .and(body_partial_json(json!({
            "inputs": "I has a apple",
            "parameters": { "max_length": 128 },
        })))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([{ "generated_text": "I have an apple." }])),
        )
        .expect(1)
        .mount(&server)
        .await;

    let rewriter = HuggingFaceRewriter::with_base_url(
        &server.uri(),
        MODEL,
        Some("hf_secret".to_string()),
        Duration::from_secs(5),
    )
    .unwrap();

    let corrected = rewriter.generate("I has a apple", 128).await.unwrap();
    assert_eq!(corrected, "I have an apple.");
}

#[tokio::test]
async fn test_huggingface_empty_generation_list() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let rewriter =
        HuggingFaceRewriter::with_base_url(&server.uri(), MODEL, None, Duration::from_secs(5))
            .unwrap();

    let err = rewriter.generate("text", 64).await.unwrap_err();
    assert!(matches!(err, CheckError::ServiceUnavailable { .. }));
}

#[tokio::test]
async fn test_huggingface_model_loading_status() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(503).set_body_json(json!({ "error": "Model is currently loading" })),
        )
        .mount(&server)
        .await;

    let rewriter =
        HuggingFaceRewriter::with_base_url(&server.uri(), MODEL, None, Duration::from_secs(5))
            .unwrap();

    let err = rewriter.generate("text", 64).await.unwrap_err();
    assert!(err.to_string().contains("503"));
}

#[tokio::test]
async fn test_ollama_generation_through_generator() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/generate"))
        .and(body_partial_json(json!({
            "model": "llama3.2",
            "prompt": "I has a apple",
            "stream": false,
            "options": { "num_predict": 96 },
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "model": "llama3.2",
            "response": "\nI have an apple.\n",
            "done": true,
        })))
        .expect(1)
        .mount(&server)
        .await;

    let rewriter = OllamaRewriter::new(server.uri(), "llama3.2").unwrap();
    let generator = RewriteGenerator::new(Arc::new(rewriter), 96);

    assert_eq!(generator.rewrite("I has a apple").await.unwrap(), "I have an apple.");
}

#[tokio::test]
async fn test_ollama_unreachable() {
    // Nothing listens on the discard port
    let rewriter = OllamaRewriter::new("http://127.0.0.1:9", "llama3.2").unwrap();
    let err = rewriter.generate("text", 64).await.unwrap_err();
    assert!(matches!(err, CheckError::ServiceUnavailable { .. }));
}
