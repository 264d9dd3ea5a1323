mod common;

use common::{azure_config, openai_config, MockLlmServer};
use sensor_rca_lib::domain::error::AppError;
use sensor_rca_lib::domain::llm_config::LLMProvider;
use sensor_rca_lib::infrastructure::llm_clients::azure::AzureOpenAIClient;
use sensor_rca_lib::infrastructure::llm_clients::openai::OpenAIClient;
use sensor_rca_lib::infrastructure::llm_clients::{LLMClient, RouterClient};
use serde_json::json;

#[tokio::test(flavor = "multi_thread")]
async fn openai_request_uses_bearer_auth_and_model() {
    let server = MockLlmServer::start().await;
    server.reply_content("<html>report</html>");

    let config = openai_config(&server.base_url);
    let content = OpenAIClient::new()
        .generate(&config, "You are a scientist.", "Write the report.")
        .await
        .unwrap();
    assert_eq!(content, "<html>report</html>");

    let requests = server.requests();
    assert_eq!(requests.len(), 1);
    let request = &requests[0];
    assert_eq!(request.path, "/v1/chat/completions");
    assert_eq!(
        request.headers.get("authorization").map(String::as_str),
        Some("Bearer sk-test")
    );
    assert_eq!(request.body["model"], "gpt-4o-mini");
    assert_eq!(request.body["messages"][0]["role"], "system");
    assert_eq!(request.body["messages"][1]["content"], "Write the report.");
    assert!(request.body.get("tools").is_none());
    assert!(request.body.get("tool_choice").is_none());

    server.stop().await;
}

#[tokio::test(flavor = "multi_thread")]
async fn local_provider_sends_no_authorization() {
    let server = MockLlmServer::start().await;
    server.reply_content("ok");

    let mut config = openai_config(&server.base_url);
    config.provider = LLMProvider::Local;
    // what `SENSOR_RCA_LLM__API_KEY=` in a .env file yields
    config.api_key = Some(String::new());
    RouterClient::new()
        .generate(&config, "system", "user")
        .await
        .unwrap();

    let requests = server.requests();
    assert!(!requests[0].headers.contains_key("authorization"));

    server.stop().await;
}

#[tokio::test(flavor = "multi_thread")]
async fn azure_request_targets_deployment() {
    let server = MockLlmServer::start().await;
    server.reply_content("done");

    let config = azure_config(&server.base_url);
    let content = AzureOpenAIClient::new()
        .generate(&config, "system", "user")
        .await
        .unwrap();
    assert_eq!(content, "done");

    let request = &server.requests()[0];
    assert_eq!(
        request.path,
        "/openai/deployments/rca-deployment/chat/completions"
    );
    assert_eq!(request.query, "api-version=2024-02-01");
    assert_eq!(
        request.headers.get("api-key").map(String::as_str),
        Some("azure-test-key")
    );
    assert!(!request.headers.contains_key("authorization"));
    assert!(request.body.get("model").is_none());

    server.stop().await;
}

#[tokio::test(flavor = "multi_thread")]
async fn router_dispatches_azure_provider() {
    let server = MockLlmServer::start().await;
    server.reply_content("routed");

    let config = azure_config(&server.base_url);
    RouterClient::new()
        .generate(&config, "system", "user")
        .await
        .unwrap();

    assert!(server.requests()[0].path.starts_with("/openai/deployments/"));

    server.stop().await;
}

#[tokio::test(flavor = "multi_thread")]
async fn unauthorized_reply_is_provider_error() {
    let server = MockLlmServer::start().await;
    server.reply(401, json!({ "error": { "message": "invalid api key" } }));

    let config = openai_config(&server.base_url);
    let err = OpenAIClient::new()
        .generate(&config, "system", "user")
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::LLMError(ref msg) if msg.contains("401")));
    assert_eq!(err.exit_code(), 4);

    server.stop().await;
}

#[tokio::test(flavor = "multi_thread")]
async fn reply_without_choices_is_provider_error() {
    let server = MockLlmServer::start().await;
    server.reply(200, json!({ "choices": [] }));

    let config = openai_config(&server.base_url);
    let err = OpenAIClient::new()
        .generate(&config, "system", "user")
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::LLMError(_)));

    server.stop().await;
}
