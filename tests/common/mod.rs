//! Chat Completions stand-in for integration tests. Replies are served in
//! the order they are queued and every request is recorded.

#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use actix_web::dev::ServerHandle;
use actix_web::{web, App, HttpRequest, HttpResponse, HttpServer};
use serde_json::{json, Value};

use sensor_rca_lib::domain::analysis_config::DataPaths;
use sensor_rca_lib::domain::llm_config::{LLMConfig, LLMProvider};

#[derive(Debug, Clone)]
pub struct CapturedRequest {
    pub path: String,
    pub query: String,
    pub headers: HashMap<String, String>,
    pub body: Value,
}

#[derive(Default)]
struct MockState {
    replies: Mutex<VecDeque<(u16, Value)>>,
    requests: Mutex<Vec<CapturedRequest>>,
}

pub struct MockLlmServer {
    pub base_url: String,
    state: Arc<MockState>,
    handle: ServerHandle,
}

impl MockLlmServer {
    pub async fn start() -> Self {
        let state = Arc::new(MockState::default());
        let server_state = state.clone();
        let server = HttpServer::new(move || {
            App::new()
                .app_data(web::Data::new(server_state.clone()))
                .default_service(web::route().to(handle_request))
        })
        .workers(1)
        .bind(("127.0.0.1", 0))
        .expect("bind mock server");
        let addr = server.addrs()[0];
        let server = server.run();

        let handle = server.handle();
        tokio::spawn(server);

        Self {
            base_url: format!("http://{}", addr),
            state,
            handle,
        }
    }

    /// Queue a successful completion whose message is `content`.
    pub fn reply_content(&self, content: &str) {
        self.reply(
            200,
            json!({
                "id": "chatcmpl-test",
                "object": "chat.completion",
                "choices": [{
                    "index": 0,
                    "message": { "role": "assistant", "content": content },
                    "finish_reason": "stop"
                }]
            }),
        );
    }

    /// Queue a completion asking for the given `(id, function, arguments)` calls.
    pub fn reply_tool_calls(&self, calls: &[(&str, &str, &str)]) {
        let tool_calls: Vec<Value> = calls
            .iter()
            .map(|(id, name, arguments)| {
                json!({
                    "id": id,
                    "type": "function",
                    "function": { "name": name, "arguments": arguments }
                })
            })
            .collect();
        self.reply(
            200,
            json!({
                "choices": [{
                    "index": 0,
                    "message": { "role": "assistant", "content": null, "tool_calls": tool_calls },
                    "finish_reason": "tool_calls"
                }]
            }),
        );
    }

    pub fn reply(&self, status: u16, body: Value) {
        self.state.replies.lock().unwrap().push_back((status, body));
    }

    pub fn requests(&self) -> Vec<CapturedRequest> {
        self.state.requests.lock().unwrap().clone()
    }

    pub async fn stop(self) {
        self.handle.stop(false).await;
    }
}

async fn handle_request(
    req: HttpRequest,
    body: web::Bytes,
    data: web::Data<Arc<MockState>>,
) -> HttpResponse {
    let headers = req
        .headers()
        .iter()
        .map(|(name, value)| {
            (
                name.as_str().to_string(),
                value.to_str().unwrap_or_default().to_string(),
            )
        })
        .collect();
    data.requests.lock().unwrap().push(CapturedRequest {
        path: req.path().to_string(),
        query: req.query_string().to_string(),
        headers,
        body: serde_json::from_slice(&body).unwrap_or(Value::Null),
    });

    let reply = data.replies.lock().unwrap().pop_front();
    match reply {
        Some((status, body)) => HttpResponse::build(
            actix_web::http::StatusCode::from_u16(status).expect("valid status"),
        )
        .json(body),
        None => HttpResponse::InternalServerError()
            .json(json!({ "error": { "message": "no reply queued" } })),
    }
}

/// The sample CSV exports shipped in `data/`.
pub fn sample_data() -> DataPaths {
    DataPaths {
        dir: PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("data"),
        ..Default::default()
    }
}

pub fn openai_config(base_url: &str) -> LLMConfig {
    LLMConfig {
        provider: LLMProvider::OpenAI,
        base_url: format!("{}/v1", base_url),
        model: "gpt-4o-mini".to_string(),
        api_key: Some("sk-test".to_string()),
        timeout_secs: 10,
        ..Default::default()
    }
}

pub fn azure_config(base_url: &str) -> LLMConfig {
    LLMConfig {
        provider: LLMProvider::AzureOpenAI,
        base_url: base_url.to_string(),
        model: "rca-deployment".to_string(),
        api_key: Some("azure-test-key".to_string()),
        timeout_secs: 10,
        ..Default::default()
    }
}

pub const REPORT_HTML: &str = "<html><body><table>\
<tr><td>Subject</td><td>pH Low ROA: Low Temperature</td></tr>\
<tr><td>Root cause analysis</td><td>The pH values are lower than the threshold due to the low temperature.</td></tr>\
<tr><td>Suggested Actions</td><td>Increase treatment Tr2.</td></tr>\
</table></body></html>";
