//! Mock design source and critique provider

use async_trait::async_trait;
use serde_json::Value;
use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::Mutex;

use uxlens_llm::{
    CompletionRequest, CompletionResponse, ContentBlock, LlmError, LlmProvider,
    ProviderCapabilities, ProviderInfo, StopReason, Usage,
};
use uxlens_orchestrator::domain::{DesignSource, DesignSourceError};

/// Design source serving one document and a fixed set of renders
pub struct MockDesignSource {
    pub document: Result<Value, DesignSourceError>,
    /// frame id -> image url; frames not listed fail to render
    pub renders: HashMap<String, String>,
    pub fetch_calls: AtomicUsize,
}

impl MockDesignSource {
    pub fn new(document: Value) -> Self {
        Self {
            document: Ok(document),
            renders: HashMap::new(),
            fetch_calls: AtomicUsize::new(0),
        }
    }

    pub fn failing(error: DesignSourceError) -> Self {
        Self {
            document: Err(error),
            renders: HashMap::new(),
            fetch_calls: AtomicUsize::new(0),
        }
    }

    pub fn with_render(mut self, frame_id: &str, url: &str) -> Self {
        self.renders.insert(frame_id.to_string(), url.to_string());
        self
    }

    /// Every listed frame renders to `https://images.example.com/{id}.png`
    pub fn rendering_all(mut self, frame_ids: &[&str]) -> Self {
        for id in frame_ids {
            self.renders
                .insert(id.to_string(), format!("https://images.example.com/{}.png", id));
        }
        self
    }
}

#[async_trait]
impl DesignSource for MockDesignSource {
    async fn fetch_document(
        &self,
        _file_key: &str,
        _node_id: Option<&str>,
    ) -> Result<Value, DesignSourceError> {
        self.fetch_calls.fetch_add(1, Ordering::SeqCst);
        self.document.clone()
    }

    async fn render_frame(&self, _file_key: &str, node_id: &str) -> Result<String, DesignSourceError> {
        self.renders
            .get(node_id)
            .cloned()
            .ok_or_else(|| DesignSourceError::NotRendered(node_id.to_string()))
    }
}

/// Critique provider answering from a script, one entry per call.
///
/// Once the script is used up every call gets `fallback`.
pub struct ScriptedLlmProvider {
    script: std::sync::Mutex<VecDeque<Result<String, LlmError>>>,
    fallback: String,
    pub captured_requests: Arc<Mutex<Vec<CompletionRequest>>>,
}

impl ScriptedLlmProvider {
    pub fn new(fallback: &str) -> Self {
        Self {
            script: std::sync::Mutex::new(VecDeque::new()),
            fallback: fallback.to_string(),
            captured_requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn then_text(self, text: &str) -> Self {
        self.push(Ok(text.to_string()))
    }

    pub fn then_error(self, error: LlmError) -> Self {
        self.push(Err(error))
    }

    fn push(self, entry: Result<String, LlmError>) -> Self {
        self.script.lock().unwrap().push_back(entry);
        self
    }
}

#[async_trait]
impl LlmProvider for ScriptedLlmProvider {
    fn info(&self) -> ProviderInfo {
        ProviderInfo {
            id: "scripted",
            name: "Scripted Provider",
            version: "test",
            capabilities: ProviderCapabilities::multimodal(8192, 2048),
        }
    }

    fn default_model(&self) -> &str {
        "test-model"
    }

    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, LlmError> {
        self.captured_requests.lock().await.push(request);

        let next = self.script.lock().unwrap().pop_front();
        let text = match next {
            Some(Ok(text)) => text,
            Some(Err(error)) => return Err(error),
            None => self.fallback.clone(),
        };

        Ok(CompletionResponse {
            id: "test-response-id".to_string(),
            model: "test-model".to_string(),
            content: vec![ContentBlock::text(text)],
            stop_reason: StopReason::EndTurn,
            usage: Usage {
                prompt_tokens: 100,
                completion_tokens: 50,
                total_tokens: 150,
            },
            created: Some(1234567890),
        })
    }
}
