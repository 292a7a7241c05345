use serde::Serialize;

/// Object tag of a buffered completion.
pub(crate) const CHAT_COMPLETION_OBJECT: &str = "chat.completion";

/// Object tag of a streamed completion chunk.
pub(crate) const CHAT_COMPLETION_CHUNK_OBJECT: &str = "chat.completion.chunk";

/// Role reported for all translated backend output.
pub(crate) const ASSISTANT_ROLE: &str = "assistant";

/// OpenAI-compatible chat completion response.
#[derive(Debug, Clone, Serialize)]
pub(crate) struct ChatCompletion {
    pub(crate) id: String,
    pub(crate) object: &'static str,
    pub(crate) created: i64,
    pub(crate) model: String,
    pub(crate) choices: Vec<ChatChoice>,
    pub(crate) usage: Usage,
}

/// Chat completion choice.
#[derive(Debug, Clone, Serialize)]
pub(crate) struct ChatChoice {
    pub(crate) message: ChatMessage,
    pub(crate) finish_reason: String,
    pub(crate) index: u32,
}

/// Chat message in OpenAI format.
#[derive(Debug, Clone, Serialize)]
pub(crate) struct ChatMessage {
    pub(crate) role: &'static str,
    pub(crate) content: String,
}

/// Token usage information.
#[derive(Debug, Clone, Serialize)]
pub(crate) struct Usage {
    pub(crate) prompt_tokens: u32,
    pub(crate) completion_tokens: u32,
    pub(crate) total_tokens: u32,
}

/// One incremental unit of a streamed completion.
#[derive(Debug, Clone, Serialize)]
pub(crate) struct ChatCompletionChunk {
    pub(crate) id: String,
    pub(crate) object: &'static str,
    pub(crate) created: i64,
    pub(crate) model: String,
    pub(crate) choices: Vec<ChunkChoice>,
}

/// Streamed completion choice.
#[derive(Debug, Clone, Serialize)]
pub(crate) struct ChunkChoice {
    pub(crate) delta: Delta,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) finish_reason: Option<&'static str>,
}

/// Incremental message content of one chunk.
#[derive(Debug, Clone, Default, Serialize)]
pub(crate) struct Delta {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) role: Option<&'static str>,
}

/// Completion identifier shared by a response or by every chunk of a stream.
pub(crate) fn completion_id() -> String {
    format!("chatcmpl-{}", uuid::Uuid::new_v4().simple())
}

/// Creation timestamp in seconds since the Unix epoch.
pub(crate) fn unix_timestamp() -> i64 {
    jiff::Timestamp::now().as_second()
}
