use std::pin::Pin;

use bytes::Bytes;
use futures::{Stream, StreamExt, stream};
use serde_json::Value;

use crate::{
    coerce,
    error::ProxyError,
    messages::{
        ASSISTANT_ROLE, CHAT_COMPLETION_CHUNK_OBJECT, ChatCompletionChunk, ChunkChoice, Delta, completion_id,
        unix_timestamp,
    },
};

/// Prefix of a relayable backend event line.
const DATA_PREFIX: &str = "data: ";

/// Sentinel some backends emit before closing their stream.
const DONE_SENTINEL: &str = "[DONE]";

/// Type alias for a stream of relayed completion chunks.
pub(crate) type ChunkStream = Pin<Box<dyn Stream<Item = Result<ChatCompletionChunk, ProxyError>> + Send>>;

/// Identity shared by every chunk of one relayed stream.
///
/// Computed once at stream start, so the identifier and creation timestamp
/// are identical across all chunks, terminal chunk included.
#[derive(Debug, Clone)]
pub(crate) struct StreamContext {
    id: String,
    created: i64,
    model: String,
}

impl StreamContext {
    pub(crate) fn new(model: impl Into<String>) -> Self {
        Self {
            id: completion_id(),
            created: unix_timestamp(),
            model: model.into(),
        }
    }

    fn content_chunk(&self, content: String) -> ChatCompletionChunk {
        ChatCompletionChunk {
            id: self.id.clone(),
            object: CHAT_COMPLETION_CHUNK_OBJECT,
            created: self.created,
            model: self.model.clone(),
            choices: vec![ChunkChoice {
                delta: Delta {
                    content: Some(content),
                    role: Some(ASSISTANT_ROLE),
                },
                finish_reason: None,
            }],
        }
    }

    fn terminal_chunk(&self) -> ChatCompletionChunk {
        ChatCompletionChunk {
            id: self.id.clone(),
            object: CHAT_COMPLETION_CHUNK_OBJECT,
            created: self.created,
            model: self.model.clone(),
            choices: vec![ChunkChoice {
                delta: Delta::default(),
                finish_reason: Some("stop"),
            }],
        }
    }

    /// A chunk for one complete backend line, if the line carries one.
    ///
    /// Lines without the `data: ` prefix, the `[DONE]` sentinel and frames
    /// that fail to parse are dropped without ending the relay.
    fn relay_line(&self, line: &str) -> Option<ChatCompletionChunk> {
        let data = line.trim().strip_prefix(DATA_PREFIX)?;

        if data == DONE_SENTINEL {
            return None;
        }

        let frame: Value = match sonic_rs::from_str(data) {
            Ok(frame) => frame,
            Err(e) => {
                log::warn!("Dropping unparsable stream frame: {e}");
                return None;
            }
        };

        Some(self.content_chunk(coerce::text_value(frame.get("content"))))
    }
}

/// Re-frame a backend event stream into completion chunks.
///
/// The backend body is consumed line by line. Exhaustion of the body appends
/// exactly one terminal chunk (empty delta, `finish_reason: "stop"`); a read
/// error ends the relay with a single error item instead. A trailing line
/// the backend never newline-terminated is dropped.
pub(crate) fn chunks<S, E>(body: S, context: StreamContext) -> ChunkStream
where
    S: Stream<Item = Result<Bytes, E>> + Send + Unpin + 'static,
    E: std::fmt::Display + Send + 'static,
{
    let relayed = stream::unfold(
        (body, Vec::<u8>::new(), false),
        move |(mut body, mut buffer, done)| {
            let context = context.clone();

            async move {
                if done {
                    return None;
                }

                loop {
                    match body.next().await {
                        Some(Ok(bytes)) => {
                            buffer.extend_from_slice(&bytes);

                            let mut chunks = Vec::new();

                            while let Some(pos) = buffer.iter().position(|&b| b == b'\n') {
                                let line: Vec<u8> = buffer.drain(..=pos).collect();

                                if let Some(chunk) = context.relay_line(&String::from_utf8_lossy(&line)) {
                                    chunks.push(Ok(chunk));
                                }
                            }

                            if chunks.is_empty() {
                                // Nothing relayable yet, read more of the body.
                                continue;
                            }

                            return Some((chunks, (body, buffer, false)));
                        }
                        Some(Err(e)) => {
                            log::error!("Backend stream read failed: {e}");

                            return Some((vec![Err(ProxyError::Stream(e.to_string()))], (body, buffer, true)));
                        }
                        None => {
                            return Some((vec![Ok(context.terminal_chunk())], (body, buffer, true)));
                        }
                    }
                }
            }
        },
    );

    Box::pin(relayed.flat_map(stream::iter))
}
