use serde_json::Value;

use crate::{
    coerce,
    error::ProxyError,
    messages::{
        ASSISTANT_ROLE, CHAT_COMPLETION_OBJECT, ChatChoice, ChatCompletion, ChatMessage, Usage, completion_id,
        unix_timestamp,
    },
};

/// Translate a buffered backend reply into a chat completion.
///
/// The parse failure here is recoverable by contract: the caller relays the
/// backend's status and body verbatim instead of reporting an error.
pub(crate) fn completion(body: &str, model: &str) -> crate::Result<ChatCompletion> {
    let reply: Value =
        sonic_rs::from_str(body).map_err(|e| ProxyError::Internal(format!("failed to parse backend response: {e}")))?;

    let prompt_tokens = coerce::token_count(reply.get("prompt_tokens"));
    let completion_tokens = coerce::token_count(reply.get("completion_tokens"));

    Ok(ChatCompletion {
        id: completion_id(),
        object: CHAT_COMPLETION_OBJECT,
        created: unix_timestamp(),
        model: model.to_string(),
        choices: vec![ChatChoice {
            message: ChatMessage {
                role: ASSISTANT_ROLE,
                content: coerce::text_value(reply.get("content")),
            },
            finish_reason: coerce::text_value(reply.get("finish_reason")),
            index: 0,
        }],
        usage: Usage {
            prompt_tokens,
            completion_tokens,
            total_tokens: prompt_tokens.saturating_add(completion_tokens),
        },
    })
}

#[cfg(test)]
mod tests {
    use super::completion;

    #[test]
    fn maps_content_and_finish_reason() {
        let result = completion(r#"{"content": "hi", "finish_reason": "stop"}"#, "m").unwrap();

        assert_eq!(result.model, "m");
        assert_eq!(result.object, "chat.completion");
        assert_eq!(result.choices.len(), 1);
        assert_eq!(result.choices[0].message.role, "assistant");
        assert_eq!(result.choices[0].message.content, "hi");
        assert_eq!(result.choices[0].finish_reason, "stop");
        assert_eq!(result.choices[0].index, 0);
    }

    #[test]
    fn id_is_a_fresh_chatcmpl_identifier() {
        let result = completion(r#"{"content": "hi"}"#, "m").unwrap();

        let hex = result.id.strip_prefix("chatcmpl-").expect("missing prefix");
        assert_eq!(hex.len(), 32);
        assert!(hex.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }

    #[test]
    fn usage_is_copied_and_totalled() {
        let result = completion(r#"{"content": "x", "prompt_tokens": 3, "completion_tokens": 5}"#, "m").unwrap();

        assert_eq!(result.usage.prompt_tokens, 3);
        assert_eq!(result.usage.completion_tokens, 5);
        assert_eq!(result.usage.total_tokens, 8);
    }

    #[test]
    fn usage_defaults_to_zero() {
        let result = completion(r#"{"content": "x"}"#, "m").unwrap();

        assert_eq!(result.usage.prompt_tokens, 0);
        assert_eq!(result.usage.completion_tokens, 0);
        assert_eq!(result.usage.total_tokens, 0);
    }

    #[test]
    fn non_numeric_counts_coerce_to_zero() {
        let result = completion(
            r#"{"content": "x", "prompt_tokens": "a lot", "completion_tokens": 5}"#,
            "m",
        )
        .unwrap();

        assert_eq!(result.usage.prompt_tokens, 0);
        assert_eq!(result.usage.completion_tokens, 5);
        assert_eq!(result.usage.total_tokens, 5);
    }

    #[test]
    fn non_string_content_keeps_its_json_text() {
        let result = completion(r#"{"content": {"parts": [1, 2]}, "finish_reason": "stop"}"#, "m").unwrap();

        assert_eq!(result.choices[0].message.content, r#"{"parts":[1,2]}"#);
    }

    #[test]
    fn unparsable_body_is_an_internal_error() {
        let error = completion("not json at all", "m").unwrap_err();

        assert_eq!(error.error_type(), "internal_error");
    }
}
