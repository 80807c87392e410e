use super::*;

fn make_response(content: serde_json::Value) -> String {
    serde_json::json!({
        "id": "msg_123",
        "type": "message",
        "role": "assistant",
        "content": content,
        "model": "claude-sonnet-4-20250514",
        "stop_reason": "end_turn",
        "usage": { "input_tokens": 100, "output_tokens": 50 }
    })
    .to_string()
}

#[test]
fn parse_text_response() {
    let json = make_response(serde_json::json!([
        { "type": "text", "text": "{\"pitch\":\"Hello\"}" }
    ]));
    let resp = parse_response(&json).unwrap();
    assert_eq!(resp.text, "{\"pitch\":\"Hello\"}");
    assert_eq!(resp.model, "claude-sonnet-4-20250514");
    assert_eq!(resp.stop_reason, "end_turn");
    assert_eq!(resp.input_tokens, 100);
    assert_eq!(resp.output_tokens, 50);
}

#[test]
fn parse_keeps_fence_for_the_adapter() {
    let json = make_response(serde_json::json!([
        { "type": "text", "text": "```json\n{}\n```" }
    ]));
    let resp = parse_response(&json).unwrap();
    assert_eq!(resp.text, "```json\n{}\n```");
}

#[test]
fn parse_skips_thinking_blocks() {
    let json = make_response(serde_json::json!([
        { "type": "thinking", "thinking": "Let me think..." },
        { "type": "text", "text": "Here is my answer" }
    ]));
    let resp = parse_response(&json).unwrap();
    assert_eq!(resp.text, "Here is my answer");
}

#[test]
fn parse_first_text_block_wins() {
    let json = make_response(serde_json::json!([
        { "type": "text", "text": "one" },
        { "type": "text", "text": "two" }
    ]));
    assert_eq!(parse_response(&json).unwrap().text, "one");
}

#[test]
fn parse_no_text_block_is_error() {
    let json = make_response(serde_json::json!([
        { "type": "thinking", "thinking": "..." }
    ]));
    assert!(matches!(parse_response(&json), Err(LlmError::ApiParse(_))));
}

#[test]
fn parse_empty_content_is_error() {
    let json = make_response(serde_json::json!([]));
    assert!(matches!(parse_response(&json), Err(LlmError::ApiParse(_))));
}

#[test]
fn parse_null_stop_reason_defaults() {
    let json = serde_json::json!({
        "content": [{ "type": "text", "text": "x" }],
        "model": "m",
        "stop_reason": null,
        "usage": { "input_tokens": 1, "output_tokens": 1 }
    })
    .to_string();
    assert_eq!(parse_response(&json).unwrap().stop_reason, "end_turn");
}

#[test]
fn parse_invalid_json() {
    let err = parse_response("not json").unwrap_err();
    assert!(matches!(err, LlmError::ApiParse(_)));
}

#[test]
fn request_body_places_system_and_user() {
    let messages = [ApiMessage { role: "user", content: "U" }];
    let body = ApiRequest { model: "m", max_tokens: 4096, system: "S", messages: &messages };
    let json = serde_json::to_value(&body).unwrap();
    assert_eq!(
        json,
        serde_json::json!({
            "model": "m",
            "max_tokens": 4096,
            "system": "S",
            "messages": [{ "role": "user", "content": "U" }]
        })
    );
}
