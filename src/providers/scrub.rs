use crate::error::LlmError;

const MAX_API_ERROR_CHARS: usize = 200;
const REDACTED: &str = "[REDACTED]";

/// Key prefixes for the supported providers.
const KEY_PREFIXES: [&str; 3] = ["sk-ant-", "sk-proj-", "sk-"];

/// Header, query and JSON markers that precede a credential.
const CREDENTIAL_MARKERS: [&str; 7] = [
    "x-api-key: ",
    "Authorization: Bearer ",
    "authorization: bearer ",
    "\"authorization\":\"Bearer ",
    "api_key=",
    "\"api_key\":\"",
    "\"token\":\"",
];

fn is_key_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.' | ':' | '+' | '/' | '=')
}

/// Replace each `marker<token>` occurrence with the redaction marker.
fn redact_after(text: &mut String, marker: &str) {
    let mut from = 0;
    while let Some(rel) = text[from..].find(marker) {
        let start = from + rel;
        let value_start = start + marker.len();
        let value_len: usize = text[value_start..]
            .chars()
            .take_while(|&c| is_key_char(c))
            .map(char::len_utf8)
            .sum();
        if value_len == 0 {
            from = value_start;
            continue;
        }
        text.replace_range(start..value_start + value_len, REDACTED);
        from = start + REDACTED.len();
    }
}

/// Redact API keys and bearer tokens from provider error text.
pub fn scrub_secrets(input: &str) -> String {
    let mut text = input.to_string();
    for prefix in KEY_PREFIXES {
        redact_after(&mut text, prefix);
    }
    for marker in CREDENTIAL_MARKERS {
        redact_after(&mut text, marker);
    }
    text
}

/// Scrub secrets, then cap the length for logs and error messages.
pub fn sanitize_api_error(input: &str) -> String {
    let scrubbed = scrub_secrets(input);
    if scrubbed.chars().count() <= MAX_API_ERROR_CHARS {
        return scrubbed;
    }
    let kept: String = scrubbed.chars().take(MAX_API_ERROR_CHARS).collect();
    format!("{kept}...")
}

/// Turn a non-success HTTP response into a sanitized request error.
pub async fn api_error(provider: &str, response: reqwest::Response) -> LlmError {
    let status = response.status();
    let body = response
        .text()
        .await
        .unwrap_or_else(|_| "<failed to read provider error body>".to_string());
    LlmError::Request {
        provider: provider.to_string(),
        message: format!("API error ({status}): {}", sanitize_api_error(&body)),
    }
}

/// Transport-level failures can echo request URLs; scrub them too.
pub fn transport_error(provider: &str, err: &reqwest::Error) -> LlmError {
    LlmError::Request {
        provider: provider.to_string(),
        message: sanitize_api_error(&err.to_string()),
    }
}
