use std::collections::HashMap;

use tracing::{debug, warn};

/// Upper bound on how much of a vendor error body is kept in an error message.
const MAX_BODY_CHARS: usize = 512;

/// Resolve a config file value. A value starting with '$' names an
/// environment variable; an unset or empty reference resolves to `None`.
pub fn resolve_credential(value: &str, env: &HashMap<String, String>) -> Option<String> {
    let Some(var_name) = value.strip_prefix('$') else {
        return Some(value.to_string());
    };
    match env.get(var_name).filter(|v| !v.trim().is_empty()) {
        Some(resolved) => {
            debug!(var = %var_name, "Resolved config value from environment");
            Some(resolved.clone())
        }
        None => {
            warn!(var = %var_name, "Config file references an unset environment variable");
            None
        }
    }
}

/// Value of the `X-ApiKeys` header the vendor API authenticates with.
pub fn api_keys_header(access_key: &str, secret_key: &str) -> String {
    format!("accessKey={}; secretKey={}", access_key, secret_key)
}

/// Redact sensitive values in a string. Replaces known credential values
/// with [REDACTED].
pub fn redact_credentials(text: &str, secrets: &[&str]) -> String {
    let mut result = text.to_string();
    for secret in secrets {
        if !secret.is_empty() && secret.len() >= 4 {
            result = result.replace(secret, "[REDACTED]");
        }
    }
    result
}

/// Prepare a remote error body for inclusion in an error: secrets removed,
/// whitespace collapsed, long bodies cut off.
pub fn sanitize_body(body: &str, secrets: &[&str]) -> String {
    let redacted = redact_credentials(body, secrets);
    let collapsed = redacted.split_whitespace().collect::<Vec<_>>().join(" ");
    if collapsed.chars().count() > MAX_BODY_CHARS {
        let cut: String = collapsed.chars().take(MAX_BODY_CHARS).collect();
        format!("{}...", cut)
    } else {
        collapsed
    }
}
