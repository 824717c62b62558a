use once_cell::sync::Lazy;
use regex::Regex;

static URL_WITH_CREDS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(https?://)[^:@\s/]+:[^@\s/]+@").expect("static regex"));

/// Long key-like runs (32+ chars of `[A-Za-z0-9_-]`), e.g. `gsk_...` API keys.
static POTENTIAL_KEY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[A-Za-z0-9_-]{32,}").expect("static regex"));

/// Strip credentials from provider/transport error text before it is logged
/// or returned to the client as a soft-failure message.
pub fn redact_error_message(message: &str) -> String {
    let redacted = URL_WITH_CREDS.replace_all(message, "$1[REDACTED]@");
    POTENTIAL_KEY
        .replace_all(&redacted, "[REDACTED_KEY]")
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn redacts_url_credentials() {
        let out = redact_error_message("error sending request for url (https://user:pw@api.example.com/v1)");
        assert_eq!(
            out,
            "error sending request for url (https://[REDACTED]@api.example.com/v1)"
        );
    }

    #[test]
    fn redacts_api_keys() {
        let out = redact_error_message("Invalid API Key: gsk_abcdefghijklmnopqrstuvwxyz0123456789");
        assert_eq!(out, "Invalid API Key: [REDACTED_KEY]");
    }

    #[test]
    fn keeps_ordinary_messages() {
        let msg = "Rate limit reached for model `llama-3.3-70b-versatile`";
        assert_eq!(redact_error_message(msg), msg);
    }
}
