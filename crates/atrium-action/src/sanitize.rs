//! Unconditional parameter sanitization.
//!
//! Runs on every dispatch, schema or no schema, validation outcome
//! regardless. Two layers:
//!
//! - **Key stripping**: `__proto__`, `constructor`, and `prototype`
//!   keys are removed from objects at every depth. Parameters cross a
//!   JS boundary in the hosting shell, where those keys are
//!   prototype-pollution vectors.
//! - **String scrubbing**: `<script>…</script>` blocks, `javascript:`
//!   URI prefixes, inline-handler patterns (`onclick=` etc.), and
//!   call-like `eval(` / `Function(` substrings are removed from every
//!   string value, at every depth.
//!
//! Numbers, booleans, and null pass through untouched. Handlers only
//! ever observe sanitized parameters.

use regex::Regex;
use serde_json::{Map, Value};
use std::sync::LazyLock;

/// Object keys stripped at every depth.
const DANGEROUS_KEYS: &[&str] = &["__proto__", "constructor", "prototype"];

static SCRIPT_BLOCK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<script\b[^>]*>.*?</script>").expect("hardcoded regex")
});
static JS_URI: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)javascript:").expect("hardcoded regex"));
static INLINE_HANDLER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bon\w+\s*=").expect("hardcoded regex"));
static CALL_LIKE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\b(?:eval|function)\s*\(").expect("hardcoded regex"));

/// Scrubs dangerous substrings out of one string value.
///
/// # Example
///
/// ```
/// use atrium_action::sanitize_string;
///
/// assert_eq!(sanitize_string("hi<script>alert(1)</script>!"), "hi!");
/// assert_eq!(sanitize_string("javascript:alert(1)"), "alert(1)");
/// ```
#[must_use]
pub fn sanitize_string(input: &str) -> String {
    let out = SCRIPT_BLOCK.replace_all(input, "");
    let out = JS_URI.replace_all(&out, "");
    let out = INLINE_HANDLER.replace_all(&out, "");
    let out = CALL_LIKE.replace_all(&out, "");
    out.into_owned()
}

/// Recursively sanitizes a parameter value.
///
/// Strips dangerous keys from objects, scrubs strings, recurses into
/// arrays and objects. Non-string scalars are returned unchanged.
///
/// # Example
///
/// ```
/// use atrium_action::sanitize_value;
/// use serde_json::json;
///
/// let clean = sanitize_value(json!({
///     "__proto__": {"polluted": true},
///     "name": "safe",
/// }));
/// assert_eq!(clean, json!({"name": "safe"}));
/// ```
#[must_use]
pub fn sanitize_value(value: Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut clean = Map::with_capacity(map.len());
            for (key, child) in map {
                if DANGEROUS_KEYS.contains(&key.as_str()) {
                    continue;
                }
                clean.insert(key, sanitize_value(child));
            }
            Value::Object(clean)
        }
        Value::Array(items) => Value::Array(items.into_iter().map(sanitize_value).collect()),
        Value::String(s) => Value::String(sanitize_string(&s)),
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn strips_proto_at_top_level() {
        let clean = sanitize_value(json!({"__proto__": 1, "ok": 2}));
        assert_eq!(clean, json!({"ok": 2}));
    }

    #[test]
    fn strips_dangerous_keys_at_any_depth() {
        let clean = sanitize_value(json!({
            "a": {"b": {"constructor": "x", "keep": 1}},
            "list": [{"prototype": true, "v": 2}],
        }));
        assert_eq!(clean, json!({"a": {"b": {"keep": 1}}, "list": [{"v": 2}]}));
    }

    #[test]
    fn scrubs_script_blocks() {
        assert_eq!(
            sanitize_string("before<script type=\"text/js\">evil()</script>after"),
            "beforeafter"
        );
        // Case-insensitive, spans newlines.
        assert_eq!(sanitize_string("<SCRIPT>\nevil()\n</SCRIPT>"), "");
    }

    #[test]
    fn scrubs_javascript_uri_prefix() {
        assert_eq!(sanitize_string("JavaScript:doThing()"), "doThing()");
    }

    #[test]
    fn scrubs_inline_handlers() {
        assert_eq!(sanitize_string("<img onerror=pwn() src=x>"), "<img pwn() src=x>");
        assert_eq!(sanitize_string("onclick = run"), " run");
    }

    #[test]
    fn scrubs_call_like_substrings() {
        assert_eq!(sanitize_string("eval(code)"), "code)");
        assert_eq!(sanitize_string("new Function(body)"), "new body)");
    }

    #[test]
    fn scalars_pass_through() {
        assert_eq!(sanitize_value(json!(42)), json!(42));
        assert_eq!(sanitize_value(json!(true)), json!(true));
        assert_eq!(sanitize_value(json!(null)), json!(null));
    }

    #[test]
    fn array_strings_are_scrubbed() {
        let clean = sanitize_value(json!(["ok", "javascript:evil()"]));
        assert_eq!(clean, json!(["ok", "evil()"]));
    }

    #[test]
    fn benign_text_is_untouched() {
        let text = "Open the file at ~/Documents/notes.txt (3 MB)";
        assert_eq!(sanitize_string(text), text);
    }
}
