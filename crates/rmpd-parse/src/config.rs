// Portlet configuration embedded in a <script> assignment.
//
// The blob is a JavaScript object literal, not JSON: unquoted keys, single
// quoted strings and `\xHH` escapes. It is rewritten into JSON on a
// best-effort basis; anything unexpected means "no configuration".

use regex::{Captures, Regex};
use rmpd_model::ConfigBlock;
use scraper::{Html, Selector};
use serde_json::Value;

/// Marker identifying the configuration script.
pub const CONFIG_ID: &str = "pl_gov_mf_sent_Sent.rmpd406PortletConfig";

/// Presentation-only keys dropped from the exposed configuration.
pub const CONFIG_DENYLIST: [&str; 3] = ["poiBlueImgSrc", "polandMapImgSrc", "language"];

/// Extract the portlet configuration, if the page carries a usable one.
///
/// Failure is expected on some pages and only logged at debug level.
pub fn extract_config(document: &Html) -> Option<ConfigBlock> {
    let script_sel = Selector::parse("script").expect("valid selector");
    let Some(script) = document
        .select(&script_sel)
        .map(|s| s.text().collect::<String>())
        .find(|text| text.contains(CONFIG_ID))
    else {
        tracing::debug!(marker = CONFIG_ID, "Configuration script not found");
        return None;
    };

    let Some(fragment) = assignment_value(&script) else {
        tracing::debug!("Configuration script has no assignment");
        return None;
    };

    let json = relaxed_to_json(fragment);
    let mut config = match serde_json::from_str::<Value>(&json) {
        Ok(Value::Object(map)) => map,
        Ok(other) => {
            tracing::debug!(kind = json_kind(&other), "Configuration is not an object");
            return None;
        }
        Err(e) => {
            tracing::debug!(error = %e, "Configuration is not parseable");
            return None;
        }
    };

    for key in CONFIG_DENYLIST {
        config.remove(key);
    }

    tracing::debug!(keys = config.len(), "Extracted configuration");
    Some(config)
}

/// Right-hand side of the first `= ` assignment, without the trailing `;`.
fn assignment_value(script: &str) -> Option<&str> {
    let (_, value) = script.split_once("= ")?;
    let value = value.trim().trim_end_matches(';').trim();
    (!value.is_empty()).then_some(value)
}

/// Rewrite a JavaScript object literal into JSON text.
fn relaxed_to_json(literal: &str) -> String {
    let key_re = Regex::new(r"([{,]\s*)([A-Za-z_$][A-Za-z0-9_$]*)\s*:").expect("valid regex");
    let quoted_keys = key_re.replace_all(literal, r#"$1"$2":"#);
    let double_quoted = quoted_keys.replace('\'', "\"");
    decode_escapes(&double_quoted)
}

/// Decode `\xHH` and `\uXXXX` escapes into literal characters.
///
/// Characters that would break the surrounding JSON string (quotes,
/// backslashes, control characters) are re-emitted as JSON `\u` escapes.
/// Other escape sequences pass through untouched.
fn decode_escapes(text: &str) -> String {
    let escape_re =
        Regex::new(r"(?s)\\(?:x([0-9A-Fa-f]{2})|u([0-9A-Fa-f]{4})|.)").expect("valid regex");

    escape_re
        .replace_all(text, |caps: &Captures| {
            let code = caps
                .get(1)
                .or_else(|| caps.get(2))
                .and_then(|hex| u32::from_str_radix(hex.as_str(), 16).ok());
            match code.and_then(char::from_u32) {
                Some(c) if c == '"' || c == '\\' || c.is_control() => {
                    format!("\\u{:04x}", c as u32)
                }
                Some(c) => c.to_string(),
                None => caps[0].to_string(),
            }
        })
        .into_owned()
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(script: &str) -> Html {
        Html::parse_document(&format!(
            "<html><head><script>var unrelated = 1;</script><script>{script}</script></head><body></body></html>"
        ))
    }

    #[test]
    fn test_extracts_relaxed_object() {
        let html = page(
            r#"pl_gov_mf_sent_Sent.rmpd406PortletConfig = {
                mapUrl: 'https\x3a\x2f\x2fmaps\x2eexample\x2epl',
                refreshInterval: 30,
                showMap: true,
                poiBlueImgSrc: '/img/poi-blue.png',
                polandMapImgSrc: '/img/poland.svg',
                language: 'en_GB'
            };"#,
        );
        let config = extract_config(&html).unwrap();

        assert_eq!(config["mapUrl"], "https://maps.example.pl");
        assert_eq!(config["refreshInterval"], 30);
        assert_eq!(config["showMap"], true);
        for key in CONFIG_DENYLIST {
            assert!(!config.contains_key(key), "{key} should be dropped");
        }
    }

    #[test]
    fn test_missing_denylisted_keys_tolerated() {
        let html = page("pl_gov_mf_sent_Sent.rmpd406PortletConfig = {zoom: 6};");
        let config = extract_config(&html).unwrap();
        assert_eq!(config.len(), 1);
        assert_eq!(config["zoom"], 6);
    }

    #[test]
    fn test_truncated_fragment_is_none() {
        let html = page("pl_gov_mf_sent_Sent.rmpd406PortletConfig = {zoom: 6, mapUrl: 'http");
        assert_eq!(extract_config(&html), None);
    }

    #[test]
    fn test_no_script_is_none() {
        let html = page("var somethingElse = {a: 1};");
        assert_eq!(extract_config(&html), None);
    }

    #[test]
    fn test_non_object_is_none() {
        let html = page("pl_gov_mf_sent_Sent.rmpd406PortletConfig = [1, 2];");
        assert_eq!(extract_config(&html), None);
    }

    #[test]
    fn test_key_quoting_leaves_values_alone() {
        assert_eq!(
            relaxed_to_json("{a: 'x', b_2 :1, 'c': 2}"),
            r#"{"a": "x", "b_2":1, "c": 2}"#
        );
    }

    #[test]
    fn test_decode_escapes() {
        assert_eq!(decode_escapes(r"a\x2ebą"), "a.bą");
        // quote decoded from hex stays escaped for JSON
        assert_eq!(decode_escapes(r"\x22"), r"\u0022");
        // escaped backslash is not mistaken for an escape prefix
        assert_eq!(decode_escapes(r"\\x41"), r"\\x41");
        assert_eq!(decode_escapes(r"line\nbreak"), r"line\nbreak");
    }
}
