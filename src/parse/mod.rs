//! Provider response parsing.
//!
//! Two stages: locate a JSON object in the raw model text, then decode it
//! strictly and validate the `verdict` field.

mod extract;

use serde_json::{Map, Value};

use crate::config::{MAX_ERROR_BODY_CHARS, MAX_JSON_CANDIDATES};
use crate::error_handling::{truncate_for_message, ParseError};
use crate::models::Verdict;

use extract::{json_object_candidates, strip_trailing_commas};

/// A validated verdict extracted from model output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedVerdict {
    /// Always `Safe` or `Phishing`.
    pub verdict: Verdict,
    pub reasoning: String,
}

/// Parses a provider's raw text into a verdict.
///
/// Balanced JSON objects are tried in order. The first one carrying a
/// `verdict` key wins, including one nested inside a wrapper object; without
/// any, the first object that decodes is used. The `verdict` key is
/// looked up case-insensitively and its value must be "safe" or "phishing" in
/// any case; nothing else is accepted. A missing `reasoning` becomes an empty
/// string.
///
/// # Errors
///
/// * `ParseError::NotJson` if no JSON object can be decoded from `raw`
/// * `ParseError::MissingField("verdict")` if the object has no (or a null) verdict
/// * `ParseError::InvalidVerdictValue` for any other verdict value
pub fn parse_response(raw: &str) -> Result<ParsedVerdict, ParseError> {
    let object = select_object(raw)?;

    let verdict = match field(&object, "verdict") {
        None | Some(Value::Null) => return Err(ParseError::MissingField("verdict")),
        Some(Value::String(s)) => match s.trim().to_ascii_lowercase().as_str() {
            "safe" => Verdict::Safe,
            "phishing" => Verdict::Phishing,
            _ => return Err(ParseError::InvalidVerdictValue(format!("'{s}'"))),
        },
        Some(other) => return Err(ParseError::InvalidVerdictValue(other.to_string())),
    };

    let reasoning = match field(&object, "reasoning") {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.trim().to_string(),
        Some(other) => other.to_string(),
    };

    Ok(ParsedVerdict { verdict, reasoning })
}

fn select_object(raw: &str) -> Result<Map<String, Value>, ParseError> {
    let mut fallback = None;
    let mut searched_until = 0;
    let mut tried = 0;

    for (start, candidate) in json_object_candidates(raw) {
        // Objects nested in one that already decoded were searched with it.
        if start < searched_until {
            continue;
        }
        if tried == MAX_JSON_CANDIDATES {
            break;
        }
        tried += 1;

        let cleaned = strip_trailing_commas(candidate);
        if let Ok(Value::Object(map)) = serde_json::from_str::<Value>(&cleaned) {
            searched_until = start + candidate.len();
            if let Some(found) = find_verdict_object(&map) {
                return Ok(found.clone());
            }
            if fallback.is_none() {
                fallback = Some(map);
            }
        }
    }

    if let Some(map) = fallback {
        return Ok(map);
    }
    let trimmed = raw.trim();
    Err(ParseError::NotJson(if trimmed.is_empty() {
        "empty response".to_string()
    } else {
        truncate_for_message(trimmed, MAX_ERROR_BODY_CHARS)
    }))
}

/// `object` itself if it has a verdict key, else the first nested object that does.
fn find_verdict_object(object: &Map<String, Value>) -> Option<&Map<String, Value>> {
    if field(object, "verdict").is_some() {
        return Some(object);
    }
    object.values().find_map(find_verdict_in_value)
}

fn find_verdict_in_value(value: &Value) -> Option<&Map<String, Value>> {
    match value {
        Value::Object(inner) => find_verdict_object(inner),
        Value::Array(items) => items.iter().find_map(find_verdict_in_value),
        _ => None,
    }
}

fn field<'a>(object: &'a Map<String, Value>, name: &str) -> Option<&'a Value> {
    object.get(name).or_else(|| {
        object
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{Duration, Instant};

    fn parsed(verdict: Verdict, reasoning: &str) -> ParsedVerdict {
        ParsedVerdict {
            verdict,
            reasoning: reasoning.to_string(),
        }
    }

    #[test]
    fn test_bare_json() {
        assert_eq!(
            parse_response(r#"{"verdict":"Safe","reasoning":"No suspicious forms"}"#),
            Ok(parsed(Verdict::Safe, "No suspicious forms"))
        );
    }

    #[test]
    fn test_fenced_json_matches_bare_json() {
        let bare = r#"{"verdict":"Phishing","reasoning":"Fake login form"}"#;
        let fenced = format!("```json\n{bare}\n```");
        let prose = format!("After reviewing the page, my answer is:\n{bare}\nLet me know!");
        assert_eq!(parse_response(&fenced), parse_response(bare));
        assert_eq!(parse_response(&prose), parse_response(bare));
    }

    #[test]
    fn test_verdict_is_case_insensitive_and_trimmed() {
        assert_eq!(
            parse_response(r#"{"verdict":"  PHISHING ","reasoning":"x"}"#).unwrap().verdict,
            Verdict::Phishing
        );
        assert_eq!(
            parse_response(r#"{"Verdict":"safe","Reasoning":"ok"}"#),
            Ok(parsed(Verdict::Safe, "ok"))
        );
    }

    #[test]
    fn test_invalid_verdict_value_is_never_coerced() {
        for raw in [
            r#"{"verdict":"Suspicious","reasoning":"x"}"#,
            r#"{"verdict":"likely safe"}"#,
            r#"{"verdict":""}"#,
        ] {
            assert!(
                matches!(parse_response(raw), Err(ParseError::InvalidVerdictValue(_))),
                "{raw} should be rejected"
            );
        }
    }

    #[test]
    fn test_non_string_verdict() {
        assert_eq!(
            parse_response(r#"{"verdict": true}"#),
            Err(ParseError::InvalidVerdictValue("true".to_string()))
        );
        assert!(matches!(
            parse_response(r#"{"verdict": ["Safe"]}"#),
            Err(ParseError::InvalidVerdictValue(_))
        ));
    }

    #[test]
    fn test_missing_verdict() {
        assert_eq!(
            parse_response(r#"{"reasoning":"no verdict here"}"#),
            Err(ParseError::MissingField("verdict"))
        );
        assert_eq!(
            parse_response(r#"{"verdict": null}"#),
            Err(ParseError::MissingField("verdict"))
        );
    }

    #[test]
    fn test_missing_reasoning_defaults_to_empty() {
        assert_eq!(
            parse_response(r#"{"verdict":"Safe"}"#),
            Ok(parsed(Verdict::Safe, ""))
        );
    }

    #[test]
    fn test_trailing_commas_are_tolerated() {
        assert_eq!(
            parse_response("{\n  \"verdict\": \"Safe\",\n  \"reasoning\": \"fine\",\n}"),
            Ok(parsed(Verdict::Safe, "fine"))
        );
    }

    #[test]
    fn test_not_json() {
        assert!(matches!(
            parse_response("Verdict: Safe\nReasoning: looks fine"),
            Err(ParseError::NotJson(_))
        ));
        assert_eq!(
            parse_response("   "),
            Err(ParseError::NotJson("empty response".to_string()))
        );
    }

    #[test]
    fn test_skips_objects_that_do_not_decode() {
        let raw = r#"Template: {verdict: ...}. Answer: {"verdict": "Phishing", "reasoning": "r"}"#;
        assert_eq!(parse_response(raw), Ok(parsed(Verdict::Phishing, "r")));
    }

    #[test]
    fn test_prefers_object_with_verdict_over_earlier_one() {
        let raw = r#"The required format is {"type": "object"}. My answer: {"verdict": "Phishing", "reasoning": "spoofed bank"}"#;
        assert_eq!(parse_response(raw), Ok(parsed(Verdict::Phishing, "spoofed bank")));
    }

    #[test]
    fn test_finds_verdict_in_wrapper_object() {
        let raw = r#"{"analysis": {"verdict": "Safe", "reasoning": "r"}}"#;
        assert_eq!(parse_response(raw), Ok(parsed(Verdict::Safe, "r")));
        let raw = r#"{"results": [{"verdict": "Phishing"}]}"#;
        assert_eq!(parse_response(raw), Ok(parsed(Verdict::Phishing, "")));
    }

    #[test]
    fn test_object_without_verdict_still_reports_missing_field() {
        assert_eq!(
            parse_response(r#"{"type": "object"} and {"also": "nothing"}"#),
            Err(ParseError::MissingField("verdict"))
        );
    }

    #[test]
    fn test_brace_flood_parses_quickly() {
        let started = Instant::now();
        assert!(matches!(
            parse_response(&"{".repeat(100_000)),
            Err(ParseError::NotJson(_))
        ));
        let nested = format!("{}{}", "{".repeat(50_000), "}".repeat(50_000));
        assert!(matches!(parse_response(&nested), Err(ParseError::NotJson(_))));
        assert!(started.elapsed() < Duration::from_secs(2));
    }
}
