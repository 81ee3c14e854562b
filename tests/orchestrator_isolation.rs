//! Orchestrator behaviour with in-process fakes: merging, partial failure and
//! per-provider isolation.

mod helpers;

use std::sync::atomic::Ordering;
use std::time::Duration;

use phish_detector::{AnalysisError, FetchError, Mode, Provider, ProviderError, Secrets, Verdict};
use serde_json::json;
use tokio::time::Instant;

use helpers::{both_keys, orchestrator, FakeFetcher, FakeProvider, Reply, PHISHING_JSON, SAFE_JSON};

const TIMEOUT: Duration = Duration::from_secs(5);

#[tokio::test]
async fn test_both_providers_succeed() {
    let orch = orchestrator(
        FakeFetcher::page("<html><form action=\"/login\"></form></html>"),
        FakeProvider::answering(Provider::Gemini, SAFE_JSON),
        FakeProvider::answering(Provider::ChatGpt, PHISHING_JSON),
        both_keys(),
        TIMEOUT,
    );

    let result = orch.analyze("https://example.com", Mode::Both).await.unwrap();

    assert_eq!(result.len(), 2);
    assert_eq!(result.get(Provider::Gemini).unwrap().verdict, Verdict::Safe);
    assert_eq!(result.get(Provider::ChatGpt).unwrap().verdict, Verdict::Phishing);

    let body = serde_json::to_value(&result).unwrap();
    let keys: Vec<&String> = body.as_object().unwrap().keys().collect();
    assert_eq!(keys, ["chatgpt", "gemini"]);
}

#[tokio::test]
async fn test_fenced_answer_yields_documented_response() {
    let orch = orchestrator(
        FakeFetcher::page("<html></html>"),
        FakeProvider::answering(Provider::Gemini, &format!("```json\n{SAFE_JSON}\n```")),
        FakeProvider::answering(Provider::ChatGpt, SAFE_JSON),
        both_keys(),
        TIMEOUT,
    );

    let result = orch.analyze("https://example.com", Mode::Gemini).await.unwrap();
    assert_eq!(
        serde_json::to_value(&result).unwrap(),
        json!({"gemini": {"verdict": "Safe", "reasoning": "No suspicious forms"}})
    );
}

#[tokio::test]
async fn test_fetch_failure_still_reaches_done() {
    let fetcher = FakeFetcher::failing(FetchError::Timeout(Duration::from_secs(10)));
    let gemini = FakeProvider::answering(Provider::Gemini, PHISHING_JSON);
    let orch = orchestrator(
        fetcher.clone(),
        gemini.clone(),
        FakeProvider::answering(Provider::ChatGpt, SAFE_JSON),
        both_keys(),
        TIMEOUT,
    );

    let result = orch.analyze("slow.example", Mode::Both).await.unwrap();

    assert_eq!(fetcher.calls.load(Ordering::SeqCst), 1);
    assert_eq!(result.len(), 2);
    assert!(result.verdicts().all(|v| v.is_success()));
    let prompt = &gemini.prompts.lock().unwrap()[0];
    assert!(prompt.user.contains("URL: https://slow.example/"));
    assert!(prompt.user.contains("could not be retrieved"));
}

#[tokio::test]
async fn test_timeout_in_one_provider_does_not_affect_the_other() {
    let provider_timeout = Duration::from_millis(300);
    let orch = orchestrator(
        FakeFetcher::page("<html></html>"),
        FakeProvider::new(Provider::Gemini, Reply::Hang),
        FakeProvider::answering(Provider::ChatGpt, PHISHING_JSON),
        both_keys(),
        provider_timeout,
    );

    let started = Instant::now();
    let result = orch.analyze("https://example.com", Mode::Both).await.unwrap();
    let elapsed = started.elapsed();

    assert!(elapsed >= provider_timeout, "returned before the timeout: {elapsed:?}");
    assert!(elapsed < Duration::from_secs(3), "took too long: {elapsed:?}");

    let gemini = result.get(Provider::Gemini).unwrap();
    assert_eq!(gemini.verdict, Verdict::Unknown);
    assert_eq!(gemini.error.as_ref().unwrap().kind, "timeout");

    let chatgpt = result.get(Provider::ChatGpt).unwrap();
    assert_eq!(chatgpt.verdict, Verdict::Phishing);
    assert!(chatgpt.error.is_none());
}

#[tokio::test]
async fn test_missing_key_is_scoped_to_its_slot() {
    let gemini = FakeProvider::answering(Provider::Gemini, SAFE_JSON);
    let orch = orchestrator(
        FakeFetcher::page(""),
        gemini.clone(),
        FakeProvider::answering(Provider::ChatGpt, SAFE_JSON),
        Secrets::new(None, Some("chatgpt-key".into())),
        TIMEOUT,
    );

    let result = orch.analyze("https://example.com", Mode::Both).await.unwrap();

    let slot = result.get(Provider::Gemini).unwrap();
    assert_eq!(slot.verdict, Verdict::Unknown);
    assert_eq!(slot.error.as_ref().unwrap().kind, "configuration");
    assert_eq!(gemini.call_count(), 0, "no call without a key");
    assert_eq!(result.get(Provider::ChatGpt).unwrap().verdict, Verdict::Safe);
}

#[tokio::test]
async fn test_no_key_for_selected_provider_fails_whole_request() {
    let fetcher = FakeFetcher::page("");
    let orch = orchestrator(
        fetcher.clone(),
        FakeProvider::answering(Provider::Gemini, SAFE_JSON),
        FakeProvider::answering(Provider::ChatGpt, SAFE_JSON),
        Secrets::new(None, Some("chatgpt-key".into())),
        TIMEOUT,
    );

    let err = orch.analyze("https://example.com", Mode::Gemini).await.unwrap_err();
    assert!(matches!(err, AnalysisError::Configuration(_)));
    assert_eq!(fetcher.calls.load(Ordering::SeqCst), 0, "nothing fetched");
}

#[tokio::test]
async fn test_validation_error_aborts_before_fetch() {
    let fetcher = FakeFetcher::page("");
    let orch = orchestrator(
        fetcher.clone(),
        FakeProvider::answering(Provider::Gemini, SAFE_JSON),
        FakeProvider::answering(Provider::ChatGpt, SAFE_JSON),
        both_keys(),
        TIMEOUT,
    );

    for bad in ["", "ftp://example.com", "http://"] {
        assert!(
            matches!(orch.analyze(bad, Mode::Both).await, Err(AnalysisError::Validation(_))),
            "{bad:?} should be rejected"
        );
    }
    assert_eq!(fetcher.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_provider_errors_keep_their_kind() {
    let orch = orchestrator(
        FakeFetcher::page(""),
        FakeProvider::new(
            Provider::Gemini,
            Reply::Error(ProviderError::RateLimited("HTTP 429: quota".into())),
        ),
        FakeProvider::new(
            Provider::ChatGpt,
            Reply::Error(ProviderError::Unauthorized("HTTP 401: bad key".into())),
        ),
        both_keys(),
        TIMEOUT,
    );

    let body = serde_json::to_value(orch.analyze("example.com", Mode::Both).await.unwrap()).unwrap();
    assert_eq!(body["gemini"]["verdict"], "Unknown");
    assert_eq!(body["gemini"]["error_kind"], "rate_limited");
    assert_eq!(body["chatgpt"]["error_kind"], "unauthorized");
    assert!(body["chatgpt"]["error"].as_str().unwrap().contains("bad key"));
}

#[tokio::test]
async fn test_unparseable_answer_is_unknown() {
    let orch = orchestrator(
        FakeFetcher::page(""),
        FakeProvider::answering(Provider::Gemini, "I think this site is fine."),
        FakeProvider::answering(Provider::ChatGpt, r#"{"verdict":"Suspicious"}"#),
        both_keys(),
        TIMEOUT,
    );

    let result = orch.analyze("example.com", Mode::Both).await.unwrap();
    assert_eq!(
        result.get(Provider::Gemini).unwrap().error.as_ref().unwrap().kind,
        "not_json"
    );
    assert_eq!(
        result.get(Provider::ChatGpt).unwrap().error.as_ref().unwrap().kind,
        "invalid_verdict_value"
    );
}

#[tokio::test]
async fn test_panicking_provider_becomes_unavailable() {
    let orch = orchestrator(
        FakeFetcher::page(""),
        FakeProvider::new(Provider::Gemini, Reply::Panic),
        FakeProvider::answering(Provider::ChatGpt, SAFE_JSON),
        both_keys(),
        TIMEOUT,
    );

    let result = orch.analyze("example.com", Mode::Both).await.unwrap();
    assert_eq!(
        result.get(Provider::Gemini).unwrap().error.as_ref().unwrap().kind,
        "unavailable"
    );
    assert_eq!(result.get(Provider::ChatGpt).unwrap().verdict, Verdict::Safe);
}
