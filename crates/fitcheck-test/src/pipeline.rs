//! End-to-end tests of [`Assessor::assess`] over the mock provider.

use std::time::Duration;

use fitcheck_core::{
    Assessor, AssessorConfig, CancellationToken, ErrorKind, IntakeForm, Latency, Recommendation,
    UpstreamFailure,
};

use crate::{MockBehavior, MockCompletionProvider, mock_assessor};

const GOOD_FIT: &str = r#"{"recommendation":"Good Fit","reasoning":"Solid match.","considerations":["a"],"nextSteps":["b"]}"#;

fn form() -> IntakeForm {
    IntakeForm {
        use_case: Some("Customer Support Agent".to_owned()),
        scale: Some(500_000.0),
        latency: Some(Latency::Realtime),
        budget: Some("$2000".to_owned()),
        compliance: Some("SOC2".to_owned()),
    }
}

#[tokio::test]
async fn example_scenario_round_trips() -> anyhow::Result<()> {
    let mock = MockCompletionProvider::replying(GOOD_FIT);

    let result = mock_assessor(&mock)
        .assess(form(), &CancellationToken::new())
        .await?;

    assert_eq!(result.recommendation, Recommendation::GoodFit);
    assert_eq!(result.reasoning, "Solid match.");
    assert_eq!(result.considerations, ["a"]);
    assert_eq!(result.next_steps, ["b"]);

    let requests = mock.requests();
    assert_eq!(requests.len(), 1);
    assert!(requests[0].prompt.contains("500,000"));
    assert!(requests[0].prompt.contains("Real-time (<500ms)"));
    Ok(())
}

#[tokio::test]
async fn identical_inputs_give_identical_results() -> anyhow::Result<()> {
    let mock = MockCompletionProvider::replying(GOOD_FIT);
    let assessor = mock_assessor(&mock);
    let cancel = CancellationToken::new();

    let first = assessor.assess(form(), &cancel).await?;
    let second = assessor.assess(form(), &cancel).await?;
    assert_eq!(first, second);
    assert_eq!(mock.call_count(), 2);
    Ok(())
}

#[tokio::test]
async fn fractional_scale_is_grouped_in_prompt() -> anyhow::Result<()> {
    let mock = MockCompletionProvider::replying(GOOD_FIT);
    let form = IntakeForm {
        scale: Some(1.5e6),
        ..form()
    };

    mock_assessor(&mock)
        .assess(form, &CancellationToken::new())
        .await?;

    assert!(
        mock.last_prompt()
            .is_some_and(|prompt| prompt.contains("- Projected Scale: 1,500,000 requests/month"))
    );
    Ok(())
}

#[tokio::test]
async fn missing_credential_short_circuits() {
    let mock = MockCompletionProvider::replying(GOOD_FIT).without_credentials();

    let error = mock_assessor(&mock)
        .assess(IntakeForm::default(), &CancellationToken::new())
        .await
        .unwrap_err();

    assert_eq!(error.kind(), ErrorKind::Config);
    assert_eq!(mock.call_count(), 0);
}

#[tokio::test]
async fn invalid_form_never_calls_upstream() {
    let mock = MockCompletionProvider::replying(GOOD_FIT);
    let assessor = mock_assessor(&mock);

    for form in [
        IntakeForm {
            use_case: None,
            ..form()
        },
        IntakeForm {
            scale: None,
            ..form()
        },
        IntakeForm {
            scale: Some(f64::NAN),
            ..form()
        },
        IntakeForm {
            latency: None,
            ..form()
        },
    ] {
        let error = assessor
            .assess(form, &CancellationToken::new())
            .await
            .unwrap_err();
        assert_eq!(error.kind(), ErrorKind::Validation);
    }

    assert_eq!(mock.call_count(), 0);
}

#[tokio::test]
async fn prose_reply_uses_fallback() -> anyhow::Result<()> {
    let mock = MockCompletionProvider::replying("I'd need more details before I can assess this.");

    let result = mock_assessor(&mock)
        .assess(form(), &CancellationToken::new())
        .await?;

    assert_eq!(result.recommendation, Recommendation::PossibleFit);
    assert_eq!(
        result.reasoning,
        "I'd need more details before I can assess this...."
    );
    assert_eq!(result.considerations.len(), 4);
    assert_eq!(result.next_steps.len(), 3);
    Ok(())
}

#[tokio::test]
async fn missing_text_payload_is_recovered() -> anyhow::Result<()> {
    let mock = MockCompletionProvider::new(MockBehavior::NoText);

    let result = mock_assessor(&mock)
        .assess(form(), &CancellationToken::new())
        .await?;

    assert_eq!(result.reasoning, "...");
    assert_eq!(result.considerations.len(), 4);
    Ok(())
}

#[tokio::test]
async fn malformed_envelope_is_recovered() -> anyhow::Result<()> {
    let mock = MockCompletionProvider::new(MockBehavior::Error(ErrorKind::UpstreamFormat));

    let result = mock_assessor(&mock)
        .assess(form(), &CancellationToken::new())
        .await?;

    assert_eq!(result.recommendation, Recommendation::PossibleFit);
    assert_eq!(result.reasoning, "...");
    assert_eq!(result.next_steps.len(), 3);
    assert_eq!(mock.call_count(), 1);
    Ok(())
}

#[tokio::test]
async fn classified_errors_other_than_format_propagate() {
    for kind in [ErrorKind::Auth, ErrorKind::Unknown] {
        let mock = MockCompletionProvider::new(MockBehavior::Error(kind));

        let error = mock_assessor(&mock)
            .assess(form(), &CancellationToken::new())
            .await
            .unwrap_err();
        assert_eq!(error.kind(), kind);
    }
}

#[tokio::test]
async fn upstream_failures_are_classified() {
    let cases = [
        (401, "invalid x-api-key", ErrorKind::Auth),
        (429, "rate_limit_error", ErrorKind::RateLimit),
        (
            400,
            "Your credit balance is too low to access the Anthropic API.",
            ErrorKind::InsufficientCredits,
        ),
        (400, "messages: field required", ErrorKind::Unknown),
        (529, "Overloaded", ErrorKind::Unknown),
    ];

    for (status, message, expected) in cases {
        let mock =
            MockCompletionProvider::failing(UpstreamFailure::with_status(status).with_message(message));

        let error = mock_assessor(&mock)
            .assess(form(), &CancellationToken::new())
            .await
            .unwrap_err();
        assert_eq!(error.kind(), expected, "status {status}");
    }
}

#[tokio::test(start_paused = true)]
async fn budget_expiry_is_timeout() {
    let mock = MockCompletionProvider::new(MockBehavior::Hang);
    let assessor = Assessor::new(
        mock.service(),
        AssessorConfig::default().with_evaluation_timeout(60),
    );

    let started = tokio::time::Instant::now();
    let error = assessor
        .assess(form(), &CancellationToken::new())
        .await
        .unwrap_err();

    assert_eq!(error.kind(), ErrorKind::Timeout);
    assert!(started.elapsed() >= Duration::from_secs(60));
}
