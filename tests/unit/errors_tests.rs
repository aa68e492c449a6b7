/*!
 * Tests for error types
 */

use subedit::errors::{ProviderError, SubtitleError, TranslationError};

/// Test error messages
#[test]
fn test_subtitle_error_display_shouldDescribeProblem() {
    assert_eq!(
        SubtitleError::format(7, "missing time line").to_string(),
        "Format error at line 7: missing time line"
    );
    assert_eq!(
        SubtitleError::TimeFormat("1:2:3".to_string()).to_string(),
        "Invalid timestamp '1:2:3': expected HH:MM:SS,mmm"
    );
    assert_eq!(SubtitleError::value("bad slice").to_string(), "Invalid value: bad slice");
}

/// Test conversions into translation errors
#[test]
fn test_translation_error_from_shouldWrapSources() {
    let provider = ProviderError::ApiError { status_code: 503, message: "busy".to_string() };
    let error: TranslationError = provider.into();
    assert!(matches!(error, TranslationError::Failure(ProviderError::ApiError { status_code: 503, .. })));

    let error: TranslationError = SubtitleError::value("bad").into();
    assert!(matches!(error, TranslationError::Subtitle(SubtitleError::Value(_))));
}

/// Test translation error messages
#[test]
fn test_translation_error_display_shouldIncludeCounts() {
    assert_eq!(
        TranslationError::Format { expected: 3, actual: 1 }.to_string(),
        "Translation format error: expected 3 lines, got 1"
    );
    assert_eq!(
        TranslationError::Cancelled { completed: 2, total: 5 }.to_string(),
        "Translation cancelled after 2 of 5 chunks"
    );
    assert_eq!(
        TranslationError::Timeout(45).to_string(),
        "Translation request timed out after 45 seconds"
    );
}

/// Test io conversion
#[test]
fn test_subtitle_error_fromIoError_shouldBeIo() {
    let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
    let error: SubtitleError = io.into();
    assert!(matches!(error, SubtitleError::Io(_)));
}

/// Test every provider failure maps to a translation failure
#[test]
fn test_provider_errors_withEveryVariant_shouldBecomeFailure() {
    let errors = vec![
        ProviderError::RequestFailed("dns".to_string()),
        ProviderError::ParseError("not json".to_string()),
        ProviderError::ApiError { status_code: 500, message: "boom".to_string() },
        ProviderError::ConnectionError("reset".to_string()),
        ProviderError::RateLimitExceeded("slow down".to_string()),
    ];

    for error in errors {
        let message = error.to_string();
        let translated: TranslationError = error.into();
        assert!(matches!(translated, TranslationError::Failure(_)));
        assert!(translated.to_string().ends_with(&message));
    }
}
