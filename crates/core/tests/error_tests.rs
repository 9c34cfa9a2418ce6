// ═══════════════════════════════════════════════════════════════════
// Error Tests — CoreError variants, Display formatting, From impls
// ═══════════════════════════════════════════════════════════════════

use purchase_dashboard_core::errors::CoreError;
use purchase_dashboard_core::models::notice::{Notice, NoticeLevel};

// ── Display formatting ──────────────────────────────────────────────

mod display {
    use super::*;

    #[test]
    fn network() {
        let err = CoreError::Network("connection refused".into());
        assert_eq!(err.to_string(), "Network error: connection refused");
    }

    #[test]
    fn api() {
        let err = CoreError::Api {
            endpoint: "/purchases".into(),
            message: "HTTP 500: boom".into(),
        };
        assert_eq!(err.to_string(), "API error (/purchases): HTTP 500: boom");
    }

    #[test]
    fn deserialization() {
        let err = CoreError::Deserialization("expected value".into());
        assert_eq!(err.to_string(), "Deserialization error: expected value");
    }

    #[test]
    fn validation() {
        let err = CoreError::Validation("All fields are required".into());
        assert_eq!(err.to_string(), "Validation failed: All fields are required");
    }

    #[test]
    fn purchase_not_found() {
        let err = CoreError::PurchaseNotFound("abc123".into());
        assert_eq!(err.to_string(), "Purchase not found: abc123");
    }

    #[test]
    fn config() {
        let err = CoreError::Config("ticker_interval_secs must be at least 1".into());
        assert_eq!(
            err.to_string(),
            "Invalid configuration: ticker_interval_secs must be at least 1"
        );
    }

    #[test]
    fn unavailable() {
        assert_eq!(CoreError::Unavailable.to_string(), "Dashboard is no longer running");
    }
}

// ── Classification ──────────────────────────────────────────────────

mod classification {
    use super::*;

    #[test]
    fn only_validation_is_validation() {
        assert!(CoreError::Validation("x".into()).is_validation());
        assert!(!CoreError::Network("x".into()).is_validation());
        assert!(!CoreError::PurchaseNotFound("x".into()).is_validation());
        assert!(!CoreError::Unavailable.is_validation());
    }

    #[test]
    fn user_errors_become_warnings() {
        let notice = Notice::from_error(&CoreError::Validation("Invalid date".into()));
        assert_eq!(notice.level, NoticeLevel::Warning);
        assert_eq!(notice.message, "Validation failed: Invalid date");

        let notice = Notice::from_error(&CoreError::PurchaseNotFound("p9".into()));
        assert_eq!(notice.level, NoticeLevel::Warning);
    }

    #[test]
    fn backend_errors_become_danger() {
        let notice = Notice::from_error(&CoreError::Network("timeout".into()));
        assert_eq!(notice.level, NoticeLevel::Danger);

        let notice = Notice::from_error(&CoreError::Api {
            endpoint: "/markets".into(),
            message: "HTTP 502".into(),
        });
        assert_eq!(notice.level, NoticeLevel::Danger);
        assert_eq!(notice.message, "API error (/markets): HTTP 502");
    }
}

// ── From impls ──────────────────────────────────────────────────────

mod conversions {
    use super::*;

    #[test]
    fn from_serde_json_error() {
        let json_err = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        let err: CoreError = json_err.into();
        match err {
            CoreError::Deserialization(msg) => assert!(!msg.is_empty()),
            other => panic!("Expected Deserialization, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn from_closed_channel() {
        let (tx, rx) = tokio::sync::mpsc::unbounded_channel::<u32>();
        drop(rx);
        let err: CoreError = tx.send(1).unwrap_err().into();
        assert!(matches!(err, CoreError::Unavailable));
    }

    #[test]
    fn error_is_debug() {
        let err = CoreError::Unavailable;
        assert_eq!(format!("{:?}", err), "Unavailable");
    }
}
