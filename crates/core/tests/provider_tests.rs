// ═══════════════════════════════════════════════════════════════════
// Provider Tests — RestBackend construction and routing, trait objects
// ═══════════════════════════════════════════════════════════════════

use reqwest::StatusCode;
use std::sync::Arc;

use purchase_dashboard_core::errors::CoreError;
use purchase_dashboard_core::models::mutation::{MutationKind, MutationOutcome};
use purchase_dashboard_core::models::purchase::PurchaseId;
use purchase_dashboard_core::models::ticker::TickerSnapshot;
use purchase_dashboard_core::models::settings::{MarketMode, Settings};
use purchase_dashboard_core::providers::rest::RestBackend;
use purchase_dashboard_core::providers::traits::DashboardBackend;

fn settings(url: &str, mode: MarketMode) -> Settings {
    Settings {
        api_base_url: url.to_string(),
        market_mode: mode,
        ..Settings::default()
    }
}

mod construction {
    use super::*;

    #[test]
    fn from_default_settings() {
        let backend = RestBackend::new(&Settings::default()).unwrap();
        assert_eq!(backend.base_url(), "http://localhost:5000");
        assert_eq!(backend.name(), "REST");
    }

    #[test]
    fn trailing_slash_trimmed() {
        let backend = RestBackend::new(&settings(" https://api.example.com/ ", MarketMode::Single)).unwrap();
        assert_eq!(backend.base_url(), "https://api.example.com");
        assert_eq!(backend.endpoint("/purchases"), "https://api.example.com/purchases");
    }

    #[test]
    fn rejects_invalid_settings() {
        let result = RestBackend::new(&settings("ftp://example.com", MarketMode::Single));
        assert!(matches!(result, Err(CoreError::Config(_))));

        let zero_timeout = Settings {
            request_timeout_secs: 0,
            ..Settings::default()
        };
        assert!(matches!(RestBackend::new(&zero_timeout), Err(CoreError::Config(_))));
    }
}

mod routing {
    use super::*;

    #[test]
    fn single_market_ticker_path() {
        let backend = RestBackend::new(&settings("http://localhost:5000", MarketMode::Single)).unwrap();
        assert_eq!(backend.ticker_path("BTC-USD"), "/bitcoin");
        assert_eq!(backend.ticker_path("ETH-USD"), "/bitcoin");
    }

    #[test]
    fn multi_market_ticker_path() {
        let backend = RestBackend::new(&settings("http://localhost:5000", MarketMode::Multi)).unwrap();
        assert_eq!(backend.ticker_path("ETH-USD"), "/ticker/ETH-USD");
        assert_eq!(
            backend.endpoint(&backend.ticker_path("ETH-USD")),
            "http://localhost:5000/ticker/ETH-USD"
        );
    }

    #[test]
    fn purchase_path() {
        let id = PurchaseId::new("65a1f0c2e4b0a1b2c3d4e5f6");
        assert_eq!(RestBackend::purchase_path(&id), "/purchase/65a1f0c2e4b0a1b2c3d4e5f6");
    }
}

mod trait_compliance {
    use super::*;

    #[test]
    fn usable_as_shared_trait_object() {
        let backend: Arc<dyn DashboardBackend> =
            Arc::new(RestBackend::new(&Settings::default()).unwrap());
        assert_eq!(backend.name(), "REST");
    }

    #[test]
    fn is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<RestBackend>();
    }
}

mod responses {
    use super::*;

    #[test]
    fn invalid_on_bad_request_is_an_outcome() {
        let outcome = RestBackend::mutation_outcome(
            MutationKind::Create,
            "/purchase",
            StatusCode::BAD_REQUEST,
            r#"{"invalid": true}"#,
        );
        assert_eq!(outcome.unwrap(), MutationOutcome::Invalid);
    }

    #[test]
    fn success_flags_on_ok() {
        let applied = RestBackend::mutation_outcome(
            MutationKind::Update,
            "/purchase/1",
            StatusCode::OK,
            r#"{"success": true}"#,
        );
        assert_eq!(applied.unwrap(), MutationOutcome::Applied);

        let unchanged = RestBackend::mutation_outcome(
            MutationKind::Delete,
            "/purchase/1",
            StatusCode::OK,
            r#"{"success": false}"#,
        );
        assert_eq!(unchanged.unwrap(), MutationOutcome::Unchanged);
    }

    #[test]
    fn server_error_body_is_api_error() {
        let result = RestBackend::mutation_outcome(
            MutationKind::Update,
            "/purchase/1",
            StatusCode::INTERNAL_SERVER_ERROR,
            r#"{"error": true}"#,
        );
        match result {
            Err(CoreError::Api { endpoint, message }) => {
                assert_eq!(endpoint, "/purchase/1");
                assert!(message.starts_with("HTTP 500"));
            }
            other => panic!("Expected Api error, got {:?}", other),
        }
    }

    #[test]
    fn success_flag_with_error_status_is_api_error() {
        let result = RestBackend::mutation_outcome(
            MutationKind::Update,
            "/purchase/1",
            StatusCode::BAD_GATEWAY,
            r#"{"success": true}"#,
        );
        assert!(matches!(result, Err(CoreError::Api { .. })));
    }

    #[test]
    fn non_json_error_page_is_api_error() {
        let result = RestBackend::mutation_outcome(
            MutationKind::Delete,
            "/purchase/1",
            StatusCode::NOT_FOUND,
            "<html>Not Found</html>",
        );
        match result {
            Err(CoreError::Api { message, .. }) => {
                assert_eq!(message, "HTTP 404 Not Found: <html>Not Found</html>");
            }
            other => panic!("Expected Api error, got {:?}", other),
        }
    }

    #[test]
    fn non_json_success_is_parse_error() {
        let result = RestBackend::mutation_outcome(
            MutationKind::Create,
            "/purchase",
            StatusCode::OK,
            "ok",
        );
        match result {
            Err(CoreError::Api { message, .. }) => {
                assert!(message.starts_with("Failed to parse response"));
            }
            other => panic!("Expected Api error, got {:?}", other),
        }
    }

    #[test]
    fn error_body_is_truncated() {
        let body = "x".repeat(500);
        let result = RestBackend::mutation_outcome(
            MutationKind::Delete,
            "/purchase/1",
            StatusCode::SERVICE_UNAVAILABLE,
            &body,
        );
        match result {
            Err(CoreError::Api { message, .. }) => {
                assert_eq!(message.len(), "HTTP 503 Service Unavailable: ".len() + 200);
            }
            other => panic!("Expected Api error, got {:?}", other),
        }
    }

    #[test]
    fn decode_ticker_body() {
        let ticker: TickerSnapshot = RestBackend::decode_body(
            "/bitcoin",
            StatusCode::OK,
            r#"{"symbol":"BTC-USD","bidRate":"1","askRate":"2","lastTradeRate":"1.5"}"#,
        )
        .unwrap();
        assert_eq!(ticker.last, 1.5);
    }

    #[test]
    fn decode_error_status() {
        let result: Result<Vec<String>, CoreError> =
            RestBackend::decode_body("/markets", StatusCode::BAD_GATEWAY, "upstream down");
        match result {
            Err(CoreError::Api { endpoint, message }) => {
                assert_eq!(endpoint, "/markets");
                assert_eq!(message, "HTTP 502 Bad Gateway: upstream down");
            }
            other => panic!("Expected Api error, got {:?}", other),
        }
    }
}
