//! Data-fetch collaborator: turns a symbol into a report or a [`FetchError`].

mod http;

pub use http::HttpReportFetcher;

use crate::error::{FetchError, GENERIC_FETCH_ERROR};
use crate::model::Report;
use crate::symbol::Symbol;
use futures::future::BoxFuture;

/// Source of volatility reports. Implementations settle exactly once per call.
pub trait ReportFetcher: Send + Sync {
    fn fetch<'a>(&'a self, symbol: &'a Symbol) -> BoxFuture<'a, Result<Report, FetchError>>;
}

/// Interpret a completed HTTP exchange.
///
/// A non-success status with a JSON body carrying a string `detail` becomes a
/// service error with that detail (trimmed); a JSON body without one, or with a
/// blank one, gets the generic
/// message; an unreadable body (on any status) is reported with the parse error.
pub fn classify_response(status: u16, body: &str) -> Result<Report, FetchError> {
    let parsed = serde_json::from_str::<serde_json::Value>(body);
    if (200..300).contains(&status) {
        return parsed
            .map(Report::new)
            .map_err(|e| FetchError::transport(format!("invalid response body: {e}")));
    }
    match parsed {
        Ok(value) => {
            let detail = value
                .get("detail")
                .and_then(|d| d.as_str())
                .map(str::trim)
                .filter(|d| !d.is_empty())
                .unwrap_or(GENERIC_FETCH_ERROR)
                .to_string();
            Err(FetchError::Service { status, detail })
        }
        Err(e) => Err(FetchError::transport(e.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_body_becomes_report() {
        let report = classify_response(200, r#"{"ticker":"SPY","vol_30d":0.152}"#).unwrap();
        assert_eq!(report.ticker(), Some("SPY"));
    }

    #[test]
    fn unreadable_success_body_is_transport_error() {
        let err = classify_response(200, "<html>").unwrap_err();
        assert!(matches!(err, FetchError::Transport(ref m) if m.starts_with("invalid response body")));
    }

    #[test]
    fn structured_failure_uses_detail() {
        let err = classify_response(404, r#"{"detail":"No data found for ticker ZZZZ"}"#).unwrap_err();
        assert_eq!(
            err,
            FetchError::Service {
                status: 404,
                detail: "No data found for ticker ZZZZ".into()
            }
        );
    }

    #[test]
    fn failure_without_detail_uses_generic_message() {
        let err = classify_response(500, r#"{"error":"boom"}"#).unwrap_err();
        assert_eq!(err.message(), GENERIC_FETCH_ERROR);
        // FastAPI validation errors carry a list, not a string.
        let err = classify_response(422, r#"{"detail":[{"msg":"bad"}]}"#).unwrap_err();
        assert_eq!(err.message(), GENERIC_FETCH_ERROR);
    }

    #[test]
    fn blank_detail_uses_generic_message() {
        for body in [r#"{"detail":""}"#, r#"{"detail":"   "}"#] {
            let err = classify_response(400, body).unwrap_err();
            assert_eq!(
                err,
                FetchError::Service {
                    status: 400,
                    detail: GENERIC_FETCH_ERROR.into()
                }
            );
        }
    }

    #[test]
    fn failure_with_unparsable_body_reports_parse_error() {
        let err = classify_response(502, "Bad Gateway").unwrap_err();
        match err {
            FetchError::Transport(msg) => assert!(!msg.is_empty()),
            other => panic!("expected transport error, got {other:?}"),
        }
    }
}
