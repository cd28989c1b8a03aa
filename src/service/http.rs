use super::{classify_response, ReportFetcher};
use crate::error::FetchError;
use crate::model::{LookupConfig, Report};
use crate::symbol::Symbol;
use anyhow::{Context, Result};
use futures::future::BoxFuture;
use reqwest::Url;

/// Render a reqwest error with its whole source chain, so a refused
/// connection says why instead of only naming the URL.
fn transport_error(e: reqwest::Error) -> FetchError {
    FetchError::transport(format!("{:#}", anyhow::Error::from(e)))
}

/// Fetches reports from `GET {base}/api/volatility/{SYMBOL}`.
pub struct HttpReportFetcher {
    http: reqwest::Client,
    base_url: String,
    lookback_years: u32,
}

impl HttpReportFetcher {
    pub fn new(cfg: &LookupConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(cfg.user_agent.clone())
            .timeout(cfg.timeout)
            .build()
            .context("build HTTP client")?;
        Ok(Self {
            http,
            base_url: cfg.base_url.clone(),
            lookback_years: cfg.lookback_years,
        })
    }

    pub fn report_url(&self, symbol: &Symbol) -> Result<Url, FetchError> {
        let mut url = Url::parse(&self.base_url)
            .map_err(|e| FetchError::transport(format!("invalid base URL: {e}")))?;
        url.path_segments_mut()
            .map_err(|_| FetchError::transport("base URL cannot carry a path"))?
            .pop_if_empty()
            .extend(["api", "volatility", symbol.as_str()]);
        url.query_pairs_mut()
            .append_pair("lookback_years", &self.lookback_years.to_string());
        Ok(url)
    }

    async fn fetch_report(&self, symbol: &Symbol) -> Result<Report, FetchError> {
        let url = self.report_url(symbol)?;
        tracing::debug!(%url, "requesting report");
        let resp = self
            .http
            .get(url)
            .send()
            .await
            .map_err(transport_error)?;
        let status = resp.status();
        let body = resp
            .text()
            .await
            .map_err(transport_error)?;
        classify_response(status.as_u16(), &body)
    }
}

impl ReportFetcher for HttpReportFetcher {
    fn fetch<'a>(&'a self, symbol: &'a Symbol) -> BoxFuture<'a, Result<Report, FetchError>> {
        Box::pin(self.fetch_report(symbol))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn fetcher(base_url: &str) -> HttpReportFetcher {
        HttpReportFetcher::new(&LookupConfig {
            base_url: base_url.to_string(),
            lookback_years: 5,
            timeout: Duration::from_secs(1),
            user_agent: "volatility-terminal/test".into(),
        })
        .unwrap()
    }

    #[test]
    fn builds_report_url() {
        let sym = Symbol::parse("spy").unwrap();
        let url = fetcher("http://localhost:8000").report_url(&sym).unwrap();
        assert_eq!(
            url.as_str(),
            "http://localhost:8000/api/volatility/SPY?lookback_years=5"
        );
    }

    #[test]
    fn keeps_base_path_and_escapes_symbol() {
        let sym = Symbol::parse("brk/b").unwrap();
        let url = fetcher("https://example.com/vol/").report_url(&sym).unwrap();
        assert_eq!(
            url.as_str(),
            "https://example.com/vol/api/volatility/BRK%2FB?lookback_years=5"
        );
    }

    #[tokio::test]
    async fn refused_connection_carries_its_cause() {
        let port = {
            let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap().port()
        };
        let sym = Symbol::parse("spy").unwrap();
        let err = fetcher(&format!("http://127.0.0.1:{port}"))
            .fetch(&sym)
            .await
            .unwrap_err();
        match err {
            FetchError::Transport(msg) => {
                assert!(msg.to_lowercase().contains("refused"), "{msg}");
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn bad_base_url_is_transport_error() {
        let sym = Symbol::parse("spy").unwrap();
        let err = fetcher("not a url").report_url(&sym).unwrap_err();
        assert!(matches!(err, FetchError::Transport(_)));
    }
}
