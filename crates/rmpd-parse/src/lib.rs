use rmpd_model::LookupResult;
use scraper::Html;
use thiserror::Error;

pub mod alert;
pub mod config;
pub mod report;
pub mod text;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    /// The portal rejected the lookup with an in-page danger banner.
    #[error("server alert: {0}")]
    ServerAlert(String),
}

/// Parse a portal response page into a `LookupResult`.
///
/// HTML parsing itself never fails. The only error is a server alert banner,
/// which aborts extraction without a partial result. Everything else that
/// is missing or malformed degrades to `None` at the field or block level.
pub fn parse(html: &str) -> Result<LookupResult, ParseError> {
    let document = Html::parse_document(html);

    if let Some(message) = alert::detect_alert(&document) {
        tracing::warn!(message = %message, "Portal returned an alert");
        return Err(ParseError::ServerAlert(message));
    }

    let config = config::extract_config(&document);
    let report = report::extract_report(&document);

    tracing::info!(
        config = config.is_some(),
        report = report.is_some(),
        "Parsed portal response"
    );

    Ok(LookupResult { config, report })
}
