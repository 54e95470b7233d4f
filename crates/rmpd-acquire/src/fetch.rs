use crate::output;
use rmpd_model::LookupRequest;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// RMPD-406 verification form on the production portal.
pub const PORTAL_URL: &str =
    "https://puesc.gov.pl/en/uslugi/przewoz-towarow-objety-monitorowaniem/rmpd-406";

/// Fixed query string addressing the portlet resource that renders the report.
const QUERY_PARAMS: [(&str, &str); 8] = [
    ("systemName", "SENT"),
    ("formName", "1000951"),
    ("p_p_id", "Sent_Rmpd406Portlet"),
    ("p_p_lifecycle", "2"),
    ("p_p_state", "normal"),
    ("p_p_mode", "view"),
    ("p_p_resource_id", "/rmpd-406/verify-rmpd-number-and-truck"),
    ("p_p_cacheability", "cacheLevelPage"),
];

/// Portlet namespace prepended to every form field name.
const FORM_NAMESPACE: &str = "_Sent_Rmpd406Portlet_";

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
const DEFAULT_USER_AGENT: &str = "rmpd/0.1 (shipment status lookup)";

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("portal responded with HTTP {0}")]
    Status(u16),

    #[error("request to portal failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Posts lookup forms to the portal.
#[derive(Debug, Clone)]
pub struct Fetcher {
    client: reqwest::Client,
    endpoint: String,
}

#[derive(Debug, Clone)]
pub struct FetcherBuilder {
    endpoint: String,
    timeout: Duration,
    user_agent: String,
}

impl Default for FetcherBuilder {
    fn default() -> Self {
        Self {
            endpoint: PORTAL_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl FetcherBuilder {
    /// Override the form URL (e.g., the portal's test environment).
    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    pub fn build(self) -> Result<Fetcher, FetchError> {
        let client = reqwest::Client::builder()
            .user_agent(self.user_agent)
            .timeout(self.timeout)
            .build()?;
        Ok(Fetcher {
            client,
            endpoint: self.endpoint,
        })
    }
}

impl Fetcher {
    pub fn builder() -> FetcherBuilder {
        FetcherBuilder::default()
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Submit the lookup form and return the raw response page.
    ///
    /// Any status other than 200 is an error carrying that status.
    pub async fn fetch(&self, request: &LookupRequest) -> Result<String, FetchError> {
        let timestamp_ms = chrono::Utc::now().timestamp_millis();
        let form = form_fields(request, timestamp_ms);

        tracing::info!(
            url = %self.endpoint,
            rmpd = %request.document_number,
            truck = %request.truck_number,
            locator = %request.geolocator_number,
            "Submitting lookup form"
        );

        let response = self
            .client
            .post(&self.endpoint)
            .query(&QUERY_PARAMS)
            .form(&form)
            .send()
            .await?;

        let status = response.status();
        if status != reqwest::StatusCode::OK {
            tracing::warn!(status = status.as_u16(), "Portal returned non-success status");
            return Err(FetchError::Status(status.as_u16()));
        }

        let html = response.text().await?;
        tracing::info!(bytes = html.len(), "Received HTML");
        Ok(html)
    }

    /// Like [`fetch`](Self::fetch), also saving the page to `path`.
    ///
    /// Nothing is written when the fetch fails.
    pub async fn fetch_to(
        &self,
        request: &LookupRequest,
        path: &Path,
    ) -> Result<String, FetchError> {
        let html = self.fetch(request).await?;
        output::write_html(path, &html).map_err(|source| FetchError::Write {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(html)
    }
}

/// Form body expected by the portlet, in submission order.
fn form_fields(request: &LookupRequest, timestamp_ms: i64) -> Vec<(String, String)> {
    [
        ("formDate", timestamp_ms.to_string()),
        ("rmpdNumber", request.document_number.clone()),
        ("truckNumber", request.truck_number.clone()),
        ("geoLocatorNumber", request.geolocator_number.clone()),
    ]
    .into_iter()
    .map(|(name, value)| (format!("{FORM_NAMESPACE}{name}"), value))
    .collect()
}
