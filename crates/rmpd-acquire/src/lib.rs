use rmpd_model::{LookupRequest, LookupResult};
use rmpd_parse::ParseError;
use std::path::PathBuf;
use thiserror::Error;

pub mod fetch;
pub mod output;

pub use fetch::{FetchError, Fetcher, FetcherBuilder};
pub use output::DumpPaths;

#[derive(Debug, Error)]
pub enum LookupError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Alert(#[from] ParseError),

    #[error("failed to write {}: {source}", path.display())]
    Dump {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Fetch one shipment's status page and extract its report.
///
/// With `dump`, the raw page is saved as soon as it arrives and the result
/// JSON once extraction succeeds. A server alert therefore leaves the page
/// on disk for inspection but no JSON.
pub async fn lookup(
    fetcher: &Fetcher,
    request: &LookupRequest,
    dump: Option<&DumpPaths>,
) -> Result<LookupResult, LookupError> {
    let html = match dump {
        Some(paths) => fetcher.fetch_to(request, &paths.html).await?,
        None => fetcher.fetch(request).await?,
    };

    let result = rmpd_parse::parse(&html)?;

    if let Some(paths) = dump {
        output::write_json(&paths.json, &result).map_err(|source| LookupError::Dump {
            path: paths.json.clone(),
            source,
        })?;
    }

    Ok(result)
}
