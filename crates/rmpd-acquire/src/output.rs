use rmpd_model::LookupResult;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// File name of the raw response page dump.
pub const HTML_DUMP_FILE: &str = "rmpd.html";
/// File name of the extracted result dump.
pub const JSON_DUMP_FILE: &str = "rmpd.json";

/// Where a lookup writes its diagnostic artifacts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DumpPaths {
    pub html: PathBuf,
    pub json: PathBuf,
}

impl DumpPaths {
    /// The fixed-name dump files inside `dir`.
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        Self {
            html: dir.join(HTML_DUMP_FILE),
            json: dir.join(JSON_DUMP_FILE),
        }
    }
}

/// Save the raw response page unchanged.
pub fn write_html(path: &Path, html: &str) -> io::Result<()> {
    create_parent(path)?;
    fs::write(path, html)?;
    tracing::info!(path = %path.display(), bytes = html.len(), "Saved raw HTML");
    Ok(())
}

/// Save the extracted result as pretty-printed JSON.
pub fn write_json(path: &Path, result: &LookupResult) -> io::Result<()> {
    let json = serde_json::to_string_pretty(result)?;
    create_parent(path)?;
    fs::write(path, &json)?;
    tracing::info!(
        path = %path.display(),
        report = result.report.is_some(),
        "Wrote result JSON"
    );
    Ok(())
}

fn create_parent(path: &Path) -> io::Result<()> {
    match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => fs::create_dir_all(dir),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dump_paths_in_dir() {
        let paths = DumpPaths::in_dir("out");
        assert_eq!(paths.html, Path::new("out").join("rmpd.html"));
        assert_eq!(paths.json, Path::new("out").join("rmpd.json"));
    }

    #[test]
    fn test_write_json_creates_directory() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join(JSON_DUMP_FILE);

        write_json(&path, &LookupResult::default()).unwrap();

        let written = fs::read_to_string(&path).unwrap();
        assert_eq!(written, "{\n  \"config\": null,\n  \"report\": null\n}");
    }

    #[test]
    fn test_write_html_unchanged() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(HTML_DUMP_FILE);
        let html = "<html>\u{a0}zażółć</html>";

        write_html(&path, html).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), html);
    }
}
