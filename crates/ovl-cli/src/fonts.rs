//! Font stylesheets from the local filesystem.

use async_trait::async_trait;
use ovl_export::{FontError, FontSource};
use std::path::{Path, PathBuf};

/// Reads stylesheets given on the command line. Relative `url(...)`s in
/// each one are rewritten against that stylesheet's own directory.
pub struct LocalFontSource {
    stylesheets: Vec<PathBuf>,
}

impl LocalFontSource {
    pub fn new(stylesheets: Vec<PathBuf>) -> Self {
        Self { stylesheets }
    }

    fn resolve(&self, url: &str) -> Result<PathBuf, FontError> {
        if url.contains("://") && !url.starts_with("file://") {
            return Err(fetch_error(url, "remote fonts are not fetched; download them first"));
        }
        Ok(PathBuf::from(url.strip_prefix("file://").unwrap_or(url)))
    }
}

/// Rewrite relative `url(...)`s in `css` so they point below `base`.
fn rebase_urls(css: &str, base: &Path) -> String {
    let mut out = String::with_capacity(css.len());
    let mut rest = css;
    while let Some(pos) = rest.find("url(") {
        let (head, tail) = rest.split_at(pos + "url(".len());
        out.push_str(head);
        let Some(end) = tail.find(')') else {
            rest = tail;
            break;
        };
        let raw = &tail[..end];
        let target = raw.trim().trim_matches(|c| c == '"' || c == '\'');
        if is_relative(target) {
            out.push('"');
            out.push_str(&base.join(target).display().to_string());
            out.push('"');
        } else {
            out.push_str(raw);
        }
        rest = &tail[end..];
    }
    out.push_str(rest);
    out
}

fn is_relative(url: &str) -> bool {
    !url.is_empty() && !url.contains("://") && !url.starts_with("data:") && Path::new(url).is_relative()
}

#[async_trait(?Send)]
impl FontSource for LocalFontSource {
    fn stylesheet_urls(&self) -> Vec<String> {
        self.stylesheets
            .iter()
            .map(|p| p.display().to_string())
            .collect()
    }

    async fn fetch_text(&self, url: &str) -> Result<String, FontError> {
        let css = tokio::fs::read_to_string(url)
            .await
            .map_err(|e| fetch_error(url, &e.to_string()))?;
        let base = Path::new(url).parent().unwrap_or_else(|| Path::new(""));
        Ok(rebase_urls(&css, base))
    }

    async fn fetch_bytes(&self, url: &str) -> Result<Vec<u8>, FontError> {
        let path = self.resolve(url)?;
        tokio::fs::read(&path)
            .await
            .map_err(|e| fetch_error(url, &e.to_string()))
    }
}

fn fetch_error(url: &str, reason: &str) -> FontError {
    FontError::Fetch {
        url: url.to_string(),
        reason: reason.to_string(),
    }
}
