//! Hands print documents to the host browser.

use std::fs;
use std::io;
use std::path::Path;
use std::path::PathBuf;

use mdlive_markdown::document::PrintDocument;

#[derive(Debug, thiserror::Error)]
pub enum PrintError {
    #[error("could not write print document {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("could not open {} in the browser: {source}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Something that can show the host print dialog for a document.
pub trait PrintHost {
    /// Returns where the document was placed.
    fn print(&mut self, document: &PrintDocument) -> Result<PathBuf, PrintError>;
}

/// Writes the document into `dir` and opens it with the default browser, which calls
/// `window.print()` once the page loads.
#[derive(Debug, Clone)]
pub struct BrowserPrintHost {
    dir: PathBuf,
}

impl BrowserPrintHost {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl PrintHost for BrowserPrintHost {
    fn print(&mut self, document: &PrintDocument) -> Result<PathBuf, PrintError> {
        let path = write_document(&self.dir, document)?;
        open::that(&path).map_err(|source| PrintError::Open {
            path: path.clone(),
            source,
        })?;
        tracing::info!(path = %path.display(), frame = %document.frame(), "print document opened");
        Ok(path)
    }
}

/// Writes `document` as `<slug>-<frame>.html` under `dir`, replacing an earlier print of the same
/// document.
pub fn write_document(dir: &Path, document: &PrintDocument) -> Result<PathBuf, PrintError> {
    let path = dir.join(file_name(document));
    let write = |source| PrintError::Write {
        path: path.clone(),
        source,
    };
    fs::create_dir_all(dir).map_err(write)?;
    fs::write(&path, document.to_html()).map_err(write)?;
    Ok(path)
}

fn file_name(document: &PrintDocument) -> String {
    format!("{}-{}.html", slug(document.title()), document.frame())
}

fn slug(title: &str) -> String {
    let mut out = String::new();
    for c in title.chars() {
        if c.is_alphanumeric() {
            out.extend(c.to_lowercase());
        } else if !out.is_empty() && !out.ends_with('-') {
            out.push('-');
        }
    }
    while out.ends_with('-') {
        out.pop();
    }
    if out.is_empty() {
        out.push_str("mdlive");
    }
    out
}
