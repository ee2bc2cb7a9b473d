//! Filesystem access for Org documents
//!
//! Reads the document once and hands its text to the pure extractors in
//! `hatena_org_core::org`.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use hatena_org_core::images::ImageReference;
use hatena_org_core::org::{self, OrgMetadata};

use crate::error::Error;

/// An Org file loaded into memory.
#[derive(Debug, Clone)]
pub struct OrgDocument {
    /// Absolute path of the file.
    pub path: PathBuf,
    pub text: String,
}

impl OrgDocument {
    /// Read `path`, failing with `NotFound` if it does not exist and
    /// `InvalidInput` if it cannot be read as UTF-8 text.
    pub fn open(path: &Path) -> Result<Self, Error> {
        let path = std::path::absolute(path).map_err(|e| {
            Error::InvalidInput(format!("failed to get absolute path of {}: {e}", path.display()))
        })?;

        let text = fs::read_to_string(&path).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => {
                Error::NotFound(format!("failed to open org file {}: {e}", path.display()))
            }
            io::ErrorKind::InvalidData => Error::InvalidInput(format!(
                "org file {} is not valid UTF-8: {e}",
                path.display()
            )),
            _ => Error::InvalidInput(format!("failed to read org file {}: {e}", path.display())),
        })?;

        Ok(Self { path, text })
    }

    /// Like [`OrgDocument::open`], but also require an existing regular file
    /// with the `.org` extension.
    pub fn open_for_publish(path: &Path) -> Result<Self, Error> {
        if !path.is_file() {
            return Err(Error::NotFound(format!(
                "org file not found: {}",
                path.display()
            )));
        }
        if path.extension().and_then(|ext| ext.to_str()) != Some("org") {
            return Err(Error::InvalidInput(format!(
                "file is not an org file: {}",
                path.display()
            )));
        }
        Self::open(path)
    }

    /// Directory image links are resolved against.
    pub fn base_dir(&self) -> &Path {
        self.path.parent().unwrap_or_else(|| Path::new("/"))
    }

    pub fn metadata(&self) -> OrgMetadata {
        org::extract_metadata(&self.text)
    }

    pub fn image_references(&self) -> Vec<ImageReference> {
        org::resolve_image_links(&self.text, self.base_dir())
    }
}

/// Title of the Org file at `path`, or `"Untitled"`.
pub fn extract_title(path: &Path) -> Result<String, Error> {
    OrgDocument::open(path).map(|doc| org::extract_title(&doc.text))
}

/// `#+filetags:` of the Org file at `path`.
pub fn extract_categories(path: &Path) -> Result<Vec<String>, Error> {
    OrgDocument::open(path).map(|doc| org::extract_categories(&doc.text))
}

/// Absolute paths of the images linked from the Org file at `path`.
pub fn extract_image_links(path: &Path) -> Result<Vec<PathBuf>, Error> {
    OrgDocument::open(path).map(|doc| {
        doc.image_references()
            .into_iter()
            .map(|reference| reference.resolved_path)
            .collect()
    })
}
