use async_trait::async_trait;
use std::path::Path;

use hatena_org_core::images::{rewrite_image_reference, ImageReference};

use crate::error::Error;

/// Uploads a local image and returns the URL it is hosted at.
#[async_trait]
pub trait ImageUploader: Send + Sync {
    async fn upload(&self, path: &Path) -> Result<String, Error>;
}

/// Upload every referenced image that exists on disk and point the Markdown
/// at the hosted copies.
///
/// Uploads run one at a time in reference order. A reference whose file does
/// not exist is left untouched; the first failed upload aborts with
/// `Error::Upload` (or `Error::Timeout`).
pub async fn process_image_uploads(
    markdown: String,
    references: &[ImageReference],
    uploader: &dyn ImageUploader,
) -> Result<String, Error> {
    let mut markdown = markdown;

    for reference in references {
        if !reference.resolved_path.is_file() {
            log::warn!(
                "Image {} not found, leaving the link unchanged",
                reference.resolved_path.display()
            );
            continue;
        }

        let hosted_url = uploader
            .upload(&reference.resolved_path)
            .await
            .map_err(|e| match e {
                Error::Upload(_) | Error::Timeout(_) => e,
                other => Error::Upload(format!("{}: {other}", reference.original)),
            })?;

        log::info!("Uploaded {} -> {}", reference.original, hosted_url);
        markdown = rewrite_image_reference(&markdown, &reference.original, &hosted_url);
    }

    Ok(markdown)
}
