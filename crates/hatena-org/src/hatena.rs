//! HTTP client for the Hatena Blog AtomPub API and the Fotolife AtomAPI

use async_trait::async_trait;
use base64::Engine;
use chrono::{SecondsFormat, Utc};
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use reqwest::StatusCode;
use std::path::Path;
use std::time::Duration;

use hatena_org_core::atom::{
    atom_base_url, build_entry_xml, build_image_entry_xml, edit_page_url, entry_id_from_edit_url,
    find_edit_link, find_image_url, BlogEntry,
};
use hatena_org_core::config::Config;
use hatena_org_core::wsse::{nonce_source, WsseCredential, WSSE_HEADER};

use crate::error::{request_error, Error};
use crate::images::ImageUploader;

/// Every request gives up after this long.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Fotolife AtomAPI endpoint for new images.
pub const FOTOLIFE_POST_URL: &str = "https://f.hatena.ne.jp/atom/post";

/// Build a new WSSE credential from the current time and a random suffix.
pub fn fresh_credential(config: &Config) -> WsseCredential {
    let now = Utc::now();
    let nanos = now.timestamp_nanos_opt().unwrap_or_else(|| now.timestamp_micros() * 1000);
    let raw_nonce = nonce_source(nanos, rand::random::<u64>());
    let created = now.to_rfc3339_opts(SecondsFormat::Secs, true);

    WsseCredential::new(&config.hatena_id, &config.api_key, &raw_nonce, &created)
}

/// Infer the image MIME type from a file extension.
fn mime_from_extension(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|ext| ext.to_str())
        .unwrap_or("")
        .to_lowercase();

    match ext.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "bmp" => "image/bmp",
        "webp" => "image/webp",
        "svg" => "image/svg+xml",
        _ => "application/octet-stream",
    }
}

/// Client for one blog.
#[derive(Debug, Clone)]
pub struct HatenaClient {
    config: Config,
    http: reqwest::Client,
    blog_base_url: String,
    fotolife_url: String,
}

impl HatenaClient {
    /// Create a client for the blog described by `config`.
    pub fn new(config: Config) -> Result<Self, Error> {
        config.validate()?;

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/xml"));

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| Error::InvalidInput(format!("failed to build HTTP client: {e}")))?;

        let blog_base_url = atom_base_url(&config.hatena_id, &config.blog_domain);

        Ok(Self {
            config,
            http,
            blog_base_url,
            fotolife_url: FOTOLIFE_POST_URL.to_string(),
        })
    }

    /// Point the client at different API endpoints.
    pub fn with_endpoints(
        mut self,
        blog_base_url: impl Into<String>,
        fotolife_url: impl Into<String>,
    ) -> Self {
        self.blog_base_url = blog_base_url.into();
        self.fotolife_url = fotolife_url.into();
        self
    }

    pub fn entry_url(&self) -> String {
        format!("{}/entry", self.blog_base_url.trim_end_matches('/'))
    }

    /// Serialize `entry` with this blog's author and the current time.
    pub fn entry_xml(&self, entry: &BlogEntry) -> String {
        build_entry_xml(entry, &self.config.hatena_id, Utc::now())
    }

    fn wsse_header(&self) -> Result<HeaderValue, Error> {
        HeaderValue::from_str(&fresh_credential(&self.config).header_value())
            .map_err(|e| Error::InvalidInput(format!("invalid WSSE header: {e}")))
    }

    /// POST an Atom entry document and return the entry's edit page URL.
    ///
    /// Anything other than `201 Created`, or a response without an edit
    /// link, is an `Error::Protocol`.
    pub async fn submit_entry(&self, entry_xml: String) -> Result<String, Error> {
        let url = self.entry_url();
        log::debug!("POST {url}");

        let response = self
            .http
            .post(&url)
            .header(WSSE_HEADER, self.wsse_header()?)
            .body(entry_xml)
            .send()
            .await
            .map_err(|e| request_error(e, "request failed", Error::Protocol))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| request_error(e, "failed to read response body", Error::Protocol))?;

        if status != StatusCode::CREATED {
            return Err(Error::Protocol(format!(
                "API request failed with status {}: {}",
                status.as_u16(),
                body
            )));
        }

        let edit_url = find_edit_link(&body)?
            .ok_or_else(|| Error::Protocol("edit link not found in API response".to_string()))?;
        log::debug!("Edit link: {edit_url}");

        Ok(edit_page_url(
            &self.config.hatena_id,
            &self.config.blog_domain,
            entry_id_from_edit_url(&edit_url),
        ))
    }

    /// Serialize and submit `entry`, returning the edit page URL.
    pub async fn post_entry(&self, entry: &BlogEntry) -> Result<String, Error> {
        self.submit_entry(self.entry_xml(entry)).await
    }
}

#[async_trait]
impl ImageUploader for HatenaClient {
    async fn upload(&self, path: &Path) -> Result<String, Error> {
        let bytes = tokio::fs::read(path).await.map_err(|e| {
            Error::Upload(format!("failed to open image file {}: {e}", path.display()))
        })?;

        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        let data = base64::engine::general_purpose::STANDARD.encode(&bytes);
        let body = build_image_entry_xml(&file_name, mime_from_extension(path), &data);

        log::debug!("Uploading {} ({} bytes)", path.display(), bytes.len());

        let response = self
            .http
            .post(&self.fotolife_url)
            .header(WSSE_HEADER, self.wsse_header()?)
            .body(body)
            .send()
            .await
            .map_err(|e| request_error(e, "request failed", Error::Upload))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| request_error(e, "failed to read upload response", Error::Upload))?;

        if status != StatusCode::CREATED {
            return Err(Error::Upload(format!(
                "image upload failed with status {}: {}",
                status.as_u16(),
                body
            )));
        }

        find_image_url(&body)
            .map_err(|e| Error::Upload(e.to_string()))?
            .ok_or_else(|| Error::Upload("image URL not found in upload response".to_string()))
    }
}
