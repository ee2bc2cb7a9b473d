use crate::prelude::{eprintln, println, *};
use colored::Colorize;
use serde::Serialize;
use std::path::{Path, PathBuf};

use hatena_org_core::atom::BlogEntry;
use hatena_org_core::images::unique_references;
use hatena_org_core::normalize::normalize_markdown;
use hatena_org_core::org::OrgMetadata;
use hatena_org_core::{PublishError, Stage};

use crate::config::load_config;
use crate::converter::{Converter, Pandoc};
use crate::hatena::HatenaClient;
use crate::images::{process_image_uploads, ImageUploader};
use crate::org_file::OrgDocument;

/// Options for publishing an Org file
#[derive(Debug, clap::Args, Clone)]
pub struct PostOptions {
    /// Path to the .org file
    pub file: PathBuf,

    /// Extra category for the entry, added to the file's #+filetags
    #[arg(short, long)]
    pub category: Option<String>,

    /// Post as a draft
    #[arg(long)]
    pub draft: bool,

    /// Print the generated Atom XML before submitting it
    #[arg(long)]
    pub debug: bool,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Options for previewing the Markdown of an Org file
#[derive(Debug, clap::Args, Clone)]
pub struct ConvertOptions {
    /// Path to the .org file
    pub file: PathBuf,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// What to publish.
#[derive(Debug, Clone)]
pub struct PublishRequest {
    pub org_path: PathBuf,
    pub category: Option<String>,
    pub is_draft: bool,
    pub debug: bool,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct PublishResult {
    pub title: String,
    pub categories: Vec<String>,
    pub draft: bool,
    pub edit_page_url: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ConvertOutput {
    pub title: String,
    pub categories: Vec<String>,
    pub markdown: String,
}

/// Tracks the current stage of one publish run and tags failures with it.
#[derive(Debug)]
struct Pipeline {
    stage: Stage,
}

impl Pipeline {
    fn new() -> Self {
        Self { stage: Stage::Idle }
    }

    /// Move to `next` if `result` succeeded; otherwise fail in `next`.
    fn advance<T>(&mut self, next: Stage, result: Result<T, Error>) -> Result<T, PublishError> {
        match result {
            Ok(value) => {
                log::debug!("{:?} -> {:?}", self.stage, next);
                self.stage = next;
                Ok(value)
            }
            Err(error) => {
                log::debug!("{:?} -> Failed ({})", self.stage, error);
                Err(PublishError::new(next, error))
            }
        }
    }
}

/// Title and categories for the entry: the file tags, plus `extra` when it
/// is non-empty and not already among them.
fn entry_categories(metadata: &OrgMetadata, extra: Option<&str>) -> Vec<String> {
    let mut categories = metadata.categories.clone();
    if let Some(extra) = extra.map(str::trim).filter(|c| !c.is_empty()) {
        if !categories.iter().any(|c| c == extra) {
            categories.push(extra.to_string());
        }
    }
    categories
}

/// Load, convert and normalize an Org file without touching the network.
pub async fn convert_org_file(
    path: &Path,
    converter: &dyn Converter,
) -> Result<ConvertOutput, PublishError> {
    let mut pipeline = Pipeline::new();

    let document = pipeline.advance(Stage::MetadataExtracted, OrgDocument::open_for_publish(path))?;
    let metadata = document.metadata();
    let raw = pipeline.advance(Stage::Converted, converter.convert(&document.text).await)?;
    let markdown = pipeline.advance(Stage::Normalized, Ok(normalize_markdown(&raw)))?;

    Ok(ConvertOutput {
        title: metadata.title,
        categories: metadata.categories,
        markdown,
    })
}

/// Publish an Org file as a new blog entry.
///
/// Stages run strictly in order and the first failure ends the run; nothing
/// is submitted unless every earlier stage succeeded.
pub async fn publish(
    request: &PublishRequest,
    converter: &dyn Converter,
    uploader: &dyn ImageUploader,
    client: &HatenaClient,
) -> Result<PublishResult, PublishError> {
    let mut pipeline = Pipeline::new();

    let document = pipeline.advance(
        Stage::MetadataExtracted,
        OrgDocument::open_for_publish(&request.org_path),
    )?;
    let metadata = document.metadata();
    log::info!(
        "Publishing {} ({:?})",
        document.path.display(),
        metadata.title
    );

    let raw = pipeline.advance(Stage::Converted, converter.convert(&document.text).await)?;
    let markdown = pipeline.advance(Stage::Normalized, Ok(normalize_markdown(&raw)))?;

    let references = pipeline.advance(
        Stage::ImagesResolved,
        Ok(unique_references(document.image_references())),
    )?;
    log::debug!("Found {} image reference(s)", references.len());

    let markdown = pipeline.advance(
        Stage::ImagesUploaded,
        process_image_uploads(markdown, &references, uploader).await,
    )?;

    let entry = BlogEntry {
        title: metadata.title.clone(),
        body: markdown,
        categories: entry_categories(&metadata, request.category.as_deref()),
        is_draft: request.is_draft,
    };
    let xml = pipeline.advance(Stage::EntryBuilt, Ok(client.entry_xml(&entry)))?;
    if request.debug {
        println!("Generated XML:");
        println!("{xml}");
    }

    let edit_page_url = pipeline.advance(Stage::Submitted, client.submit_entry(xml).await)?;

    Ok(PublishResult {
        title: entry.title,
        categories: entry.categories,
        draft: entry.is_draft,
        edit_page_url,
    })
}

/// Handle the post command
pub async fn post_handler(options: PostOptions, global: crate::Global) -> Result<()> {
    let config = load_config(global.config_overrides(), global.config.as_deref())?;
    let client = HatenaClient::new(config)?;
    let converter = Pandoc::locate()?;

    let request = PublishRequest {
        org_path: options.file.clone(),
        category: options.category.clone(),
        is_draft: options.draft,
        debug: options.debug,
    };

    if global.verbose {
        eprintln!("Posting {}...", options.file.display());
    }

    let result = publish(&request, &converter, &client, &client).await?;

    if options.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        println!("{}", "Successfully posted to Hatena Blog!".green().bold());
        println!("{} {}", "Title:".bold(), result.title);
        if !result.categories.is_empty() {
            println!("{} {}", "Categories:".bold(), result.categories.join(", "));
        }
        if result.draft {
            println!("{} {}", "Status:".bold(), "draft".yellow());
        }
        println!("{} {}", "Edit:".bold(), result.edit_page_url.bright_blue());
    }

    Ok(())
}

/// Handle the convert command
pub async fn convert_handler(options: ConvertOptions, _global: crate::Global) -> Result<()> {
    let converter = Pandoc::locate()?;
    let output = convert_org_file(&options.file, &converter).await?;

    if options.json {
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        eprintln!("{} {}", "Title:".bold(), output.title);
        eprintln!("{} {}", "Categories:".bold(), output.categories.join(", "));
        println!("{}", output.markdown);
    }

    Ok(())
}
