//! Core library for hatena-org
//!
//! This crate implements the **Functional Core** of the hatena-org publisher,
//! following the Functional Core - Imperative Shell architectural pattern.
//!
//! # Architecture Overview
//!
//! - **`hatena_org_core`** (this crate): pure transformations with zero I/O
//! - **`hatena-org`**: file access, pandoc, HTTP and orchestration (the Imperative Shell)
//!
//! Every function here takes its inputs as values (document text, base
//! directories, timestamps, nonces) and returns a value, so the whole
//! publishing pipeline can be exercised with fixture strings.
//!
//! # Module Organization
//!
//! - [`org`]: title, tag and image link extraction from Org source
//! - [`normalize`]: cleanup of pandoc's Markdown output
//! - [`images`]: image references and Markdown link rewriting
//! - [`atom`]: AtomPub request bodies and response parsing
//! - [`wsse`]: WSSE UsernameToken credentials
//! - [`config`]: blog credentials and validation
//! - [`error`]: error kinds and pipeline stages
//!
//! # Example Usage
//!
//! ```rust
//! use hatena_org_core::normalize::normalize_markdown;
//! use hatena_org_core::org::extract_metadata;
//!
//! let org = "#+title: Hello\n#+filetags: :rust:org:\n\n* Intro\n";
//! let metadata = extract_metadata(org);
//! assert_eq!(metadata.title, "Hello");
//! assert_eq!(metadata.categories, vec!["rust", "org"]);
//!
//! let markdown = normalize_markdown("```{=org}\n#+filetags: :rust:\n```\n\n# Intro {#intro}\n");
//! assert_eq!(markdown, "\n\n# Intro\n");
//!
//! use hatena_org_core::wsse::WsseCredential;
//!
//! let credential = WsseCredential::new("alice", "secret", "1234567890", "2024-05-01T12:30:00Z");
//! assert!(credential.header_value().starts_with(r#"UsernameToken Username="alice""#));
//! ```

pub mod atom;
pub mod config;
pub mod error;
pub mod images;
pub mod normalize;
pub mod org;
pub mod wsse;

pub use error::{Error, ErrorKind, PublishError, Stage};
