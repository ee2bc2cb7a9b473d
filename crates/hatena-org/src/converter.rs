use async_trait::async_trait;
use std::path::PathBuf;
use std::process::Stdio;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

use crate::error::Error;

/// Turns Org text into Markdown.
///
/// Implementations must not re-wrap lines: Hatena renders Markdown with
/// hard line breaks, so the original line structure has to survive.
#[async_trait]
pub trait Converter: Send + Sync {
    async fn convert(&self, org: &str) -> Result<String, Error>;
}

/// Runs `pandoc -f org -t markdown --wrap=preserve`, feeding the document
/// through stdin.
#[derive(Debug, Clone)]
pub struct Pandoc {
    program: PathBuf,
}

impl Pandoc {
    pub const ARGS: [&'static str; 5] = ["-f", "org", "-t", "markdown", "--wrap=preserve"];

    /// Find `pandoc` on the `PATH`.
    pub fn locate() -> Result<Self, Error> {
        which::which("pandoc")
            .map(Self::with_program)
            .map_err(|e| Error::Conversion(format!("pandoc is not available: {e}")))
    }

    pub fn with_program(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

#[async_trait]
impl Converter for Pandoc {
    async fn convert(&self, org: &str) -> Result<String, Error> {
        log::debug!("Running {} {}", self.program.display(), Self::ARGS.join(" "));

        let mut child = Command::new(&self.program)
            .args(Self::ARGS)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| {
                Error::Conversion(format!("failed to run {}: {e}", self.program.display()))
            })?;

        let mut stdin = child
            .stdin
            .take()
            .ok_or_else(|| Error::Conversion("pandoc stdin was not captured".to_string()))?;

        // Feed stdin while collecting stdout so large documents cannot fill
        // both pipes and stall.
        let feed = async move {
            stdin.write_all(org.as_bytes()).await?;
            stdin.shutdown().await
        };
        let (_, output) = tokio::try_join!(feed, child.wait_with_output())
            .map_err(|e| Error::Conversion(format!("pandoc conversion failed: {e}")))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(Error::Conversion(format!(
                "pandoc conversion failed ({}): {}",
                output.status,
                stderr.trim()
            )));
        }

        String::from_utf8(output.stdout)
            .map_err(|e| Error::Conversion(format!("pandoc produced invalid UTF-8: {e}")))
    }
}
