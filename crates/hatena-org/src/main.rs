use crate::prelude::*;
use clap::Parser;
use std::path::PathBuf;

mod config;
mod converter;
mod error;
mod hatena;
mod images;
mod org_file;
mod prelude;
mod publish;

#[derive(Debug, clap::Parser)]
#[command(
    author,
    version,
    about,
    long_about = "Publish Org-mode documents to Hatena Blog"
)]
pub struct App {
    #[command(subcommand)]
    pub command: SubCommands,

    #[clap(flatten)]
    global: Global,
}

#[derive(Debug, Clone, clap::Args)]
pub struct Global {
    /// Hatena ID
    #[clap(long = "id", env = "HATENA_ID", global = true)]
    hatena_id: Option<String>,

    /// AtomPub API key
    #[clap(long = "key", env = "HATENA_API_KEY", global = true, hide_env_values = true)]
    api_key: Option<String>,

    /// Blog domain (e.g. example.hatenablog.com)
    #[clap(long = "domain", env = "HATENA_BLOG_DOMAIN", global = true)]
    blog_domain: Option<String>,

    /// Path to a JSON config file (defaults to ~/.config/hatena-blog-org/config.json)
    #[clap(long, env = "HATENA_CONFIG", global = true)]
    config: Option<PathBuf>,

    /// Whether to display additional information.
    #[clap(long, env = "HATENA_VERBOSE", global = true, default_value = "false")]
    verbose: bool,
}

impl Global {
    /// Credentials given on the command line or through the environment.
    pub fn config_overrides(&self) -> crate::config::Config {
        crate::config::Config::new(
            self.hatena_id.clone().unwrap_or_default(),
            self.api_key.clone().unwrap_or_default(),
            self.blog_domain.clone().unwrap_or_default(),
        )
    }
}

#[derive(Debug, clap::Parser)]
pub enum SubCommands {
    /// Convert an Org file and publish it as a new entry
    Post(crate::publish::PostOptions),

    /// Print the Markdown an Org file would be published as
    Convert(crate::publish::ConvertOptions),
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();
    color_eyre::install()?;

    let app = App::parse();

    match app.command {
        SubCommands::Post(options) => crate::publish::post_handler(options, app.global).await,
        SubCommands::Convert(options) => crate::publish::convert_handler(options, app.global).await,
    }
    .map_err(|err: color_eyre::eyre::Report| eyre!(err))
}
