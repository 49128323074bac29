//! vpip - variant-aware package installer
#![allow(missing_docs)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::doc_markdown)]
//!
//! Front-end for the vpip resolver: fetches a package's simple-index page,
//! picks the artifact whose variant best fits this machine, and reports
//! the install.
//!
//! # Directory Layout
//!
//! ```text
//! ~/.vpip/
//! └── config.toml   # index URL, provider priority, provider values
//! ```

pub mod cmd;
pub mod logging;
pub mod progress;

pub use vpip_core::USER_AGENT;
pub use vpip_core::config::DEFAULT_INDEX_URL;

use clap::{Args, Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "vpip")]
#[command(author, version, about = "vpip - variant-aware package installer")]
pub struct Cli {
    /// Suppress the install progress bar
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Install a package
    Install(InstallArgs),
}

#[derive(Debug, Clone, Args)]
pub struct InstallArgs {
    /// Package name
    pub package: String,

    /// Simple-index root URL (defaults to the configured index, then PyPI)
    #[arg(short = 'i', long, env = "VPIP_INDEX_URL")]
    pub index_url: Option<String>,

    /// Variant providers to use, most preferred first; others are excluded
    #[arg(
        long = "variant_provider",
        visible_alias = "variant-provider",
        value_name = "NAME",
        num_args = 1..
    )]
    pub variant_providers: Vec<String>,

    /// Ignore variants and install the generic artifact
    #[arg(long = "no_variants", visible_alias = "no-variants")]
    pub no_variants: bool,

    /// Force a variant hash, or `no-variant` to ignore variants
    #[arg(long = "variant-hash", value_name = "HASH", env = "VPIP_VARIANT_HASH")]
    pub variant_hash: Option<String>,
}
