use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "pombump",
    about = "Edit and interrogate Maven project descriptors without a build",
    version
)]
pub struct Cli {
    /// Log at debug level
    #[arg(long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Bump a dependency version inside a descriptor
    Bump(BumpArgs),
    /// Print the resolved property map of a descriptor chain
    Properties(PropertiesArgs),
    /// Print the discovered language-level versions
    Versions(VersionsArgs),
}

#[derive(Args)]
pub struct BumpArgs {
    /// Descriptor file to edit
    pub pom: PathBuf,

    /// Target coordinate, group:artifact:version
    pub coordinate: String,

    /// Top-level directory bounding the ancestor search (defaults to the
    /// descriptor's directory)
    #[arg(long)]
    pub top_level: Option<PathBuf>,

    /// Route the version through a property instead of writing it inline
    #[arg(long)]
    pub use_properties: bool,

    /// Leave the descriptor alone unless the requested version is newer
    #[arg(long)]
    pub skip_if_newer: bool,

    /// Redefine an existing shared property instead of failing
    #[arg(long)]
    pub override_existing: bool,

    /// Profile to activate; prefix with ! to deactivate. Repeatable.
    #[arg(long = "profile")]
    pub profiles: Vec<String>,

    /// Report what would change without writing any file
    #[arg(long)]
    pub dry_run: bool,
}

#[derive(Args)]
pub struct PropertiesArgs {
    /// Descriptor file to resolve
    pub pom: PathBuf,

    /// Top-level directory bounding the ancestor search (defaults to the
    /// descriptor's directory)
    #[arg(long)]
    pub top_level: Option<PathBuf>,

    /// Profile to activate; prefix with ! to deactivate. Repeatable.
    #[arg(long = "profile")]
    pub profiles: Vec<String>,

    /// Emit JSON instead of name=value lines
    #[arg(long)]
    pub json: bool,
}

#[derive(Args)]
pub struct VersionsArgs {
    /// Descriptor file to inspect
    pub pom: PathBuf,

    /// Top-level directory bounding the ancestor search (defaults to the
    /// descriptor's directory)
    #[arg(long)]
    pub top_level: Option<PathBuf>,

    /// Profile to activate; prefix with ! to deactivate. Repeatable.
    #[arg(long = "profile")]
    pub profiles: Vec<String>,
}
