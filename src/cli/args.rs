//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueHint};

use crate::config::FlagOverrides;

const ENV_HELP: &str = concat!(
    "Environment:\n",
    "  XLDC_USERNAME, XLDC_PASSWORD, XLDC_HOST, XLDC_PORT, XLDC_CONTEXT, XLDC_SSL\n",
    "  override the config file. Unprefixed names (USERNAME, HOST, PORT, ...) are not read."
);

/// XL Deploy command line client: metadata, templates and repository CRUD
#[derive(Parser, Debug)]
#[command(name = "xldc")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
#[command(after_help = ENV_HELP)]
pub struct Cli {
    /// Config file (default: ./xldc.toml, .yaml or .json); XLDC_* variables and flags override it
    #[arg(long, global = true, value_hint = ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(flatten)]
    pub connection: ConnectionArgs,

    /// Write output to this file instead of stdout
    #[arg(long, global = true, value_hint = ValueHint::FilePath)]
    pub out: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Connection flags; each one overrides config file and environment.
#[derive(Args, Debug, Default, Clone)]
pub struct ConnectionArgs {
    /// Username for the connection
    #[arg(long, global = true)]
    pub username: Option<String>,

    /// Password for the connection
    #[arg(long, global = true)]
    pub password: Option<String>,

    /// Hostname of the XL Deploy server
    #[arg(long, global = true)]
    pub host: Option<String>,

    /// Port XL Deploy is listening on
    #[arg(long, global = true)]
    pub port: Option<u16>,

    /// Context root XL Deploy runs under
    #[arg(long, global = true)]
    pub context: Option<String>,

    /// Use https
    #[arg(long, global = true)]
    pub ssl: bool,
}

impl From<&ConnectionArgs> for FlagOverrides {
    fn from(args: &ConnectionArgs) -> Self {
        Self {
            username: args.username.clone(),
            password: args.password.clone(),
            host: args.host.clone(),
            port: args.port,
            context: args.context.clone(),
            ssl: args.ssl,
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Verify the connection to XL Deploy
    Verify,

    /// Display metadata
    #[command(visible_alias = "meta")]
    Metadata {
        #[command(subcommand)]
        command: MetadataCommands,
    },

    /// Read and write configuration items
    Repository {
        #[command(subcommand)]
        command: RepositoryCommands,
    },

    /// Manage the config file
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Generate shell completions
    Completion {
        /// Shell type
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(Subcommand, Debug)]
pub enum MetadataCommands {
    /// List all types, or show one type
    Type {
        /// Fully qualified type name, e.g. udm.Environment
        name: Option<String>,
        /// Show complete type definitions instead of name and description
        #[arg(short, long)]
        long: bool,
    },

    /// Build creation templates for types
    Template {
        /// Type names
        #[arg(required = true, num_args = 1..)]
        names: Vec<String>,
        /// Include optional properties
        #[arg(long)]
        optional: bool,
    },

    /// List available orchestrators
    Orchestrators,

    /// Show permission metadata
    Permissions,
}

#[derive(Subcommand, Debug)]
pub enum RepositoryCommands {
    /// Get a CI from the repository
    Get {
        /// CI id, e.g. Infrastructure/web1
        id: String,
        /// Input file (accepted, not used)
        #[arg(long = "in", value_hint = ValueHint::FilePath)]
        input: Option<PathBuf>,
    },

    /// Create a CI in the repository
    Create {
        /// CI id
        #[arg(short, long)]
        id: String,
        /// CI type
        #[arg(short = 't', long = "type")]
        ci_type: String,
        /// Comma separated list of key=value (not submitted)
        properties: Option<String>,
    },

    /// Update an existing CI in the repository
    Update {
        /// CI id
        #[arg(short, long)]
        id: String,
        /// CI type
        #[arg(short = 't', long = "type")]
        ci_type: String,
        /// Comma separated list of key=value (not submitted)
        properties: Option<String>,
        /// Merge the update with the existing CI
        #[arg(short, long)]
        merge: bool,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show merged config
    Show,

    /// Create config template in the current directory
    Init {
        /// Overwrite an existing file
        #[arg(short, long)]
        force: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn given_help_when_rendered_then_names_prefixed_environment() {
        let help = Cli::command().render_long_help().to_string();

        assert!(help.contains("XLDC_HOST"));
        assert!(help.contains("Unprefixed names (USERNAME, HOST, PORT, ...) are not read"));
    }
}
