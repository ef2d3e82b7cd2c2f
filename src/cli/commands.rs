//! Command dispatch: resolve configuration, connect, run one handler

use std::io;
use std::path::{Path, PathBuf};

use clap::CommandFactory;
use clap_complete::{generate, Shell};
use tracing::{debug, instrument};

use crate::application::IoResultExt;
use crate::cli::args::{Cli, Commands, ConfigCommands, MetadataCommands, RepositoryCommands};
use crate::cli::error::{CliError, CliResult, CommandContext};
use crate::cli::output;
use crate::config::{local_config_path, FlagOverrides, Settings, SettingsLoader};
use crate::infrastructure::di::ServiceContainer;
use crate::infrastructure::traits::{FileSystem, RealFileSystem};
use crate::infrastructure::InfraError;

/// Entry point called by `main`: settings are searched in the working directory.
pub fn execute_command(cli: &Cli) -> CliResult<()> {
    let cwd = std::env::current_dir().map_err(|e| InfraError::io("current directory", e))?;
    run(cli, &settings_loader(cli, cwd))
}

/// Settings for this invocation: `xldc.*` in `dir` (or `--config`), flags on top.
pub fn settings_loader(cli: &Cli, dir: impl Into<PathBuf>) -> SettingsLoader {
    SettingsLoader::new(dir)
        .config_file(cli.config.clone())
        .overrides(FlagOverrides::from(&cli.connection))
}

/// Run one invocation with settings from `loader`.
///
/// Commands that talk to the server first resolve the connection profile
/// and probe the server; a failure there ends the run before the handler.
pub fn run(cli: &Cli, loader: &SettingsLoader) -> CliResult<()> {
    let Some(command) = &cli.command else {
        Cli::command()
            .print_help()
            .map_err(|e| InfraError::io("print help", e))?;
        return Ok(());
    };

    match command {
        Commands::Completion { shell } => {
            print_completions(*shell);
            Ok(())
        }
        Commands::Config { command } => config_command(loader, command),
        _ => {
            let services = connect(loader)?;
            dispatch(cli, command, &services)
        }
    }
}

/// Resolve the profile, wire up services and verify the server is reachable.
pub fn connect(loader: &SettingsLoader) -> CliResult<ServiceContainer> {
    let profile = loader.load()?.resolve()?;
    let services = ServiceContainer::new(profile)?;
    services.connection().verify()?;
    Ok(services)
}

/// Run the handler for a server command against services `connect` returned.
pub fn dispatch(cli: &Cli, command: &Commands, services: &ServiceContainer) -> CliResult<()> {
    let out = cli.out.as_deref();
    match command {
        Commands::Verify => verify(cli),
        Commands::Metadata { command } => match command {
            MetadataCommands::Type { name, long } => {
                metadata_type(services, out, name.as_deref(), *long)
            }
            MetadataCommands::Template { names, optional } => {
                metadata_template(services, out, names, *optional)
            }
            MetadataCommands::Orchestrators => metadata_orchestrators(services, out),
            MetadataCommands::Permissions => metadata_permissions(services, out),
        },
        Commands::Repository { command } => match command {
            RepositoryCommands::Get { id, input } => {
                repository_get(services, out, id, input.as_deref())
            }
            RepositoryCommands::Create {
                id,
                ci_type,
                properties,
            } => repository_create(services, out, id, ci_type, properties.as_deref()),
            RepositoryCommands::Update {
                id,
                ci_type,
                properties,
                merge,
            } => repository_update(services, out, id, ci_type, properties.as_deref(), *merge),
        },
        Commands::Config { .. } | Commands::Completion { .. } => Err(CliError::Usage(
            "command does not talk to the server".to_string(),
        )),
    }
}

fn print_completions(shell: Shell) {
    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();
    generate(shell, &mut cmd, name, &mut io::stdout());
}

/// The probe already ran in `connect`.
fn verify(cli: &Cli) -> CliResult<()> {
    // with --verbose the log line already says so
    if !cli.verbose {
        output::success("Connection to XL-Deploy verified");
    }
    Ok(())
}

#[instrument(skip(services))]
fn metadata_type(
    services: &ServiceContainer,
    out: Option<&Path>,
    name: Option<&str>,
    long: bool,
) -> CliResult<()> {
    let path = "xldc metadata type";
    let types = services.metadata().types(name).in_command(path)?;
    services
        .renderer(out)
        .render_types(types, !long)
        .in_command(path)
}

#[instrument(skip(services))]
fn metadata_template(
    services: &ServiceContainer,
    out: Option<&Path>,
    names: &[String],
    optional: bool,
) -> CliResult<()> {
    let path = "xldc metadata template";
    let templates = services
        .metadata()
        .templates(names, optional)
        .in_command(path)?;
    debug!("metadata_template: {} template(s)", templates.len());
    services.renderer(out).render(&templates).in_command(path)
}

#[instrument(skip(services))]
fn metadata_orchestrators(services: &ServiceContainer, out: Option<&Path>) -> CliResult<()> {
    let path = "xldc metadata orchestrators";
    let orchestrators = services.metadata().orchestrators().in_command(path)?;
    services.renderer(out).render(&orchestrators).in_command(path)
}

#[instrument(skip(services))]
fn metadata_permissions(services: &ServiceContainer, out: Option<&Path>) -> CliResult<()> {
    let path = "xldc metadata permissions";
    let permissions = services.metadata().permissions().in_command(path)?;
    services.renderer(out).render(&permissions).in_command(path)
}

#[instrument(skip(services))]
fn repository_get(
    services: &ServiceContainer,
    out: Option<&Path>,
    id: &str,
    input: Option<&Path>,
) -> CliResult<()> {
    let path = "xldc repository get";
    if let Some(input) = input {
        output::warning(&format!("--in is not used by {path}, ignoring {}", input.display()));
    }
    let ci = services.repository().get(id).in_command(path)?;
    services.renderer(out).render(&ci).in_command(path)
}

#[instrument(skip(services))]
fn repository_create(
    services: &ServiceContainer,
    out: Option<&Path>,
    id: &str,
    ci_type: &str,
    properties: Option<&str>,
) -> CliResult<()> {
    let path = "xldc repository create";
    let ci = services
        .repository()
        .create(id, ci_type, properties)
        .in_command(path)?;
    services.renderer(out).render(&ci).in_command(path)
}

#[instrument(skip(services))]
fn repository_update(
    services: &ServiceContainer,
    out: Option<&Path>,
    id: &str,
    ci_type: &str,
    properties: Option<&str>,
    merge: bool,
) -> CliResult<()> {
    let path = "xldc repository update";
    let ci = services
        .repository()
        .update(id, ci_type, properties, merge)
        .in_command(path)?;
    services.renderer(out).render(&ci).in_command(path)
}

fn config_command(loader: &SettingsLoader, command: &ConfigCommands) -> CliResult<()> {
    match command {
        ConfigCommands::Show => {
            let settings = loader.load()?;
            output::info(&settings.to_toml()?);
            Ok(())
        }
        ConfigCommands::Init { force } => {
            let written = init_config(&RealFileSystem, loader.search_dir(), *force)?;
            output::action("Created", &written.display());
            Ok(())
        }
    }
}

/// Write the config template into `dir`, refusing to overwrite unless `force`.
pub fn init_config(fs: &dyn FileSystem, dir: &Path, force: bool) -> CliResult<PathBuf> {
    let path = local_config_path(dir);
    if fs.exists(&path) && !force {
        return Err(CliError::Usage(format!(
            "{} already exists, use --force to overwrite",
            path.display()
        )));
    }
    fs.write(&path, &Settings::template())
        .with_path_context("write config", &path)?;
    Ok(path)
}
