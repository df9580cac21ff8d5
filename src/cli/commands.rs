use std::io;
use std::path::{Path, PathBuf};

use clap::CommandFactory;
use clap_complete::generate;
use tracing::{debug, instrument};

use crate::application::services::CatalogService;
use crate::cli::args::{Cli, Commands, ConfigCommands};
use crate::cli::error::{CliError, CliResult};
use crate::cli::menu::{preload_catalog, run_menu};
use crate::cli::output;
use crate::config::{global_config_path, local_config_path, Settings};
use crate::exitcode;
use crate::infrastructure::{InfraError, ServiceContainer};

/// Run the parsed command line and return the process exit code.
pub fn execute_command(cli: &Cli) -> CliResult<i32> {
    let project_dir = cli
        .project_dir
        .clone()
        .unwrap_or_else(|| PathBuf::from("."));
    let settings = Settings::load(Some(project_dir.as_path()))?;
    debug!("settings: {:?}", settings);
    let container = ServiceContainer::new(settings);

    match &cli.command {
        None => _menu(&container, None),
        Some(Commands::Menu { file }) => _menu(&container, file.as_deref()),
        Some(Commands::List { file }) => _list(&container, file),
        Some(Commands::Search { file, number }) => _search(&container, file, number),
        Some(Commands::Tree { file, depth }) => _tree(&container, file, *depth),
        Some(Commands::Config { command }) => _config(&container.settings, command, &project_dir),
        Some(Commands::Completion { shell }) => {
            let mut cmd = Cli::command();
            let name = cmd.get_name().to_string();
            generate(*shell, &mut cmd, name, &mut io::stdout());
            Ok(exitcode::OK)
        }
    }
}

/// Build a service and load `file` into it, reporting malformed rows as warnings.
fn loaded_service(container: &ServiceContainer, file: &Path) -> CliResult<CatalogService> {
    let mut service = container.catalog_service()?;
    let report = service.load_path(file)?;
    for err in &report.errors {
        output::warning(err);
    }
    debug!(
        "loaded {} courses, {} duplicates skipped",
        report.inserted, report.skipped_duplicates
    );
    Ok(service)
}

#[instrument(skip(container))]
fn _list(container: &ServiceContainer, file: &Path) -> CliResult<i32> {
    let service = loaded_service(container, file)?;
    for line in service.list() {
        output::info(&line);
    }
    Ok(exitcode::OK)
}

#[instrument(skip(container))]
fn _search(container: &ServiceContainer, file: &Path, number: &str) -> CliResult<i32> {
    let service = loaded_service(container, file)?;
    for line in service.search_lines(number) {
        output::info(&line);
    }
    Ok(if service.search(number).is_some() {
        exitcode::OK
    } else {
        exitcode::NOT_FOUND
    })
}

#[instrument(skip(container))]
fn _tree(container: &ServiceContainer, file: &Path, depth: usize) -> CliResult<i32> {
    let service = loaded_service(container, file)?;
    output::header(&format!("{} courses", service.index().len()));
    output::info(&service.tree(depth));
    Ok(exitcode::OK)
}

#[instrument(skip(container))]
fn _menu(container: &ServiceContainer, file: Option<&Path>) -> CliResult<i32> {
    let mut service = container.catalog_service()?;
    if let Some(path) = file.or(container.settings.catalog.as_deref()) {
        preload_catalog(&mut service, path, io::stdout())?;
    }
    let stdin = io::stdin();
    run_menu(&mut service, stdin.lock(), io::stdout())?;
    Ok(exitcode::OK)
}

#[instrument(skip(settings))]
fn _config(settings: &Settings, command: &ConfigCommands, project_dir: &Path) -> CliResult<i32> {
    match command {
        ConfigCommands::Show => {
            output::info(&settings.to_toml()?);
        }
        ConfigCommands::Path => {
            match global_config_path() {
                Some(path) => output::action("global", &path.display()),
                None => output::action("global", &"<no config directory>"),
            }
            output::action("local", &local_config_path(project_dir).display());
        }
        ConfigCommands::Init { global } => {
            let path = if *global {
                global_config_path().ok_or_else(|| {
                    CliError::Usage("cannot determine global config directory".to_string())
                })?
            } else {
                local_config_path(project_dir)
            };
            if path.exists() {
                return Err(CliError::Usage(format!(
                    "config already exists: {}",
                    path.display()
                )));
            }
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)
                    .map_err(|e| InfraError::io(format!("create {}", parent.display()), e))?;
            }
            std::fs::write(&path, Settings::template())
                .map_err(|e| InfraError::io(format!("write {}", path.display()), e))?;
            output::success(&format!("Created {}", path.display()));
        }
    }
    Ok(exitcode::OK)
}
