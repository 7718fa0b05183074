//! Command dispatch

use std::io::{self, Write};
use std::path::Path;

use clap::CommandFactory;
use clap_complete::{generate, Shell};
use itertools::Itertools;
use tracing::{debug, instrument};

use crate::application::Pivots;
use crate::cli::args::{Cli, Commands, ConfigCommands};
use crate::cli::output;
use crate::cli::{CliError, CliResult};
use crate::config::{global_config_path, local_config_path, Settings};
use crate::domain::{TargetSet, TieBreak, TreeArena};
use crate::infrastructure::di::ServiceContainer;
use crate::infrastructure::InfraError;

pub fn execute_command(cli: &Cli) -> CliResult<()> {
    let dir = match &cli.dir {
        Some(dir) => dir.clone(),
        None => std::env::current_dir()
            .map_err(|e| InfraError::io("resolve working directory", e))?,
    };

    match &cli.command {
        Some(Commands::Pivots {
            tree,
            targets,
            tie_break,
        }) => pivots(&services(&dir)?, tree, targets, *tie_break),
        Some(Commands::Extract {
            tree,
            targets,
            neighbors,
            cuts,
            tree_out,
            tie_break,
        }) => extract(
            &services(&dir)?,
            tree,
            targets,
            neighbors,
            cuts,
            tree_out.as_deref(),
            *tie_break,
        ),
        Some(Commands::Leaves { tree }) => leaves(&services(&dir)?, tree),
        Some(Commands::Config { command }) => config(command, &dir),
        Some(Commands::Completion { shell }) => completion(*shell),
        None => Err(CliError::Usage(
            "no command given, run with --help for usage".to_string(),
        )),
    }
}

fn services(dir: &Path) -> CliResult<ServiceContainer> {
    let settings = Settings::load(Some(dir))?;
    debug!(?settings, "settings loaded");
    Ok(ServiceContainer::new(settings))
}

#[instrument(skip(container))]
fn pivots(
    container: &ServiceContainer,
    tree_path: &Path,
    targets_path: &Path,
    tie_break: Option<TieBreak>,
) -> CliResult<()> {
    let tree = container.pivots.load_tree(tree_path)?;
    let targets = container.pivots.load_targets(targets_path)?;
    let tie_break = tie_break.unwrap_or(container.settings.tie_break);

    let pivots = container.pivots.find_pivots(&tree, &targets, tie_break)?;
    print_pivots(&tree, &pivots);
    Ok(())
}

#[allow(clippy::too_many_arguments)]
#[instrument(skip(container))]
fn extract(
    container: &ServiceContainer,
    tree_path: &Path,
    targets_path: &Path,
    neighbors_path: &Path,
    cuts: &[String],
    tree_out: Option<&Path>,
    tie_break: Option<TieBreak>,
) -> CliResult<()> {
    let cuts = cuts
        .iter()
        .map(|cut| parse_cut(cut))
        .collect::<CliResult<Vec<_>>>()?;

    let mut tree = container.pivots.load_tree(tree_path)?;
    let targets = container.pivots.load_targets(targets_path)?;
    let tie_break = tie_break.unwrap_or(container.settings.tie_break);

    let pivots = container.pivots.find_pivots(&tree, &targets, tie_break)?;
    print_pivots(&tree, &pivots);

    let extraction = container.extract.extract_neighbors(&mut tree, &cuts)?;
    if extraction.neighbors.is_empty() {
        output::warning("no named leaves remain");
    }

    output::header("Neighbors");
    output::detail(&format!(
        "You have removed {} of {} leaves.",
        extraction.removed_leaves, extraction.total_leaves
    ));
    let joined = extraction
        .neighbors
        .iter()
        .join(&container.settings.separator);
    writeln!(io::stdout().lock(), "{}", joined)
        .map_err(|e| InfraError::io("print neighbors", e))?;

    container
        .extract
        .write_neighbors(neighbors_path, &extraction)?;
    output::success(&format!("neighbors written to {}", neighbors_path.display()));

    if let Some(path) = tree_out {
        container.extract.write_tree(path, &tree)?;
        output::success(&format!("pruned tree written to {}", path.display()));
    }
    Ok(())
}

#[instrument(skip(container))]
fn leaves(container: &ServiceContainer, tree_path: &Path) -> CliResult<()> {
    let tree = container.pivots.load_tree(tree_path)?;
    let mut stdout = io::stdout().lock();
    for name in tree.leaf_names() {
        writeln!(stdout, "{}", name).map_err(|e| InfraError::io("print leaves", e))?;
    }
    Ok(())
}

fn config(command: &ConfigCommands, dir: &Path) -> CliResult<()> {
    match command {
        ConfigCommands::Show => {
            let settings = Settings::load(Some(dir))?;
            print!("{}", settings.to_toml()?);
        }
        ConfigCommands::Path => {
            let global = global_config_path()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|| "<unavailable>".to_string());
            output::action("global", &global);
            output::action("local", &local_config_path(dir).display());
        }
        ConfigCommands::Template => print!("{}", Settings::template()),
    }
    Ok(())
}

fn completion(shell: Shell) -> CliResult<()> {
    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();
    generate(shell, &mut cmd, name, &mut io::stdout());
    Ok(())
}

/// Parse a `--cut` value: comma-separated leaf names.
pub fn parse_cut(value: &str) -> CliResult<TargetSet> {
    let names: TargetSet = value
        .split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .collect();
    if names.is_empty() {
        return Err(CliError::InvalidArgs(format!(
            "--cut needs at least one leaf name, got '{}'",
            value
        )));
    }
    debug!(?names, "parsed cut");
    Ok(names)
}

fn print_pivots(tree: &TreeArena, pivots: &Pivots) {
    output::header("Pivots");
    output::detail(&format!(
        "{} targets among {} leaves",
        pivots.target_count, pivots.total_leaves
    ));
    output::pivot_all(
        "MRCA of all targets",
        &format!(
            "{} ({} leaves)",
            tree.describe(pivots.mrca_all),
            pivots.mrca_all_leaves
        ),
    );
    output::pivot_majority(
        "MRCA of the majority of targets",
        &format!(
            "{} ({} leaves)",
            tree.describe(pivots.mrca_majority),
            pivots.mrca_majority_leaves
        ),
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_cut_splits_and_trims() {
        let names = parse_cut(" A, B ,,C").unwrap();
        assert_eq!(names.len(), 3);
        assert!(names.contains("B"));
    }

    #[test]
    fn test_parse_cut_rejects_empty() {
        assert!(matches!(parse_cut(" , "), Err(CliError::InvalidArgs(_))));
    }
}
