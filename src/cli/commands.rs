use std::io;
use std::path::Path;

use clap::CommandFactory;
use clap_complete::{generate, Shell};
use tracing::{debug, instrument};

use crate::application::services::ConflictPolicy;
use crate::application::template::placeholder_key;
use crate::application::Template;
use crate::cli::args::{Cli, Commands, ConfigCommands, SourceArgs};
use crate::cli::error::{CliError, CliResult};
use crate::cli::output;
use crate::config::{global_config_path, Settings};
use crate::domain::{DirectoryTree, TreeRender};
use crate::infrastructure::di::ServiceContainer;
use crate::infrastructure::InfraError;

pub fn execute_command(cli: &Cli) -> CliResult<()> {
    let Some(command) = &cli.command else {
        return Err(CliError::Usage("no command given, see --help".into()));
    };

    let settings = Settings::load(cli.config.as_deref())?;
    let container = ServiceContainer::new(settings);

    match command {
        Commands::Show { source, max_depth } => cmd_show(&container, source, *max_depth),
        Commands::Build {
            source,
            output,
            template,
            set,
        } => cmd_build(&container, source, output, template.as_deref(), set),
        Commands::Export {
            source,
            output,
            root_key,
            on_conflict,
        } => {
            let policy = on_conflict.unwrap_or(container.settings.conflict_policy);
            cmd_export(&container, source, output, root_key.as_deref(), policy)
        }
        Commands::Roots { file } => cmd_roots(&container, file),
        Commands::Config { command } => match command {
            ConfigCommands::Show => cmd_config_show(&container),
            ConfigCommands::Path => cmd_config_path(),
        },
        Commands::Completion { shell } => {
            print_completions(*shell);
            Ok(())
        }
    }
}

fn print_completions(shell: Shell) {
    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();
    generate(shell, &mut cmd, name, &mut io::stdout());
}

/// Loads the tree named by `args` and narrows it to `--node` if given.
fn load_tree(container: &ServiceContainer, args: &SourceArgs) -> CliResult<DirectoryTree> {
    let tree = if container.fs.is_dir(&args.source) {
        container.import.from_directory(&args.source)?
    } else if !container.fs.is_file(&args.source) {
        return Err(CliError::InvalidArgs(format!(
            "no such file or directory: {}",
            args.source.display()
        )));
    } else {
        let root = args.root.as_deref().ok_or_else(|| {
            CliError::InvalidArgs(format!(
                "--root is required when reading the document {}",
                args.source.display()
            ))
        })?;
        container.import.from_document(&args.source, root)?
    };

    match &args.node {
        Some(node) => {
            let id = tree.find_path(node.split('/').filter(|part| !part.is_empty()))?;
            debug!("load_tree: narrowing to {:?}", node);
            Ok(tree.subtree(id)?)
        }
        None => Ok(tree),
    }
}

#[instrument(level = "debug", skip(container))]
fn cmd_show(container: &ServiceContainer, source: &SourceArgs, max_depth: Option<usize>) -> CliResult<()> {
    let tree = load_tree(container, source)?;
    let depth = max_depth.or(container.settings.max_depth);
    output::info(&tree.render(tree.root(), depth)?);
    Ok(())
}

#[instrument(level = "debug", skip(container))]
fn cmd_build(
    container: &ServiceContainer,
    source: &SourceArgs,
    output_dir: &Path,
    template: Option<&Path>,
    set: &[(String, String)],
) -> CliResult<()> {
    let tree = load_tree(container, source)?;
    let template = match template {
        Some(path) => Template::load(container.fs.as_ref(), path)?,
        None => container.template()?,
    };

    let mut extra = container.settings.placeholders();
    extra.extend(set.iter().map(|(k, v)| (placeholder_key(k), Some(v.clone()))));

    container
        .fs
        .create_dir_all(output_dir)
        .map_err(|e| InfraError::io(format!("create output directory: {}", output_dir.display()), e))?;

    let created = container
        .readme
        .materialize(&tree, tree.root(), output_dir, &template, &extra)?;
    output::success(&format!(
        "Created {} ({} directories)",
        created.display(),
        tree.node_count()
    ));
    Ok(())
}

#[instrument(level = "debug", skip(container))]
fn cmd_export(
    container: &ServiceContainer,
    source: &SourceArgs,
    output_file: &Path,
    root_key: Option<&str>,
    policy: ConflictPolicy,
) -> CliResult<()> {
    let tree = load_tree(container, source)?;
    let root = tree.root();
    let key = match root_key {
        Some(key) => key.to_string(),
        None => tree.name(root)?.to_string(),
    };

    container
        .documents
        .export_document(&tree, root, output_file, &key, policy)?;
    output::action("Exported", &format!("{} -> {}", key, output_file.display()));
    Ok(())
}

fn cmd_roots(container: &ServiceContainer, file: &Path) -> CliResult<()> {
    let names = container.import.root_names(file)?;
    output::header(&format!("Roots in {}", file.display()));
    if names.is_empty() {
        output::warning("document is empty");
    }
    for name in names {
        output::detail(&name);
    }
    Ok(())
}

fn cmd_config_show(container: &ServiceContainer) -> CliResult<()> {
    output::info(&container.settings.to_toml()?);
    Ok(())
}

fn cmd_config_path() -> CliResult<()> {
    match global_config_path() {
        Some(path) => output::info(&path.display()),
        None => output::warning("no config directory available on this platform"),
    }
    Ok(())
}
