//! Command dispatch: each subcommand wires services from the container

use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::CommandFactory;
use tracing::{debug, instrument};

use crate::application::services::{expand_inputs, CurriculumService, GraphWalker};
use crate::application::{ApplicationError, ToTermTree};
use crate::cli::args::{Cli, Commands, ConfigCommands, Inputs};
use crate::cli::error::{CliError, CliResult};
use crate::cli::output;
use crate::config::{global_config_path, local_config_path, Settings};
use crate::domain::Curriculum;
use crate::infrastructure::di::ServiceContainer;
use crate::infrastructure::{InfraError, RdfStore};

pub fn execute_command(cli: &Cli) -> CliResult<()> {
    let settings = Settings::load(cli.config.as_deref())?;
    let container = ServiceContainer::new(settings);

    match &cli.command {
        Some(Commands::Load { inputs }) => cmd_load(&container, inputs),
        Some(Commands::Tree { inputs }) => cmd_tree(&container, inputs),
        Some(Commands::Walk { paths }) => cmd_walk(&container, paths),
        Some(Commands::Place { code, inputs }) => cmd_place(&container, code, inputs),
        Some(Commands::Render { inputs, output }) => {
            cmd_render(&container, inputs, output.as_deref())
        }
        Some(Commands::Config { command }) => cmd_config(&container, command, cli.config.as_deref()),
        Some(Commands::Completion { shell }) => {
            let mut cmd = Cli::command();
            let mut script = Vec::new();
            clap_complete::generate(*shell, &mut cmd, "curriculum-tree", &mut script);
            io::stdout()
                .write_all(&script)
                .map_err(|e| InfraError::io("write completion script", e))?;
            Ok(())
        }
        None => Err(CliError::Usage(
            "no command given, run with --help for usage".into(),
        )),
    }
}

/// Load every input file, honouring `--keep-going` and `--lenient`.
#[instrument(level = "debug", skip(container))]
fn load_curriculum(container: &ServiceContainer, inputs: &Inputs) -> CliResult<Curriculum> {
    let files = expand_inputs(&inputs.paths)?;
    if files.is_empty() {
        return Err(CliError::InvalidArgs(
            "no RDF/XML files found in the given paths".into(),
        ));
    }

    let mut settings = container.settings.load.clone();
    if inputs.lenient {
        settings.strict_root = false;
    }
    let mut service = CurriculumService::new(Arc::clone(&container.fs), settings);

    let mut failed = 0;
    for file in &files {
        match service.add_file(file) {
            Ok(source) => debug!(
                "{} -> {}",
                file.display(),
                source.learning_areas.join(", ")
            ),
            Err(e) if inputs.keep_going => {
                output::warning(&format!("skipping {}: {}", file.display(), e));
                failed += 1;
            }
            Err(e) => return Err(e.into()),
        }
    }
    if failed > 0 {
        output::warning(&format!("{} of {} file(s) failed to load", failed, files.len()));
    }
    Ok(service.into_curriculum())
}

fn cmd_load(container: &ServiceContainer, inputs: &Inputs) -> CliResult<()> {
    let curriculum = load_curriculum(container, inputs)?;

    for (title, summary) in curriculum.summary() {
        output::header(title);
        output::detail(&format!("subjects:              {}", summary.subjects));
        output::detail(&format!("year levels:           {}", summary.year_levels));
        output::detail(&format!("achievement standards: {}", summary.achievement_standards));
        output::detail(&format!("strands:               {}", summary.strands));
        output::detail(&format!("sub-strands:           {}", summary.sub_strands));
        output::detail(&format!("content descriptions:  {}", summary.content_descriptions));
        output::detail(&format!("elaborations:          {}", summary.elaborations));
    }
    output::success(&format!(
        "{} learning area(s) from {} file(s)",
        curriculum.learning_areas.len(),
        curriculum.files().len()
    ));
    Ok(())
}

fn cmd_tree(container: &ServiceContainer, inputs: &Inputs) -> CliResult<()> {
    let curriculum = load_curriculum(container, inputs)?;
    output::info(&curriculum.to_term_tree());
    Ok(())
}

fn cmd_walk(container: &ServiceContainer, paths: &[PathBuf]) -> CliResult<()> {
    for file in expand_inputs(paths)? {
        let store = RdfStore::load(container.fs.as_ref(), &file)?;
        let walker = GraphWalker::new(&store);

        let roots = walker.roots();
        if roots.is_empty() {
            output::warning(&format!("{}: no root node", file.display()));
        }
        for root in roots {
            let tree = walker.walk(&root).map_err(ApplicationError::from)?;
            output::header(&file.display());
            output::info(&tree.to_term_tree());
        }
    }
    Ok(())
}

fn cmd_place(container: &ServiceContainer, code: &str, inputs: &Inputs) -> CliResult<()> {
    let curriculum = load_curriculum(container, inputs)?;
    let cd = curriculum
        .content_description(code)
        .ok_or_else(|| CliError::InvalidArgs(format!("no content description {code}")))?;
    let place = curriculum
        .place_in_hierarchy(cd)
        .map_err(ApplicationError::from)?;

    output::header(&format!("{} {}", cd.meta.code, cd.meta.title));
    output::info(&place.chain().join(" / "));
    Ok(())
}

fn cmd_render(
    container: &ServiceContainer,
    inputs: &Inputs,
    output_dir: Option<&Path>,
) -> CliResult<()> {
    let curriculum = load_curriculum(container, inputs)?;
    let renderer = container.renderer()?;
    let out = output_dir
        .map(Path::to_path_buf)
        .unwrap_or_else(|| container.settings.render.output_dir.clone());

    let report = renderer.render(&curriculum, &out)?;

    output::action("Index", &report.index.display());
    output::success(&format!(
        "{} content description page(s) in {}",
        report.pages.len(),
        out.display()
    ));
    Ok(())
}

fn cmd_config(
    container: &ServiceContainer,
    command: &ConfigCommands,
    explicit: Option<&Path>,
) -> CliResult<()> {
    match command {
        ConfigCommands::Show => {
            output::info(&container.settings.to_toml()?);
        }
        ConfigCommands::Template => {
            output::info(&Settings::template());
        }
        ConfigCommands::Path => {
            let local = explicit
                .map(Path::to_path_buf)
                .unwrap_or_else(|| local_config_path(Path::new(".")));
            match global_config_path() {
                Some(global) => show_path(container, "Global", &global),
                None => output::failure(&"Global: no config directory on this platform"),
            }
            show_path(container, "Local", &local);
        }
    }
    Ok(())
}

fn show_path(container: &ServiceContainer, label: &str, path: &Path) {
    let state = if container.fs.exists(path) {
        "exists"
    } else {
        "not found"
    };
    output::action(label, &format!("{} ({})", path.display(), state));
}
