use std::{path::PathBuf, process::ExitCode};

use clap::Parser;
use colored::Colorize;
use env_logger::Env;
use log::error;

use keil2vscode::{
    config::{COMPILER_PATH_ENV, ToolConfig},
    ctx::{AppContext, PathConfig, RunOutcome},
    properties::UpdateOutcome,
};

/// Generate or update VS Code c_cpp_properties.json from a Keil .uvprojx project.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Cli {
    /// Directory searched for the .uvprojx file.
    #[arg(short, long, default_value = ".")]
    src_dir: PathBuf,
    /// Target .vscode directory.
    #[arg(short = 'v', long, default_value = ".vscode")]
    vscode_dir: PathBuf,
    /// Configuration entry name. Defaults to the .uvprojx file name.
    #[arg(long)]
    config_name: Option<String>,
    /// Generate a .editorconfig in the source directory.
    #[arg(long)]
    create_editorconfig: bool,
    /// Add a "Default" entry when c_cpp_properties.json has to be created.
    #[arg(long)]
    create_default_config: bool,
    /// Compiler written into compilerPath. Overrides the environment and config file.
    #[arg(long)]
    compiler_path: Option<String>,
    /// TOML config file. Defaults to .keil2vscode.toml in the source directory.
    #[arg(short, long)]
    config: Option<PathBuf>,
}

fn run(cli: Cli) -> anyhow::Result<RunOutcome> {
    let tool = ToolConfig::resolve(
        cli.config.as_deref(),
        &cli.src_dir,
        std::env::var(COMPILER_PATH_ENV).ok(),
        cli.compiler_path,
    )?;

    let ctx = AppContext {
        paths: PathConfig {
            src_dir: cli.src_dir,
            vscode_dir: cli.vscode_dir,
        },
        tool,
        config_name: cli.config_name,
        create_editorconfig: cli.create_editorconfig,
        create_default: cli.create_default_config,
    };
    ctx.run()
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(Env::default().default_filter_or("info"))
        .format_timestamp(None)
        .init();

    let cli = Cli::parse();

    match run(cli) {
        Ok(RunOutcome::NoDescriptor) => ExitCode::SUCCESS,
        Ok(RunOutcome::Updated {
            properties,
            name,
            outcome,
            ..
        }) => {
            let action = match outcome {
                UpdateOutcome::Created => "Created",
                UpdateOutcome::Updated => "Updated",
            };
            println!(
                "{}",
                format!("{action} configuration '{name}' in {}", properties.display())
                    .green()
                    .bold()
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("{e:#}");
            println!("{}", "Conversion aborted.".red());
            ExitCode::FAILURE
        }
    }
}
