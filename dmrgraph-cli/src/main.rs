mod adapters;
mod cli;
mod commands;
mod output;

use clap::{CommandFactory, Parser};
use cli::{Cli, Commands};
use output::OutputConfig;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().with_writer(std::io::stderr).init();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            if e.kind() == clap::error::ErrorKind::DisplayHelp || e.kind() == clap::error::ErrorKind::DisplayVersion {
                e.exit();
            }
            eprint!("{e}");
            std::process::exit(e.exit_code());
        }
    };

    let out = OutputConfig { output: cli.output };

    match cli.command {
        Commands::Run(args) => commands::run::run(
            &args.rows,
            &args.timepoint,
            args.cover.as_deref(),
            args.dmr_offset,
            args.gene_id_base,
            &out,
        ),
        Commands::ShowGraph(args) => {
            commands::show_graph::show_graph(&args.rows, &args.timepoint, args.dmr_offset, &out)
        }
        Commands::Inspect { rows } => commands::inspect::inspect(&rows, &out),
        Commands::Completions { shell } => {
            let shell = shell.or_else(clap_complete::Shell::from_env).unwrap_or(clap_complete::Shell::Bash);
            let mut cmd = Cli::command();
            clap_complete::generate(shell, &mut cmd, "dmr", &mut std::io::stdout());
            Ok(())
        }
    }
}
