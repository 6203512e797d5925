use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "dmr",
    about = "Run and inspect the DMR/gene bipartite graph pipeline",
    version,
    after_help = "\
Typical workflow:
  dmr run rows.jsonl --timepoint P0 --cover P0_bicliques.txt
  dmr show-graph rows.jsonl --timepoint P0
  dmr inspect rows.jsonl

Rows file: one JSON object per line, e.g.:
  {\"dmr_number\": 0, \"nearby_gene\": \"Brca1\", \"area_stat\": 1.2}

Enable tab completion:
  eval \"$(dmr completions)\"     # add to ~/.bashrc or ~/.zshrc"
)]
pub struct Cli {
    /// Output file path (implies JSON output)
    #[arg(long, short, global = true)]
    pub output: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the full pipeline over one timepoint's rows and print a summary
    #[command(after_help = "\
Examples:
  dmr run rows.jsonl --timepoint P0
  dmr run rows.jsonl --timepoint P0 --cover P0_bicliques.txt
  dmr run rows.jsonl --timepoint P0 --dmr-offset 10000 -o result.json")]
    Run(RunArgs),

    /// Build and print the bipartite graph for one timepoint, without a cover
    #[command(after_help = "\
Examples:
  dmr show-graph rows.jsonl --timepoint P0
  dmr show-graph rows.jsonl --timepoint P0 -o graph.json")]
    ShowGraph(ShowGraphArgs),

    /// Print row and gene-symbol counts for a rows file
    #[command(after_help = "Examples:\n  dmr inspect rows.jsonl")]
    Inspect {
        /// Rows file (one JSON object per line)
        rows: PathBuf,
    },

    /// Print shell completions to stdout (auto-detects shell)
    #[command(after_help = "\
Setup: add one line to your shell rc file:

  # bash (~/.bashrc)
  eval \"$(dmr completions bash)\"

  # zsh (~/.zshrc)
  eval \"$(dmr completions zsh)\"

  # fish (~/.config/fish/config.fish)
  dmr completions fish | source")]
    Completions {
        /// Shell type (bash, zsh, fish, etc.). Auto-detected if omitted.
        shell: Option<clap_complete::Shell>,
    },
}

#[derive(clap::Args)]
pub struct RunArgs {
    /// Rows file (one JSON object per line)
    pub rows: PathBuf,
    /// Timepoint name
    #[arg(long)]
    pub timepoint: String,
    /// Biclique cover file; omitted means a MissingCover downgrade
    #[arg(long)]
    pub cover: Option<PathBuf>,
    /// First DMR id reserved for this timepoint [default: 0]
    #[arg(long, default_value_t = 0)]
    pub dmr_offset: u64,
    /// First gene NodeId; all values below this are DMR ids
    #[arg(long, default_value_t = dmrgraph::config::DEFAULT_GENE_ID_BASE)]
    pub gene_id_base: u64,
}

#[derive(clap::Args)]
pub struct ShowGraphArgs {
    /// Rows file (one JSON object per line)
    pub rows: PathBuf,
    /// Timepoint name
    #[arg(long)]
    pub timepoint: String,
    /// First DMR id reserved for this timepoint [default: 0]
    #[arg(long, default_value_t = 0)]
    pub dmr_offset: u64,
}
