use clap::{Args, Parser};

#[derive(Debug, Parser)]
#[command(author, version, about)]
pub struct Cli {
    #[command(flatten)]
    pub build: BuildArgs,
}

#[derive(Debug, Args)]
pub struct BuildArgs {
    /// Source root containing `SUMMARY.md`, `README.md` and `book.json`.
    #[arg(default_value = ".")]
    pub source: String,

    /// Output directory (default: `<SOURCE>/_book`). Recreated on every build.
    #[arg(long)]
    pub out: Option<String>,
}
