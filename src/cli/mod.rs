use clap::Parser;

#[derive(Debug, Parser)]
#[command(
    name = "dir-manifest",
    version,
    about = "Generate a manifest of file relationships in a directory",
    long_about = "Index all files under a directory, analyze Python scripts for read/write \
references, and write a JSON manifest plus a human-readable summary. Traversal skips \
common dependency/cache directories and simple directory names listed in .gitignore."
)]
pub struct Cli {
    /// Target directory (default: current working directory)
    pub directory: Option<String>,

    /// Skip pretty-print output to stdout, just write the JSON manifest
    #[arg(short, long, default_value_t = false)]
    pub quiet: bool,

    /// Suppress related_files and mentioned_by (weak edges)
    #[arg(long, default_value_t = false)]
    pub no_weak_edges: bool,

    /// Exclude files with no relationships from output
    #[arg(long, default_value_t = false)]
    pub filter_unused: bool,

    /// Manifest output filename, written inside the target directory
    #[arg(long, value_name = "NAME")]
    pub output: Option<String>,

    /// Path to a TOML configuration file
    #[arg(long)]
    pub config: Option<String>,
}

#[must_use]
pub fn parse() -> Cli {
    Cli::parse()
}
