use crate::cli::Cli;
use crate::graph::{BuildOptions, Manifest};
use crate::report;
use std::env;
use std::path::{Path, PathBuf};

/// Run the CLI logic in-process.
///
/// Returns an exit code (0 = success). The only fatal conditions live here:
/// an invalid target directory and an unwritable manifest path.
#[must_use]
pub fn run_cli(cli: Cli) -> i32 {
    let target = match cli.directory.as_deref() {
        Some(dir) => PathBuf::from(dir),
        None => env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
    };
    if !target.is_dir() {
        eprintln!(
            "Target directory does not exist or is not a directory: {}",
            target.display()
        );
        return 1;
    }

    let config = match cli.config.as_deref() {
        Some(path) => crate::utils::config::load_config_at(Path::new(path)),
        None => crate::utils::config::load_config_near(&target),
    };

    let mut opts = BuildOptions::default();
    if let Some(cfg) = &config {
        if let Some(dirs) = &cfg.skip_dirs {
            opts.indexer.skip_dirs.extend(dirs.iter().cloned());
        }
        if let Some(exts) = &cfg.script_extensions {
            opts.indexer.script_extensions.extend(exts.iter().cloned());
        }
        if let Some(output) = &cfg.output {
            opts.output_name = output.clone();
        }
    }
    if let Some(output) = cli.output {
        opts.output_name = output;
    }

    let mut manifest = match Manifest::build_with_options(&target, &opts) {
        Ok(m) => m,
        Err(e) => {
            eprintln!("Build failed: {e}");
            return 1;
        }
    };

    if cli.no_weak_edges {
        report::strip_weak_edges(&mut manifest);
    }
    if cli.filter_unused {
        report::filter_unused(&mut manifest);
    }

    let manifest_path = target.join(&opts.output_name);
    if let Err(e) = manifest.save_json(&manifest_path) {
        eprintln!("Failed to write manifest {}: {e}", manifest_path.display());
        return 1;
    }

    if !cli.quiet {
        // Summarize what actually landed on disk.
        let loaded = Manifest::load_json(&manifest_path).unwrap_or(manifest);
        report::print_summary(&loaded);
    }
    0
}
