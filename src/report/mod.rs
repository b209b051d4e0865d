//! Rendering and post-filters for a built manifest.
use crate::graph::Manifest;

/// Drop weak edges (`related_files` / `mentioned_by`) from the manifest.
pub fn strip_weak_edges(manifest: &mut Manifest) {
    for script in &mut manifest.scripts {
        script.related_files.clear();
    }
    for info in &mut manifest.files {
        info.mentioned_by.clear();
    }
}

/// Drop files with no relationships at all.
pub fn filter_unused(manifest: &mut Manifest) {
    manifest.files.retain(|info| {
        !info.read_by.is_empty() || !info.written_by.is_empty() || !info.mentioned_by.is_empty()
    });
}

fn print_set(label: &str, items: &std::collections::BTreeSet<String>) {
    if items.is_empty() {
        return;
    }
    println!("    {label}:");
    for item in items {
        println!("      - {item}");
    }
}

/// Pretty-print a human-readable summary of the manifest.
pub fn print_summary(manifest: &Manifest) {
    let bar = "=".repeat(80);
    println!("{bar}");
    println!("Directory Manifest Summary");
    println!("{bar}");
    println!("Root directory: {}", manifest.root);
    println!("Generated at : {}", manifest.generated_at);
    println!("Total scripts  : {}", manifest.scripts.len());
    println!("Total files    : {}", manifest.files.len());
    println!();

    println!("Scripts:");
    println!("--------");
    if manifest.scripts.is_empty() {
        println!("No scripts found under this root.");
    } else {
        for script in &manifest.scripts {
            println!("- {}", script.path);
            print_set("reads", &script.reads);
            print_set("writes", &script.writes);
            print_set("unresolved_reads (source files don't exist)", &script.unresolved_reads);
            print_set("unresolved_writes (target files don't exist yet)", &script.unresolved_writes);
            print_set("heuristic_writes (medium-confidence pattern inference)", &script.heuristic_writes);
            print_set("related_files (basename matches, weaker signal)", &script.related_files);
            if script.reads.is_empty()
                && script.writes.is_empty()
                && script.unresolved_reads.is_empty()
                && script.unresolved_writes.is_empty()
                && script.heuristic_writes.is_empty()
                && script.related_files.is_empty()
            {
                println!("    (no detectable relationships)");
            }
        }
        println!();
    }

    println!("Files:");
    println!("------");
    if manifest.files.is_empty() {
        println!("No files found under this root.");
    } else {
        for info in &manifest.files {
            println!("- {}", info.path);
            print_set("read_by", &info.read_by);
            print_set("written_by", &info.written_by);
            print_set("mentioned_by (basename string match)", &info.mentioned_by);
            if info.read_by.is_empty() && info.written_by.is_empty() && info.mentioned_by.is_empty()
            {
                println!("    (no scripts detected using or mentioning this file)");
            }
        }
        println!();
    }

    println!("{bar}");
    println!("End of manifest summary");
    println!("{bar}");
}
