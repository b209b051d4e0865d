//! Naming-convention inference rules.
//!
//! Post-processing passes that recognize project-specific naming conventions
//! and promote weak evidence into inferred edges. Each rule scans for files
//! matching a fixed suffix pattern, reconstructs the expected companion
//! filename from the stem, and links any script already reading or mentioning
//! the companion to the derived output. Rules are additive, idempotent (set
//! membership), and independent of each other, but they must run only after
//! all strong and weak edges for all scripts exist.
use super::{FileEntry, Manifest, ScriptEntry};
use crate::indexer::basename;

const PROFILE_REPORT_SUFFIX: &str = "_ydata_report.html";
const JSONL_CONVERTER_SCRIPT: &str = "jsonl_to_simple_tabular.py";

/// Run every inference rule over a fully aggregated manifest.
pub fn apply_rules(manifest: &mut Manifest) {
    infer_profile_reports(manifest);
    infer_jsonl_tabular(manifest);
}

/// Profile-report convention: scripts that read `{stem}.csv` under a `DATA`
/// path generate `{stem}_ydata_report.html` under a `PROFILES` path.
pub fn infer_profile_reports(manifest: &mut Manifest) {
    let inventory: Vec<String> = manifest.files.iter().map(|f| f.path.clone()).collect();
    let reports: Vec<String> = inventory
        .iter()
        .filter(|p| p.ends_with(PROFILE_REPORT_SUFFIX) && p.contains("PROFILES"))
        .cloned()
        .collect();

    let Manifest { scripts, files, .. } = manifest;
    for report in &reports {
        let name = basename(report);
        let stem = &name[..name.len() - PROFILE_REPORT_SUFFIX.len()];
        let csv_name = format!("{stem}.csv");
        let csv_candidates: Vec<&String> =
            inventory.iter().filter(|p| p.ends_with(&csv_name) && p.contains("DATA")).collect();

        for csv in csv_candidates {
            for script in scripts.iter_mut() {
                if script.reads.contains(csv.as_str()) || script.related_files.contains(csv.as_str())
                {
                    script.heuristic_writes.insert(report.clone());
                    if let Some(info) = file_entry_mut(files, report) {
                        info.written_by.insert(script.path.clone());
                    }
                }
            }
        }
    }
}

/// JSONL conversion convention: `jsonl_to_simple_tabular.py` turns
/// `{stem}.jsonl` into `{stem}_scalar.csv` and `{stem}_nested_fields.csv`.
/// Mentioned JSONL inputs are promoted to strong reads along the way.
pub fn infer_jsonl_tabular(manifest: &mut Manifest) {
    let inventory: Vec<String> = manifest.files.iter().map(|f| f.path.clone()).collect();

    let Manifest { scripts, files, .. } = manifest;
    for script in scripts.iter_mut() {
        if !script.path.ends_with(JSONL_CONVERTER_SCRIPT) {
            continue;
        }
        let jsonl_inputs: Vec<String> = script
            .reads
            .iter()
            .chain(script.related_files.iter())
            .filter(|p| p.ends_with(".jsonl"))
            .cloned()
            .collect();
        if jsonl_inputs.is_empty() {
            continue;
        }

        for path in &jsonl_inputs {
            script.reads.insert(path.clone());
            if let Some(info) = file_entry_mut(files, path) {
                info.read_by.insert(script.path.clone());
            }
        }

        for path in &jsonl_inputs {
            let name = basename(path);
            let stem = name.strip_suffix(".jsonl").unwrap_or(name);
            for out_name in [format!("{stem}_scalar.csv"), format!("{stem}_nested_fields.csv")] {
                for candidate in inventory.iter().filter(|p| p.ends_with(&out_name)) {
                    script.heuristic_writes.insert(candidate.clone());
                    if let Some(info) = file_entry_mut(files, candidate) {
                        info.written_by.insert(script.path.clone());
                    }
                }
            }
        }
    }
}

/// Binary search into the path-sorted file list.
fn file_entry_mut<'a>(files: &'a mut [FileEntry], path: &str) -> Option<&'a mut FileEntry> {
    let idx = files.binary_search_by(|f| f.path.as_str().cmp(path)).ok()?;
    Some(&mut files[idx])
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    fn file(path: &str) -> FileEntry {
        FileEntry { path: path.to_string(), ..FileEntry::default() }
    }

    fn script(path: &str) -> ScriptEntry {
        ScriptEntry { path: path.to_string(), ..ScriptEntry::default() }
    }

    fn manifest(scripts: Vec<ScriptEntry>, mut files: Vec<FileEntry>) -> Manifest {
        files.sort_by(|a, b| a.path.cmp(&b.path));
        let mut scripts = scripts;
        scripts.sort_by(|a, b| a.path.cmp(&b.path));
        Manifest { root: "/proj".to_string(), generated_at: String::new(), scripts, files }
    }

    fn profile_fixture() -> Manifest {
        let mut s = script("scripts/profile.py");
        s.reads.insert("DATA/bank-full.csv".to_string());
        manifest(
            vec![s],
            vec![
                file("DATA/bank-full.csv"),
                file("PROFILES/bank-full_ydata_report.html"),
                file("scripts/profile.py"),
            ],
        )
    }

    #[test]
    fn profile_report_rule_links_reader_to_report() {
        let mut m = profile_fixture();
        apply_rules(&mut m);

        let s = &m.scripts[0];
        assert!(s.heuristic_writes.contains("PROFILES/bank-full_ydata_report.html"));
        let report = m.files.iter().find(|f| f.path.ends_with(".html")).unwrap();
        assert!(report.written_by.contains("scripts/profile.py"));
    }

    #[test]
    fn profile_report_rule_accepts_mention_evidence() {
        let mut m = profile_fixture();
        let csv = "DATA/bank-full.csv".to_string();
        m.scripts[0].reads.clear();
        m.scripts[0].related_files.insert(csv);
        apply_rules(&mut m);
        assert!(m.scripts[0].heuristic_writes.contains("PROFILES/bank-full_ydata_report.html"));
    }

    #[test]
    fn profile_report_rule_requires_both_conventions() {
        // Report outside PROFILES, or CSV outside DATA: no inference.
        let mut s = script("p.py");
        s.reads.insert("raw/bank.csv".to_string());
        let mut m = manifest(
            vec![s],
            vec![file("raw/bank.csv"), file("out/bank_ydata_report.html"), file("p.py")],
        );
        apply_rules(&mut m);
        assert!(m.scripts[0].heuristic_writes.is_empty());
    }

    #[test]
    fn jsonl_rule_promotes_mention_to_read_and_adds_outputs() {
        let mut s = script("tools/jsonl_to_simple_tabular.py");
        s.related_files.insert("dumps/events.jsonl".to_string());
        let mut m = manifest(
            vec![s],
            vec![
                file("dumps/events.jsonl"),
                file("dumps/events_nested_fields.csv"),
                file("dumps/events_scalar.csv"),
                file("tools/jsonl_to_simple_tabular.py"),
            ],
        );
        apply_rules(&mut m);

        let s = &m.scripts[0];
        assert!(s.reads.contains("dumps/events.jsonl"));
        assert!(s.heuristic_writes.contains("dumps/events_scalar.csv"));
        assert!(s.heuristic_writes.contains("dumps/events_nested_fields.csv"));

        let jsonl = m.files.iter().find(|f| f.path.ends_with(".jsonl")).unwrap();
        assert!(jsonl.read_by.contains("tools/jsonl_to_simple_tabular.py"));
        let scalar = m.files.iter().find(|f| f.path.ends_with("_scalar.csv")).unwrap();
        assert!(scalar.written_by.contains("tools/jsonl_to_simple_tabular.py"));
    }

    #[test]
    fn jsonl_rule_only_applies_to_the_converter_script() {
        let mut s = script("other.py");
        s.related_files.insert("dumps/events.jsonl".to_string());
        let mut m = manifest(
            vec![s],
            vec![file("dumps/events.jsonl"), file("dumps/events_scalar.csv"), file("other.py")],
        );
        apply_rules(&mut m);
        assert!(m.scripts[0].heuristic_writes.is_empty());
        assert!(m.scripts[0].reads.is_empty());
    }

    #[test]
    fn rules_are_idempotent() {
        let mut s = script("tools/jsonl_to_simple_tabular.py");
        s.reads.insert("DATA/bank.csv".to_string());
        s.related_files.insert("dumps/events.jsonl".to_string());
        let mut m = manifest(
            vec![s],
            vec![
                file("DATA/bank.csv"),
                file("PROFILES/bank_ydata_report.html"),
                file("dumps/events.jsonl"),
                file("dumps/events_scalar.csv"),
                file("tools/jsonl_to_simple_tabular.py"),
            ],
        );
        apply_rules(&mut m);
        let once: (Vec<BTreeSet<String>>, Vec<BTreeSet<String>>) = (
            m.scripts.iter().map(|s| s.heuristic_writes.clone()).collect(),
            m.files.iter().map(|f| f.written_by.clone()).collect(),
        );
        apply_rules(&mut m);
        let twice = (
            m.scripts.iter().map(|s| s.heuristic_writes.clone()).collect(),
            m.files.iter().map(|f| f.written_by.clone()).collect(),
        );
        assert_eq!(once, twice);
    }
}
