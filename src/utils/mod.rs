pub mod config {
    use serde::Deserialize;
    use std::fs;
    use std::path::{Path, PathBuf};

    /// Optional project configuration, loaded from `dir-manifest.toml` next to
    /// the target root or from an explicit `--config` path.
    #[derive(Debug, Clone, Deserialize, Default)]
    pub struct Config {
        /// Extra directory names to skip during traversal.
        pub skip_dirs: Option<Vec<String>>,
        /// Manifest output filename override.
        pub output: Option<String>,
        /// Extra script extensions (without dot) to analyze.
        pub script_extensions: Option<Vec<String>>,
    }

    fn default_config_path(root: &Path) -> PathBuf {
        root.join("dir-manifest.toml")
    }

    #[must_use]
    pub fn load_config_at(path: &Path) -> Option<Config> {
        let data = fs::read_to_string(path).ok()?;
        toml::from_str::<Config>(&data).ok()
    }

    #[must_use]
    pub fn load_config_near(root: &Path) -> Option<Config> {
        let p = default_config_path(root);
        if p.exists() {
            load_config_at(&p)
        } else {
            None
        }
    }

}
