use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ConfigFlags {
    pub data_dir: Option<PathBuf>,
    pub export_dir: Option<PathBuf>,
    pub ephemeral: bool,
    pub quiet: bool,
}

impl ConfigFlags {
    pub fn union(&self, other: &Self) -> Self {
        Self {
            data_dir: other.data_dir.clone().or_else(|| self.data_dir.clone()),
            export_dir: other
                .export_dir
                .clone()
                .or_else(|| self.export_dir.clone()),
            ephemeral: self.ephemeral || other.ephemeral,
            quiet: self.quiet || other.quiet,
        }
    }

    /// Where notes and accounts are stored.
    pub fn effective_data_dir(&self) -> PathBuf {
        self.data_dir.clone().unwrap_or_else(default_data_dir)
    }

    /// Where exported notes are written.
    pub fn effective_export_dir(&self) -> PathBuf {
        self.export_dir.clone().unwrap_or_else(|| PathBuf::from("."))
    }
}

pub fn global_config_path() -> PathBuf {
    app_dir("config").unwrap_or_else(local_override_path)
}

pub fn default_data_dir() -> PathBuf {
    #[cfg(not(any(target_os = "windows", target_os = "macos")))]
    {
        if let Some(xdg) = std::env::var_os("XDG_DATA_HOME") {
            return PathBuf::from(xdg).join("inkwell");
        }
        if let Some(home) = std::env::var_os("HOME") {
            return PathBuf::from(home)
                .join(".local")
                .join("share")
                .join("inkwell");
        }
    }

    app_dir("data").unwrap_or_else(|| PathBuf::from(".inkwell"))
}

fn app_dir(leaf: &str) -> Option<PathBuf> {
    #[cfg(target_os = "windows")]
    {
        if let Some(appdata) = std::env::var_os("APPDATA") {
            return Some(PathBuf::from(appdata).join("inkwell").join(leaf));
        }
    }

    #[cfg(target_os = "macos")]
    {
        if let Some(home) = std::env::var_os("HOME") {
            return Some(
                PathBuf::from(home)
                    .join("Library")
                    .join("Application Support")
                    .join("inkwell")
                    .join(leaf),
            );
        }
    }

    #[cfg(not(any(target_os = "windows", target_os = "macos")))]
    {
        if let Some(xdg) = std::env::var_os("XDG_CONFIG_HOME") {
            return Some(PathBuf::from(xdg).join("inkwell").join(leaf));
        }
        if let Some(home) = std::env::var_os("HOME") {
            return Some(
                PathBuf::from(home)
                    .join(".config")
                    .join("inkwell")
                    .join(leaf),
            );
        }
    }

    None
}

pub fn local_override_path() -> PathBuf {
    PathBuf::from(".inkwellrc")
}

pub fn load_config_flags(path: &Path) -> Result<ConfigFlags> {
    if !path.exists() {
        return Ok(ConfigFlags::default());
    }
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config {}", path.display()))?;
    let tokens = content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .flat_map(|line| line.split_whitespace().map(ToOwned::to_owned))
        .collect::<Vec<_>>();
    Ok(parse_flag_tokens(&tokens))
}

pub fn save_config_flags(path: &Path, flags: &ConfigFlags) -> Result<()> {
    let mut lines = Vec::new();
    lines.push("# inkwell defaults (saved with --save)".to_string());
    if let Some(dir) = &flags.data_dir {
        lines.push(format!("--data-dir {}", dir.display()));
    }
    if let Some(dir) = &flags.export_dir {
        lines.push(format!("--export-dir {}", dir.display()));
    }
    if flags.ephemeral {
        lines.push("--ephemeral".to_string());
    }
    if flags.quiet {
        lines.push("--quiet".to_string());
    }
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create config dir {}", parent.display()))?;
    }
    fs::write(path, format!("{}\n", lines.join("\n")))
        .with_context(|| format!("Failed to write config {}", path.display()))
}

pub fn clear_config_flags(path: &Path) -> Result<()> {
    if path.exists() {
        fs::remove_file(path).with_context(|| format!("Failed to remove {}", path.display()))?;
    }
    Ok(())
}

/// Pick the known flags out of raw command-line style tokens.
///
/// Unknown tokens, including subcommands and their arguments, are skipped.
pub fn parse_flag_tokens(tokens: &[String]) -> ConfigFlags {
    let mut flags = ConfigFlags::default();
    let mut i = 0;
    while i < tokens.len() {
        let token = &tokens[i];
        if token == "--ephemeral" {
            flags.ephemeral = true;
        } else if token == "--quiet" || token == "-q" {
            flags.quiet = true;
        } else if token == "--data-dir" {
            if let Some(next) = tokens.get(i + 1) {
                flags.data_dir = Some(PathBuf::from(next));
                i += 1;
            }
        } else if let Some(value) = token.strip_prefix("--data-dir=") {
            flags.data_dir = Some(PathBuf::from(value));
        } else if token == "--export-dir" {
            if let Some(next) = tokens.get(i + 1) {
                flags.export_dir = Some(PathBuf::from(next));
                i += 1;
            }
        } else if let Some(value) = token.strip_prefix("--export-dir=") {
            flags.export_dir = Some(PathBuf::from(value));
        }
        i += 1;
    }
    flags
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_parse_flag_tokens_extracts_known_flags() {
        let args = vec![
            "inkwell".to_string(),
            "--ephemeral".to_string(),
            "--data-dir".to_string(),
            "/tmp/ink".to_string(),
            "--export-dir=out".to_string(),
            "-q".to_string(),
            "indent".to_string(),
            "--start".to_string(),
            "3".to_string(),
        ];
        let flags = parse_flag_tokens(&args);
        assert!(flags.ephemeral);
        assert!(flags.quiet);
        assert_eq!(flags.data_dir, Some(PathBuf::from("/tmp/ink")));
        assert_eq!(flags.export_dir, Some(PathBuf::from("out")));
    }

    #[test]
    fn test_config_union_merges_cli_over_file_for_options() {
        let file = ConfigFlags {
            quiet: true,
            data_dir: Some(PathBuf::from("file-data")),
            ..ConfigFlags::default()
        };
        let cli = ConfigFlags {
            ephemeral: true,
            data_dir: Some(PathBuf::from("cli-data")),
            ..ConfigFlags::default()
        };
        let merged = file.union(&cli);
        assert!(merged.quiet);
        assert!(merged.ephemeral);
        assert_eq!(merged.data_dir, Some(PathBuf::from("cli-data")));
    }

    #[test]
    fn test_effective_export_dir_defaults_to_cwd() {
        assert_eq!(
            ConfigFlags::default().effective_export_dir(),
            PathBuf::from(".")
        );
    }

    #[test]
    fn test_save_load_and_clear_config() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("config");
        let flags = ConfigFlags {
            data_dir: Some(PathBuf::from("notes")),
            export_dir: Some(PathBuf::from("exports")),
            ephemeral: true,
            quiet: true,
        };

        save_config_flags(&path, &flags).unwrap();
        let loaded = load_config_flags(&path).unwrap();
        assert_eq!(loaded, flags);

        clear_config_flags(&path).unwrap();
        assert!(!path.exists());
    }

    #[test]
    fn test_load_missing_config_is_default() {
        let dir = tempdir().unwrap();
        let loaded = load_config_flags(&dir.path().join("absent")).unwrap();
        assert_eq!(loaded, ConfigFlags::default());
    }
}
