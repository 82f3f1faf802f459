//! Config file commands.

use std::path::Path;

use crate::config::{self, Config};

/// Write the default configuration
pub fn cmd_config_init(path: Option<&Path>, force: bool) -> anyhow::Result<()> {
    let target = match path {
        Some(path) => path.to_path_buf(),
        None => config::config_path().ok_or(config::ConfigError::NoConfigDir)?,
    };

    if target.exists() && !force {
        anyhow::bail!("{} already exists (use --force to overwrite)", target.display());
    }

    config::save_to(&Config::default(), &target)?;
    println!("Wrote {}", target.display());
    Ok(())
}

/// Print the effective configuration as TOML
pub fn cmd_config_show(config: &Config) -> anyhow::Result<()> {
    print!("{}", toml::to_string_pretty(config)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_refuses_to_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        cmd_config_init(Some(&path), false).unwrap();
        assert!(path.exists());
        assert!(cmd_config_init(Some(&path), false).is_err());
        cmd_config_init(Some(&path), true).unwrap();
    }
}
