//! Config file location.

use std::path::{Path, PathBuf};

use anyhow::{Result, bail};

/// Application directory under the config base.
const APP_DIR: &str = "pmovies";

/// Config file name inside the application directory.
const CONFIG_FILE: &str = "config.toml";

/// Resolves the config file path from `--dir` and the environment.
///
/// Precedence: `{dir}/config.toml`, then
/// `$XDG_CONFIG_HOME/pmovies/config.toml`, then
/// `$HOME/.config/pmovies/config.toml`.
///
/// # Errors
///
/// Returns an error if `dir` is `None` and neither `XDG_CONFIG_HOME`
/// nor `HOME` is set.
pub fn resolve_config_path(dir: Option<&Path>) -> Result<PathBuf> {
    config_path_from(
        dir,
        std::env::var_os("XDG_CONFIG_HOME").as_deref().map(Path::new),
        std::env::var_os("HOME").as_deref().map(Path::new),
    )
}

/// Environment-free core of [`resolve_config_path`].
///
/// An empty `XDG_CONFIG_HOME` counts as unset.
fn config_path_from(
    dir: Option<&Path>,
    xdg_config_home: Option<&Path>,
    home: Option<&Path>,
) -> Result<PathBuf> {
    if let Some(d) = dir {
        return Ok(d.join(CONFIG_FILE));
    }

    let base = match (xdg_config_home.filter(|p| !p.as_os_str().is_empty()), home) {
        (Some(xdg), _) => xdg.to_path_buf(),
        (None, Some(home)) => home.join(".config"),
        (None, None) => bail!("neither XDG_CONFIG_HOME nor HOME is set; pass --dir"),
    };
    Ok(base.join(APP_DIR).join(CONFIG_FILE))
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[test]
    fn test_dir_wins_over_environment() {
        // Arrange
        let dir = Path::new("/tmp/pmovies-test");

        // Act
        let path = config_path_from(
            Some(dir),
            Some(Path::new("/xdg")),
            Some(Path::new("/home/u")),
        )
        .unwrap();

        // Assert
        assert_eq!(path, PathBuf::from("/tmp/pmovies-test/config.toml"));
    }

    #[test]
    fn test_xdg_config_home_wins_over_home() {
        // Arrange & Act
        let path =
            config_path_from(None, Some(Path::new("/xdg")), Some(Path::new("/home/u"))).unwrap();

        // Assert
        assert_eq!(path, PathBuf::from("/xdg/pmovies/config.toml"));
    }

    #[test]
    fn test_home_fallback() {
        // Arrange & Act
        let empty_xdg =
            config_path_from(None, Some(Path::new("")), Some(Path::new("/home/u"))).unwrap();
        let no_xdg = config_path_from(None, None, Some(Path::new("/home/u"))).unwrap();

        // Assert
        assert_eq!(empty_xdg, PathBuf::from("/home/u/.config/pmovies/config.toml"));
        assert_eq!(no_xdg, empty_xdg);
    }

    #[test]
    fn test_no_base_directory_fails() {
        // Arrange & Act
        let result = config_path_from(None, None, None);

        // Assert
        assert!(result.unwrap_err().to_string().contains("--dir"));
    }

    #[test]
    fn test_resolve_with_dir() {
        // Arrange
        let dir = PathBuf::from("/tmp/pmovies-test");

        // Act
        let path = resolve_config_path(Some(dir.as_path())).unwrap();

        // Assert
        assert!(path.ends_with("pmovies-test/config.toml"));
    }
}
