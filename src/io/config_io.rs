use std::fs;
use std::path::{Path, PathBuf};

use crate::model::config::Config;

const APP_DIR: &str = "pipeboard";
const DB_FILE: &str = "pipeboard.sqlite";

/// Error type for loading configuration
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("could not read {path}: {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not parse {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },
}

/// Config file location: the explicit override, else
/// `<config dir>/pipeboard/config.toml`.
pub fn config_path(explicit: Option<&Path>) -> Option<PathBuf> {
    match explicit {
        Some(p) => Some(p.to_path_buf()),
        None => dirs::config_dir().map(|d| d.join(APP_DIR).join("config.toml")),
    }
}

/// Read config from `path`. A missing file (or no path at all) yields the
/// defaults; a file that exists but does not parse is an error.
pub fn load_config(path: Option<&Path>) -> Result<Config, ConfigError> {
    let Some(path) = path else {
        return Ok(Config::default());
    };
    let text = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Config::default()),
        Err(e) => {
            return Err(ConfigError::ReadError {
                path: path.to_path_buf(),
                source: e,
            });
        }
    };
    toml::from_str(&text).map_err(|e| ConfigError::ParseError {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Pick the database file: `--db`, then `[database] path`, then
/// `./data/pipeboard.sqlite` when `./data` exists, then the per-user data
/// directory.
pub fn resolve_db_path(cli_db: Option<&Path>, config: &Config) -> PathBuf {
    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    resolve_db_path_in(cli_db, config, &cwd, dirs::data_dir().as_deref())
}

fn resolve_db_path_in(
    cli_db: Option<&Path>,
    config: &Config,
    cwd: &Path,
    data_dir: Option<&Path>,
) -> PathBuf {
    if let Some(p) = cli_db {
        return p.to_path_buf();
    }
    if let Some(p) = &config.database.path {
        return p.clone();
    }
    let local = cwd.join("data");
    if local.is_dir() {
        return local.join(DB_FILE);
    }
    match data_dir {
        Some(d) => d.join(APP_DIR).join(DB_FILE),
        None => local.join(DB_FILE),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn missing_file_gives_defaults() {
        let tmp = TempDir::new().unwrap();
        let config = load_config(Some(&tmp.path().join("nope.toml"))).unwrap();
        assert!(config.database.path.is_none());
        assert_eq!(config.log.level, "info");
        assert!(load_config(None).is_ok());
    }

    #[test]
    fn reads_every_section() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("config.toml");
        fs::write(
            &path,
            r##"[database]
path = "/srv/pb.sqlite"

[ui.colors]
highlight = "#FB4196"

[ui.lead_type_colors]
seller = "#44FF88"

[log]
level = "debug"
"##,
        )
        .unwrap();
        let config = load_config(Some(&path)).unwrap();
        assert_eq!(config.database.path, Some(PathBuf::from("/srv/pb.sqlite")));
        assert_eq!(config.ui.colors["highlight"], "#FB4196");
        assert_eq!(config.ui.lead_type_colors["seller"], "#44FF88");
        assert_eq!(config.log.level, "debug");
        assert!(config.log.file.is_none());
    }

    #[test]
    fn malformed_file_is_an_error() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("config.toml");
        fs::write(&path, "[database\npath = 3").unwrap();
        let err = load_config(Some(&path)).unwrap_err();
        assert!(err.to_string().starts_with("could not parse"));
    }

    #[test]
    fn db_path_precedence() {
        let tmp = TempDir::new().unwrap();
        let cwd = tmp.path();
        let data_home = Path::new("/home/u/.local/share");
        let mut config = Config::default();

        assert_eq!(
            resolve_db_path_in(None, &config, cwd, Some(data_home)),
            data_home.join("pipeboard").join("pipeboard.sqlite")
        );

        fs::create_dir(cwd.join("data")).unwrap();
        assert_eq!(
            resolve_db_path_in(None, &config, cwd, Some(data_home)),
            cwd.join("data").join("pipeboard.sqlite")
        );

        config.database.path = Some(PathBuf::from("/etc/pb.sqlite"));
        assert_eq!(
            resolve_db_path_in(None, &config, cwd, Some(data_home)),
            PathBuf::from("/etc/pb.sqlite")
        );

        assert_eq!(
            resolve_db_path_in(Some(Path::new("x.sqlite")), &config, cwd, Some(data_home)),
            PathBuf::from("x.sqlite")
        );
    }
}
