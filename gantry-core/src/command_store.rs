use crate::path_command::circle_path;
use serde::{Deserialize, Serialize};
use std::{
    fmt, fs, io,
    path::PathBuf,
    str::FromStr,
};
use thiserror::Error;

/// Extensions recognized for stored command files, in lookup order
pub const PRIMARY_EXTENSION: &str = "csv";
pub const SECONDARY_EXTENSION: &str = "txt";

#[derive(Error, Debug)]
#[error("invalid command name {0:?}: only letters, digits, and underscores are allowed")]
pub struct InvalidCommandName(pub String);

/// Validated command identifier.
///
/// Names cross a trust boundary (bus payload, CLI input) and are used to
/// build file paths, so anything outside `[A-Za-z0-9_]` is rejected at
/// construction.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CommandName(String);

impl CommandName {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for CommandName {
    type Err = InvalidCommandName;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let valid =
            !text.is_empty() && text.chars().all(|c| c.is_ascii_alphanumeric() || c == '_');
        if !valid {
            return Err(InvalidCommandName(text.to_owned()));
        }
        Ok(CommandName(text.to_owned()))
    }
}

impl TryFrom<String> for CommandName {
    type Error = InvalidCommandName;

    fn try_from(text: String) -> Result<Self, Self::Error> {
        text.parse()
    }
}

impl From<CommandName> for String {
    fn from(name: CommandName) -> String {
        name.0
    }
}

impl fmt::Display for CommandName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

#[derive(Error, Debug)]
pub enum StoreError {
    /// The command file exists but could not be read.
    /// Distinct from "absent", which falls back to generated geometry.
    #[error("failed to read command file {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Directory of named command definition files.
pub struct CommandStore {
    directory: PathBuf,
}

impl CommandStore {
    pub fn new(directory: impl Into<PathBuf>) -> CommandStore {
        CommandStore {
            directory: directory.into(),
        }
    }

    /// Resolve a command name to a path payload.
    ///
    /// Tries `<name>.csv` then `<name>.txt` in the store directory and
    /// returns the file contents verbatim on first match. If neither file
    /// exists the payload is a generated circle of the given radius.
    ///
    /// Only "file not found" triggers the fallback. Any other read fault
    /// (permissions, I/O) propagates as [`StoreError::Read`].
    pub fn resolve(&self, name: &CommandName, radius: i64) -> Result<String, StoreError> {
        for extension in [PRIMARY_EXTENSION, SECONDARY_EXTENSION] {
            let path = self
                .directory
                .join(format!("{}.{}", name.as_str(), extension));
            match fs::read_to_string(&path) {
                Ok(contents) => return Ok(contents),
                Err(error) if error.kind() == io::ErrorKind::NotFound => continue,
                Err(error) => {
                    return Err(StoreError::Read {
                        path,
                        source: error,
                    })
                }
            }
        }
        Ok(circle_path(radius))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::path_command::DEFAULT_RADIUS_MM;

    fn store_with(files: &[(&str, &str)]) -> (tempfile::TempDir, CommandStore) {
        let dir = tempfile::tempdir().unwrap();
        for (file_name, contents) in files {
            fs::write(dir.path().join(file_name), contents).unwrap();
        }
        let store = CommandStore::new(dir.path());
        (dir, store)
    }

    #[test]
    fn valid_names_parse() {
        for text in ["wave", "circle1", "A_9", "_", "0"] {
            assert!(text.parse::<CommandName>().is_ok(), "{:?}", text);
        }
    }

    #[test]
    fn invalid_names_are_rejected() {
        for text in ["", "bad;name", "a b", "../etc", "wave!", "naïve", "a/b"] {
            assert!(text.parse::<CommandName>().is_err(), "{:?}", text);
        }
    }

    #[test]
    fn csv_takes_precedence_over_txt() {
        let (_dir, store) = store_with(&[("wave.csv", "from csv"), ("wave.txt", "from txt")]);
        let name = "wave".parse().unwrap();
        assert_eq!(store.resolve(&name, DEFAULT_RADIUS_MM).unwrap(), "from csv");
    }

    #[test]
    fn txt_is_used_when_csv_is_absent() {
        let (_dir, store) = store_with(&[("wave.txt", "from txt")]);
        let name = "wave".parse().unwrap();
        assert_eq!(store.resolve(&name, DEFAULT_RADIUS_MM).unwrap(), "from txt");
    }

    #[test]
    fn file_contents_are_returned_verbatim() {
        let contents = "  INSPECT,1,0,0,0,10,0,0,-50,50,EOL \n\n";
        let (_dir, store) = store_with(&[("wave.csv", contents)]);
        let name = "wave".parse().unwrap();
        assert_eq!(store.resolve(&name, DEFAULT_RADIUS_MM).unwrap(), contents);
    }

    #[test]
    fn missing_command_falls_back_to_circle() {
        let (_dir, store) = store_with(&[]);
        let name = "circle1".parse().unwrap();
        let payload = store.resolve(&name, 40).unwrap();
        assert_eq!(payload, circle_path(40));
    }

    #[test]
    fn unreadable_file_is_an_error_not_a_fallback() {
        let dir = tempfile::tempdir().unwrap();
        // a directory named like a command file fails with a non-NotFound kind
        fs::create_dir(dir.path().join("wave.csv")).unwrap();
        let store = CommandStore::new(dir.path());
        let name: CommandName = "wave".parse().unwrap();
        let result = store.resolve(&name, DEFAULT_RADIUS_MM);
        assert!(matches!(result, Err(StoreError::Read { .. })));
    }
}
