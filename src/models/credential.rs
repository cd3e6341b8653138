use anyhow::{Context, Result};
use std::fs;
use std::path::Path;
use tracing::warn;

/// One login record for the booking portal. Immutable once loaded; each
/// automation loop owns exactly one.
#[derive(Debug, Clone)]
pub struct Credential {
    pub url: String,
    pub username: String,
    pub password: String,
}

/// Reads credentials from a plain-text file. Expected format, repeated:
///
/// ```text
/// URL
/// username
/// password
/// ```
///
/// A trailing group of fewer than three lines is skipped with a warning.
pub fn read_credentials(path: impl AsRef<Path>) -> Result<Vec<Credential>> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)
        .with_context(|| format!("failed to read credentials file {}", path.display()))?;

    let lines: Vec<&str> = contents.lines().collect();
    let mut credentials = Vec::new();

    for chunk in lines.chunks(3) {
        match chunk {
            [url, username, password] => credentials.push(Credential {
                url: url.trim().to_string(),
                username: username.trim().to_string(),
                password: password.trim().to_string(),
            }),
            _ => warn!(
                "incomplete credential record ({} trailing line(s)) in {}, skipping",
                chunk.len(),
                path.display()
            ),
        }
    }

    Ok(credentials)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_temp(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn parses_complete_records() {
        let file = write_temp(
            "https://portal.example/login\nalice\nhunter2\nhttps://portal.example/login\nbob\nswordfish\n",
        );
        let creds = read_credentials(file.path()).unwrap();
        assert_eq!(creds.len(), 2);
        assert_eq!(creds[0].url, "https://portal.example/login");
        assert_eq!(creds[0].username, "alice");
        assert_eq!(creds[0].password, "hunter2");
        assert_eq!(creds[1].username, "bob");
    }

    #[test]
    fn skips_incomplete_trailing_record() {
        // 7 lines: two full records plus one leftover line.
        let file = write_temp("u1\na\np1\nu2\nb\np2\nu3\n");
        let creds = read_credentials(file.path()).unwrap();
        assert_eq!(creds.len(), 2);
        assert_eq!(creds[1].username, "b");
    }

    #[test]
    fn trims_surrounding_whitespace() {
        let file = write_temp("  https://portal.example \n carol \n p4ss \n");
        let creds = read_credentials(file.path()).unwrap();
        assert_eq!(creds[0].url, "https://portal.example");
        assert_eq!(creds[0].username, "carol");
        assert_eq!(creds[0].password, "p4ss");
    }

    #[test]
    fn empty_file_yields_no_records() {
        let file = write_temp("");
        assert!(read_credentials(file.path()).unwrap().is_empty());
    }

    #[test]
    fn missing_file_is_an_error() {
        assert!(read_credentials("/nonexistent/credentials.txt").is_err());
    }
}
