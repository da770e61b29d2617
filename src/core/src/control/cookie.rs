//! Locating and reading the control-port authentication cookie.

use std::env;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use log::{debug, info};
use regex::{Captures, Regex};

use crate::error_handling::types::ControlError;

static ENV_VAR_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)\}|\$([A-Za-z_][A-Za-z0-9_]*)")
        .expect("Valid regex pattern")
});

/// Expands `$VAR` and `${VAR}`; unset variables expand to the empty string.
pub fn expand_env(path: &str) -> String {
    ENV_VAR_REGEX
        .replace_all(path, |caps: &Captures| {
            let name = caps.get(1).or_else(|| caps.get(2)).map_or("", |m| m.as_str());
            env::var(name).unwrap_or_default()
        })
        .into_owned()
}

/// Returns the first configured cookie path that exists.
///
/// Each path is expanded first; a relative path that does not resolve as-is
/// is also tried against the current directory.
pub fn find_cookie_file(paths: &[String]) -> Result<PathBuf, ControlError> {
    for (i, raw) in paths.iter().enumerate() {
        let expanded = PathBuf::from(expand_env(raw));

        if expanded.exists() {
            info!("Found cookie file at path #{}: {}", i + 1, expanded.display());
            return Ok(expanded);
        }

        if expanded.is_relative() {
            if let Ok(cwd) = env::current_dir() {
                let absolute = cwd.join(&expanded);
                if absolute.exists() {
                    info!(
                        "Found cookie file at relative path #{}: {}",
                        i + 1,
                        absolute.display()
                    );
                    return Ok(absolute);
                }
            }
        }

        debug!("Cookie path #{} not found: {}", i + 1, expanded.display());
    }

    Err(ControlError::CookieNotFound(paths.to_vec()))
}

pub fn read_cookie(path: &Path) -> Result<Vec<u8>, ControlError> {
    std::fs::read(path).map_err(ControlError::CookieRead)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn test_expand_env() {
        env::set_var("OMON_TEST_HOME", "/home/tester");
        env::remove_var("OMON_TEST_UNSET");

        assert_eq!(expand_env("$OMON_TEST_HOME/.tor/cookie"), "/home/tester/.tor/cookie");
        assert_eq!(expand_env("${OMON_TEST_HOME}/cookie"), "/home/tester/cookie");
        assert_eq!(expand_env("/x/$OMON_TEST_UNSET/cookie"), "/x//cookie");
        assert_eq!(expand_env("/var/lib/tor/control_auth_cookie"), "/var/lib/tor/control_auth_cookie");

        env::remove_var("OMON_TEST_HOME");
    }

    #[test]
    #[serial]
    fn test_find_first_existing_cookie() {
        let dir = tempfile::tempdir().unwrap();
        let cookie = dir.path().join("control_auth_cookie");
        std::fs::write(&cookie, [1u8, 2, 3]).unwrap();
        env::set_var("OMON_TEST_COOKIE_DIR", dir.path());

        let paths = vec![
            dir.path().join("missing").display().to_string(),
            "$OMON_TEST_COOKIE_DIR/control_auth_cookie".to_string(),
        ];
        let found = find_cookie_file(&paths).unwrap();
        assert_eq!(found, cookie);
        assert_eq!(read_cookie(&found).unwrap(), vec![1, 2, 3]);

        env::remove_var("OMON_TEST_COOKIE_DIR");
    }

    #[test]
    fn test_cookie_not_found_lists_paths() {
        let paths = vec!["/definitely/not/here/cookie".to_string()];
        match find_cookie_file(&paths) {
            Err(ControlError::CookieNotFound(listed)) => assert_eq!(listed, paths),
            other => panic!("expected CookieNotFound, got {:?}", other),
        }
    }

    #[test]
    fn test_read_missing_cookie() {
        assert!(matches!(
            read_cookie(Path::new("/definitely/not/here/cookie")),
            Err(ControlError::CookieRead(_))
        ));
    }
}
