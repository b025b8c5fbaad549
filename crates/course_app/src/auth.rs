use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use engine_logging::{engine_debug, engine_info};
use thiserror::Error;

pub const SESSION_COOKIE: &str = "session-cookie";

/// Netscape cookie files mark HttpOnly cookies with this prefix on the
/// domain column instead of commenting them out.
const HTTP_ONLY_PREFIX: &str = "#HttpOnly_";

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("cannot read cookie file {}: {source}", path.display())]
    CookieFile {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error(
        "no session token: pass --token, set COURSE_HARVESTER_TOKEN, or provide a cookie file with a `session-cookie` entry"
    )]
    Missing,
}

/// Picks the bearer token: an explicit token first, then the cookie file.
pub fn resolve_token(explicit: Option<&str>, cookie_file: &Path) -> Result<String, AuthError> {
    if let Some(token) = explicit.map(str::trim).filter(|token| !token.is_empty()) {
        engine_debug!("Using session token from command line or environment");
        return Ok(token.to_string());
    }

    let content = match fs::read_to_string(cookie_file) {
        Ok(content) => content,
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            engine_debug!("Cookie file {:?} not found", cookie_file);
            return Err(AuthError::Missing);
        }
        Err(source) => {
            return Err(AuthError::CookieFile {
                path: cookie_file.to_path_buf(),
                source,
            })
        }
    };

    let token = session_token_from_cookies(&content).ok_or(AuthError::Missing)?;
    engine_info!("Loaded session token from {:?}", cookie_file);
    Ok(token)
}

/// Value of the last `session-cookie` entry in Netscape cookie file text.
pub fn session_token_from_cookies(content: &str) -> Option<String> {
    content
        .lines()
        .map(|line| line.strip_prefix(HTTP_ONLY_PREFIX).unwrap_or(line))
        .filter(|line| !line.starts_with('#') && !line.trim().is_empty())
        .filter_map(|line| {
            let fields: Vec<&str> = line.trim().split('\t').collect();
            match fields.as_slice() {
                [_domain, _flag, _path, _secure, _expires, name, value, ..] if *name == SESSION_COOKIE => {
                    Some(value.to_string())
                }
                _ => None,
            }
        })
        .filter(|value| !value.is_empty())
        .next_back()
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::{resolve_token, session_token_from_cookies, AuthError};

    const COOKIES: &str = "# Netscape HTTP Cookie File\n\
        # https://curl.se/docs/http-cookies.html\n\
        \n\
        .kodekloud.com\tTRUE\t/\tTRUE\t1999999999\t_ga\tGA1.2.3\n\
        #HttpOnly_.kodekloud.com\tTRUE\t/\tTRUE\t1999999999\tsession-cookie\tabc.def.ghi\n";

    #[test]
    fn session_cookie_is_extracted() {
        assert_eq!(session_token_from_cookies(COOKIES).as_deref(), Some("abc.def.ghi"));
    }

    #[test]
    fn short_or_unrelated_lines_are_ignored() {
        let content = "kodekloud.com\tTRUE\t/\tsession-cookie\n.x\tTRUE\t/\tTRUE\t0\tother\tv\n";
        assert_eq!(session_token_from_cookies(content), None);
    }

    #[test]
    fn explicit_token_wins_over_cookie_file() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("cookie.txt");
        fs::write(&path, COOKIES).unwrap();
        assert_eq!(resolve_token(Some(" tok "), &path).unwrap(), "tok");
        assert_eq!(resolve_token(Some(""), &path).unwrap(), "abc.def.ghi");
        assert_eq!(resolve_token(None, &path).unwrap(), "abc.def.ghi");
    }

    #[test]
    fn no_source_is_an_error() {
        let temp = tempfile::tempdir().unwrap();
        let err = resolve_token(None, &temp.path().join("cookie.txt")).unwrap_err();
        assert!(matches!(err, AuthError::Missing));

        let path = temp.path().join("empty.txt");
        fs::write(&path, "# nothing here\n").unwrap();
        assert!(matches!(resolve_token(None, &path), Err(AuthError::Missing)));
    }
}
