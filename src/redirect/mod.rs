//! Host-based redirect rules

use axum::http::StatusCode;
use serde::{Deserialize, Serialize};

/// Redirect `source` on `host` to `destination`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RedirectRule {
    /// Request path to match, e.g. `/`
    pub source: String,
    /// Host to match; `None` matches every host
    #[serde(default)]
    pub host: Option<String>,
    /// Absolute URL or path to send the client to
    pub destination: String,
    #[serde(default)]
    pub permanent: bool,
}

impl RedirectRule {
    /// Check whether a request for `path` on `host` hits this rule
    pub fn matches(&self, path: &str, host: Option<&str>) -> bool {
        if normalize_path(path) != normalize_path(&self.source) {
            return false;
        }

        match (&self.host, host) {
            (None, _) => true,
            (Some(expected), Some(actual)) => {
                strip_port(actual).eq_ignore_ascii_case(strip_port(expected))
            }
            (Some(_), None) => false,
        }
    }

    /// 308 for permanent rules, 307 otherwise
    pub fn status(&self) -> StatusCode {
        if self.permanent {
            StatusCode::PERMANENT_REDIRECT
        } else {
            StatusCode::TEMPORARY_REDIRECT
        }
    }
}

/// First rule matching the request, in configuration order
pub fn find_redirect<'a>(
    rules: &'a [RedirectRule],
    path: &str,
    host: Option<&str>,
) -> Option<&'a RedirectRule> {
    rules.iter().find(|rule| rule.matches(path, host))
}

fn normalize_path(path: &str) -> &str {
    let trimmed = path.trim_end_matches('/');
    if trimmed.is_empty() {
        "/"
    } else {
        trimmed
    }
}

fn strip_port(host: &str) -> &str {
    // Leave bracketed IPv6 literals alone
    if host.starts_with('[') {
        return host.split(']').next().map_or(host, |h| &h[1..]);
    }
    host.split(':').next().unwrap_or(host)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn meet_rule() -> RedirectRule {
        RedirectRule {
            source: "/".to_string(),
            host: Some("meet.carlosnexans.com".to_string()),
            destination: "https://calendly.com/nexanscarlos/30min".to_string(),
            permanent: false,
        }
    }

    #[test]
    fn test_matches_host() {
        let rule = meet_rule();
        assert!(rule.matches("/", Some("meet.carlosnexans.com")));
        assert!(rule.matches("/", Some("MEET.carlosnexans.com:443")));
        assert!(!rule.matches("/", Some("carlosnexans.com")));
        assert!(!rule.matches("/", None));
        assert!(!rule.matches("/en/blog/", Some("meet.carlosnexans.com")));
    }

    #[test]
    fn test_trailing_slash_ignored() {
        let rule = RedirectRule {
            source: "/old-blog".to_string(),
            host: None,
            destination: "/en/blog/".to_string(),
            permanent: true,
        };
        assert!(rule.matches("/old-blog/", Some("anything")));
        assert!(rule.matches("/old-blog", None));
        assert_eq!(rule.status(), StatusCode::PERMANENT_REDIRECT);
    }

    #[test]
    fn test_status_temporary() {
        assert_eq!(meet_rule().status(), StatusCode::TEMPORARY_REDIRECT);
    }

    #[test]
    fn test_find_redirect_first_match() {
        let catch_all = RedirectRule {
            host: None,
            destination: "/en/".to_string(),
            ..meet_rule()
        };
        let rules = vec![meet_rule(), catch_all];
        let hit = find_redirect(&rules, "/", Some("meet.carlosnexans.com")).unwrap();
        assert_eq!(hit.destination, "https://calendly.com/nexanscarlos/30min");
        let hit = find_redirect(&rules, "/", Some("localhost:4000")).unwrap();
        assert_eq!(hit.destination, "/en/");
        assert!(find_redirect(&rules, "/es/", None).is_none());
    }

    #[test]
    fn test_strip_port() {
        assert_eq!(strip_port("example.com:8080"), "example.com");
        assert_eq!(strip_port("[::1]:4000"), "::1");
    }
}
