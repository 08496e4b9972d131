//! Route exclusion policy
//!
//! Paths that must render with no valid session (login, signup). Both the
//! session guard and the transport interceptor consult the same policy: the
//! guard renders these paths unconditionally, and the interceptor leaves 401s
//! received on them for the page to handle.

use std::collections::BTreeSet;

/// Immutable set of public paths, matched exactly
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteExclusionPolicy {
    paths: BTreeSet<String>,
}

impl RouteExclusionPolicy {
    /// Build a policy from a list of paths
    pub fn new<I, S>(paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            paths: paths.into_iter().map(Into::into).collect(),
        }
    }

    /// Check whether `path` renders without a session
    pub fn is_excluded(&self, path: &str) -> bool {
        self.paths.contains(path)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.paths.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }
}

impl Default for RouteExclusionPolicy {
    fn default() -> Self {
        Self::new(["/login", "/signup"])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_policy() {
        let policy = RouteExclusionPolicy::default();
        assert!(policy.is_excluded("/login"));
        assert!(policy.is_excluded("/signup"));
        assert!(!policy.is_excluded("/"));
        assert!(!policy.is_excluded("/chats"));
        assert_eq!(policy.len(), 2);
    }

    #[test]
    fn test_exact_match_only() {
        let policy = RouteExclusionPolicy::new(["/login"]);
        assert!(!policy.is_excluded("/login/"));
        assert!(!policy.is_excluded("/LOGIN"));
        assert!(!policy.is_excluded("/login?next=/chats"));
    }

    #[test]
    fn test_duplicates_collapse() {
        let policy = RouteExclusionPolicy::new(vec!["/a".to_string(), "/a".to_string()]);
        assert_eq!(policy.iter().collect::<Vec<_>>(), vec!["/a"]);
    }
}
