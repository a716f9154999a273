/// Decides which request paths go through the route gate.
///
/// Excluded: the auth endpoints themselves, framework assets, the favicon and
/// image files. Everything else is gated. Prefixes match whole path segments,
/// so `api/auth` covers `/api/auth/session` but not `/api/authors`.
#[derive(Debug, Clone)]
pub struct RouteMatcher {
    excluded_prefixes: Vec<String>,
    excluded_files: Vec<String>,
    excluded_extensions: Vec<String>,
}

impl Default for RouteMatcher {
    fn default() -> Self {
        Self {
            excluded_prefixes: ["api/auth", "_next/static", "_next/image"]
                .map(String::from)
                .to_vec(),
            excluded_files: vec!["favicon.ico".to_string()],
            excluded_extensions: [".png", ".jpg", ".jpeg", ".gif", ".webp", ".svg"]
                .map(String::from)
                .to_vec(),
        }
    }
}

impl RouteMatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add another excluded prefix, given without the leading slash.
    pub fn exclude_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.excluded_prefixes.push(prefix.into());
        self
    }

    /// `true` when the gate must evaluate this path.
    pub fn matches(&self, path: &str) -> bool {
        let rest = path.strip_prefix('/').unwrap_or(path);

        if self
            .excluded_prefixes
            .iter()
            .any(|prefix| under_prefix(rest, prefix))
        {
            return false;
        }

        if self.excluded_files.iter().any(|file| rest == file) {
            return false;
        }

        !self
            .excluded_extensions
            .iter()
            .any(|ext| rest.ends_with(ext.as_str()))
    }
}

fn under_prefix(path: &str, prefix: &str) -> bool {
    path.strip_prefix(prefix)
        .is_some_and(|tail| tail.is_empty() || tail.starts_with('/'))
}
