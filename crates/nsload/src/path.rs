//! Package identifier to resource path conversion
//!
//! ```text
//! Test.Simple   ->  Test/Simple.js
//! HTTP.Request  ->  HTTP/Request.js
//! Foo.Bar.Baz   ->  Foo/Bar/Baz.js
//! ```

/// Default module file extension
pub const DEFAULT_EXTENSION: &str = "js";

/// Convert a dotted package identifier to a relative resource path
///
/// Pure and total: every `.` becomes `/` and the extension is appended.
pub fn resolve_path(identifier: &str, extension: &str) -> String {
    let mut path = identifier.replace('.', "/");
    path.push('.');
    path.push_str(extension);
    path
}

/// Build the candidate URL for a resource path inside a repository
pub fn path_to_url(repository: &str, path: &str) -> String {
    format!("{}/{}", repository.trim_end_matches('/'), path)
}

/// Split a dotted identifier into its segments
pub fn segments(identifier: &str) -> impl Iterator<Item = &str> {
    identifier.split('.')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_path() {
        assert_eq!(resolve_path("Test.Simple", "js"), "Test/Simple.js");
        assert_eq!(resolve_path("HTTP.Request", "js"), "HTTP/Request.js");
        assert_eq!(resolve_path("Foo.Bar.Baz", "js"), "Foo/Bar/Baz.js");
    }

    #[test]
    fn test_resolve_path_single_segment() {
        assert_eq!(resolve_path("Digest", "js"), "Digest.js");
    }

    #[test]
    fn test_resolve_path_is_stable() {
        assert_eq!(resolve_path("A.B", "js"), resolve_path("A.B", "js"));
        assert_ne!(resolve_path("A.B", "js"), resolve_path("AB", "js"));
    }

    #[test]
    fn test_custom_extension() {
        assert_eq!(resolve_path("Foo.Bar", "toml"), "Foo/Bar.toml");
    }

    #[test]
    fn test_path_to_url() {
        assert_eq!(path_to_url("lib", "Foo/Bar.js"), "lib/Foo/Bar.js");
        assert_eq!(
            path_to_url("https://example.com/js/", "Foo/Bar.js"),
            "https://example.com/js/Foo/Bar.js"
        );
        assert_eq!(path_to_url(".", "Foo.js"), "./Foo.js");
    }
}
