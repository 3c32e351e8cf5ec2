//! Textual path manipulation. Nothing in here touches the filesystem; paths
//! are resolved the way `make` and the compilers print them, so `..` and `.`
//! are collapsed without following symlinks.

use crate::errors::{Error, Result};

/// Collapses repeated slashes and resolves `.`/`..` segments. A leading `/`
/// is preserved iff the input is absolute; the result never carries a
/// trailing slash, except for the root `"/"` itself.
pub fn normalize(path: &str) -> String {
    let absolute = path.starts_with('/');
    let mut segments: Vec<&str> = Vec::new();

    for segment in path.split('/') {
        match segment {
            "" | "." => {}
            ".." if !segments.is_empty() && *segments.last().unwrap() != ".." => {
                segments.pop();
            }
            s => segments.push(s),
        }
    }

    let mut result = String::from(if absolute { "/" } else { "" });
    result.push_str(&segments.join("/"));
    result
}

/// Joins `base` and `extension` with exactly one `/` between them, then
/// normalizes.
pub fn join_normalize(base: &str, extension: &str) -> String {
    let base_ends_slash = base.ends_with('/');
    let ext_starts_slash = extension.starts_with('/');
    let mut joined = String::from(base);
    if !base.is_empty() && !base_ends_slash && !ext_starts_slash {
        joined.push('/');
        joined.push_str(extension);
    } else if base_ends_slash && ext_starts_slash {
        joined.push_str(&extension[1..]);
    } else {
        joined.push_str(extension);
    }
    normalize(&joined)
}

/// Expands a leading `~` using `$HOME`.
pub fn expand_path(path: &str) -> Result<String> {
    match path.strip_prefix('~') {
        None => Ok(join_normalize("", path)),
        Some(rest) => {
            let home = std::env::var("HOME")
                .ok()
                .filter(|h| !h.is_empty())
                .ok_or_else(|| {
                    Error::Config(format!("could not expand path {}: $HOME not set", path))
                })?;
            Ok(join_normalize(&home, rest))
        }
    }
}

/// Returns true iff `prefix` is a segment-aligned prefix of `path`, so
/// `/foo` is a prefix of `/foo/bar` but not of `/foobar`. The empty prefix
/// matches nothing.
pub fn has_path_prefix(path: &str, prefix: &str) -> bool {
    if prefix.is_empty() {
        return false;
    }
    if path == prefix {
        return true;
    }
    let mut prefix = prefix.to_string();
    if !prefix.ends_with('/') {
        prefix.push('/');
    }
    path.starts_with(&prefix)
}

/// Rewrites an absolute `path` under `project_root` into the shortest
/// relative path from `working_directory`. Anything else (relative input,
/// empty working directory, path outside the project root) is returned
/// unchanged. The working directory must be absolute.
pub fn make_relative(path: &str, working_directory: &str, project_root: &str) -> String {
    if working_directory.is_empty()
        || !path.starts_with('/')
        || !has_path_prefix(path, project_root)
    {
        return path.to_string();
    }

    let trailing_slash = path.ends_with('/');
    let path_segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
    let cwd_segments: Vec<&str> = working_directory
        .split('/')
        .filter(|s| !s.is_empty())
        .collect();

    let common = path_segments
        .iter()
        .zip(cwd_segments.iter())
        .take_while(|(a, b)| a == b)
        .count();

    let ups = cwd_segments.len() - common;
    let mut parts: Vec<&str> = std::iter::repeat("..").take(ups).collect();
    parts.extend(&path_segments[common..]);

    if parts.is_empty() {
        return String::from(if trailing_slash { "./" } else { "." });
    }
    let mut result = parts.join("/");
    if trailing_slash {
        result.push('/');
    }
    result
}

/// Prepends `cwd` if `path` is relative and normalizes; a trailing slash on
/// the input is preserved.
pub fn make_absolute(path: &str, cwd: &str) -> String {
    if path.is_empty() || path.starts_with('/') {
        return path.to_string();
    }
    let mut normalized = normalize(&format!("{}/{}", cwd, path));
    if path.ends_with('/') && !normalized.ends_with('/') {
        normalized.push('/');
    }
    normalized
}

/// How many levels above its starting directory the path escapes; `"a/b"`
/// escapes zero levels, `"../x"` one, `"../../x"` two.
pub fn parent_directory_levels(path: &str) -> i32 {
    let mut current = 0;
    let mut lowest = 0;
    for segment in path.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                current -= 1;
                lowest = lowest.min(current);
            }
            _ => current += 1,
        }
    }
    -lowest
}

/// The trailing `n` segments of `path`; errors if the path is shorter.
pub fn last_n_segments(path: &str, n: usize) -> Result<String> {
    if n == 0 {
        return Ok(String::new());
    }
    let trimmed = path.strip_suffix('/').unwrap_or(path);
    let segments: Vec<&str> = trimmed.split('/').filter(|s| !s.is_empty()).collect();
    if segments.len() < n {
        return Err(Error::Usage(format!(
            "not enough segments in path {:?} (wanted {})",
            path, n
        )));
    }
    Ok(segments[segments.len() - n..].join("/"))
}

/// The final segment of `path`, or `""` for the root.
pub fn path_basename(path: &str) -> String {
    last_n_segments(path, 1).unwrap_or_default()
}

/// Applies the first matching `(from, to)` prefix replacement and
/// normalizes; used to make absolute paths hermetic before they enter a
/// Merkle tree or a Command proto.
pub fn resolve_prefix_map(path: &str, prefix_map: &[(String, String)]) -> String {
    for (from, to) in prefix_map {
        if has_path_prefix(path, from) {
            let replaced = format!("{}/{}", to, &path[from.len()..]);
            return normalize(&replaced);
        }
    }
    path.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("/a/./b/../c//d/", "/a/c/d"; "mixed dots and doubled slashes")]
    #[test_case("a/../../b", "../b"; "escapes above start")]
    #[test_case("a/b/../c", "a/c"; "simple parent")]
    #[test_case("./a", "a"; "leading dot")]
    #[test_case("/", "/"; "root")]
    #[test_case("", ""; "empty")]
    #[test_case("../..", "../.."; "all parents")]
    #[test_case("a/..", ""; "collapses to empty")]
    fn normalize_cases(input: &str, want: &str) {
        assert_eq!(normalize(input), want);
    }

    #[test]
    fn normalize_idempotent() {
        for p in ["/a/./b/../c//d/", "a/../../b", "x/y/z", "../weird/.."] {
            assert_eq!(normalize(&normalize(p)), normalize(p));
        }
    }

    #[test_case("/a/", "b", "/a/b"; "base trailing slash, ext no leading slash")]
    #[test_case("/a", "b", "/a/b"; "base no trailing slash, ext no leading slash")]
    #[test_case("/a/", "/b", "/a/b"; "base trailing slash, ext leading slash")]
    #[test_case("/a", "/b", "/a/b"; "base no trailing slash, ext leading slash")]
    #[test_case("", "rel/x", "rel/x"; "empty base keeps relative")]
    #[test_case("/", "b", "/b"; "root base")]
    fn join_normalize_slash_handling(base: &str, ext: &str, want: &str) {
        assert_eq!(join_normalize(base, ext), want);
    }

    #[test]
    fn prefix_checks() {
        assert!(!has_path_prefix("/foo", "/foobar"));
        assert!(!has_path_prefix("/foobar", "/foo"));
        assert!(has_path_prefix("/foo/bar", "/foo"));
        assert!(has_path_prefix("/foo", "/foo"));
        assert!(!has_path_prefix("/foo", ""));
        assert!(has_path_prefix("/foo/bar", "/foo/"));
    }

    #[test]
    fn relative_inside_and_outside_cwd() {
        assert_eq!(make_relative("/proj/src/x.c", "/proj/src", "/proj"), "x.c");
        assert_eq!(make_relative("/proj/x.c", "/proj/src", "/proj"), "../x.c");
        assert_eq!(
            make_relative("/proj/a/b/x.c", "/proj/src", "/proj"),
            "../a/b/x.c"
        );
        assert_eq!(make_relative("/proj/src", "/proj/src", "/proj"), ".");
        assert_eq!(make_relative("/proj/src/", "/proj/src", "/proj"), "./");
    }

    #[test]
    fn relative_leaves_foreign_paths_alone() {
        // Not under the project root.
        assert_eq!(
            make_relative("/usr/include/stdio.h", "/proj/src", "/proj"),
            "/usr/include/stdio.h"
        );
        // Already relative.
        assert_eq!(make_relative("x.c", "/proj/src", "/proj"), "x.c");
        // No working directory configured.
        assert_eq!(make_relative("/proj/x.c", "", "/proj"), "/proj/x.c");
    }

    #[test]
    fn absolute_round_trip() {
        for p in ["x.c", "sub/x.c", "./x.c"] {
            assert_eq!(
                make_relative(&make_absolute(p, "/proj/src"), "/proj/src", "/proj"),
                normalize(p)
            );
        }
    }

    #[test]
    fn make_absolute_preserves_trailing_slash() {
        assert_eq!(make_absolute("sub/", "/proj"), "/proj/sub/");
        assert_eq!(make_absolute("/abs/path", "/proj"), "/abs/path");
        assert_eq!(make_absolute("", "/proj"), "");
    }

    #[test_case("a/b/c", 0)]
    #[test_case("../a", 1)]
    #[test_case("../../a", 2)]
    #[test_case("a/../../b", 1)]
    #[test_case("..", 1)]
    #[test_case("a/..", 0)]
    fn parent_levels(path: &str, want: i32) {
        assert_eq!(parent_directory_levels(path), want);
    }

    #[test]
    fn last_segments() {
        assert_eq!(last_n_segments("/a/b/c", 1).unwrap(), "c");
        assert_eq!(last_n_segments("/a/b/c", 2).unwrap(), "b/c");
        assert_eq!(last_n_segments("/a/b/c/", 2).unwrap(), "b/c");
        assert_eq!(last_n_segments("c", 1).unwrap(), "c");
        assert_eq!(last_n_segments("/a/b/c", 0).unwrap(), "");
        assert!(last_n_segments("/a", 3).is_err());
    }

    #[test]
    fn prefix_map_first_match_wins() {
        let map = vec![
            ("/usr/local".to_string(), "/opt".to_string()),
            ("/usr".to_string(), "/mnt/usr".to_string()),
        ];
        assert_eq!(resolve_prefix_map("/usr/local/lib", &map), "/opt/lib");
        assert_eq!(resolve_prefix_map("/usr/include", &map), "/mnt/usr/include");
        assert_eq!(resolve_prefix_map("/home/x", &map), "/home/x");
        // Segment-aligned only.
        assert_eq!(resolve_prefix_map("/usr_local/x", &map), "/usr_local/x");
    }
}
