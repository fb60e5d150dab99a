//! Containment of client-supplied paths under a fixed base directory.
//!
//! A requested path is always joined onto the canonical base first and the
//! joined result is cleaned afterwards. Cleaning the input alone is not
//! enough: `a/../../x` looks harmless segment by segment but climbs out of
//! the base once it is appended to it.

use std::ffi::OsString;
use std::path::{Component, MAIN_SEPARATOR, Path, PathBuf};

/// Resolves requested paths against a base directory canonicalized once.
#[derive(Clone, Debug)]
pub struct PathResolver {
    base: PathBuf,
}

impl PathResolver {
    /// Canonicalize `base` once. Returns `None` when it cannot be made absolute.
    pub fn new(base: impl AsRef<Path>) -> Option<Self> {
        canonical_base(base.as_ref()).map(|base| Self { base })
    }

    /// The canonical base every accepted path is contained in.
    pub fn base(&self) -> &Path {
        &self.base
    }

    /// Join `requested` onto the base, clean the result and check containment.
    pub fn resolve(&self, requested: &str) -> Option<PathBuf> {
        contain(&self.base, requested)
    }

    /// Whether an absolute, already normalized path lies under the base.
    pub fn contains(&self, path: &Path) -> bool {
        is_contained(&self.base, path)
    }
}

/// Map `requested` to an absolute path under `base`, or reject it.
///
/// The returned path is either equal to the canonical base or starts with
/// the canonical base followed by exactly one separator. Leading separators
/// in `requested` do not replace the base; they are treated as relative.
pub fn resolve(base: impl AsRef<Path>, requested: &str) -> Option<PathBuf> {
    let base = canonical_base(base.as_ref())?;
    contain(&base, requested)
}

fn contain(base: &Path, requested: &str) -> Option<PathBuf> {
    if requested.contains('\0') {
        return None;
    }

    let mut joined = OsString::from(base.as_os_str());
    if !requested.is_empty() {
        joined.push(MAIN_SEPARATOR.to_string());
        joined.push(requested);
    }
    let candidate = clean(Path::new(&joined))?;

    is_contained(base, &candidate).then_some(candidate)
}

/// Byte-wise prefix check on the cleaned string forms.
fn is_contained(base: &Path, candidate: &Path) -> bool {
    let (Some(base), Some(candidate)) = (base.to_str(), candidate.to_str()) else {
        return false;
    };
    if candidate == base {
        return true;
    }
    // Only the filesystem root keeps its trailing separator after cleaning.
    if base.ends_with(MAIN_SEPARATOR) {
        return candidate.starts_with(base);
    }
    candidate
        .strip_prefix(base)
        .is_some_and(|rest| rest.starts_with(MAIN_SEPARATOR))
}

fn canonical_base(base: &Path) -> Option<PathBuf> {
    let absolute = if base.is_absolute() {
        base.to_path_buf()
    } else {
        std::env::current_dir().ok()?.join(base)
    };
    clean(&absolute)
}

/// Lexically normalize an absolute path: drop `.` and empty segments and
/// resolve `..` against the preceding segment. `..` at the root stays at
/// the root. Relative input is rejected.
fn clean(path: &Path) -> Option<PathBuf> {
    let mut root = PathBuf::new();
    let mut segments: Vec<&std::ffi::OsStr> = Vec::new();

    for component in path.components() {
        match component {
            Component::Prefix(prefix) => root.push(prefix.as_os_str()),
            Component::RootDir => root.push(MAIN_SEPARATOR.to_string()),
            Component::CurDir => {}
            Component::ParentDir => {
                segments.pop();
            }
            Component::Normal(segment) => segments.push(segment),
        }
    }

    if !root.has_root() {
        return None;
    }

    let mut cleaned = root;
    for segment in segments {
        cleaned.push(segment);
    }
    Some(cleaned)
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    const BASE: &str = "/srv/static";

    #[test]
    fn test_empty_and_dot_resolve_to_base() {
        assert_eq!(resolve(BASE, ""), Some(PathBuf::from(BASE)));
        assert_eq!(resolve(BASE, "."), Some(PathBuf::from(BASE)));
        assert_eq!(resolve(BASE, "./"), Some(PathBuf::from(BASE)));
    }

    #[test]
    fn test_parent_escape_rejected() {
        assert_eq!(resolve(BASE, "../../etc/passwd"), None);
        assert_eq!(resolve(BASE, ".."), None);
        assert_eq!(resolve(BASE, "js/../../static-private/key.pem"), None);
    }

    #[test]
    fn test_inner_parent_segments_accepted() {
        assert_eq!(
            resolve(BASE, "sub/dir/../../sub/file.png"),
            Some(PathBuf::from("/srv/static/sub/file.png"))
        );
        assert_eq!(
            resolve(BASE, "js/../css/app.css"),
            Some(PathBuf::from("/srv/static/css/app.css"))
        );
    }

    #[test]
    fn test_sibling_with_shared_prefix_rejected() {
        // "/srv/static-secrets" starts with "/srv/static" as a string but is
        // not inside it.
        assert_eq!(resolve(BASE, "../static-secrets/token"), None);
        assert_eq!(resolve(BASE, "../static"), Some(PathBuf::from(BASE)));
    }

    #[test]
    fn test_absolute_request_is_treated_as_relative() {
        assert_eq!(
            resolve(BASE, "/etc/passwd"),
            Some(PathBuf::from("/srv/static/etc/passwd"))
        );
        assert_eq!(
            resolve(BASE, "//js///app.js"),
            Some(PathBuf::from("/srv/static/js/app.js"))
        );
        assert_eq!(resolve(BASE, "/../../etc/passwd"), None);
    }

    #[test]
    fn test_unclean_base_is_canonicalized() {
        assert_eq!(
            resolve("/srv/./static/../static/", "app.js"),
            Some(PathBuf::from("/srv/static/app.js"))
        );
        assert_eq!(resolve("/srv/static/", ""), Some(PathBuf::from(BASE)));
    }

    #[test]
    fn test_relative_base_is_made_absolute() {
        let resolved = resolve("static", "app.js").unwrap();
        let expected = std::env::current_dir().unwrap().join("static/app.js");
        assert!(resolved.is_absolute());
        assert_eq!(resolved, expected);
    }

    #[test]
    fn test_root_base() {
        assert_eq!(resolve("/", "etc/passwd"), Some(PathBuf::from("/etc/passwd")));
        assert_eq!(resolve("/", "../.."), Some(PathBuf::from("/")));
    }

    #[test]
    fn test_encoded_and_odd_inputs_stay_contained() {
        // Percent sequences are literal names once they reach the resolver.
        assert_eq!(
            resolve(BASE, "%2e%2e/%2e%2e/etc/passwd"),
            Some(PathBuf::from("/srv/static/%2e%2e/%2e%2e/etc/passwd"))
        );
        // A backslash is an ordinary byte on unix.
        assert_eq!(
            resolve(BASE, "..\\..\\etc\\passwd"),
            Some(PathBuf::from("/srv/static/..\\..\\etc\\passwd"))
        );
        assert_eq!(resolve(BASE, "app.js\0.png"), None);
    }

    #[test]
    fn test_traversal_corpus_never_escapes() {
        let prefixes = ["", "/", "./", "a/", "a/b/", "//", "a/./b/"];
        let climbs = ["", "..", "../..", "../../..", "a/../..", "./../", "../a/../.."];
        let tails = ["", "etc/passwd", "static/app.js", ".", "x/.."];

        let base = Path::new(BASE);
        for prefix in prefixes {
            for climb in climbs {
                for tail in tails {
                    let requested = format!("{prefix}{climb}/{tail}");
                    if let Some(resolved) = resolve(BASE, &requested) {
                        assert!(
                            resolved == base || resolved.starts_with(base),
                            "{requested:?} escaped to {resolved:?}"
                        );
                        let rendered = resolved.to_str().unwrap();
                        assert!(
                            rendered == BASE || rendered.starts_with("/srv/static/"),
                            "{requested:?} produced {rendered:?}"
                        );
                    }
                }
            }
        }
    }

    #[test]
    fn test_resolver_reuses_canonical_base() {
        let resolver = PathResolver::new("/srv//static/.").unwrap();
        assert_eq!(resolver.base(), Path::new(BASE));
        assert_eq!(
            resolver.resolve("img/logo.png"),
            Some(PathBuf::from("/srv/static/img/logo.png"))
        );
        assert_eq!(resolver.resolve("../../etc/passwd"), None);
    }
}
