//! Mapping between function names and test file paths.

use std::ffi::OsStr;
use std::path::{Path, PathBuf};

/// Folder used by mocha for tests, relative to the project root.
pub const TEST_FOLDER: &str = "test";

/// Suffix of a recognized test file.
pub const TEST_FILE_SUFFIX: &str = ".js";

/// Separator between module segments of a function name.
const FUNCTION_SEPARATOR: char = '/';

/// Files whose presence marks a serverless project root.
const PROJECT_MARKERS: &[&str] = &["s-project.json", "serverless.yml", "serverless.yaml"];

/// Returns the path of a function's test file, relative to the project root.
///
/// Every `/` in the function name becomes `_`, so `module1/function1` maps to
/// `test/module1_function1.js`.
#[must_use]
pub fn resolve_test_path(function_name: &str) -> PathBuf {
    let file_name = function_name.replace(FUNCTION_SEPARATOR, "_");
    Path::new(TEST_FOLDER).join(format!("{file_name}{TEST_FILE_SUFFIX}"))
}

/// Check whether a directory entry name looks like a test file.
///
/// Only the suffix is inspected, so names that are not valid UTF-8 still match.
#[must_use]
pub fn is_test_file(file_name: &OsStr) -> bool {
    file_name
        .as_encoded_bytes()
        .ends_with(TEST_FILE_SUFFIX.as_bytes())
}

/// Find the project root by walking up from `cwd` looking for a serverless project file.
///
/// Returns the first directory containing a marker, or `None` if none is found.
#[must_use]
pub fn project_root(cwd: &Path) -> Option<PathBuf> {
    let mut current = cwd.to_path_buf();

    loop {
        if PROJECT_MARKERS
            .iter()
            .any(|marker| current.join(marker).is_file())
        {
            return Some(current);
        }

        if !current.pop() {
            return None;
        }
    }
}

/// A serverless project on disk.
///
/// All paths handed out by the plugin are relative to [`Project::root`]; the
/// project joins them onto the root whenever the filesystem is touched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Project {
    root: PathBuf,
}

impl Project {
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Absolute location of a root-relative path.
    #[must_use]
    pub fn absolute(&self, relative: &Path) -> PathBuf {
        self.root.join(relative)
    }

    /// Absolute location of the test folder.
    #[must_use]
    pub fn test_dir(&self) -> PathBuf {
        self.root.join(TEST_FOLDER)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_resolve_plain_name() {
        assert_eq!(resolve_test_path("hello"), Path::new("test/hello.js"));
        assert_eq!(resolve_test_path("f"), Path::new("test").join("f.js"));
    }

    #[test]
    fn test_resolve_nested_name() {
        assert_eq!(
            resolve_test_path("module1/function1"),
            Path::new("test/module1_function1.js")
        );
        assert_eq!(resolve_test_path("a/b/c"), Path::new("test/a_b_c.js"));
    }

    #[test]
    fn test_resolve_only_touches_separators() {
        let path = resolve_test_path("my-mod.v2/fn_x");
        assert_eq!(path, Path::new("test/my-mod.v2_fn_x.js"));
    }

    #[test]
    fn test_is_test_file() {
        assert!(is_test_file(OsStr::new("a.js")));
        assert!(is_test_file(OsStr::new("module1_function1.js")));
        assert!(!is_test_file(OsStr::new("notes.txt")));
        assert!(!is_test_file(OsStr::new("a.json")));
        assert!(!is_test_file(OsStr::new("a.ts")));
    }

    #[cfg(unix)]
    #[test]
    fn test_is_test_file_non_utf8() {
        use std::os::unix::ffi::OsStrExt;

        assert!(is_test_file(OsStr::from_bytes(b"caf\xe9.js")));
        assert!(!is_test_file(OsStr::from_bytes(b"caf\xe9.txt")));
    }

    #[test]
    fn test_project_root_with_s_project() {
        let dir = tempdir().unwrap();
        let nested = dir.path().join("module1").join("function1");
        fs::create_dir_all(&nested).unwrap();
        fs::write(dir.path().join("s-project.json"), "{}").unwrap();

        assert_eq!(project_root(&nested), Some(dir.path().to_path_buf()));
    }

    #[test]
    fn test_project_root_with_serverless_yml() {
        let dir = tempdir().unwrap();
        let nested = dir.path().join("src");
        fs::create_dir_all(&nested).unwrap();
        fs::write(dir.path().join("serverless.yml"), "service: x\n").unwrap();

        assert_eq!(project_root(&nested), Some(dir.path().to_path_buf()));
    }

    #[test]
    fn test_project_paths() {
        let project = Project::new("/srv/app");
        assert_eq!(project.test_dir(), Path::new("/srv/app/test"));
        assert_eq!(
            project.absolute(&resolve_test_path("a/b")),
            Path::new("/srv/app/test/a_b.js")
        );
    }
}
