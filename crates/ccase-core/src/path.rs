use std::path::{Path, PathBuf};

/// Normalizes a local path the way the tracking tables key it.
///
/// Strips the `\\?\` verbatim prefix on Windows and any trailing separator,
/// so `C:\view\src\` and `\\?\C:\view\src` share one key.
#[must_use]
pub fn canonical_local_path(path: &Path) -> PathBuf {
    dunce::simplified(path).components().collect()
}

/// A file is writable when it exists and its read-only bit is clear.
///
/// Snapshot views load checked-in elements read-only, so a writable file
/// is the first hint that something happened to it.
#[must_use]
pub fn is_writable(path: &Path) -> bool {
    std::fs::metadata(path).is_ok_and(|meta| !meta.permissions().readonly())
}

#[must_use]
pub fn starts_with_ignore_case(path: &Path, prefix: &Path) -> bool {
    let path = path.to_string_lossy().to_lowercase();
    let prefix = prefix.to_string_lossy().to_lowercase();
    Path::new(&path).starts_with(Path::new(&prefix))
}

#[must_use]
pub fn same_path_ignore_case(a: &Path, b: &Path) -> bool {
    let a = canonical_local_path(a);
    let b = canonical_local_path(b);
    a.to_string_lossy().to_lowercase() == b.to_string_lossy().to_lowercase()
}
