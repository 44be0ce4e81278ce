//! Filename helpers.
//!
//! Only the final path component (after the last `/`) is considered. The
//! extension is everything from the last `.` of that component, so `".png"`
//! has the extension `".png"` and an empty stem.

/// Final path component of `filename`.
fn base_name(filename: &str) -> &str {
    filename.rsplit('/').next().unwrap_or(filename)
}

/// Extension of `filename` including the leading dot, case preserved.
///
/// ```
/// use assetdrop_core::upload::extension;
///
/// assert_eq!(extension("photo.JPG"), Some(".JPG"));
/// assert_eq!(extension("archive.tar.gz"), Some(".gz"));
/// assert_eq!(extension(".png"), Some(".png"));
/// assert_eq!(extension("README"), None);
/// ```
#[must_use]
pub fn extension(filename: &str) -> Option<&str> {
    let base = base_name(filename);
    base.rfind('.').map(|idx| &base[idx..])
}

/// Base name of `filename` with its final extension removed.
///
/// ```
/// use assetdrop_core::upload::strip_extension;
///
/// assert_eq!(strip_extension("report.png"), "report");
/// assert_eq!(strip_extension("archive.tar.gz"), "archive.tar");
/// ```
#[must_use]
pub fn strip_extension(filename: &str) -> String {
    let base = base_name(filename);
    match extension(base) {
        Some(ext) => base[..base.len() - ext.len()].to_string(),
        None => base.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("photo.jpg", Some(".jpg"))]
    #[case("photo.JPG", Some(".JPG"))]
    #[case("archive.tar.gz", Some(".gz"))]
    #[case("file.", Some("."))]
    #[case("dir.d/photo", None)]
    #[case("dir/photo.png", Some(".png"))]
    #[case(".png", Some(".png"))]
    #[case(".JPG", Some(".JPG"))]
    #[case("noext", None)]
    #[case("", None)]
    fn test_extension(#[case] filename: &str, #[case] expected: Option<&str>) {
        assert_eq!(extension(filename), expected);
    }

    #[rstest]
    #[case("report.png", "report")]
    #[case("archive.tar.gz", "archive.tar")]
    #[case("noext", "noext")]
    #[case(".bashrc", "")]
    #[case("file.", "file")]
    #[case("dir/photo.jpg", "photo")]
    #[case("a/b/c.d/e.svg", "e")]
    #[case("dir/", "")]
    #[case("", "")]
    fn test_strip_extension(#[case] filename: &str, #[case] expected: &str) {
        assert_eq!(strip_extension(filename), expected);
    }
}
