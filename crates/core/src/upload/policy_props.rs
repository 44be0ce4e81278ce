//! Property-based tests for upload policy and filename helpers.
//!
//! - Property 1: Oversized files are always rejected
//! - Property 2: Unlisted extensions are always rejected
//! - Property 3: Listed extensions are accepted in any letter case
//! - Property 4: Stripping a single extension recovers the stem

use proptest::prelude::*;

use super::error::PolicyError;
use super::filename::{extension, strip_extension};
use super::policy::UploadPolicy;

/// Strategy for filename stems: no dots, no separators, never empty.
fn stem() -> impl Strategy<Value = String> {
    "[A-Za-z0-9_-]{1,24}"
}

/// Strategy for extensions outside the default allow-list.
fn disallowed_extension() -> impl Strategy<Value = String> {
    "[a-z]{1,5}".prop_filter("must not be an allowed image type", |ext| {
        !matches!(ext.as_str(), "jpg" | "jpeg" | "png" | "svg")
    })
}

/// Strategy for allowed extensions with random letter case.
fn allowed_extension_any_case() -> impl Strategy<Value = String> {
    (
        prop::sample::select(vec!["jpg", "jpeg", "png", "svg"]),
        prop::collection::vec(any::<bool>(), 4),
    )
        .prop_map(|(ext, upper)| {
            ext.chars()
                .zip(upper)
                .map(|(c, up)| if up { c.to_ascii_uppercase() } else { c })
                .collect()
        })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Property 1: any declared size above the maximum fails with
    /// `FileTooLarge`, whatever the extension.
    #[test]
    fn prop_oversize_rejected(
        max in 1u64..10_000_000,
        excess in 1u64..10_000_000,
        name in stem(),
        ext in "[a-z]{0,5}",
    ) {
        let policy = UploadPolicy::new(max, [".png"]);
        let filename = format!("{name}.{ext}");

        let err = policy.validate(max + excess, &filename).unwrap_err();
        prop_assert_eq!(err, PolicyError::FileTooLarge { size: max + excess, max });
    }

    /// Property 2: an extension outside the allow-list fails with
    /// `UnsupportedFileType`, even for tiny files.
    #[test]
    fn prop_unlisted_extension_rejected(
        name in stem(),
        ext in disallowed_extension(),
        size in 0u64..=UploadPolicy::DEFAULT_MAX_FILE_SIZE,
    ) {
        let policy = UploadPolicy::default();
        let filename = format!("{name}.{ext}");

        let rejected = matches!(
            policy.validate(size, &filename),
            Err(PolicyError::UnsupportedFileType { .. })
        );
        prop_assert!(rejected);
    }

    /// Property 3: allowed extensions match case-insensitively.
    #[test]
    fn prop_allowed_extension_any_case(
        name in stem(),
        ext in allowed_extension_any_case(),
        size in 0u64..=UploadPolicy::DEFAULT_MAX_FILE_SIZE,
    ) {
        let policy = UploadPolicy::default();
        let filename = format!("{name}.{ext}");

        prop_assert!(policy.validate(size, &filename).is_ok());
    }

    /// Property 4: `strip_extension` removes exactly the last extension.
    #[test]
    fn prop_strip_extension_recovers_stem(
        name in stem(),
        ext in "[A-Za-z0-9]{1,6}",
    ) {
        let filename = format!("{name}.{ext}");
        let dotted = format!(".{ext}");

        prop_assert_eq!(strip_extension(&filename), name);
        prop_assert_eq!(extension(&filename), Some(dotted.as_str()));
    }
}
