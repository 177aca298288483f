//! Unique test data built from ULIDs.

use ulid::Ulid;

/// A website name that no other test run will produce.
///
/// ```
/// use test_support::unique_name;
///
/// let a = unique_name("site");
/// let b = unique_name("site");
/// assert_ne!(a, b);
/// assert!(a.starts_with("site-"));
/// ```
pub fn unique_name(prefix: &str) -> String {
    format!("{}-{}", prefix, Ulid::new())
}

/// A URL under the reserved `.example.test` domain.
///
/// ```
/// use test_support::unique_url;
///
/// let url = unique_url("docs");
/// assert!(url.starts_with("https://docs-"));
/// assert!(url.ends_with(".example.test"));
/// ```
pub fn unique_url(prefix: &str) -> String {
    format!("https://{}-{}.example.test", prefix, Ulid::new().to_string().to_lowercase())
}
