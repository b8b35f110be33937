//! Custom assertion macros for CLI and scenario tests.
//!
//! These macros provide descriptive failure messages to aid debugging.

/// Assert that a command succeeded, printing its output otherwise.
///
/// # Example
/// ```ignore
/// assert_success!(result);
/// ```
#[macro_export]
macro_rules! assert_success {
    ($result:expr) => {
        assert!(
            $result.success,
            "Expected success, got exit code {}\n\
             stdout:\n{}\n\
             stderr:\n{}",
            $result.exit_code,
            $result.stdout,
            $result.stderr
        );
    };
}

/// Assert that output (stdout or stderr) contains expected pattern.
///
/// # Example
/// ```ignore
/// assert_output_contains!(result, "is live");
/// ```
#[macro_export]
macro_rules! assert_output_contains {
    ($result:expr, $pattern:expr) => {
        assert!(
            $result.stdout.contains($pattern) || $result.stderr.contains($pattern),
            "Expected output to contain '{}'\n\
             stdout:\n{}\n\
             stderr:\n{}",
            $pattern,
            $result.stdout,
            $result.stderr
        );
    };
}

/// Assert that output does NOT contain a pattern.
#[macro_export]
macro_rules! assert_output_not_contains {
    ($result:expr, $pattern:expr) => {
        assert!(
            !$result.stdout.contains($pattern) && !$result.stderr.contains($pattern),
            "Expected output to NOT contain '{}'\n\
             stdout:\n{}\n\
             stderr:\n{}",
            $pattern,
            $result.stdout,
            $result.stderr
        );
    };
}

/// Assert the exact object keys of a bucket in a local cloud.
///
/// # Example
/// ```ignore
/// assert_bucket_keys!(cloud, "docs.example.com", ["error.html", "index.html"]);
/// ```
#[macro_export]
macro_rules! assert_bucket_keys {
    ($cloud:expr, $bucket:expr, [$($key:expr),* $(,)?]) => {
        let expected: Vec<String> = vec![$($key.to_string()),*];
        let actual = $cloud.object_keys($bucket);
        assert_eq!(
            actual, expected,
            "Bucket '{}' holds unexpected objects",
            $bucket
        );
    };
}
