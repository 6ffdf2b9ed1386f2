//! Various helper method for reporting on the compiled version of the library both from calling
//! applications as well as the version reported in the user agent of the library HTTP client.

/// Reports the full version and various useful build settings as a well-formatted and
/// semi-structured string.
pub fn full_version() -> String {
    format!(
        "build-profile={} build-timestamp={} features={} repo-version={}",
        env!("BUILD_PROFILE"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_FEATURES"),
        env!("REPO_VERSION"),
    )
}

/// Only the core version information from the build, suitable for headers and log lines.
pub fn minimal_version() -> String {
    format!("repo-version={}", env!("REPO_VERSION"))
}

/// The user agent sent by the built-in HTTP client. Useful to recognize this library in the
/// remote service's request logs.
pub fn user_agent() -> String {
    format!("triplog/{}", minimal_version())
}
