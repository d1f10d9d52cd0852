/// Builds the web URL for a CircleCI build.
///
/// The API root targets GitHub-hosted projects, so web links use the `gh`
/// path scheme.
///
/// # Arguments
///
/// * `project` - Project slug (e.g. "org/repo")
/// * `build_num` - Build number
///
/// # Returns
///
/// Clickable URL to the build (e.g. <https://circleci.com/gh/org/repo/42>)
pub fn build_url(project: &str, build_num: u64) -> String {
    format!("https://circleci.com/gh/{project}/{build_num}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_url() {
        assert_eq!(
            build_url("org/repo", 1234),
            "https://circleci.com/gh/org/repo/1234"
        );
    }
}
