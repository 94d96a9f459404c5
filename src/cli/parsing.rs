//! CLI parsing helpers for clap value parsers.

pub(super) fn parse_jobs(s: &str) -> Result<usize, String> {
    let value: usize = s
        .parse()
        .map_err(|_| format!("{s} is not a valid number"))?;
    if (1..=super::MAX_JOBS).contains(&value) {
        Ok(value)
    } else {
        Err(format!("jobs must be between 1 and {}", super::MAX_JOBS))
    }
}

/// Accept a single non-empty path segment, such as an output namespace.
pub(super) fn parse_segment(s: &str) -> Result<String, String> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return Err("value must not be empty".into());
    }
    if trimmed.contains(['/', '\\']) || trimmed == "." || trimmed == ".." {
        return Err(format!("'{trimmed}' must be a single path segment"));
    }
    Ok(trimmed.to_owned())
}

/// Accept a test-file marker. Markers match the end of a file stem, so they
/// cannot contain separators or dots.
pub(super) fn parse_marker(s: &str) -> Result<String, String> {
    if s.is_empty() {
        return Err("test marker must not be empty".into());
    }
    if s.contains(['/', '\\', '.']) {
        return Err(format!("test marker '{s}' must not contain '/', '\\' or '.'"));
    }
    Ok(s.to_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("1", Ok(1))]
    #[case("64", Ok(64))]
    #[case("0", Err(()))]
    #[case("65", Err(()))]
    #[case("many", Err(()))]
    fn jobs_are_bounded(#[case] raw: &str, #[case] expected: Result<usize, ()>) {
        assert_eq!(parse_jobs(raw).map_err(|_| ()), expected);
    }

    #[rstest]
    #[case("bood", true)]
    #[case(" acme ", true)]
    #[case("", false)]
    #[case("a/b", false)]
    #[case("..", false)]
    fn segments_are_single_components(#[case] raw: &str, #[case] ok: bool) {
        assert_eq!(parse_segment(raw).is_ok(), ok);
    }

    #[rstest]
    #[case("_test", true)]
    #[case(".spec", false)]
    #[case("", false)]
    fn markers_reject_separators(#[case] raw: &str, #[case] ok: bool) {
        assert_eq!(parse_marker(raw).is_ok(), ok);
    }
}
