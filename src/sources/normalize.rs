//! Pattern rewriting applied before patterns reach the `glob` crate.
use camino::Utf8Path;

/// Scope a manifest pattern to the module directory.
///
/// A `.` or empty directory leaves the pattern untouched so paths in the
/// generated graph stay relative (`main.go`, not `./main.go`). Absolute
/// patterns are never rescoped.
pub(super) fn scope_pattern(dir: &Utf8Path, pattern: &str) -> String {
    let trimmed = pattern.strip_prefix("./").unwrap_or(pattern);
    if Utf8Path::new(trimmed).is_absolute() || is_current_dir(dir) {
        return trimmed.to_owned();
    }
    let base = dir.as_str().trim_end_matches('/');
    let escaped = glob::Pattern::escape(base);
    format!("{escaped}/{trimmed}")
}

/// Returns `true` for directories that do not contribute a path prefix.
pub(crate) fn is_current_dir(dir: &Utf8Path) -> bool {
    matches!(dir.as_str(), "" | ".")
}

/// Rewrite backslash escapes into the bracket form understood by `glob`.
///
/// The `glob` crate has no escape character, so `\*` becomes `[*]` and
/// likewise for `?`, `[`, `]`, `{` and `}`. Backslashes inside character
/// classes are copied verbatim.
#[cfg(unix)]
pub(super) fn force_literal_escapes(pattern: &str) -> String {
    let mut out = String::with_capacity(pattern.len());
    let mut it = pattern.chars().peekable();
    let mut in_class = false;
    while let Some(c) = it.next() {
        match c {
            '[' if !in_class => {
                in_class = true;
                out.push(c);
            }
            ']' if in_class => {
                in_class = false;
                out.push(c);
            }
            '\\' if !in_class => handle_escaped_char(&mut it, &mut out),
            _ => out.push(c),
        }
    }
    out
}

/// Windows patterns use `\` as a separator, never as an escape.
#[cfg(not(unix))]
pub(super) fn force_literal_escapes(pattern: &str) -> String {
    pattern.replace('\\', "/")
}

#[cfg(unix)]
fn handle_escaped_char(it: &mut std::iter::Peekable<std::str::Chars<'_>>, out: &mut String) {
    let Some(next) = it.peek().copied() else {
        out.push('\\');
        return;
    };

    let literal = match next {
        '*' => "[*]",
        '?' => "[?]",
        '[' => "[[]",
        ']' => "[]]",
        '{' => "[{]",
        '}' => "[}]",
        _ => {
            out.push('\\');
            return;
        }
    };
    it.next();
    out.push_str(literal);
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(".", "main.go", "main.go")]
    #[case("", "./main.go", "main.go")]
    #[case("cmd/server", "*.go", "cmd/server/*.go")]
    #[case("cmd/server/", "./*.go", "cmd/server/*.go")]
    #[case("web[1]", "*.js", "web[[]1[]]/*.js")]
    fn scope_pattern_prefixes_module_dir(
        #[case] dir: &str,
        #[case] pattern: &str,
        #[case] expected: &str,
    ) {
        assert_eq!(scope_pattern(Utf8Path::new(dir), pattern), expected);
    }

    #[cfg(unix)]
    #[test]
    fn scope_pattern_keeps_absolute_patterns() {
        assert_eq!(
            scope_pattern(Utf8Path::new("pkg"), "/abs/*.go"),
            "/abs/*.go"
        );
    }

    #[cfg(unix)]
    #[rstest]
    #[case("a\\*b", "a[*]b")]
    #[case("\\{x\\}", "[{]x[}]")]
    #[case("[\\]]", "[\\]]")]
    #[case("trailing\\", "trailing\\")]
    fn literal_escapes_become_classes(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(force_literal_escapes(input), expected);
    }
}
