pub(crate) mod comment_repository;
pub(crate) mod like_repository;
pub(crate) mod notification_repository;
pub(crate) mod post_repository;
pub(crate) mod user_repository;

/// Turns a search term into an `ILIKE` substring pattern, escaping the
/// wildcard characters the client may have typed.
pub(super) fn like_pattern(term: &str) -> String {
    let mut pattern = String::with_capacity(term.len() + 2);
    pattern.push('%');
    for ch in term.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(ch);
    }
    pattern.push('%');
    pattern
}

#[cfg(test)]
mod tests {
    use super::like_pattern;

    #[test]
    fn like_pattern_escapes_wildcards() {
        assert_eq!(like_pattern("rust"), "%rust%");
        assert_eq!(like_pattern("50%_off\\"), "%50\\%\\_off\\\\%");
    }
}
