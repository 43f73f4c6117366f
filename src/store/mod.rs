//! Storage operations, one module per service. Every write runs inside a
//! transaction so a failed operation never leaves partial rows behind.

pub mod bookmarks;
pub mod clubs;
pub mod events;
pub mod identity;
pub mod media;
pub mod memberships;
pub mod messages;
pub mod stats;

/// Escapes `%`, `_` and `\` so user text matches literally inside a LIKE pattern.
pub(crate) fn like_pattern(search: &str) -> String {
    let mut pattern = String::with_capacity(search.len() + 2);
    pattern.push('%');
    for c in search.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

#[cfg(test)]
mod tests {
    use super::like_pattern;

    #[test]
    fn like_pattern_escapes_wildcards() {
        assert_eq!(like_pattern("chess"), "%chess%");
        assert_eq!(like_pattern("100%_fun"), "%100\\%\\_fun%");
    }
}
