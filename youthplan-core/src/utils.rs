use crate::error::{PlannerError, PlannerResult};

/// Lowercase, hyphen-separated, at most 50 characters. Unicode letters (Hangul
/// included) are kept as they are.
pub fn slugify(s: &str) -> String {
    s.to_lowercase()
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { '-' })
        .collect::<String>()
        .split('-')
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("-")
        .chars()
        .take(50)
        .collect()
}

/// Find an item by full id or by an unambiguous id prefix.
pub fn resolve_index<T>(
    items: &[T],
    id: &str,
    id_of: impl Fn(&T) -> &str,
    kind: &'static str,
) -> PlannerResult<usize> {
    if let Some(index) = items.iter().position(|item| id_of(item) == id) {
        return Ok(index);
    }

    let matches: Vec<usize> = items
        .iter()
        .enumerate()
        .filter(|(_, item)| !id.is_empty() && id_of(item).starts_with(id))
        .map(|(index, _)| index)
        .collect();

    match matches.as_slice() {
        [index] => Ok(*index),
        [] => Err(PlannerError::not_found(kind, id)),
        _ => Err(PlannerError::InvalidInput(format!(
            "{} id '{}' is ambiguous ({} matches)",
            kind,
            id,
            matches.len()
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slugify_keeps_hangul() {
        assert_eq!(slugify("2025 여름 수련회!"), "2025-여름-수련회");
        assert_eq!(slugify("  Youth   Night  "), "youth-night");
    }

    #[test]
    fn test_resolve_index_by_prefix() {
        let ids = vec!["abc123", "abd456", "xyz789"];
        assert_eq!(resolve_index(&ids, "xyz789", |s| *s, "Program").unwrap(), 2);
        assert_eq!(resolve_index(&ids, "abd", |s| *s, "Program").unwrap(), 1);
        assert!(matches!(
            resolve_index(&ids, "ab", |s| *s, "Program"),
            Err(PlannerError::InvalidInput(_))
        ));
        assert!(matches!(
            resolve_index(&ids, "q", |s| *s, "Program"),
            Err(PlannerError::NotFound { .. })
        ));
    }
}
