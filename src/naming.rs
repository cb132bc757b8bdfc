//! Name comparison shared by every aggregate service.
//!
//! Uniqueness checks must not go through locale-aware case folding: upper- or
//! lower-casing mis-folds characters like the Turkish dotted/dotless I, so a
//! database-side UPPER() comparison can disagree with the application. The
//! services fetch the candidate rows and compare here, ordinally.

/// Ordinal case-insensitive equality on trimmed names.
pub fn names_match(existing: &str, candidate: &str) -> bool {
    existing.trim().eq_ignore_ascii_case(candidate.trim())
}

/// True when any row other than `exclude_id` carries `candidate` as its name.
pub fn name_taken<'a, I>(rows: I, candidate: &str, exclude_id: Option<i32>) -> bool
where
    I: IntoIterator<Item = (i32, &'a str)>,
{
    rows.into_iter()
        .filter(|(id, _)| Some(*id) != exclude_id)
        .any(|(_, name)| names_match(name, candidate))
}

/// Masked rendering of a sensitive field: one asterisk per stored character.
pub fn mask(value: &str) -> String {
    "*".repeat(value.chars().count())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn match_is_case_insensitive_and_trimmed() {
        assert!(names_match("Comedy", "  comedy "));
        assert!(names_match("ADMIN", "admin"));
        assert!(!names_match("Comedy", "Drama"));
    }

    #[test]
    fn match_does_not_fold_locale_sensitive_characters() {
        // Turkish dotted capital I must not collapse onto ASCII 'i'.
        assert!(!names_match("İSTANBUL", "istanbul"));
        assert!(!names_match("ısparta", "ISPARTA"));
    }

    #[test]
    fn taken_excludes_the_row_under_update() {
        let rows = [(1, "admin"), (2, "user")];
        assert!(name_taken(rows, "ADMIN", None));
        assert!(!name_taken(rows, "ADMIN", Some(1)));
        assert!(name_taken(rows, "admin ", Some(2)));
    }

    #[test]
    fn mask_is_one_star_per_character() {
        assert_eq!(mask("secret"), "******");
        assert_eq!(mask(""), "");
    }
}
