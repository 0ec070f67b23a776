/// Suggest a URL slug for a form name.
///
/// Lowercases and trims the name, turns each whitespace run into a single
/// `-`, then drops everything outside `[a-z0-9-]`. The result may be empty
/// (e.g. for a name made only of punctuation).
pub fn suggest_slug(name: &str) -> String {
    let lowered = name.to_lowercase();
    let mut slug = String::with_capacity(lowered.len());
    let mut in_whitespace = false;

    for c in lowered.trim().chars() {
        if c.is_whitespace() {
            if !in_whitespace {
                slug.push('-');
            }
            in_whitespace = true;
            continue;
        }
        in_whitespace = false;
        if is_slug_char(c) {
            slug.push(c);
        }
    }

    slug
}

/// Whether `slug` is non-empty and only uses `[a-z0-9-]`.
pub fn is_valid_slug(slug: &str) -> bool {
    !slug.is_empty() && slug.chars().all(is_slug_char)
}

fn is_slug_char(c: char) -> bool {
    c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-'
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn suggests_from_display_name() {
        assert_eq!(suggest_slug("  Team Lunch   Survey "), "team-lunch-survey");
        assert_eq!(suggest_slug("Q3 Feedback!"), "q3-feedback");
        assert_eq!(suggest_slug("Café & Bar"), "caf--bar");
        assert_eq!(suggest_slug("???"), "");
    }

    #[test]
    fn suggestions_are_valid_unless_empty() {
        for name in ["Hello World", "2024 retro", "a-b c"] {
            assert!(is_valid_slug(&suggest_slug(name)), "{name}");
        }
    }

    #[test]
    fn validates_slugs() {
        assert!(is_valid_slug("event-2024"));
        assert!(!is_valid_slug(""));
        assert!(!is_valid_slug("Event"));
        assert!(!is_valid_slug("event 2024"));
        assert!(!is_valid_slug("event_2024"));
    }
}
