//! URL slugs derived from display names.

/// Convert a display name into a URL path segment.
///
/// Spaces become hyphens and the result is lowercased. Only the first `å` or
/// `ä` is folded to `a` and only the first `ö` to `o`; later occurrences are
/// kept as they are. Nothing else is escaped.
pub fn slugify(name: &str) -> String {
    let slug = name.replace(' ', "-").to_lowercase();
    let slug = replace_first(&slug, &['å', 'ä'], "a");
    replace_first(&slug, &['ö'], "o")
}

fn replace_first(text: &str, from: &[char], to: &str) -> String {
    match text.find(from) {
        Some(pos) => {
            let len = text[pos..].chars().next().map_or(0, char::len_utf8);
            format!("{}{}{}", &text[..pos], to, &text[pos + len..])
        }
        None => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lowercases_and_hyphenates() {
        assert_eq!(slugify("Guider"), "guider");
        assert_eq!(slugify("Mina Bästa Guider"), "mina-basta-guider");
    }

    #[test]
    fn folds_uppercase_accents() {
        assert_eq!(slugify("Åtgärder"), "atgärder");
        assert_eq!(slugify("Öl"), "ol");
    }

    #[test]
    fn only_first_accent_is_folded() {
        assert_eq!(slugify("ärtsås"), "artsås");
        assert_eq!(slugify("gödsel och ört"), "godsel-och-ört");
        assert_eq!(slugify("söndagsår"), "sondagsar");
    }

    #[test]
    fn passes_other_characters_through() {
        assert_eq!(slugify("C++ & Rust?"), "c++-&-rust?");
        assert_eq!(slugify("über"), "über");
    }

    #[test]
    fn idempotent_for_single_accents() {
        for name in ["Intro", "Mina Bästa Guider", "Ölburk", "Två ord", "a b ö"] {
            let once = slugify(name);
            assert_eq!(slugify(&once), once, "not idempotent for {name:?}");
        }
    }

    #[test]
    fn empty_name_stays_empty() {
        assert_eq!(slugify(""), "");
    }
}
