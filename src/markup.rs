use std::sync::LazyLock;

use regex::Regex;

/// Anything between `<` and the next `>`
static HTML_TAG_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<[^>]*>").expect("Invalid HTML tag regex"));

/// Remove markup tags from recipe instructions, keeping the text between them.
pub fn strip_markup(text: &str) -> String {
    HTML_TAG_REGEX.replace_all(text, "").into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strips_inline_tags() {
        assert_eq!(strip_markup("Boil <b>water</b> now"), "Boil water now");
    }

    #[test]
    fn test_strips_tags_with_attributes() {
        assert_eq!(
            strip_markup(r#"<ol><li class="step">Chop</li><li>Fry</li></ol>"#),
            "ChopFry"
        );
    }

    #[test]
    fn test_plain_text_untouched() {
        assert_eq!(strip_markup("Bake at 180C for 20 minutes"), "Bake at 180C for 20 minutes");
        assert_eq!(strip_markup(""), "");
    }

    #[test]
    fn test_unclosed_bracket_is_kept() {
        assert_eq!(strip_markup("Use 1 < 2 cups"), "Use 1 < 2 cups");
    }
}
