pub const PLACEHOLDER: &str = "$PATH_VERSION";

/// Replace every literal occurrence of `placeholder` in `template` with `revision`.
///
/// Nothing in either string is treated as a pattern, so a revision such as
/// `$1` or `4123:4168M` lands in the output exactly as written.
pub fn render_with(template: &str, placeholder: &str, revision: &str) -> String {
    if placeholder.is_empty() {
        return template.to_string();
    }
    template.replace(placeholder, revision)
}

/// [`render_with`] using the default `$PATH_VERSION` token.
pub fn render(template: &str, revision: &str) -> String {
    render_with(template, PLACEHOLDER, revision)
}

pub fn count_placeholders(template: &str, placeholder: &str) -> usize {
    if placeholder.is_empty() {
        return 0;
    }
    template.matches(placeholder).count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn render_replaces_single_occurrence() {
        let rendered = render("Version: aaabbbccc $PATH_VERSION end", "12345");
        assert_eq!(rendered, "Version: aaabbbccc 12345 end");
    }

    #[test]
    fn render_replaces_every_occurrence() {
        let template = "#define REV \"$PATH_VERSION\"\n// $PATH_VERSION\n$PATH_VERSION";
        let rendered = render(template, "r42");
        assert_eq!(rendered, "#define REV \"r42\"\n// r42\nr42");
        assert_eq!(count_placeholders(template, PLACEHOLDER), 3);
    }

    #[test]
    fn render_without_placeholder_is_verbatim() {
        let template = "#pragma once\n#define REV \"none\"\n";
        assert_eq!(render(template, "12345"), template);
        assert_eq!(count_placeholders(template, PLACEHOLDER), 0);
    }

    #[test]
    fn render_inserts_special_characters_literally() {
        let rendered = render("rev=$PATH_VERSION;", r"$1\0&${name}");
        assert_eq!(rendered, r"rev=$1\0&${name};");
    }

    #[test]
    fn render_does_not_rescan_inserted_revision() {
        let rendered = render("$PATH_VERSION", "$PATH_VERSION-dirty");
        assert_eq!(rendered, "$PATH_VERSION-dirty");
    }

    #[test]
    fn render_with_custom_placeholder() {
        let rendered = render_with("v@REV@ and $PATH_VERSION", "@REV@", "7");
        assert_eq!(rendered, "v7 and $PATH_VERSION");
    }

    #[test]
    fn empty_placeholder_leaves_template_untouched() {
        assert_eq!(render_with("abc", "", "7"), "abc");
        assert_eq!(count_placeholders("abc", ""), 0);
    }
}
