//! Background color: `!!!color text!!!`.

use crate::error::RenderError;
use crate::hook::{Hook, HookType, Rule, SentenceHook};
use crate::lookbehind::EscapeGuard;

/// Sentence hook painting text with a background color.
///
/// `!!!red important!!!` renders as
/// `<span style="background-color:red">important</span>`. The color is a
/// hex code (`#fff`, `#a0b1c2`) or a lowercase name of 3 to 10 letters.
/// A backslash before the opening `!!!` disables the rule and stays in
/// the output.
///
/// # Example
///
/// ```
/// use hookdown_renderer::SentenceHook;
/// use hookdown_renderer::hooks::BackgroundColor;
///
/// let hook = BackgroundColor::new().unwrap();
/// assert_eq!(
///     hook.make_html("!!!red hi!!!"),
///     r#"<span style="background-color:red">hi</span>"#,
/// );
/// assert_eq!(hook.make_html(r"\!!!red hi!!!"), r"\!!!red hi!!!");
/// ```
pub struct BackgroundColor {
    rule: Rule,
    guard: EscapeGuard,
}

impl BackgroundColor {
    /// Hook name.
    pub const NAME: &'static str = "bgColor";

    /// Create the hook, using native lookbehind when available.
    pub fn new() -> Result<Self, RenderError> {
        Self::with_guard(EscapeGuard::new('\\'))
    }

    /// Create the hook with an explicit escape strategy.
    pub fn with_guard(guard: EscapeGuard) -> Result<Self, RenderError> {
        let rule = Rule::new(
            Self::NAME,
            guard.begin(r"!!!"),
            r"(#[0-9a-zA-Z]{3,6}|[a-z]{3,10})\s([\s\S]+?)",
            r"!!!",
        )?;
        Ok(Self { rule, guard })
    }
}

impl Hook for BackgroundColor {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn hook_type(&self) -> HookType {
        HookType::Sentence
    }
}

impl SentenceHook for BackgroundColor {
    fn rule(&self) -> &Rule {
        &self.rule
    }

    fn to_html(&self, _whole: &str, groups: &[&str]) -> String {
        format!(
            r#"<span style="background-color:{}">{}</span>"#,
            groups[0], groups[1]
        )
    }

    fn make_html(&self, text: &str) -> String {
        self.guard
            .replace(text, &self.rule.reg, |whole, groups| self.to_html(whole, groups))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn hooks() -> [BackgroundColor; 2] {
        [
            BackgroundColor::new().unwrap(),
            BackgroundColor::with_guard(EscapeGuard::emulated('\\')).unwrap(),
        ]
    }

    #[test]
    fn test_named_color() {
        for hook in hooks() {
            assert_eq!(
                hook.make_html("!!!red hi!!!"),
                r#"<span style="background-color:red">hi</span>"#
            );
        }
    }

    #[test]
    fn test_escaped_is_verbatim() {
        for hook in hooks() {
            assert_eq!(hook.make_html(r"\!!!red hi!!!"), r"\!!!red hi!!!");
        }
    }

    #[test]
    fn test_hex_color_mid_sentence() {
        for hook in hooks() {
            assert_eq!(
                hook.make_html("say !!!#ff0000 loud words!!! now"),
                r#"say <span style="background-color:#ff0000">loud words</span> now"#
            );
        }
    }

    #[test]
    fn test_two_spans() {
        for hook in hooks() {
            assert_eq!(
                hook.make_html("!!!red a!!! and !!!blue b!!!"),
                concat!(
                    r#"<span style="background-color:red">a</span> and "#,
                    r#"<span style="background-color:blue">b</span>"#
                )
            );
        }
    }

    #[test]
    fn test_invalid_color_untouched() {
        for hook in hooks() {
            assert_eq!(hook.make_html("!!!RED hi!!!"), "!!!RED hi!!!");
        }
    }

    #[test]
    fn test_hook_identity() {
        let hook = BackgroundColor::new().unwrap();
        assert_eq!(hook.name(), "bgColor");
        assert_eq!(hook.hook_type(), HookType::Sentence);
    }
}
