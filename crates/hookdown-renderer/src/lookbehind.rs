//! Escape-aware matching without native lookbehind.
//!
//! Rules such as `!!!red text!!!` must not fire when preceded by a
//! backslash. With native lookbehind this is `(?<!\\)!!!`. The regex engine
//! may not support look-around, so the capability is probed once per
//! process and, when missing, rules are compiled with one synthetic leading
//! group capturing the character before the match (or start of input), and
//! [`replace_lookbehind`] filters escaped candidates by hand.

use std::sync::LazyLock;

use regex::{Captures, Regex};

use crate::hook::groups_from;

/// Whether the regex engine accepts negative lookbehind. Probed once.
static LOOKBEHIND_SUPPORTED: LazyLock<bool> = LazyLock::new(|| {
    let supported = Regex::new(r"(?<!\\)x").is_ok();
    tracing::debug!(supported, "Probed regex lookbehind support");
    supported
});

/// Whether native negative lookbehind is available.
pub fn is_lookbehind_supported() -> bool {
    *LOOKBEHIND_SUPPORTED
}

/// Replace every match of `reg` in `text` not preceded by `escape`.
///
/// `reg` must start with `synthetic_groups` capture groups (at least one),
/// the first capturing the character right before the real match or
/// nothing at the start of input, e.g. `(^|[\s\S])!!!`. For each match:
///
/// - If the first synthetic group is the escape character, the text is left
///   verbatim and scanning resumes right after the escape character.
/// - Otherwise `transform` receives the real match (without the synthetic
///   prefix) and the capture groups after the synthetic ones.
///
/// Text outside transformed spans is copied unchanged. A match may begin on
/// the last character of the previous one, so adjacent matches both fire.
///
/// # Example
///
/// ```
/// use regex::Regex;
/// use hookdown_renderer::lookbehind::replace_lookbehind;
///
/// let reg = Regex::new(r"(^|[\s\S])\*(\w+)\*").unwrap();
/// let out = replace_lookbehind(r"*a* \*b*", &reg, '\\', 1, |_, g| format!("<em>{}</em>", g[0]));
/// assert_eq!(out, r"<em>a</em> \*b*");
/// ```
pub fn replace_lookbehind<F>(
    text: &str,
    reg: &Regex,
    escape: char,
    synthetic_groups: usize,
    mut transform: F,
) -> String
where
    F: FnMut(&str, &[&str]) -> String,
{
    let mut output = String::with_capacity(text.len());
    let mut cursor = 0;
    let mut search = 0;

    while search <= text.len() {
        let Some(caps) = reg.captures_at(text, search) else {
            break;
        };
        let Some(whole) = caps.get(0) else {
            break;
        };
        let lead = caps.get(1).map_or("", |m| m.as_str());
        let real_start = real_match_start(&caps, synthetic_groups);

        if real_start < cursor {
            // Overlaps text already consumed by the previous match.
            search = cursor;
            continue;
        }

        if !lead.is_empty() && lead.starts_with(escape) {
            output.push_str(&text[cursor..real_start]);
            cursor = real_start;
            search = real_start;
            continue;
        }

        output.push_str(&text[cursor..real_start]);
        let groups = groups_from(&caps, synthetic_groups + 1);
        output.push_str(&transform(&text[real_start..whole.end()], &groups));
        cursor = whole.end();

        search = if whole.end() > real_start {
            // Let the next match read the last character as its prefix.
            floor_char_boundary(text, whole.end() - 1)
        } else {
            match text[whole.end()..].chars().next() {
                Some(c) => whole.end() + c.len_utf8(),
                None => break,
            }
        };
    }

    output.push_str(&text[cursor..]);
    output
}

/// Replace every match using native lookbehind, with the same transform
/// contract as [`replace_lookbehind`] and no synthetic groups.
pub fn replace_native<F>(text: &str, reg: &Regex, mut transform: F) -> String
where
    F: FnMut(&str, &[&str]) -> String,
{
    reg.replace_all(text, |caps: &Captures<'_>| {
        transform(&caps[0], &groups_from(caps, 1))
    })
    .into_owned()
}

/// End of the synthetic prefix, or the match start when it matched nothing.
fn real_match_start(caps: &Captures<'_>, synthetic_groups: usize) -> usize {
    (1..=synthetic_groups)
        .filter_map(|idx| caps.get(idx))
        .map(|m| m.end())
        .max()
        .or_else(|| caps.get(0).map(|m| m.start()))
        .unwrap_or(0)
}

fn floor_char_boundary(text: &str, mut idx: usize) -> usize {
    while idx > 0 && !text.is_char_boundary(idx) {
        idx -= 1;
    }
    idx
}

/// Builds and applies "not preceded by an escape character" rules.
///
/// Chooses native lookbehind when the engine supports it and the
/// synthetic-group emulation otherwise.
///
/// # Example
///
/// ```
/// use regex::Regex;
/// use hookdown_renderer::lookbehind::EscapeGuard;
///
/// let guard = EscapeGuard::emulated('\\');
/// let reg = Regex::new(&format!("{}(\\w+)~", guard.begin("~"))).unwrap();
/// let out = guard.replace(r"~x~ \~y~", &reg, |_, g| g[0].to_uppercase());
/// assert_eq!(out, r"X \~y~");
/// ```
#[derive(Clone, Copy, Debug)]
pub struct EscapeGuard {
    escape: char,
    emulated: bool,
}

impl EscapeGuard {
    /// Guard using native lookbehind when available.
    #[must_use]
    pub fn new(escape: char) -> Self {
        Self {
            escape,
            emulated: !is_lookbehind_supported(),
        }
    }

    /// Guard that always uses emulation.
    #[must_use]
    pub fn emulated(escape: char) -> Self {
        Self {
            escape,
            emulated: true,
        }
    }

    /// Whether the emulation path is in use.
    pub fn is_emulated(&self) -> bool {
        self.emulated
    }

    /// Prefix `fragment` with the "not preceded by escape" condition.
    #[must_use]
    pub fn begin(&self, fragment: &str) -> String {
        if self.emulated {
            format!(r"(^|[\s\S]){fragment}")
        } else {
            let escape = regex::escape(&self.escape.to_string());
            format!("(?<!{escape}){fragment}")
        }
    }

    /// Number of synthetic leading groups [`begin`](Self::begin) adds.
    pub fn synthetic_groups(&self) -> usize {
        usize::from(self.emulated)
    }

    /// Replace every unescaped match of `reg`, a pattern built with
    /// [`begin`](Self::begin).
    pub fn replace<F>(&self, text: &str, reg: &Regex, transform: F) -> String
    where
        F: FnMut(&str, &[&str]) -> String,
    {
        if self.emulated {
            replace_lookbehind(text, reg, self.escape, self.synthetic_groups(), transform)
        } else {
            replace_native(text, reg, transform)
        }
    }
}
