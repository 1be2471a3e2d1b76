//! Placeholder tokens standing in for cached HTML.
//!
//! A placeholder is the textual form of a pending cache lookup:
//!
//! ```text
//! ~~C<namespace>I<signature>_L<line count>$
//! ```
//!
//! A signature prefixed with `!` marks an *in-paragraph* placeholder, which
//! may sit inside running paragraph text. Any other placeholder is
//! *standalone*: it stands for a whole block and is never merged into a
//! paragraph.
//!
//! All placeholder patterns live in this module. Other modules encode through
//! [`Placeholder`] and scan through the functions here.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

/// Reserved sigil opening every placeholder.
pub const SIGIL: &str = "~~C";

/// Signature prefix marking an in-paragraph placeholder.
pub const IN_PARAGRAPH_PREFIX: char = '!';

/// Any placeholder, with or without the line-count suffix.
static ANY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"~~C(\d+)I(!?)(\w+?)(?:_L(\d+))?\$").unwrap());

/// Placeholder carrying a line count, with the line breaks right before it.
static LINE_COUNTED_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\n*)~~C\d+I(!?)\w+?_L(\d+)\$").unwrap());

/// Standalone placeholder anywhere in the input.
static STANDALONE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"~~C\d+I\w+\$").unwrap());

/// Standalone placeholder plus adjacent line breaks, used for splitting.
static STANDALONE_SPLIT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n*~~C\d+I\w+\$\n?").unwrap());

/// Input made only of whitespace-separated placeholders.
static FULLY_CACHED_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?:\s*~~C\d+I!?\w+\$\s*)+$").unwrap());

/// In-paragraph placeholder anywhere in the input.
static IN_PARAGRAPH_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"~~C\d+I!\w+\$").unwrap());

/// Trailing line-count suffix of a signature.
static LINE_SUFFIX_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"_L\d+$").unwrap());

/// Decoded placeholder token.
///
/// # Example
///
/// ```
/// use hookdown_renderer::Placeholder;
///
/// let token = Placeholder::standalone(3, "abc", 2).to_string();
/// assert_eq!(token, "~~C3Iabc_L2$");
///
/// let parsed = Placeholder::parse(&token).unwrap();
/// assert_eq!(parsed.namespace, 3);
/// assert_eq!(parsed.line_count, 2);
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Placeholder {
    /// Namespace of the cached region that owns the entry.
    pub namespace: u64,
    /// Cache signature, without the `!` prefix.
    pub signature: String,
    /// Whether the placeholder may be embedded in paragraph text.
    pub in_paragraph: bool,
    /// Number of source lines the cached fragment represents.
    pub line_count: usize,
}

impl Placeholder {
    /// Build a standalone placeholder.
    #[must_use]
    pub fn standalone(namespace: u64, signature: impl Into<String>, line_count: usize) -> Self {
        Self {
            namespace,
            signature: signature.into(),
            in_paragraph: false,
            line_count,
        }
    }

    /// Build a placeholder from a cache key, where a leading `!` marks it
    /// as in-paragraph.
    #[must_use]
    pub fn from_key(namespace: u64, key: &str, line_count: usize) -> Self {
        match key.strip_prefix(IN_PARAGRAPH_PREFIX) {
            Some(signature) => Self {
                namespace,
                signature: signature.to_owned(),
                in_paragraph: true,
                line_count,
            },
            None => Self::standalone(namespace, key, line_count),
        }
    }

    /// Key under which the fragment is stored in its region's cache.
    ///
    /// In-paragraph keys keep their `!` prefix; the line count is never part
    /// of the key.
    #[must_use]
    pub fn storage_key(&self) -> String {
        if self.in_paragraph {
            format!("{IN_PARAGRAPH_PREFIX}{}", self.signature)
        } else {
            self.signature.clone()
        }
    }

    /// Parse a single placeholder token.
    ///
    /// Returns `None` unless the whole input is exactly one token. A token
    /// without a line-count suffix parses with a line count of zero.
    #[must_use]
    pub fn parse(token: &str) -> Option<Self> {
        let caps = ANY_RE.captures(token)?;
        let whole = caps.get(0)?;
        if whole.start() != 0 || whole.end() != token.len() {
            return None;
        }
        Some(Self {
            namespace: caps[1].parse().ok()?,
            signature: caps[3].to_owned(),
            in_paragraph: !caps[2].is_empty(),
            line_count: caps.get(4).map_or(Some(0), |m| m.as_str().parse().ok())?,
        })
    }

    /// Find every placeholder in `text`, in order, regardless of namespace.
    pub fn scan(text: &str) -> impl Iterator<Item = Self> + '_ {
        ANY_RE
            .find_iter(text)
            .filter_map(|m| Self::parse(m.as_str()))
    }
}

impl fmt::Display for Placeholder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{SIGIL}{}I{}_L{}$",
            self.namespace,
            self.storage_key(),
            self.line_count
        )
    }
}

/// Build the pattern matching only placeholders of one namespace.
///
/// Group 1 captures the signature, including any `!` prefix and line-count
/// suffix.
pub(crate) fn namespace_pattern(namespace: u64) -> Regex {
    // Only digits are interpolated, so the pattern always compiles.
    Regex::new(&format!(r"~~C{namespace}I(!?\w+)\$")).unwrap()
}

/// Strip a trailing `_L<digits>` suffix from a signature.
///
/// # Example
///
/// ```
/// use hookdown_renderer::placeholder::strip_line_suffix;
///
/// assert_eq!(strip_line_suffix("abc_L12"), "abc");
/// assert_eq!(strip_line_suffix("!abc"), "!abc");
/// ```
#[must_use]
pub fn strip_line_suffix(signature: &str) -> &str {
    match LINE_SUFFIX_RE.find(signature) {
        Some(m) => &signature[..m.start()],
        None => signature,
    }
}

/// Check whether `text` holds cached content.
///
/// With `full_match`, `text` must consist entirely of whitespace-separated
/// standalone placeholders; a single in-paragraph placeholder anywhere makes
/// the answer `false`. Without it, one standalone placeholder anywhere is
/// enough. Placeholders of every namespace count.
///
/// # Example
///
/// ```
/// use hookdown_renderer::placeholder::is_contains_cache;
///
/// assert!(is_contains_cache("~~C0Ia_L1$\n~~C1Ib_L2$", true));
/// assert!(!is_contains_cache("~~C0Ia_L1$ ~~C1I!b_L0$", true));
/// assert!(is_contains_cache("text ~~C0Ia_L1$ text", false));
/// ```
#[must_use]
pub fn is_contains_cache(text: &str, full_match: bool) -> bool {
    if full_match {
        FULLY_CACHED_RE.is_match(text) && !IN_PARAGRAPH_RE.is_match(text)
    } else {
        STANDALONE_RE.is_match(text)
    }
}

/// Result of splitting content around standalone placeholders.
#[derive(Debug, PartialEq, Eq)]
pub struct CacheSplit<'a> {
    /// Matched placeholders, with their adjacent line breaks, in order.
    pub caches: Vec<&'a str>,
    /// Text between placeholders; always one more entry than `caches`.
    pub contents: Vec<&'a str>,
}

/// Split `content` on every standalone placeholder.
///
/// Each split point also swallows the line breaks right before the
/// placeholder and at most one line break right after it, so reassembly
/// does not introduce blank lines.
#[must_use]
pub fn split_html_by_cache(content: &str) -> CacheSplit<'_> {
    CacheSplit {
        caches: STANDALONE_SPLIT_RE
            .find_iter(content)
            .map(|m| m.as_str())
            .collect(),
        contents: STANDALONE_SPLIT_RE.split(content).collect(),
    }
}

/// Apply `processor` to the text between standalone placeholders.
///
/// Placeholders are kept, trimmed of surrounding whitespace, and results are
/// interleaved in the original order.
///
/// # Example
///
/// ```
/// use hookdown_renderer::placeholder::make_excluding_cached;
///
/// let out = make_excluding_cached("a\n~~C0Ix_L1$\nb", |part| part.to_uppercase());
/// assert_eq!(out, "A~~C0Ix_L1$B");
/// ```
pub fn make_excluding_cached<F>(content: &str, mut processor: F) -> String
where
    F: FnMut(&str) -> String,
{
    let split = split_html_by_cache(content);
    let mut output = String::with_capacity(content.len());
    for (idx, part) in split.contents.iter().enumerate() {
        output.push_str(&processor(part));
        if let Some(cache) = split.caches.get(idx) {
            output.push_str(cache.trim());
        }
    }
    output
}

/// Sum the line counts of every counted placeholder in `text`.
///
/// Returns the sum and `text` with the line breaks preceding each standalone
/// placeholder removed, since its line count already covers them. Breaks
/// before an in-paragraph placeholder are ordinary paragraph lines and stay.
pub(crate) fn take_placeholder_lines(text: &str) -> (usize, String) {
    let mut total = 0;
    let stripped = LINE_COUNTED_RE.replace_all(text, |caps: &regex::Captures<'_>| {
        total += caps[3].parse::<usize>().unwrap_or(0);
        if caps[2].is_empty() {
            caps[0][caps[1].len()..].to_owned()
        } else {
            caps[0].to_owned()
        }
    });
    (total, stripped.into_owned())
}
