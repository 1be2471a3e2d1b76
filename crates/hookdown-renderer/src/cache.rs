//! Cached regions protecting rendered block fragments.
//!
//! A [`CachedRegion`] lets a block-level hook swap finished HTML for an
//! opaque [placeholder](crate::Placeholder) so later passes (nested block
//! hooks, the paragraph pass, sentence hooks) neither re-parse nor re-wrap
//! it. The owning hook restores its own placeholders in
//! [`after_make_html`](crate::ParagraphHook::after_make_html).
//!
//! # Lifecycle
//!
//! ```text
//! make_html:        push_cache(html) ──► "~~C<ns>I<sig>_L<n>$"
//! later passes:     placeholder travels through untouched
//! after_make_html:  restore_cache(html) ──► fragment back, cache cleared
//! ```
//!
//! Entries live for one render pass. A region must not be pushed to for a
//! new pass before the previous pass's restore has run.

use std::collections::HashMap;

use regex::Regex;
use sha2::{Digest, Sha256};

use crate::namespace::NamespaceAllocator;
use crate::placeholder::{self, IN_PARAGRAPH_PREFIX, Placeholder};

/// Compute the default cache signature for a rendered fragment.
///
/// Identical fragments share a signature, so repeats collapse to one entry.
///
/// # Hash Format
///
/// Hex-encoded SHA-256 of the fragment (64 characters).
#[must_use]
pub fn content_signature(html: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(html.as_bytes());
    hex::encode(hasher.finalize())
}

/// Storage and namespace, present only when caching is enabled.
#[derive(Debug)]
struct CacheState {
    namespace: u64,
    /// Matches this region's placeholders only.
    pattern: Regex,
    entries: HashMap<String, String>,
}

/// Placeholder cache owned by one block-level hook.
///
/// # Example
///
/// ```
/// use hookdown_renderer::{CachedRegion, SequentialNamespaces};
///
/// let namespaces = SequentialNamespaces::starting_at(0);
/// let mut region = CachedRegion::new(&namespaces);
///
/// let token = region.push_cache("<pre>x</pre>", Some("code"), 3).unwrap();
/// assert_eq!(token, "~~C0Icode_L3$");
///
/// let html = region.restore_cache(&format!("{token}<p>after</p>"));
/// assert_eq!(html, "<pre>x</pre><p>after</p>");
/// ```
#[derive(Debug)]
pub struct CachedRegion {
    state: Option<CacheState>,
    misses: usize,
}

impl CachedRegion {
    /// Create an enabled region, drawing one namespace from `namespaces`.
    #[must_use]
    pub fn new(namespaces: &dyn NamespaceAllocator) -> Self {
        Self::with_seed(namespaces, HashMap::new())
    }

    /// Create an enabled region preloaded with known entries.
    #[must_use]
    pub fn with_seed(namespaces: &dyn NamespaceAllocator, seed: HashMap<String, String>) -> Self {
        let namespace = namespaces.allocate();
        Self {
            state: Some(CacheState {
                namespace,
                pattern: placeholder::namespace_pattern(namespace),
                entries: seed,
            }),
            misses: 0,
        }
    }

    /// Create a region with caching turned off.
    ///
    /// Pushes return `None`, pops return an empty string and restores pass
    /// their input through.
    #[must_use]
    pub fn disabled() -> Self {
        Self {
            state: None,
            misses: 0,
        }
    }

    /// Whether caching is enabled.
    pub fn is_enabled(&self) -> bool {
        self.state.is_some()
    }

    /// Namespace stamped on this region's placeholders.
    pub fn namespace(&self) -> Option<u64> {
        self.state.as_ref().map(|s| s.namespace)
    }

    /// Number of entries currently held.
    pub fn len(&self) -> usize {
        self.state.as_ref().map_or(0, |s| s.entries.len())
    }

    /// Whether no entries are held.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Total placeholders restored to an empty string because their entry
    /// was missing.
    pub fn cache_misses(&self) -> usize {
        self.misses
    }

    /// Store a rendered fragment and return the placeholder standing in for it.
    ///
    /// Without a signature, the [content signature](content_signature) is
    /// used. A caller-supplied signature is used verbatim; prefix it with `!`
    /// to produce an in-paragraph placeholder. `line_count` is the number of
    /// source lines the fragment represents.
    ///
    /// Returns `None` when caching is disabled.
    pub fn push_cache(
        &mut self,
        html: impl Into<String>,
        signature: Option<&str>,
        line_count: usize,
    ) -> Option<String> {
        let state = self.state.as_mut()?;
        let html = html.into();
        let key = match signature {
            Some(sign) if !sign.is_empty() => sign.to_owned(),
            _ => content_signature(&html),
        };
        let token = Placeholder::from_key(state.namespace, &key, line_count).to_string();
        state.entries.insert(key, html);
        Some(token)
    }

    /// Store a fragment behind an in-paragraph placeholder.
    ///
    /// Shorthand for [`push_cache`](Self::push_cache) with a `!`-prefixed
    /// signature, defaulting to the content signature.
    pub fn push_in_paragraph(
        &mut self,
        html: impl Into<String>,
        signature: Option<&str>,
        line_count: usize,
    ) -> Option<String> {
        let html = html.into();
        let sign = match signature {
            Some(sign) if !sign.is_empty() => sign.to_owned(),
            _ => content_signature(&html),
        };
        self.push_cache(html, Some(&format!("{IN_PARAGRAPH_PREFIX}{sign}")), line_count)
    }

    /// Look up a cached fragment.
    ///
    /// A trailing `_L<digits>` suffix is ignored. Missing entries (and any
    /// lookup while disabled) yield an empty string.
    pub fn pop_cache(&self, signature: &str) -> String {
        self.state
            .as_ref()
            .and_then(|s| s.entries.get(placeholder::strip_line_suffix(signature)))
            .cloned()
            .unwrap_or_default()
    }

    /// Replace the whole cache with `seed`.
    ///
    /// Pass an empty map to clear.
    pub fn reset_cache(&mut self, seed: HashMap<String, String>) {
        if let Some(state) = self.state.as_mut() {
            state.entries = seed;
        }
    }

    /// Replace this region's placeholders with their cached fragments, then
    /// clear the cache.
    ///
    /// Placeholders of other namespaces are left alone. A placeholder whose
    /// entry is missing becomes an empty string.
    pub fn restore_cache(&mut self, html: &str) -> String {
        let Some(state) = self.state.as_mut() else {
            return html.to_owned();
        };

        let CacheState {
            namespace,
            pattern,
            entries,
        } = state;
        let mut misses = 0;
        let restored = pattern.replace_all(html, |caps: &regex::Captures<'_>| {
            let key = placeholder::strip_line_suffix(&caps[1]);
            if let Some(fragment) = entries.get(key) {
                fragment.clone()
            } else {
                misses += 1;
                tracing::debug!(
                    namespace = *namespace,
                    signature = key,
                    "Placeholder has no cached fragment, restoring as empty"
                );
                String::new()
            }
        });
        let restored = restored.into_owned();

        entries.clear();
        self.misses += misses;
        restored
    }
}
