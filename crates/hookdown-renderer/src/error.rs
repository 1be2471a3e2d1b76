//! Error types for hook construction.

/// Error raised while building hooks or an engine.
///
/// Rendering itself never fails: malformed input degrades to best-effort
/// output. Only hook construction can fail, when a rule's
/// `begin + content + end` does not compile.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum RenderError {
    /// A hook's combined pattern failed to compile.
    #[error("invalid pattern for hook `{hook}`")]
    InvalidPattern {
        /// Name of the hook that owns the pattern.
        hook: &'static str,
        /// Underlying regex compilation error.
        #[source]
        source: regex::Error,
    },
}
