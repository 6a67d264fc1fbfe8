//! Filename decoration around raw tokens.
//!
//! Tokens are embedded in executable filenames. The decoration is fixed by
//! the deployed naming convention; decode must strip it (including infix
//! markers that installers sometimes inject) before handing the raw token to
//! the core.

/// Prefix for filenames produced from command-line arguments.
pub const LICENSED_PREFIX: &str = "rustdesk-licensed-";

/// Prefix for filenames produced from the interactive prompt.
pub const INTERACTIVE_PREFIX: &str = "rustdesk-custom_serverd-";

/// Executable suffix.
pub const EXE_SUFFIX: &str = ".exe";

/// Infix marker occasionally duplicated into the middle of a filename.
const INFIX_MARKER: &str = "-licensed-";

/// Decorate a token as a licensed executable filename.
pub fn licensed_name(token: &str) -> String {
    format!("{LICENSED_PREFIX}{token}{EXE_SUFFIX}")
}

/// Decorate a token as an interactive-mode executable filename.
pub fn interactive_name(token: &str) -> String {
    format!("{INTERACTIVE_PREFIX}{token}{EXE_SUFFIX}")
}

/// Strip filename decoration, returning the raw token.
///
/// Accepts bare tokens unchanged; suffix first, then prefix, then any infix
/// markers.
pub fn strip_name(name: &str) -> String {
    let stripped = name.strip_suffix(EXE_SUFFIX).unwrap_or(name);
    let stripped = stripped.strip_prefix(LICENSED_PREFIX).unwrap_or(stripped);
    stripped.replace(INFIX_MARKER, "")
}
