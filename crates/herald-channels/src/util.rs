//! Common utilities for channel adapters
//!
//! Caption formatting, log previews and media type detection shared by the
//! WhatsApp and Telegram adapters.

use regex::Regex;
use std::path::Path;
use std::sync::OnceLock;

// ============================================================================
// Logging Constants
// ============================================================================

/// Maximum number of caption characters shown in log previews
pub const MAX_PREVIEW_CHARS: usize = 100;

/// Number of trailing characters left visible when masking a secret
const VISIBLE_SECRET_SUFFIX: usize = 4;

/// Shorten a caption for logging
///
/// Counts characters, not bytes, so multi-byte scripts are never split.
///
/// # Examples
/// ```
/// use herald_channels::util::preview_caption;
///
/// assert_eq!(preview_caption("Hello"), "Hello");
/// assert!(preview_caption(&"a".repeat(150)).ends_with("..."));
/// ```
#[must_use]
pub fn preview_caption(text: &str) -> String {
    if text.chars().count() > MAX_PREVIEW_CHARS {
        let head: String = text.chars().take(MAX_PREVIEW_CHARS).collect();
        format!("{head}...")
    } else {
        text.to_string()
    }
}

/// Mask a credential for logging, keeping only its last few characters
#[must_use]
pub fn mask_secret(secret: &str) -> String {
    let count = secret.chars().count();
    if count <= VISIBLE_SECRET_SUFFIX {
        return "*".repeat(count);
    }
    let tail: String = secret.chars().skip(count - VISIBLE_SECRET_SUFFIX).collect();
    format!("{}{}", "*".repeat(count - VISIBLE_SECRET_SUFFIX), tail)
}

fn monospace_block() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"```([^`]+)```").expect("static regex is valid"))
}

/// Convert WhatsApp caption formatting to Telegram legacy Markdown
///
/// WhatsApp monospace blocks (```` ```text``` ````) have no Telegram
/// Markdown equivalent and are rendered as italics instead.
///
/// # Examples
/// ```
/// use herald_channels::util::whatsapp_to_telegram_markdown;
///
/// assert_eq!(whatsapp_to_telegram_markdown("```note```"), "_note_");
/// ```
#[must_use]
pub fn whatsapp_to_telegram_markdown(text: &str) -> String {
    monospace_block().replace_all(text, "_${1}_").into_owned()
}

/// Guess the MIME type of an image from its extension
#[must_use]
pub fn image_mime_type(path: &Path) -> mime::Mime {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();

    match ext.as_str() {
        "jpg" | "jpeg" => mime::IMAGE_JPEG,
        "png" => mime::IMAGE_PNG,
        "gif" => mime::IMAGE_GIF,
        "webp" => "image/webp"
            .parse()
            .unwrap_or(mime::APPLICATION_OCTET_STREAM),
        _ => mime::APPLICATION_OCTET_STREAM,
    }
}
