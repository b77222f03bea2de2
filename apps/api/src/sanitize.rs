//! Markup stripping for free-text input.
//!
//! Uses ammonia's default policy: a small allow-list of formatting tags,
//! `<script>`/`<style>` removed together with their content, and everything
//! else reduced to escaped text.

/// Returns `text` with unsafe markup removed.
pub fn sanitize(text: &str) -> String {
    ammonia::clean(text)
}
