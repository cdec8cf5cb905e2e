//! Inline SVG icons shown next to post metadata.
//!
//! Used by both the server-rendered pages and the frontend components.

/// Publication date.
pub const CALENDAR: &str = r#"<svg viewBox="0 0 24 24" fill="none" stroke="currentColor" stroke-width="2" aria-hidden="true"><rect x="3" y="4" width="18" height="18" rx="2"/><line x1="16" y1="2" x2="16" y2="6"/><line x1="8" y1="2" x2="8" y2="6"/><line x1="3" y1="10" x2="21" y2="10"/></svg>"#;

/// Author.
pub const USER: &str = r#"<svg viewBox="0 0 24 24" fill="none" stroke="currentColor" stroke-width="2" aria-hidden="true"><path d="M20 21v-2a4 4 0 0 0-4-4H8a4 4 0 0 0-4 4v2"/><circle cx="12" cy="7" r="4"/></svg>"#;

/// Reading time.
pub const CLOCK: &str = r#"<svg viewBox="0 0 24 24" fill="none" stroke="currentColor" stroke-width="2" aria-hidden="true"><circle cx="12" cy="12" r="10"/><polyline points="12 6 12 12 16 14"/></svg>"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_icons_are_decorative_svg() {
        for icon in [CALENDAR, USER, CLOCK] {
            assert!(icon.starts_with("<svg"));
            assert!(icon.ends_with("</svg>"));
            assert!(icon.contains(r#"aria-hidden="true""#));
        }
    }
}
