//! Link navigation policy for the preview
//!
//! Links clicked inside the page never navigate the view itself. Footnote
//! anchors scroll within the page, wiki links go back to the host and
//! everything else opens outside the application.

/// Prefix of wiki link lookups
pub const WIKI_LINK_PREFIX: &str = "fsnotes://find?id=";

/// Separator between a bundle page and an in-page anchor
const ANCHOR_SEPARATOR: &str = "/index.html#";

/// What the host should do with a navigation request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkAction {
    /// Let the view perform the navigation
    Allow,
    /// Scroll to an element by id, falling back to a text search
    ScrollToAnchor { anchor: String, text_query: String },
    /// Resolve a wiki link in the host
    OpenWikiLink(String),
    /// Hand the URL to the system
    OpenExternal(String),
}

/// Decide how to handle navigation to `url`
///
/// `activated` is true when the user clicked a link; other navigations
/// (initial loads, reloads, script-driven) are allowed through.
pub fn classify_link(url: &str, activated: bool) -> LinkAction {
    if !activated {
        return LinkAction::Allow;
    }

    let parts: Vec<&str> = url.split(ANCHOR_SEPARATOR).collect();
    if let [_, anchor] = parts.as_slice() {
        return LinkAction::ScrollToAnchor {
            anchor: anchor.to_string(),
            text_query: anchor.replace('-', " "),
        };
    }

    if url.starts_with(WIKI_LINK_PREFIX) {
        return LinkAction::OpenWikiLink(url.to_string());
    }

    LinkAction::OpenExternal(url.to_string())
}
