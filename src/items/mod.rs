//! Work items and item-list resolution.
//!
//! A work item is one unit of input (a URL, a hostname, an arbitrary token)
//! that generates exactly one external-command invocation. Items carry a
//! derived alias, the token with filesystem-hostile characters replaced,
//! which is handed to the command as a `--alias` argument.

mod source;

pub use source::resolve_items;

/// One unit of work: an opaque token plus its derived alias.
///
/// Immutable once constructed; consumed exactly once by the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkItem {
    /// The raw token as it appeared in the list source.
    pub token: String,
    /// The token with `:` replaced by `-` and `/` replaced by `_`.
    pub alias: String,
}

impl WorkItem {
    /// Create an item and derive its alias from the token.
    pub fn new(token: impl Into<String>) -> Self {
        let token = token.into();
        let alias = token.replace(':', "-").replace('/', "_");
        Self { token, alias }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alias_replaces_colons_and_slashes() {
        let item = WorkItem::new("http://www.python.org/doc/");
        assert_eq!(item.token, "http://www.python.org/doc/");
        assert_eq!(item.alias, "http-__www.python.org_doc_");
    }

    #[test]
    fn alias_of_plain_token_is_unchanged() {
        let item = WorkItem::new("hostname01");
        assert_eq!(item.alias, "hostname01");
    }

    #[test]
    fn alias_is_derived_once_at_construction() {
        let item = WorkItem::new("a:b/c");
        assert_eq!(item.alias, "a-b_c");
    }
}
