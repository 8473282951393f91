#![forbid(unsafe_code)]

//! Which elements of an overlay take part in the Tab cycle.

use tapedeck_core::element::ElementId;
use tapedeck_core::host::Host;

/// Where focusable candidates come from.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum FocusScope {
    /// Every descendant of the overlay root, in document order.
    #[default]
    Subtree,
    /// A fixed list, in the given order.
    Explicit(Vec<ElementId>),
}

/// Lazily yield the tabbable elements of `scope`.
///
/// Candidates are re-read from the host on every call, so content that
/// changed since the overlay opened is picked up. Detached and disabled
/// elements are skipped.
pub fn focusable_elements<'a, H: Host>(
    host: &'a H,
    root: ElementId,
    scope: &FocusScope,
) -> impl Iterator<Item = ElementId> + 'a {
    let candidates = match scope {
        FocusScope::Subtree => host.descendants(root),
        FocusScope::Explicit(ids) => ids.clone(),
    };
    candidates.into_iter().filter(move |id| {
        host.is_connected(*id)
            && host
                .element(*id)
                .is_some_and(|info| info.is_tabbable())
    })
}
