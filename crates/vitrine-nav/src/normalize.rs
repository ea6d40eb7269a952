//! The menu normalization algorithm.

use tracing::warn;

use crate::item::{ItemKind, NavChild, NavItem, NavTarget, NavigationMenu, RawMenu, RawMenuItem};
use crate::origin::{split_origin, Origin};
use crate::rewrite::RewriteRules;

/// Result of normalizing one menu: the render-ready tree plus the ids of
/// items dropped for exceeding the supported depth.
#[derive(Debug, Clone)]
pub struct NormalizedMenu {
    pub menu: NavigationMenu,
    /// IDs of items discarded because they were nested beyond one child
    /// level. Kept for diagnostics; the drop itself matches the API's
    /// documented two-level menu shape.
    pub dropped: Vec<String>,
}

/// Normalize a raw menu against the shop's own domain and a rewrite rule
/// set.
///
/// URLs on the shop's own origin lose their origin component and become
/// internal paths; rule-matched types get their path rewritten; foreign
/// origins are marked external and left untouched. Malformed items are
/// carried through best-effort - one bad item never fails the tree.
pub fn normalize_menu(raw: &RawMenu, shop_domain: &str, rules: &RewriteRules) -> NormalizedMenu {
    let shop_origin = Origin::parse(shop_domain);
    let mut dropped = Vec::new();

    let items = raw
        .items
        .iter()
        .map(|item| normalize_item(item, shop_origin.as_ref(), rules, &mut dropped))
        .collect();

    NormalizedMenu {
        menu: NavigationMenu {
            id: raw.id.clone(),
            items,
        },
        dropped,
    }
}

fn normalize_item(
    raw: &RawMenuItem,
    shop_origin: Option<&Origin>,
    rules: &RewriteRules,
    dropped: &mut Vec<String>,
) -> NavItem {
    let children = raw
        .items
        .iter()
        .map(|child| normalize_child(child, shop_origin, rules, dropped))
        .collect();

    let kind = ItemKind::from_raw(&raw.item_type);
    NavItem {
        id: raw.id.clone(),
        resource_id: raw.resource_id.clone(),
        tags: raw.tags.clone(),
        title: raw.title.clone(),
        kind,
        target: resolve_target(raw, kind, shop_origin, rules),
        children,
    }
}

fn normalize_child(
    raw: &RawMenuItem,
    shop_origin: Option<&Origin>,
    rules: &RewriteRules,
    dropped: &mut Vec<String>,
) -> NavChild {
    if !raw.items.is_empty() {
        warn!(
            item = %raw.id,
            discarded = raw.items.len(),
            "menu items nested beyond one child level are not supported"
        );
        collect_ids(&raw.items, dropped);
    }

    let kind = ItemKind::from_raw(&raw.item_type);
    NavChild {
        id: raw.id.clone(),
        resource_id: raw.resource_id.clone(),
        tags: raw.tags.clone(),
        title: raw.title.clone(),
        kind,
        target: resolve_target(raw, kind, shop_origin, rules),
    }
}

fn collect_ids(items: &[RawMenuItem], dropped: &mut Vec<String>) {
    for item in items {
        dropped.push(item.id.clone());
        collect_ids(&item.items, dropped);
    }
}

/// Resolve a raw item's URL into a navigation target.
fn resolve_target(
    raw: &RawMenuItem,
    kind: ItemKind,
    shop_origin: Option<&Origin>,
    rules: &RewriteRules,
) -> NavTarget {
    let url = match raw.url.as_deref().filter(|u| !u.is_empty()) {
        Some(url) => url,
        // An item with no URL still renders (as a heading); give it a
        // non-navigating target instead of dropping it.
        None => return NavTarget::Internal("#".to_string()),
    };

    if url.starts_with('/') {
        return NavTarget::Internal(rewrite_path(url, &raw.item_type, kind, rules));
    }

    match split_origin(url) {
        Some((origin, rest)) if shop_origin.is_some_and(|own| own.same_as(&origin)) => {
            NavTarget::Internal(rewrite_path(&rest, &raw.item_type, kind, rules))
        }
        // Foreign origin, or nothing we can parse an origin out of:
        // leave the URL untouched and send the visitor off-site.
        _ => NavTarget::External(url.to_string()),
    }
}

/// Apply the rewrite rule for this item type to a root-relative path.
/// Query string and fragment survive the rewrite.
fn rewrite_path(path_and_rest: &str, item_type: &str, kind: ItemKind, rules: &RewriteRules) -> String {
    let segment = match rules.get(item_type) {
        Some(segment) => segment,
        None => return path_and_rest.to_string(),
    };

    let split_at = path_and_rest
        .find(['?', '#'])
        .unwrap_or(path_and_rest.len());
    let (path, suffix) = path_and_rest.split_at(split_at);

    let new_path = if kind.is_single_route() {
        format!("/{segment}")
    } else {
        let mut segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
        if segments.is_empty() {
            format!("/{segment}")
        } else {
            segments[0] = segment;
            format!("/{}", segments.join("/"))
        }
    };

    format!("{new_path}{suffix}")
}
