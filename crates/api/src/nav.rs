//! Navigation shared by every screen.

use serde::Serialize;

/// Title used when a page declares none.
pub const DEFAULT_TITLE: &str = "RallyControl";

/// One navigation entry: label and target path.
#[derive(Debug, Clone, Copy)]
pub struct NavItem {
    pub label: &'static str,
    pub href: &'static str,
}

/// Navigation entries in display order.
pub const NAV_ITEMS: &[NavItem] = &[
    NavItem { label: "Dashboard", href: "/" },
    NavItem { label: "Fahrer", href: "/drivers/" },
    NavItem { label: "Fahrzeuge", href: "/vehicles/" },
    NavItem { label: "Klassen", href: "/classes/" },
    NavItem { label: "Events", href: "/events/" },
    NavItem { label: "Stages", href: "/stages/" },
    NavItem { label: "Sessions", href: "/sessions/" },
    NavItem { label: "Gates", href: "/gates/" },
];

/// A navigation entry as rendered for one request.
#[derive(Debug, Serialize)]
pub struct NavLink {
    pub label: &'static str,
    pub href: &'static str,
    pub active: bool,
}

/// Navigation for a page at `path`. The dashboard is active only on `/`,
/// every other entry for its whole subtree.
pub fn nav_links(path: &str) -> Vec<NavLink> {
    NAV_ITEMS
        .iter()
        .map(|item| NavLink {
            label: item.label,
            href: item.href,
            active: if item.href == "/" {
                path == "/"
            } else {
                path.starts_with(item.href)
            },
        })
        .collect()
}

/// Resolve a page title: explicit title, else the entity's plural name,
/// else [`DEFAULT_TITLE`].
pub fn page_title(explicit: Option<&str>, verbose_plural: Option<&str>) -> String {
    explicit
        .or(verbose_plural)
        .unwrap_or(DEFAULT_TITLE)
        .to_string()
}
