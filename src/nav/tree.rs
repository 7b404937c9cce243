use crate::models::{MenuLocation, MenuRecord, NavigationMenu};

/// Icon slot shown next to a navigation entry on the public site.
#[derive(Clone, Copy, Debug, PartialEq, Eq, strum::Display, strum::AsRefStr)]
#[strum(serialize_all = "kebab-case")]
pub(crate) enum NavIcon {
    Home,
    About,
    Specialties,
    Globe,
    Briefcase,
    Lightbulb,
    Phone,
    Menu,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum NavItemKind {
    /// Plain entry without children.
    Link,
    /// Collapsible group; determined solely by `sub_menu` being non-empty.
    Group,
}

/// UI-facing projection of one menu entry.
///
/// Derived, never authoritative: rebuilt from `MenuRecord`s on every fetch.
/// `key` is synthetic and unique across the forest as long as backend ids
/// are.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct NavItem {
    pub key: String,
    pub label: String,
    pub path: String,
    pub icon: NavIcon,
    pub kind: NavItemKind,
    pub sub_menu: Vec<NavItem>,
}

/// Keyword match against the lower-cased title; first rule wins, so the
/// rule order here is load-bearing ("specialt" must precede
/// "international" so that e.g. "International Specialist" gets the
/// specialties icon).
pub(crate) fn derive_icon(title: &str) -> NavIcon {
    let t = title.to_lowercase();

    if t.contains("home") {
        NavIcon::Home
    } else if t.contains("about") {
        NavIcon::About
    } else if t.contains("specialt") {
        NavIcon::Specialties
    } else if t.contains("international") {
        NavIcon::Globe
    } else if t.contains("career") {
        NavIcon::Briefcase
    } else if t.contains("what") && t.contains("new") {
        NavIcon::Lightbulb
    } else if t.contains("contact") {
        NavIcon::Phone
    } else {
        NavIcon::Menu
    }
}

/// Home is a pseudo-static route merged with dynamic data; its path is
/// forced regardless of the stored url.
fn nav_path(rec: &MenuRecord) -> String {
    if rec.title.eq_ignore_ascii_case("home") {
        "/home".to_string()
    } else {
        rec.url.clone()
    }
}

pub(crate) fn nav_item_from_record(rec: &MenuRecord) -> NavItem {
    let sub_menu: Vec<NavItem> = rec.children.iter().map(nav_item_from_record).collect();
    let kind = if sub_menu.is_empty() {
        NavItemKind::Link
    } else {
        NavItemKind::Group
    };

    NavItem {
        key: format!("menu-{}", rec.id),
        label: rec.title.clone(),
        path: nav_path(rec),
        icon: derive_icon(&rec.title),
        kind,
        sub_menu,
    }
}

/// Project the menu matching `location` into the rendering tree.
///
/// Server order is authoritative; no sorting happens here. A missing
/// location yields an empty tree, never an error; callers fall back to a
/// static default.
pub(crate) fn navigation_tree(menus: &[NavigationMenu], location: MenuLocation) -> Vec<NavItem> {
    menus
        .iter()
        .find(|m| m.location == location)
        .map(|m| m.items.iter().map(nav_item_from_record).collect())
        .unwrap_or_default()
}

/// Static fallback rendered when the transform yields nothing (menu not
/// yet loaded, or the location has no rows on the server).
pub(crate) fn default_navigation_tree() -> Vec<NavItem> {
    let link = |key: &str, label: &str, path: &str| NavItem {
        key: key.to_string(),
        label: label.to_string(),
        path: path.to_string(),
        icon: derive_icon(label),
        kind: NavItemKind::Link,
        sub_menu: vec![],
    };

    vec![
        link("default-home", "Home", "/home"),
        link("default-about", "About Us", "/about"),
        link("default-contact", "Contact Us", "/contact"),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: i64, title: &str, url: &str, children: Vec<MenuRecord>) -> MenuRecord {
        MenuRecord {
            id,
            parent_id: None,
            title: title.to_string(),
            url: url.to_string(),
            display_order: 0,
            is_active: true,
            children,
        }
    }

    fn count_items(items: &[NavItem]) -> usize {
        items.iter().map(|i| 1 + count_items(&i.sub_menu)).sum()
    }

    #[test]
    fn test_icon_precedence_is_fixed() {
        // "specialt" is checked before "international".
        assert_eq!(derive_icon("International Specialist"), NavIcon::Specialties);
        assert_eq!(derive_icon("International Patients"), NavIcon::Globe);
        assert_eq!(derive_icon("Home"), NavIcon::Home);
        assert_eq!(derive_icon("About Us"), NavIcon::About);
        assert_eq!(derive_icon("Careers"), NavIcon::Briefcase);
        assert_eq!(derive_icon("What's New"), NavIcon::Lightbulb);
        assert_eq!(derive_icon("Contact Us"), NavIcon::Phone);
        assert_eq!(derive_icon("Main Menu"), NavIcon::Menu);
        assert_eq!(derive_icon("Patient Stories"), NavIcon::Menu);
        // Pure: same input, same output.
        assert_eq!(derive_icon("Careers"), derive_icon("Careers"));
    }

    #[test]
    fn test_home_path_override() {
        // A root item titled "Home" with url /about must still map to /home.
        let rec = record(1, "Home", "/about", vec![]);
        let item = nav_item_from_record(&rec);
        assert_eq!(item.path, "/home");
        assert_eq!(item.key, "menu-1");

        let rec = record(2, "HOME", "/x", vec![]);
        assert_eq!(nav_item_from_record(&rec).path, "/home");
    }

    #[test]
    fn test_transform_preserves_count_and_order() {
        let menus = vec![NavigationMenu {
            id: 1,
            location: MenuLocation::Header,
            items: vec![
                record(
                    10,
                    "Specialties",
                    "/specialties",
                    vec![
                        record(11, "Oncology", "/specialties/oncology", vec![]),
                        record(12, "Cardiology", "/specialties/cardiology", vec![]),
                    ],
                ),
                record(20, "Contact Us", "/contact", vec![]),
            ],
        }];

        let tree = navigation_tree(&menus, MenuLocation::Header);
        assert_eq!(count_items(&tree), 4);
        assert_eq!(tree[0].kind, NavItemKind::Group);
        assert_eq!(tree[1].kind, NavItemKind::Link);
        assert_eq!(
            tree[0]
                .sub_menu
                .iter()
                .map(|i| i.key.as_str())
                .collect::<Vec<_>>(),
            vec!["menu-11", "menu-12"],
            "relative sibling order must survive the transform"
        );
    }

    #[test]
    fn test_missing_location_yields_empty_tree() {
        let menus = vec![NavigationMenu {
            id: 1,
            location: MenuLocation::Header,
            items: vec![record(1, "Home", "/", vec![])],
        }];
        assert!(navigation_tree(&menus, MenuLocation::Sidebar).is_empty());
        assert!(navigation_tree(&[], MenuLocation::Header).is_empty());
    }

    #[test]
    fn test_group_kind_follows_children_only() {
        // Kind depends on children, not on url or title.
        let leaf = nav_item_from_record(&record(1, "Specialties", "", vec![]));
        assert_eq!(leaf.kind, NavItemKind::Link);

        let group = nav_item_from_record(&record(
            2,
            "Page",
            "/p",
            vec![record(3, "Sub", "/p/s", vec![])],
        ));
        assert_eq!(group.kind, NavItemKind::Group);
        assert_eq!(group.sub_menu[0].kind, NavItemKind::Link);
    }

    #[test]
    fn test_default_tree_is_links_only() {
        let tree = default_navigation_tree();
        assert!(!tree.is_empty());
        assert!(tree.iter().all(|i| i.kind == NavItemKind::Link));
        assert_eq!(tree[0].path, "/home");
        assert_eq!(tree[0].icon, NavIcon::Home);
    }

    #[test]
    fn test_icon_key_rendering() {
        assert_eq!(NavIcon::Specialties.to_string(), "specialties");
        assert_eq!(NavIcon::Lightbulb.as_ref(), "lightbulb");
    }
}
