//! Interactive chrome of the page: booking modal, mobile nav drawer, FAQ
//! accordion, and in-page anchor links.
//!
//! Each component states its ARIA role, keyboard focusability, and expanded
//! state as data ([`A11yAttrs`]) at construction time, so hosts render those
//! attributes together with the element instead of patching them in later.

use serde::Serialize;

/// Accessibility attributes an element is rendered with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct A11yAttrs {
    pub role: &'static str,
    /// `0` for keyboard-focusable, `-1` for programmatic focus only.
    pub tabindex: i32,
    /// `aria-expanded`, for disclosure controls.
    pub expanded: Option<bool>,
    /// `aria-controls`: id of the element this control toggles.
    pub controls: Option<String>,
    /// `aria-modal`, for dialogs.
    pub modal: Option<bool>,
}

impl A11yAttrs {
    /// Attribute name/value pairs in the order they are set on the element.
    pub fn to_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![
            ("role", self.role.to_owned()),
            ("tabindex", self.tabindex.to_string()),
        ];
        if let Some(expanded) = self.expanded {
            pairs.push(("aria-expanded", expanded.to_string()));
        }
        if let Some(controls) = &self.controls {
            pairs.push(("aria-controls", controls.clone()));
        }
        if let Some(modal) = self.modal {
            pairs.push(("aria-modal", modal.to_string()));
        }
        pairs
    }
}

/// Keys that activate a focused control.
pub fn is_activation_key(key: &str) -> bool {
    matches!(key, "Enter" | " " | "Spacebar")
}

/// The scheduling modal. The iframe URL is only handed out on first open so
/// the third-party widget is not loaded until someone asks for it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookingModal {
    open: bool,
    loaded: bool,
}

impl BookingModal {
    pub const DIALOG_ID: &'static str = "booking-modal";

    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    /// Opens the modal. Returns `true` the first time, when the host should
    /// set the iframe `src`.
    pub fn open(&mut self) -> bool {
        self.open = true;
        let first = !self.loaded;
        self.loaded = true;
        first
    }

    pub fn close(&mut self) {
        self.open = false;
    }

    /// Escape closes the modal; other keys are ignored.
    pub fn on_key(&mut self, key: &str) -> bool {
        if self.open && key == "Escape" {
            self.close();
            return true;
        }
        false
    }

    pub fn dialog_attrs(&self) -> A11yAttrs {
        A11yAttrs {
            role: "dialog",
            tabindex: -1,
            expanded: None,
            controls: None,
            modal: Some(true),
        }
    }

    pub fn trigger_attrs(&self) -> A11yAttrs {
        A11yAttrs {
            role: "button",
            tabindex: 0,
            expanded: Some(self.open),
            controls: Some(Self::DIALOG_ID.to_owned()),
            modal: None,
        }
    }
}

/// Mobile navigation drawer. Following any link closes it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NavDrawer {
    open: bool,
}

impl NavDrawer {
    pub const DRAWER_ID: &'static str = "mobile-nav";

    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn toggle(&mut self) -> bool {
        self.open = !self.open;
        self.open
    }

    pub fn on_link_followed(&mut self) {
        self.open = false;
    }

    pub fn toggle_attrs(&self) -> A11yAttrs {
        A11yAttrs {
            role: "button",
            tabindex: 0,
            expanded: Some(self.open),
            controls: Some(Self::DRAWER_ID.to_owned()),
            modal: None,
        }
    }
}

/// FAQ accordion: at most one item open at a time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Accordion {
    len: usize,
    open: Option<usize>,
}

impl Accordion {
    pub fn new(len: usize) -> Self {
        Self { len, open: None }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn open_item(&self) -> Option<usize> {
        self.open
    }

    /// Opens `index`, closing any other item; toggling the open item closes
    /// it. Out-of-range indices are ignored.
    pub fn toggle(&mut self, index: usize) {
        if index >= self.len {
            return;
        }
        self.open = if self.open == Some(index) {
            None
        } else {
            Some(index)
        };
    }

    pub fn is_open(&self, index: usize) -> bool {
        self.open == Some(index)
    }

    pub fn panel_id(index: usize) -> String {
        format!("faq-panel-{index}")
    }

    /// Attributes for the question header of item `index`.
    pub fn header_attrs(&self, index: usize) -> A11yAttrs {
        A11yAttrs {
            role: "button",
            tabindex: 0,
            expanded: Some(self.is_open(index)),
            controls: Some(Self::panel_id(index)),
            modal: None,
        }
    }
}

/// Element id targeted by an in-page link such as `#pricing`.
///
/// Returns `None` for anything that is not a non-empty fragment link; the
/// host then does nothing, as it does when no element has that id.
pub fn anchor_target(href: &str) -> Option<&str> {
    let id = href.strip_prefix('#')?;
    if id.is_empty() {
        None
    } else {
        Some(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn modal_hands_out_iframe_src_once() {
        let mut modal = BookingModal::new();
        assert!(!modal.is_open());
        assert!(modal.open());
        modal.close();
        assert!(!modal.open());
        assert!(modal.is_open());
    }

    #[test]
    fn escape_closes_open_modal_only() {
        let mut modal = BookingModal::new();
        assert!(!modal.on_key("Escape"));
        modal.open();
        assert!(!modal.on_key("Enter"));
        assert!(modal.on_key("Escape"));
        assert!(!modal.is_open());
    }

    #[test]
    fn modal_attrs_track_state() {
        let mut modal = BookingModal::new();
        assert_eq!(modal.trigger_attrs().expanded, Some(false));
        modal.open();
        assert_eq!(modal.trigger_attrs().expanded, Some(true));
        assert_eq!(modal.dialog_attrs().role, "dialog");
        assert_eq!(modal.dialog_attrs().modal, Some(true));
    }

    #[test]
    fn drawer_closes_on_link() {
        let mut drawer = NavDrawer::new();
        assert!(drawer.toggle());
        assert_eq!(drawer.toggle_attrs().expanded, Some(true));
        drawer.on_link_followed();
        assert!(!drawer.is_open());
    }

    #[test]
    fn accordion_keeps_one_item_open() {
        let mut faq = Accordion::new(4);
        faq.toggle(1);
        assert!(faq.is_open(1));
        faq.toggle(3);
        assert!(faq.is_open(3) && !faq.is_open(1));
        faq.toggle(3);
        assert_eq!(faq.open_item(), None);
        faq.toggle(9);
        assert_eq!(faq.open_item(), None);
    }

    #[test]
    fn accordion_header_attrs_point_at_panel() {
        let mut faq = Accordion::new(2);
        faq.toggle(0);
        let attrs = faq.header_attrs(0);
        assert_eq!(attrs.role, "button");
        assert_eq!(attrs.tabindex, 0);
        assert_eq!(attrs.expanded, Some(true));
        assert_eq!(attrs.controls.as_deref(), Some("faq-panel-0"));
        assert_eq!(faq.header_attrs(1).expanded, Some(false));
    }

    #[test]
    fn attrs_render_as_pairs() {
        let pairs = Accordion::new(1).header_attrs(0).to_pairs();
        assert_eq!(
            pairs,
            vec![
                ("role", "button".to_string()),
                ("tabindex", "0".to_string()),
                ("aria-expanded", "false".to_string()),
                ("aria-controls", "faq-panel-0".to_string()),
            ]
        );
    }

    #[test]
    fn activation_keys() {
        assert!(is_activation_key("Enter"));
        assert!(is_activation_key(" "));
        assert!(!is_activation_key("Tab"));
    }

    #[test]
    fn anchor_target_parses_fragments() {
        assert_eq!(anchor_target("#pricing"), Some("pricing"));
        assert_eq!(anchor_target("#"), None);
        assert_eq!(anchor_target("/about"), None);
        assert_eq!(anchor_target("https://example.com/#faq"), None);
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn accordion_never_has_two_items_open(
                len in 0_usize..8,
                toggles in prop::collection::vec(0_usize..10, 0..40),
            ) {
                let mut faq = Accordion::new(len);
                for index in toggles {
                    faq.toggle(index);
                    let open = (0..len).filter(|&i| faq.is_open(i)).count();
                    prop_assert!(open <= 1);
                    if let Some(i) = faq.open_item() {
                        prop_assert!(i < len);
                        prop_assert_eq!(faq.header_attrs(i).expanded, Some(true));
                    }
                }
            }

            #[test]
            fn modal_loads_iframe_only_on_first_open(ops in prop::collection::vec(0_u8..3, 1..30)) {
                let mut modal = BookingModal::new();
                let mut loads = 0;
                for op in ops {
                    match op {
                        0 => loads += usize::from(modal.open()),
                        1 => modal.close(),
                        _ => { modal.on_key("Escape"); }
                    }
                    prop_assert_eq!(modal.trigger_attrs().expanded, Some(modal.is_open()));
                }
                prop_assert!(loads <= 1);
            }
        }
    }
}
