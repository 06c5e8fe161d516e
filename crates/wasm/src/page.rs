//! Page chrome: theme, lead form, booking modal, mobile nav, FAQ, anchors.
//!
//! Markup contract, by element id:
//!
//! | id                        | role                                   |
//! |---------------------------|----------------------------------------|
//! | `booking-modal`           | dialog, hidden while closed            |
//! | `booking-frame`           | iframe inside the dialog               |
//! | `booking-trigger`         | button opening the dialog              |
//! | `mobile-nav`              | drawer, hidden while closed            |
//! | `mobile-nav-toggle`       | drawer toggle button                   |
//! | `faq-header-{i}`          | FAQ question button                    |
//! | `faq-panel-{i}`           | FAQ answer, hidden while closed        |
//! | `{form}-status`           | banner under the lead form `{form}`    |
//!
//! Missing elements are skipped, so a page can carry any subset.

use std::cell::RefCell;
use std::rc::Rc;

use chrono::Utc;
use log::{info, warn};
use voicefx_core::FxError;
use voicefx_site::lead::{FormStatus, LeadFormState};
use voicefx_site::ui::{
    anchor_target, is_activation_key, A11yAttrs, Accordion, BookingModal, NavDrawer,
};
use voicefx_site::{LeadForm, SiteConfig, Theme, ThemeStore};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::future_to_promise;
use web_sys::{
    Element, Event, EventTarget, HtmlIFrameElement, KeyboardEvent, ScrollBehavior,
    ScrollIntoViewOptions,
};

use crate::lead::post_lead;
use crate::listener::Listener;
use crate::storage::LocalStore;
use crate::{document, host_err, to_js};

const BOOKING_FRAME_ID: &str = "booking-frame";
const BOOKING_TRIGGER_ID: &str = "booking-trigger";
const NAV_TOGGLE_ID: &str = "mobile-nav-toggle";
const FORM_FIELDS: [&str; 5] = ["name", "email", "phone", "company", "message"];

struct Chrome {
    config: SiteConfig,
    themes: ThemeStore<LocalStore>,
    modal: BookingModal,
    drawer: NavDrawer,
    faq: Accordion,
    lead: LeadFormState,
}

impl Chrome {
    fn render_modal(&self) {
        if let Some(dialog) = element(BookingModal::DIALOG_ID) {
            apply_attrs(&dialog, &self.modal.dialog_attrs());
            set_open(&dialog, self.modal.is_open());
        }
        if let Some(trigger) = element(BOOKING_TRIGGER_ID) {
            apply_attrs(&trigger, &self.modal.trigger_attrs());
        }
    }

    fn render_drawer(&self) {
        if let Some(drawer) = element(NavDrawer::DRAWER_ID) {
            set_open(&drawer, self.drawer.is_open());
        }
        if let Some(toggle) = element(NAV_TOGGLE_ID) {
            apply_attrs(&toggle, &self.drawer.toggle_attrs());
        }
    }

    fn render_faq(&self) {
        for index in 0..self.faq.len() {
            if let Some(header) = element(&format!("faq-header-{index}")) {
                apply_attrs(&header, &self.faq.header_attrs(index));
            }
            if let Some(panel) = element(&Accordion::panel_id(index)) {
                set_open(&panel, self.faq.is_open(index));
            }
        }
    }

    fn render_theme(&self) {
        apply_theme(self.themes.current());
    }
}

/// Handle to the page chrome. Keeps the Escape-key listener alive.
#[wasm_bindgen]
pub struct Page {
    chrome: Rc<RefCell<Chrome>>,
    _keydown: Listener,
}

#[wasm_bindgen]
impl Page {
    /// Reads the stored theme, counts FAQ items, and renders every control
    /// with its accessibility attributes. `config` is an optional JSON
    /// object overriding [`SiteConfig`] defaults.
    #[wasm_bindgen(constructor)]
    pub fn new(config: Option<String>) -> Result<Page, JsValue> {
        Self::init(config.as_deref()).map_err(to_js)
    }

    pub fn theme(&self) -> String {
        self.chrome.borrow().themes.current().to_string()
    }

    /// Flips the theme, persists it, and returns the new name.
    #[wasm_bindgen(js_name = toggleTheme)]
    pub fn toggle_theme(&self) -> String {
        let mut chrome = self.chrome.borrow_mut();
        if let Err(e) = chrome.themes.toggle() {
            warn!("theme not persisted: {e}");
        }
        chrome.render_theme();
        chrome.themes.current().to_string()
    }

    #[wasm_bindgen(js_name = openBooking)]
    pub fn open_booking(&self) {
        let mut chrome = self.chrome.borrow_mut();
        if chrome.modal.open() {
            load_booking_frame(&chrome.config.booking_url);
        }
        chrome.render_modal();
    }

    #[wasm_bindgen(js_name = closeBooking)]
    pub fn close_booking(&self) {
        let mut chrome = self.chrome.borrow_mut();
        chrome.modal.close();
        chrome.render_modal();
    }

    #[wasm_bindgen(js_name = toggleNav)]
    pub fn toggle_nav(&self) -> bool {
        let mut chrome = self.chrome.borrow_mut();
        let open = chrome.drawer.toggle();
        chrome.render_drawer();
        open
    }

    /// A nav link was clicked: closes the drawer and scrolls to its target.
    #[wasm_bindgen(js_name = followLink)]
    pub fn follow_link(&self, href: &str) {
        {
            let mut chrome = self.chrome.borrow_mut();
            chrome.drawer.on_link_followed();
            chrome.render_drawer();
        }
        scroll_to_anchor(href);
    }

    #[wasm_bindgen(js_name = toggleFaq)]
    pub fn toggle_faq(&self, index: usize) {
        let mut chrome = self.chrome.borrow_mut();
        chrome.faq.toggle(index);
        chrome.render_faq();
    }

    /// Keyboard activation on a FAQ header.
    #[wasm_bindgen(js_name = faqKey)]
    pub fn faq_key(&self, index: usize, key: &str) -> bool {
        if !is_activation_key(key) {
            return false;
        }
        self.toggle_faq(index);
        true
    }

    /// Reads the lead form `form_id`, POSTs it once, clears it, and shows the
    /// outcome banner. Resolves to the banner text; an empty string means a
    /// previous submission was still in flight.
    #[wasm_bindgen(js_name = submitLead)]
    pub fn submit_lead(&self, form_id: String) -> js_sys::Promise {
        let chrome = Rc::clone(&self.chrome);
        future_to_promise(async move {
            let banner = submit(chrome, &form_id).await.map_err(to_js)?;
            Ok(JsValue::from_str(&banner))
        })
    }
}

impl Page {
    fn init(config: Option<&str>) -> Result<Self, FxError> {
        let config = match config {
            Some(raw) => {
                let value: serde_json::Value =
                    serde_json::from_str(raw).map_err(|e| FxError::ParamTypeMismatch {
                        name: "config".into(),
                        expected: "JSON object".into(),
                        got: e.to_string(),
                    })?;
                SiteConfig::from_json(&value)
            }
            None => SiteConfig::default(),
        };
        let faq_items = document()?
            .query_selector_all("[id^='faq-panel-']")
            .map_err(|e| host_err("querySelectorAll", e))?
            .length() as usize;

        let chrome = Chrome {
            config,
            themes: ThemeStore::load(LocalStore::open()),
            modal: BookingModal::new(),
            drawer: NavDrawer::new(),
            faq: Accordion::new(faq_items),
            lead: LeadFormState::new(),
        };
        chrome.render_theme();
        chrome.render_modal();
        chrome.render_drawer();
        chrome.render_faq();
        let chrome = Rc::new(RefCell::new(chrome));

        let doc = document()?;
        let target: &EventTarget = doc.as_ref();
        let weak = Rc::downgrade(&chrome);
        let keydown = Listener::new(target, "keydown", move |event: Event| {
            let Some(key) = event.dyn_ref::<KeyboardEvent>().map(KeyboardEvent::key) else {
                return;
            };
            let Some(chrome) = weak.upgrade() else {
                return;
            };
            let Ok(mut chrome) = chrome.try_borrow_mut() else {
                return;
            };
            if chrome.modal.on_key(&key) {
                chrome.render_modal();
            }
        })?;

        info!("page chrome ready ({faq_items} faq items)");
        Ok(Self {
            chrome,
            _keydown: keydown,
        })
    }
}

/// Smoothly scrolls to the element an in-page link points at. Does nothing
/// when the link is not a fragment or no element has that id.
#[wasm_bindgen(js_name = scrollToAnchor)]
pub fn scroll_to_anchor(href: &str) {
    let Some(id) = anchor_target(href) else {
        return;
    };
    let Some(target) = element(id) else {
        return;
    };
    let options = ScrollIntoViewOptions::new();
    options.set_behavior(ScrollBehavior::Smooth);
    target.scroll_into_view_with_scroll_into_view_options(&options);
}

async fn submit(chrome: Rc<RefCell<Chrome>>, form_id: &str) -> Result<String, FxError> {
    let form = read_form(form_id)?;
    let missing = form.missing_fields();
    if !missing.is_empty() {
        let banner = format!("Please fill in: {}.", missing.join(", "));
        show_status(form_id, &banner, "invalid");
        return Ok(banner);
    }

    let (payload, config) = {
        let mut chrome = chrome.borrow_mut();
        if chrome.lead.status() == FormStatus::Submitting {
            return Ok(String::new());
        }
        chrome.lead.form = form;
        match chrome.lead.begin_submit(Utc::now()) {
            Some(payload) => (payload, chrome.config.clone()),
            None => return Ok(String::new()),
        }
    };

    let response = post_lead(&config.webhook_url, &payload).await;
    let outcome = chrome.borrow_mut().lead.finish_submit(response);
    write_form(form_id, &chrome.borrow().lead.form);

    let banner = outcome.message(&config);
    let state = if outcome.is_success() { "sent" } else { "failed" };
    show_status(form_id, &banner, state);
    Ok(banner)
}

fn read_form(form_id: &str) -> Result<LeadForm, FxError> {
    let doc = document()?;
    let value = |field: &str| -> String {
        doc.query_selector(&format!("#{form_id} [name='{field}']"))
            .ok()
            .flatten()
            .and_then(|input| js_sys::Reflect::get(&input, &JsValue::from_str("value")).ok())
            .and_then(|value| value.as_string())
            .unwrap_or_default()
    };
    Ok(LeadForm {
        name: value("name"),
        email: value("email"),
        phone: value("phone"),
        company: value("company"),
        message: value("message"),
    })
}

fn write_form(form_id: &str, form: &LeadForm) {
    let Ok(doc) = document() else {
        return;
    };
    let values = [&form.name, &form.email, &form.phone, &form.company, &form.message];
    for (field, value) in FORM_FIELDS.iter().zip(values) {
        if let Ok(Some(input)) = doc.query_selector(&format!("#{form_id} [name='{field}']")) {
            let _ = js_sys::Reflect::set(&input, &JsValue::from_str("value"), &JsValue::from_str(value));
        }
    }
}

fn show_status(form_id: &str, banner: &str, state: &str) {
    if let Some(status) = element(&format!("{form_id}-status")) {
        status.set_text_content(Some(banner));
        let _ = status.set_attribute("data-outcome", state);
        let _ = status.set_attribute("role", "status");
    }
}

fn load_booking_frame(url: &str) {
    let Some(frame) = element(BOOKING_FRAME_ID) else {
        return;
    };
    match frame.dyn_into::<HtmlIFrameElement>() {
        Ok(frame) => frame.set_src(url),
        Err(_) => warn!("#{BOOKING_FRAME_ID} is not an iframe"),
    }
}

fn apply_theme(theme: Theme) {
    let root = document().ok().and_then(|d| d.document_element());
    if let Some(root) = root {
        let _ = root.set_attribute("data-theme", theme.as_str());
    }
}

fn element(id: &str) -> Option<Element> {
    document().ok()?.get_element_by_id(id)
}

fn apply_attrs(element: &Element, attrs: &A11yAttrs) {
    for (name, value) in attrs.to_pairs() {
        if let Err(e) = element.set_attribute(name, &value) {
            warn!("{}", host_err(name, e));
        }
    }
}

fn set_open(element: &Element, open: bool) {
    let _ = element.toggle_attribute_with_force("hidden", !open);
    let _ = element.class_list().toggle_with_force("is-open", open);
}
