//! The Fonts and Encoding settings page.
//!
//! `FontSettings` owns the three size sliders and the three selection lists,
//! writes user changes through a `PreferenceBinding`, keeps the sample
//! regions up to date, and asks its `FontDataHost` for the font and
//! encoding lists the first time the page is shown.
//!
//! Single-threaded: the sample regions and the preference binding are shared
//! with the slider hooks through `Rc<RefCell<_>>`.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;
use std::sync::Arc;

use log::{debug, info, warn};

use crate::prefs::{keys, PreferenceBinding, PreferenceKey};
use crate::sample::{SamplePreview, SampleRegion};
use crate::select::{SelectOption, SelectionList};
use crate::slider::{SliderId, Step, ValueMap, ValueMapSlider};
use crate::strings::{self, LocalizedStrings};

/// A page of the settings UI, driven by the host's page framework.
pub trait Page {
    fn name(&self) -> &str;

    fn title(&self) -> &str;

    /// Build controls. Called once, before the page is first shown.
    fn initialize_page(&mut self);

    /// Called every time the page becomes the active view.
    fn did_show_page(&mut self);
}

/// Host side of the page: answers the one-time font data request.
///
/// The answer arrives later through `FontSettings::on_fonts_data_received`.
pub trait FontDataHost {
    fn request_fonts_and_encodings(&mut self);
}

/// Identifies one of the page's selection lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ListId {
    SerifFamily,
    FixedFamily,
    Encoding,
}

impl ListId {
    pub const ALL: [ListId; 3] = [ListId::SerifFamily, ListId::FixedFamily, ListId::Encoding];

    pub fn label(self) -> &'static str {
        match self {
            ListId::SerifFamily => "Serif font",
            ListId::FixedFamily => "Fixed-width font",
            ListId::Encoding => "Encoding",
        }
    }

    pub fn pref_key(self) -> &'static str {
        match self {
            ListId::SerifFamily => keys::SERIF_FONT_FAMILY,
            ListId::FixedFamily => keys::FIXED_FONT_FAMILY,
            ListId::Encoding => keys::DEFAULT_CHARSET,
        }
    }
}

impl SliderId {
    pub fn pref_key(self) -> &'static str {
        match self {
            SliderId::SerifSize => keys::DEFAULT_FONT_SIZE,
            SliderId::FixedSize => keys::DEFAULT_FIXED_FONT_SIZE,
            SliderId::MinimumSize => keys::MINIMUM_FONT_SIZE,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageState {
    Uninitialized,
    Initialized { has_shown: bool },
}

type ListListener = Box<dyn FnMut(&str)>;

struct BoundSlider {
    slider: ValueMapSlider,
    pref: Option<PreferenceKey>,
}

struct BoundList {
    list: SelectionList,
    pref: Option<PreferenceKey>,
    listeners: Vec<ListListener>,
}

impl BoundList {
    fn new(pref: &str) -> Self {
        Self {
            list: SelectionList::new(),
            pref: Some(PreferenceKey::from(pref)),
            listeners: Vec::new(),
        }
    }
}

struct Controls {
    serif_size: BoundSlider,
    fixed_size: BoundSlider,
    minimum_size: BoundSlider,
    serif_family: BoundList,
    fixed_family: BoundList,
    encoding: BoundList,
}

impl Controls {
    fn slider(&self, id: SliderId) -> &BoundSlider {
        match id {
            SliderId::SerifSize => &self.serif_size,
            SliderId::FixedSize => &self.fixed_size,
            SliderId::MinimumSize => &self.minimum_size,
        }
    }

    fn slider_mut(&mut self, id: SliderId) -> &mut BoundSlider {
        match id {
            SliderId::SerifSize => &mut self.serif_size,
            SliderId::FixedSize => &mut self.fixed_size,
            SliderId::MinimumSize => &mut self.minimum_size,
        }
    }

    fn list(&self, id: ListId) -> &BoundList {
        match id {
            ListId::SerifFamily => &self.serif_family,
            ListId::FixedFamily => &self.fixed_family,
            ListId::Encoding => &self.encoding,
        }
    }

    fn list_mut(&mut self, id: ListId) -> &mut BoundList {
        match id {
            ListId::SerifFamily => &mut self.serif_family,
            ListId::FixedFamily => &mut self.fixed_family,
            ListId::Encoding => &mut self.encoding,
        }
    }
}

#[derive(Clone)]
struct Samples {
    serif: Rc<RefCell<SampleRegion>>,
    fixed: Rc<RefCell<SampleRegion>>,
    minimum: Rc<RefCell<SampleRegion>>,
}

impl Samples {
    fn region(&self, id: SliderId) -> &Rc<RefCell<SampleRegion>> {
        match id {
            SliderId::SerifSize => &self.serif,
            SliderId::FixedSize => &self.fixed,
            SliderId::MinimumSize => &self.minimum,
        }
    }
}

pub struct FontSettings<H, P> {
    host: H,
    prefs: Rc<RefCell<P>>,
    strings: LocalizedStrings,
    preview: Rc<SamplePreview>,
    samples: Samples,
    state: PageState,
    controls: Option<Controls>,
}

impl<H, P> FontSettings<H, P>
where
    H: FontDataHost,
    P: PreferenceBinding + 'static,
{
    pub fn new(host: H, prefs: Rc<RefCell<P>>, strings: LocalizedStrings) -> Self {
        let preview = Rc::new(SamplePreview::new(strings.get(strings::SAMPLE_SENTENCE)));
        Self {
            host,
            prefs,
            strings,
            preview,
            samples: Samples {
                serif: Rc::default(),
                fixed: Rc::default(),
                minimum: Rc::default(),
            },
            state: PageState::Uninitialized,
            controls: None,
        }
    }

    pub fn state(&self) -> PageState {
        self.state
    }

    pub fn is_initialized(&self) -> bool {
        self.controls.is_some()
    }

    pub fn has_shown(&self) -> bool {
        matches!(self.state, PageState::Initialized { has_shown: true })
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn prefs(&self) -> &Rc<RefCell<P>> {
        &self.prefs
    }

    pub fn slider(&self, id: SliderId) -> Option<&ValueMapSlider> {
        self.controls.as_ref().map(|c| &c.slider(id).slider)
    }

    pub fn list(&self, id: ListId) -> Option<&SelectionList> {
        self.controls.as_ref().map(|c| &c.list(id).list)
    }

    /// Snapshot of a sample region.
    pub fn sample(&self, id: SliderId) -> SampleRegion {
        self.samples.region(id).borrow().clone()
    }

    /// Fill all three lists from the host's answer and select
    /// `selected_values` positionally (serif, fixed, encoding).
    pub fn on_fonts_data_received(
        &mut self,
        fonts: &[SelectOption],
        encodings: &[SelectOption],
        selected_values: &[String],
    ) {
        let Some(controls) = self.controls.as_mut() else {
            warn!("font data arrived before the page was initialized; ignoring");
            return;
        };
        if selected_values.len() < ListId::ALL.len() {
            debug!(
                "font data carries {} of {} selected values",
                selected_values.len(),
                ListId::ALL.len()
            );
        }
        for (i, id) in ListId::ALL.into_iter().enumerate() {
            let items = match id {
                ListId::Encoding => encodings,
                ListId::SerifFamily | ListId::FixedFamily => fonts,
            };
            let selected = selected_values.get(i).map(String::as_str);
            controls.list_mut(id).list.populate(items, selected);
        }
        info!(
            "font lists populated: {} fonts, {} encodings",
            fonts.len(),
            encodings.len()
        );
    }

    pub fn on_serif_sample_update(&self, font: &str, size: i32) {
        self.render_sample(SliderId::SerifSize, size, Some(font));
    }

    pub fn on_fixed_sample_update(&self, font: &str, size: i32) {
        self.render_sample(SliderId::FixedSize, size, Some(font));
    }

    pub fn on_minimum_sample_update(&self, size: i32) {
        self.render_sample(SliderId::MinimumSize, size, None);
    }

    /// Raw slider motion from the UI. Returns the new mapped value when it
    /// changed; the slider's bound preference is written in that case.
    pub fn on_slider_input(&mut self, id: SliderId, raw_position: u32) -> Option<i32> {
        let bound = self.controls.as_mut()?.slider_mut(id);
        let value = bound.slider.on_user_input(raw_position)?;
        if let Some(key) = &bound.pref {
            write_integer(&self.prefs, key.as_str(), value);
        }
        Some(value)
    }

    /// Keyboard step on a slider; same write-back as `on_slider_input`.
    pub fn nudge_slider(&mut self, id: SliderId, step: Step) -> Option<i32> {
        let bound = self.controls.as_mut()?.slider_mut(id);
        let value = bound.slider.nudge(step)?;
        if let Some(key) = &bound.pref {
            write_integer(&self.prefs, key.as_str(), value);
        }
        Some(value)
    }

    /// User picked entry `index` of a list. Writes the list's preference and
    /// runs its extra listeners. Returns the picked value.
    pub fn on_selection_changed(&mut self, id: ListId, index: usize) -> Option<String> {
        let bound = self.controls.as_mut()?.list_mut(id);
        let value = bound.list.select(index)?.value.clone();
        if let Some(key) = &bound.pref {
            write_string(&self.prefs, key.as_str(), &value);
        }
        for listener in bound.listeners.iter_mut() {
            listener(&value);
        }
        Some(value)
    }

    /// Re-read the bound preferences: reposition sliders, reselect list
    /// entries and re-render the samples. The host calls this whenever a
    /// font preference changes.
    pub fn on_preferences_changed(&mut self) {
        let Some(controls) = self.controls.as_mut() else {
            return;
        };
        let prefs = self.prefs.borrow();
        for id in SliderId::ALL {
            let bound = controls.slider_mut(id);
            if let Some(value) = prefs.get_integer(id.pref_key()) {
                bound.slider.set_value(value);
            }
            bound.slider.set_disabled(prefs.is_managed(id.pref_key()));
        }
        for id in ListId::ALL {
            let list = &mut controls.list_mut(id).list;
            if !list.is_empty() && list.is_disabled() && !list.is_managed() {
                // still showing the placeholder
                continue;
            }
            if let Some(value) = prefs.get_string(id.pref_key()) {
                list.select_value(&value);
            }
        }
        drop(prefs);

        self.refresh_samples();
    }

    /// Re-render all three samples from the stored families and the
    /// sliders' current values.
    pub fn refresh_samples(&self) {
        let Some(controls) = self.controls.as_ref() else {
            return;
        };
        let (serif, fixed) = {
            let prefs = self.prefs.borrow();
            (
                prefs.get_string(keys::SERIF_FONT_FAMILY).unwrap_or_default(),
                prefs.get_string(keys::FIXED_FONT_FAMILY).unwrap_or_default(),
            )
        };
        self.on_serif_sample_update(&serif, controls.serif_size.slider.value());
        self.on_fixed_sample_update(&fixed, controls.fixed_size.slider.value());
        self.on_minimum_sample_update(controls.minimum_size.slider.value());
    }

    fn render_sample(&self, id: SliderId, size: i32, font: Option<&str>) {
        let mut region = self.samples.region(id).borrow_mut();
        self.preview.render(&mut region, size, font);
    }

    fn build_slider(&self, id: SliderId, value_map: Arc<ValueMap>) -> BoundSlider {
        let mut slider = ValueMapSlider::new(id, value_map, false);

        let region = self.samples.region(id).clone();
        let preview = self.preview.clone();
        slider.set_notify_change(Box::new(move |_, value: i32| {
            preview.render(&mut region.borrow_mut(), value, None);
        }));

        let prefs = self.prefs.borrow();
        let key = id.pref_key();
        if let Some(value) = prefs.get_integer(key) {
            slider.set_value(value);
        }
        slider.set_disabled(prefs.is_managed(key));
        BoundSlider {
            slider,
            pref: Some(PreferenceKey::from(key)),
        }
    }
}

fn write_integer<P: PreferenceBinding>(prefs: &RefCell<P>, key: &str, value: i32) {
    if let Err(e) = prefs.borrow_mut().set_integer_pref(key, value, "") {
        warn!("could not set {key} to {value}: {e}");
    }
}

fn write_string<P: PreferenceBinding>(prefs: &RefCell<P>, key: &str, value: &str) {
    if let Err(e) = prefs.borrow_mut().set_string_pref(key, value, "") {
        warn!("could not set {key} to {value:?}: {e}");
    }
}

impl<H, P> Page for FontSettings<H, P>
where
    H: FontDataHost,
    P: PreferenceBinding + 'static,
{
    fn name(&self) -> &str {
        "fontSettings"
    }

    fn title(&self) -> &str {
        self.strings.get(strings::PAGE_TITLE)
    }

    fn initialize_page(&mut self) {
        if self.controls.is_some() {
            warn!("font settings page initialized twice; ignoring");
            return;
        }

        let font_sizes = Arc::new(ValueMap::font_sizes());
        let serif_size = self.build_slider(SliderId::SerifSize, font_sizes.clone());
        let fixed_size = self.build_slider(SliderId::FixedSize, font_sizes);
        let mut minimum_size =
            self.build_slider(SliderId::MinimumSize, Arc::new(ValueMap::minimum_font_sizes()));

        let prefs = self.prefs.clone();
        minimum_size
            .slider
            .set_notify_pref_change(Box::new(move |_, value: i32| {
                write_integer(&prefs, keys::MINIMUM_LOGICAL_FONT_SIZE, value);
            }));

        let placeholder = self.strings.get(strings::PLACEHOLDER);
        let mut serif_family = BoundList::new(ListId::SerifFamily.pref_key());
        let mut fixed_family = BoundList::new(ListId::FixedFamily.pref_key());
        let mut encoding = BoundList::new(ListId::Encoding.pref_key());
        {
            let prefs = self.prefs.borrow();
            for (id, bound) in [
                (ListId::SerifFamily, &mut serif_family),
                (ListId::FixedFamily, &mut fixed_family),
                (ListId::Encoding, &mut encoding),
            ] {
                bound.list.append(SelectOption::new(placeholder, placeholder));
                bound.list.set_managed(prefs.is_managed(id.pref_key()));
            }
        }

        // One serif pick sets the sans-serif family too.
        let prefs = self.prefs.clone();
        serif_family.listeners.push(Box::new(move |value: &str| {
            write_string(&prefs, keys::SANS_SERIF_FONT_FAMILY, value);
        }));

        self.controls = Some(Controls {
            serif_size,
            fixed_size,
            minimum_size,
            serif_family,
            fixed_family,
            encoding,
        });
        self.state = PageState::Initialized { has_shown: false };
        debug!("font settings page initialized");
    }

    fn did_show_page(&mut self) {
        match self.state {
            PageState::Uninitialized => {
                warn!("font settings page shown before initialization");
            }
            PageState::Initialized { has_shown: true } => {}
            PageState::Initialized { has_shown: false } => {
                info!("requesting font and encoding lists");
                self.host.request_fonts_and_encodings();
                self.state = PageState::Initialized { has_shown: true };
            }
        }
    }
}

impl<H, P> fmt::Debug for FontSettings<H, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FontSettings")
            .field("state", &self.state)
            .field("initialized", &self.controls.is_some())
            .finish_non_exhaustive()
    }
}
