//! Page host that forwards the font data request to the worker thread.

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::mpsc::Sender;

use log::{debug, warn};

use fontprefs_core::{keys, FontDataHost, PreferenceBinding, PreferenceStore};

use crate::worker::WorkerCommand;

pub struct ChannelHost {
    tx: Sender<WorkerCommand>,
    prefs: Rc<RefCell<PreferenceStore>>,
}

impl ChannelHost {
    pub fn new(tx: Sender<WorkerCommand>, prefs: Rc<RefCell<PreferenceStore>>) -> Self {
        Self { tx, prefs }
    }

    /// Current serif family, fixed family and default charset, in the
    /// order the page selects them.
    fn selected_values(&self) -> Vec<String> {
        let prefs = self.prefs.borrow();
        [keys::SERIF_FONT_FAMILY, keys::FIXED_FONT_FAMILY, keys::DEFAULT_CHARSET]
            .iter()
            .map(|key| prefs.get_string(key).unwrap_or_default())
            .collect()
    }
}

impl FontDataHost for ChannelHost {
    fn request_fonts_and_encodings(&mut self) {
        let selected_values = self.selected_values();
        debug!("fetch request with selected values {selected_values:?}");
        if self
            .tx
            .send(WorkerCommand::FetchFontsData { selected_values })
            .is_err()
        {
            warn!("font worker is gone; font lists will stay empty");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc;

    #[test]
    fn request_carries_current_selection() {
        let (tx, rx) = mpsc::channel();
        let prefs = Rc::new(RefCell::new(PreferenceStore::with_font_defaults()));
        prefs
            .borrow_mut()
            .set_string_pref(keys::FIXED_FONT_FAMILY, "Consolas", "")
            .unwrap();

        let mut host = ChannelHost::new(tx, prefs);
        host.request_fonts_and_encodings();

        match rx.try_recv().unwrap() {
            WorkerCommand::FetchFontsData { selected_values } => {
                assert_eq!(selected_values, ["Times New Roman", "Consolas", "ISO-8859-1"]);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn closed_channel_is_not_fatal() {
        let (tx, rx) = mpsc::channel();
        drop(rx);
        let prefs = Rc::new(RefCell::new(PreferenceStore::with_font_defaults()));
        ChannelHost::new(tx, prefs).request_fonts_and_encodings();
    }
}
