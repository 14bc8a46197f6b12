use crate::error::ListenerFault;

/// Listener fired after any data-affecting mutation
pub type ChangeListener = Box<dyn FnMut() -> Result<(), ListenerFault>>;
/// Listener fired with the word of a completed selection
pub type SelectionListener = Box<dyn FnMut(&str) -> Result<(), ListenerFault>>;

/// Registered observers, called synchronously in registration order.
///
/// A failing listener does not stop the ones after it; every fault is
/// returned to the caller for reporting.
#[derive(Default)]
pub struct Notifier {
    change: Vec<ChangeListener>,
    selection: Vec<SelectionListener>,
}

impl std::fmt::Debug for Notifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Notifier")
            .field("change", &self.change.len())
            .field("selection", &self.selection.len())
            .finish()
    }
}

impl Notifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_change(&mut self, listener: ChangeListener) {
        self.change.push(listener);
    }

    pub fn on_selection_complete(&mut self, listener: SelectionListener) {
        self.selection.push(listener);
    }

    pub fn change_listener_count(&self) -> usize {
        self.change.len()
    }

    pub fn selection_listener_count(&self) -> usize {
        self.selection.len()
    }

    pub fn notify_change(&mut self) -> Vec<ListenerFault> {
        self.change
            .iter_mut()
            .filter_map(|listener| listener().err())
            .collect()
    }

    pub fn notify_selection(&mut self, word: &str) -> Vec<ListenerFault> {
        self.selection
            .iter_mut()
            .filter_map(|listener| listener(word).err())
            .collect()
    }
}
