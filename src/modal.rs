//! Open/closed state for a modal dialog with an optional payload.
//!
//! Pages decide whether a dialog is open from the request (e.g. a query
//! parameter naming the account to delete) and render the dialog from the
//! state.

/// Whether a modal is open and the data it was opened with.
#[derive(Debug, Clone, PartialEq)]
pub struct ModalState<T> {
    is_open: bool,
    data: Option<T>,
}

impl<T> Default for ModalState<T> {
    fn default() -> Self {
        Self {
            is_open: false,
            data: None,
        }
    }
}

impl<T> ModalState<T> {
    /// Create a closed modal with no data.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the modal is open.
    pub fn is_open(&self) -> bool {
        self.is_open
    }

    /// The data the modal was opened with, if any.
    pub fn data(&self) -> Option<&T> {
        self.data.as_ref()
    }

    /// Open the modal.
    ///
    /// If `data` is `None` any data from a previous call to `open` is kept.
    pub fn open(&mut self, data: Option<T>) {
        if data.is_some() {
            self.data = data;
        }

        self.is_open = true;
    }

    /// Close the modal and clear its data.
    pub fn close(&mut self) {
        self.is_open = false;
        self.data = None;
    }

    /// Open the modal if it is closed, otherwise close it.
    ///
    /// Closing the modal clears its data.
    pub fn toggle(&mut self) {
        self.is_open = !self.is_open;

        if !self.is_open {
            self.data = None;
        }
    }
}

impl<T> From<Option<T>> for ModalState<T> {
    /// A modal that is open with `data` when `data` is `Some`, otherwise closed.
    fn from(data: Option<T>) -> Self {
        let mut modal = Self::new();

        if data.is_some() {
            modal.open(data);
        }

        modal
    }
}

#[cfg(test)]
mod tests {
    use super::ModalState;

    #[test]
    fn starts_closed_without_data() {
        let modal = ModalState::<i64>::new();

        assert!(!modal.is_open());
        assert_eq!(modal.data(), None);
    }

    #[test]
    fn open_with_data_sets_data() {
        let mut modal = ModalState::new();

        modal.open(Some(42));

        assert!(modal.is_open());
        assert_eq!(modal.data(), Some(&42));
    }

    #[test]
    fn open_without_data_keeps_existing_data() {
        let mut modal = ModalState::new();
        modal.open(Some("foo"));

        modal.open(None);

        assert!(modal.is_open());
        assert_eq!(modal.data(), Some(&"foo"));
    }

    #[test]
    fn close_always_clears_data() {
        let mut modal = ModalState::new();
        modal.open(Some(1));

        modal.close();

        assert!(!modal.is_open());
        assert_eq!(modal.data(), None);

        // Closing an already closed modal is fine too.
        modal.close();
        assert_eq!(modal, ModalState::new());
    }

    #[test]
    fn toggle_opens_then_closes_and_clears() {
        let mut modal = ModalState::new();

        modal.toggle();
        assert!(modal.is_open());

        modal.open(Some(7));
        modal.toggle();

        assert!(!modal.is_open());
        assert_eq!(modal.data(), None);
    }

    #[test]
    fn from_option() {
        assert_eq!(ModalState::<i64>::from(None), ModalState::new());

        let modal = ModalState::from(Some(3));
        assert!(modal.is_open());
        assert_eq!(modal.data(), Some(&3));
    }
}
