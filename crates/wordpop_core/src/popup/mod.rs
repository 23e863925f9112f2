//! Popup view-model.
//!
//! # Responsibility
//! - Hold the per-popup state: tokens of the selected phrase, current word,
//!   active tab, panel contents and per-word caches.
//! - Fetch tab content lazily and save the current word through the router.
//! - Render the state into a plain [`view::PopupView`].
//!
//! # Invariants
//! - At most one popup session exists per [`controller::PopupController`].
//! - The current word index stays within `[0, word_count - 1]`.
//! - Caches live in the session and die with it.

pub mod controller;
pub mod placement;
pub mod session;
pub mod view;

pub use controller::{PopupController, SaveFeedback, Trigger};
pub use placement::{place_popup, Placement, Rect, Viewport};
pub use session::{
    DefinitionView, Notification, NotificationKind, PanelContent, PanelState, PopupPhase,
    PopupSession,
};
pub use view::{render, PopupView};

/// Popup tabs, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tab {
    Definition,
    Examples,
    Hanjas,
    Translation,
}

impl Tab {
    pub const ALL: [Tab; 4] = [
        Self::Definition,
        Self::Examples,
        Self::Hanjas,
        Self::Translation,
    ];

    pub fn id(self) -> &'static str {
        match self {
            Self::Definition => "definition",
            Self::Examples => "examples",
            Self::Hanjas => "hanjas",
            Self::Translation => "translation",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Definition => "Definition",
            Self::Examples => "Examples",
            Self::Hanjas => "Hanjas / 한자",
            Self::Translation => "Translation",
        }
    }

    pub(crate) fn slot(self) -> usize {
        match self {
            Self::Definition => 0,
            Self::Examples => 1,
            Self::Hanjas => 2,
            Self::Translation => 3,
        }
    }

    pub fn parse(value: &str) -> Option<Tab> {
        let value = value.trim();
        Self::ALL
            .into_iter()
            .find(|tab| tab.id().eq_ignore_ascii_case(value))
    }
}
