//! Host-UI capability hooks.
//!
//! Navigation-level outcomes (leaving the composer after a successful post,
//! announcing the created listing) concern the host UI, not the engine. Hosts
//! declare what they can do by filling in [`UiHooks`]; every field is
//! optional and an absent hook means that outcome is deliberately ignored —
//! a documented no-op, not a hidden fallback closure.

use crate::domain::listing::Listing;

/// Callback type for hooks receiving a listing.
pub type ListingHook = Box<dyn Fn(&Listing)>;

/// Callback type for hooks receiving nothing.
pub type SignalHook = Box<dyn Fn()>;

/// Optional host-UI capabilities.
///
/// Each field is consulted when the corresponding
/// [`Action`](crate::app::Action) is executed. `None` means the host has no
/// use for that signal and it is dropped silently; this is the supported way
/// to embed the engine headless.
#[derive(Default)]
pub struct UiHooks {
    /// Called with the created listing when a submission succeeds.
    pub on_listing_created: Option<ListingHook>,

    /// Called when the engine asks to leave the composer view.
    pub on_navigate_home: Option<SignalHook>,
}

impl UiHooks {
    /// Hooks that ignore every signal.
    #[must_use]
    pub fn none() -> Self {
        Self::default()
    }

    /// Invokes the creation hook, if present.
    pub fn announce_created(&self, listing: &Listing) {
        if let Some(hook) = &self.on_listing_created {
            hook(listing);
        }
    }

    /// Invokes the navigation hook, if present.
    pub fn navigate_home(&self) {
        if let Some(hook) = &self.on_navigate_home {
            hook();
        }
    }
}

impl std::fmt::Debug for UiHooks {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UiHooks")
            .field("on_listing_created", &self.on_listing_created.is_some())
            .field("on_navigate_home", &self.on_navigate_home.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    #[test]
    fn test_absent_hooks_are_silent_no_ops() {
        let hooks = UiHooks::none();
        hooks.navigate_home();
        // Nothing to assert beyond "did not panic": absence is a no-op.
    }

    #[test]
    fn test_present_hooks_fire() {
        let fired = Rc::new(Cell::new(false));
        let flag = Rc::clone(&fired);
        let hooks = UiHooks {
            on_navigate_home: Some(Box::new(move || flag.set(true))),
            ..UiHooks::none()
        };
        hooks.navigate_home();
        assert!(fired.get());
    }
}
