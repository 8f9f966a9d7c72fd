//! Records where a resolver panicked
//!
//! `catch_unwind` only returns the payload. A chained panic hook keeps the
//! location of the latest panic on the panicking thread so the caught error can
//! carry it.

use std::cell::RefCell;
use std::panic;
use std::sync::Once;

thread_local! {
    static LAST_LOCATION: RefCell<Option<String>> = const { RefCell::new(None) };
}

static INSTALL: Once = Once::new();

/// Install the recording hook once. The previously installed hook still runs.
pub(crate) fn install() {
    INSTALL.call_once(|| {
        let previous = panic::take_hook();
        panic::set_hook(Box::new(move |info| {
            let location = info.location().map(|location| location.to_string());
            let _ = LAST_LOCATION.try_with(|slot| *slot.borrow_mut() = location);
            previous(info);
        }));
    });
}

/// Location of the latest panic on this thread, cleared on read
pub(crate) fn take_location() -> Option<String> {
    LAST_LOCATION
        .try_with(|slot| slot.borrow_mut().take())
        .ok()
        .flatten()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_location_is_recorded_and_taken() {
        install();

        let result = panic::catch_unwind(|| panic!("boom"));
        assert!(result.is_err());

        let location = take_location().unwrap();
        assert!(location.contains("panic_hook.rs"), "location: {}", location);
        assert!(take_location().is_none());
    }
}
