//! Rendering of panic payloads caught while a step runs.

use std::any::Any;

/// Turn a panic payload into a readable message.
///
/// `&str` and `String` payloads are returned as-is; anything else is
/// described by its type-erased `Debug` form.
///
/// # Examples
///
/// ```
/// use stepwise::panic_message;
/// use std::any::Any;
///
/// let payload: Box<dyn Any + Send> = Box::new(String::from("boom"));
/// assert_eq!(panic_message(payload.as_ref()), "boom");
/// ```
#[must_use]
pub fn panic_message(payload: &(dyn Any + Send)) -> String {
    payload
        .downcast_ref::<&str>()
        .map(|s| (*s).to_owned())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| format!("{payload:?}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::panic;

    #[test]
    fn extracts_formatted_panic_messages() {
        let result = panic::catch_unwind(|| -> u8 { panic!("expected {} cucumbers", 7) });
        let Err(payload) = result else {
            panic!("closure should panic");
        };
        assert_eq!(panic_message(payload.as_ref()), "expected 7 cucumbers");
    }

    #[test]
    fn falls_back_to_debug_for_other_payloads() {
        let payload: Box<dyn Any + Send> = Box::new(42_u8);
        assert_eq!(panic_message(payload.as_ref()), "Any { .. }");
    }
}
