pub fn set_panic_hook() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

#[cfg(target_arch = "wasm32")]
pub fn init_logging() {
    // Errs only when a logger is already installed.
    let _ = console_log::init_with_level(log::Level::Info);
}

/// Character-wise JavaScript `String.prototype.slice(start)`: a negative
/// `start` counts from the end.
pub fn js_slice(text: &str, start: i32) -> String {
    let len = text.chars().count();
    let skip = if start < 0 {
        len.saturating_sub(start.unsigned_abs() as usize)
    } else {
        (start as usize).min(len)
    };
    text.chars().skip(skip).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn negative_start_keeps_tail() {
        assert_eq!(js_slice("/shop/cart", -4), "cart");
        assert_eq!(js_slice("/shop/cart", -255), "/shop/cart");
    }

    #[test]
    fn positive_start_drops_head() {
        assert_eq!(js_slice("/shop/cart", 6), "cart");
        assert_eq!(js_slice("/shop", 0), "/shop");
        assert_eq!(js_slice("/shop", 99), "");
    }

    #[test]
    fn counts_characters_not_bytes() {
        assert_eq!(js_slice("/größe", -5), "größe");
    }
}
