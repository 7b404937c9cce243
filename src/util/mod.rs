pub(crate) fn now_ms() -> i64 {
    js_sys::Date::now().round() as i64
}

/// Browser-console warning that compiles to a no-op in native test builds.
pub(crate) fn console_warn(msg: &str) {
    #[cfg(target_arch = "wasm32")]
    web_sys::console::warn_1(&msg.into());
    #[cfg(not(target_arch = "wasm32"))]
    let _ = msg;
}

/// Client-side temporary id for rows that have not been persisted yet.
///
/// Temporary ids are negative so they can never collide with server-assigned
/// ids, which are positive.
pub(crate) fn make_tmp_menu_id(now_ms: i64, rand: u64) -> i64 {
    -((now_ms.unsigned_abs() as i64 % 1_000_000_000) * 1_000 + (rand % 1_000) as i64).max(1)
}

pub(crate) fn is_tmp_menu_id(id: i64) -> bool {
    id < 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tmp_menu_ids_are_negative() {
        let id = make_tmp_menu_id(1_700_000_123_456, 42);
        assert!(is_tmp_menu_id(id));
        assert!(!is_tmp_menu_id(7));
    }

    #[test]
    fn test_tmp_menu_ids_vary_with_rand() {
        let a = make_tmp_menu_id(1_700_000_123_456, 1);
        let b = make_tmp_menu_id(1_700_000_123_456, 2);
        assert_ne!(a, b);
    }
}
