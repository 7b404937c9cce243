use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::sync::atomic::{AtomicUsize, Ordering};

const PREFIX: &str = "medcms_ui"; // Must NOT contain "/" or "-"

pub fn use_random_id_for(element: &str) -> String {
    format!("{}_{PREFIX}_{}", element, generate_hash())
}

/// Session-unique value for minting temporary client ids
/// (see `util::make_tmp_menu_id`).
pub fn random_seed() -> u64 {
    generate_hash()
}

static COUNTER: AtomicUsize = AtomicUsize::new(1);

fn generate_hash() -> u64 {
    let mut hasher = DefaultHasher::new();
    let counter = COUNTER.fetch_add(1, Ordering::SeqCst);
    counter.hash(&mut hasher);
    hasher.finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_are_distinct_within_a_session() {
        let a = use_random_id_for("menu_row");
        let b = use_random_id_for("menu_row");
        assert_ne!(a, b);
        assert!(a.starts_with("menu_row_"));
    }
}
