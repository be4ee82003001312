use std::sync::atomic::{AtomicUsize, Ordering};

// Single static counter for all paths
static NEXT_PATH_ID: AtomicUsize = AtomicUsize::new(1);

pub fn generate_id() -> usize {
    NEXT_PATH_ID.fetch_add(1, Ordering::SeqCst)
}

/// Make sure ids handed out from now on never collide with `used`
/// (called after restoring a document from storage).
pub fn reserve_up_to(used: usize) {
    NEXT_PATH_ID.fetch_max(used + 1, Ordering::SeqCst);
}
