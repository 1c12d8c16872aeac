//! Featured image storage - local filesystem and in-memory.

mod local;
mod memory;

pub use local::LocalImageStorage;
pub use memory::InMemoryImageStorage;

/// Download URL for a stored image: `{base}/uploads/{name}`.
pub(crate) fn upload_url(base_url: &str, name: &str) -> String {
    format!("{}/uploads/{name}", base_url.trim_end_matches('/'))
}
