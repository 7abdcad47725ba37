pub mod file;
pub mod memory;
pub mod traits;

pub use file::FilePreferenceRepository;
pub use memory::InMemoryPreferenceRepository;
pub use traits::{PreferenceRepository, Storage};
