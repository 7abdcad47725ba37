mod preference_repository;

pub use preference_repository::FilePreferenceRepository;
