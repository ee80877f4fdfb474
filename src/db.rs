pub mod client_repo;
pub mod json_store;
pub mod module_repo;
pub mod onboarding_repo;
pub mod user_repo;

pub use client_repo::ClientRepository;
pub use json_store::JsonStore;
pub use module_repo::ModuleRepository;
pub use onboarding_repo::OnboardingRepository;
pub use user_repo::UserRepository;
