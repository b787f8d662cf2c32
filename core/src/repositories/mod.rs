pub mod credentials;
pub mod member;
pub mod session;

pub use credentials::CredentialVerifier;
pub use member::MemberRepository;
pub use session::{InMemorySessionStore, RefreshSessionStore};
