//! Identity adapters.
//!
//! Implementations of the `IdentityProvider` port:
//!
//! - `mock` - Sequential anonymous identities, no external services
//! - `firebase` - Firebase Identity Toolkit anonymous sign-up

mod firebase;
mod mock;

pub use firebase::{FirebaseConfig, FirebaseIdentityProvider, DEFAULT_IDENTITY_TOOLKIT_URL};
pub use mock::MockIdentityProvider;
