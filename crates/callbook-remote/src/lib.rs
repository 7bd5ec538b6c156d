pub mod auth;
pub mod error;
pub mod firestore;
pub mod wire;

pub use auth::{PasswordSignIn, Session};
pub use error::{RemoteError, Result};
pub use firestore::{FirestoreBackend, FirestoreSettings};
