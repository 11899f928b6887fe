// Authentication Module
// OAuth2 authorization-code flow against Google: provider client, session
// codec, callback routes, the client-side controller and the single-record
// user directory.

pub mod controller;
pub mod directory;
pub mod error;
pub mod provider;
pub mod routes;
pub mod session;

pub use controller::{AuthController, AuthStatus, Platform};
pub use directory::{CURRENT_USER_KEY, DirectoryRecord, DirectoryStore, MemoryDirectory};
pub use error::AuthError;
pub use provider::{GoogleAuthClient, GoogleClientConfig, TokenSet, UserProfile};
pub use routes::{AuthState, create_auth_router};
pub use session::{SESSION_STORAGE_KEY, Session};
