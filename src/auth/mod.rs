//! Authentication: request signing and session material.
//!
//! ## Security Model
//!
//! - **Server mode**: every request is signed with an HMAC-SHA256 over
//!   `{timestamp_ms}{url}{body}` keyed by the secret key. The secret never
//!   leaves the signer.
//! - **Embedded-host mode**: authenticated requests carry a bearer token
//!   mirrored from the `zabosession` cookie. Public endpoints send no auth
//!   header at all.
//! - The one-time password in [`TeamSession`] binds the connect widget and
//!   WebSocket channel to this SDK instance; it is short-lived and refreshed
//!   on expiry.

pub mod session;
pub mod signer;

pub use session::{TeamSession, SESSION_COOKIE};
pub use signer::{HmacSigner, RequestSigner};
