//! Authentication and authorization.
//!
//! Every authenticated request goes through the same pipeline:
//!
//! 1. **Session resolution** - a JWT in an HTTP-only cookie is verified and
//!    resolved to an auth identity ([`principal`]). Any failure, whether a
//!    missing cookie, a bad signature, or a deactivated account, collapses to
//!    the same 401 so callers cannot probe which identities exist.
//! 2. **Tenant resolution** - staff sessions read the identity's active
//!    company pointer; portal sessions carry the company embedded in the
//!    linked customer or technician profile. Handlers never pick a tenant
//!    themselves.
//! 3. **Ownership guard** - entity routes resolve the target's owning
//!    company through [`guard::ensure_company_owns`] before touching it.
//!
//! # Modules
//!
//! - [`principal`]: Extractors producing the three session principals
//! - [`guard`]: The shared ownership check for entity routes
//! - [`password`]: Password hashing and verification using Argon2
//! - [`session`]: JWT session token creation and verification

pub mod guard;
pub mod password;
pub mod principal;
pub mod session;
