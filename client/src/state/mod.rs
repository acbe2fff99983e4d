//! Shared client-side state modules.
//!
//! DESIGN
//! ======
//! `auth` owns the session store (credential, user summary, status) and its
//! durable snapshot codec; `session` owns the per-activation hydration machine
//! and the `use_auth` hook that consuming views read.

pub mod auth;
pub mod session;
