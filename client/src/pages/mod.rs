//! Page components. Pages stay thin: session state comes from `use_auth` and
//! the store in context; network calls go through `net::api`.

pub mod dashboard;
pub mod home;
pub mod login;
