//! Landing page. Also the destination of the OAuth callback redirect; the
//! callback parameters are consumed by the app shell before this renders.

use leptos::prelude::*;

use crate::state::session::use_auth;

/// Home page — points at the dashboard or the login form depending on
/// session state.
#[component]
pub fn HomePage() -> impl IntoView {
    let handle = use_auth();

    view! {
        <div class="home-page">
            <h1>"AuthWeb"</h1>
            <Show
                when=move || handle.user.get().is_some()
                fallback=|| view! { <a href="/login">"Sign in"</a> }
            >
                <a href="/dashboard">"Go to dashboard"</a>
            </Show>
        </div>
    }
}
