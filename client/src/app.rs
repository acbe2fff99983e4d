//! Root application component with routing and session boot.
//!
//! BOOT ORDER
//! ==========
//! 1. Reconcile any OAuth callback parameters from the URL (fresh credential
//!    wins and is persisted before anything reads storage).
//! 2. Complete hydration from the persisted snapshot.
//! 3. `use_auth` in the page tree revalidates the credential once.

use leptos::prelude::*;
use leptos_meta::{MetaTags, Stylesheet, Title, provide_meta_context};
use leptos_router::{
    StaticSegment,
    components::{Route, Router, Routes},
};

use crate::pages::{dashboard::DashboardPage, home::HomePage, login::LoginPage};
use crate::state::auth::AuthState;

/// HTML shell rendered on the server for SSR + hydration.
pub fn shell(options: LeptosOptions) -> impl IntoView {
    view! {
        <!DOCTYPE html>
        <html lang="en">
            <head>
                <meta charset="utf-8"/>
                <meta name="viewport" content="width=device-width, initial-scale=1"/>
                <AutoReload options=options.clone()/>
                <HydrationScripts options/>
                <MetaTags/>
            </head>
            <body>
                <App/>
            </body>
        </html>
    }
}

/// Root application component. Provides the session store context and boots
/// the session before the router mounts.
#[component]
pub fn App() -> impl IntoView {
    provide_meta_context();

    let auth = RwSignal::new(AuthState::default());
    provide_context(auth);

    crate::util::callback::reconcile_from_url(auth);
    auth.update(|a| a.complete_hydration(crate::util::browser::load_session()));

    view! {
        <Stylesheet id="leptos" href="/pkg/authweb.css"/>
        <Title text="AuthWeb"/>

        <Router>
            <Routes fallback=|| "Page not found.".into_view()>
                <Route path=StaticSegment("") view=HomePage/>
                <Route path=StaticSegment("login") view=LoginPage/>
                <Route path=StaticSegment("dashboard") view=DashboardPage/>
            </Routes>
        </Router>
    }
}
