//! Dashboard page: the guarded landing area listing the user directory.

use leptos::prelude::*;
use leptos_router::NavigateOptions;
use leptos_router::hooks::use_navigate;

use crate::net::api::UserListParams;
use crate::state::auth::AuthState;
use crate::state::session::{sign_out, use_auth};

/// Dashboard page — greets the signed-in user and lists the directory.
/// Redirects to `/login` once the session has settled unauthenticated.
#[component]
pub fn DashboardPage() -> impl IntoView {
    let auth = expect_context::<RwSignal<AuthState>>();
    let handle = use_auth();
    let navigate = use_navigate();

    // Only redirect after hydration and revalidation have settled; bouncing a
    // returning visitor mid-boot would lose their session for no reason.
    Effect::new(move || {
        if !handle.loading.get() && handle.user.get().is_none() {
            navigate("/login", NavigateOptions::default());
        }
    });

    let users = LocalResource::new(move || async move {
        crate::net::api::fetch_users(auth, &UserListParams::default()).await
    });

    let on_sign_out = move |_| sign_out(auth);

    view! {
        <div class="dashboard-page">
            <header class="dashboard-page__header">
                <h1>
                    {move || {
                        handle
                            .user
                            .get()
                            .map_or_else(|| "Loading...".to_owned(), |u| format!("Welcome, {}", u.name))
                    }}
                </h1>
                <button class="btn" on:click=on_sign_out>
                    "Sign out"
                </button>
            </header>

            <Suspense fallback=move || view! { <p>"Loading users..."</p> }>
                {move || {
                    users
                        .get()
                        .map(|result| match result {
                            Ok(list) => {
                                view! {
                                    <ul class="dashboard-page__users">
                                        {list
                                            .users
                                            .into_iter()
                                            .map(|u| view! { <li>{u.name}</li> })
                                            .collect::<Vec<_>>()}
                                    </ul>
                                }
                                    .into_any()
                            }
                            Err(_) => view! { <p>"Could not load users."</p> }.into_any(),
                        })
                }}
            </Suspense>
        </div>
    }
}
