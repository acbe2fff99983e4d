//! Login page: email/password form plus the Google redirect entry point.

use leptos::prelude::*;
#[cfg(feature = "hydrate")]
use leptos_router::NavigateOptions;
#[cfg(feature = "hydrate")]
use leptos_router::hooks::use_navigate;

use crate::state::auth::AuthState;

/// Login page — password form and a Google sign-in link. A successful login
/// seeds the store, persists the session, and navigates to the dashboard.
#[component]
pub fn LoginPage() -> impl IntoView {
    let auth = expect_context::<RwSignal<AuthState>>();
    let email = RwSignal::new(String::new());
    let password = RwSignal::new(String::new());
    let error = RwSignal::new(Option::<String>::None);

    #[cfg(feature = "hydrate")]
    let navigate = use_navigate();

    let submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        error.set(None);

        #[cfg(feature = "hydrate")]
        {
            let credentials = crate::net::types::LoginData {
                email: email.get_untracked(),
                password: password.get_untracked(),
            };
            let navigate = navigate.clone();
            leptos::task::spawn_local(async move {
                match crate::net::api::login(&credentials).await {
                    Ok(resp) => {
                        auth.update(|a| {
                            a.set_token(Some(resp.token));
                            a.set_user(Some(resp.user));
                        });
                        auth.with_untracked(|a| crate::util::browser::store_session(&a.snapshot()));
                        navigate("/dashboard", NavigateOptions::default());
                    }
                    Err(crate::net::api::ApiError::Status(401)) => {
                        error.set(Some("Invalid email or password.".to_owned()));
                    }
                    Err(e) => {
                        log::warn!("login failed: {e}");
                        error.set(Some("Login failed. Please try again.".to_owned()));
                    }
                }
            });
        }
    };

    view! {
        <div class="login-page">
            <h1>"AuthWeb"</h1>
            <form class="login-form" on:submit=submit>
                <input
                    type="email"
                    placeholder="Email"
                    prop:value=email
                    on:input=move |ev| email.set(event_target_value(&ev))
                />
                <input
                    type="password"
                    placeholder="Password"
                    prop:value=password
                    on:input=move |ev| password.set(event_target_value(&ev))
                />
                <button type="submit" class="btn btn--primary">
                    "Sign in"
                </button>
            </form>
            <Show when=move || error.get().is_some()>
                <p class="login-form__error">{move || error.get()}</p>
            </Show>
            <a href="/auth/google" class="login-button">
                "Sign in with Google"
            </a>
        </div>
    }
}
