use contracts::system::auth::{LoginFieldErrors, LoginRequest};
use leptos::prelude::*;
use leptos::task::spawn_local;
use thaw::*;

use crate::routes::history::use_navigator;
use crate::system::auth::context::{do_login, use_auth};
use crate::system::auth::guard;

#[component]
pub fn LoginPage(redirect: String) -> impl IntoView {
    let username = RwSignal::new(String::new());
    let password = RwSignal::new(String::new());
    let field_errors = RwSignal::new(LoginFieldErrors::default());
    let server_error = RwSignal::new(Option::<String>::None);
    let is_loading = RwSignal::new(false);

    let (_, set_auth_state) = use_auth();
    let navigator = use_navigator();
    let redirect = StoredValue::new(redirect);

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        if is_loading.get_untracked() {
            return;
        }

        let request = LoginRequest {
            username: username.get_untracked(),
            password: password.get_untracked(),
        };
        let errors = request.field_errors();
        let valid = errors.is_empty();
        field_errors.set(errors);
        server_error.set(None);
        if !valid {
            return;
        }

        is_loading.set(true);
        spawn_local(async move {
            match do_login(request, set_auth_state).await {
                Ok(()) => {
                    navigator.navigate(guard::after_login(&redirect.get_value()));
                }
                Err(e) => server_error.set(Some(e)),
            }
            is_loading.set(false);
        });
    };

    view! {
        <main class="login-container">
            <div class="login-box">
                <h1>"관리자 로그인"</h1>

                <form on:submit=on_submit>
                    <div class="form-group">
                        <Label>"아이디"</Label>
                        <Input value=username placeholder="admin" disabled=is_loading />
                        {move || field_errors.get().username.map(|msg| view! {
                            <p class="field-error">{msg}</p>
                        })}
                    </div>

                    <div class="form-group">
                        <Label>"비밀번호"</Label>
                        <Input
                            value=password
                            input_type=InputType::Password
                            placeholder="••••••••"
                            disabled=is_loading
                        />
                        {move || field_errors.get().password.map(|msg| view! {
                            <p class="field-error">{msg}</p>
                        })}
                    </div>

                    {move || server_error.get().map(|e| view! {
                        <p class="error-message">{e}</p>
                    })}

                    <Button
                        button_type=ButtonType::Submit
                        appearance=ButtonAppearance::Primary
                        block=true
                        disabled=is_loading
                    >
                        {move || if is_loading.get() { "로그인 중..." } else { "로그인" }}
                    </Button>
                </form>
            </div>
        </main>
    }
}
