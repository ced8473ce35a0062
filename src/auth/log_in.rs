//! The log-in page and the handler for log-in requests.

use std::sync::{Arc, Mutex};

use axum::{
    Form,
    extract::{FromRef, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_extra::extract::{PrivateCookieJar, cookie::Key};
use axum_htmx::HxRedirect;
use maud::{Markup, html};
use rusqlite::Connection;
use serde::Deserialize;
use time::Duration;

use crate::{
    AppState, Error,
    auth::{
        get_user_by_email, invalidate_auth_cookie, redirect::normalize_redirect_url,
        set_auth_cookie,
    },
    endpoints,
    html::{
        BUTTON_PRIMARY_STYLE, base, email_input, link, loading_spinner, log_in_register,
        password_input,
    },
};

/// How long the auth cookie should last if the user selects "remember me" at log-in.
const REMEMBER_ME_COOKIE_DURATION: Duration = Duration::days(7);

pub(super) const INVALID_CREDENTIALS_ERROR_MSG: &str = "Incorrect email or password.";
const INTERNAL_ERROR_MSG: &str = "An internal error occurred. Please try again later.";

fn log_in_form(email: &str, error_message: Option<&str>, redirect_url: Option<&str>) -> Markup {
    html! {
        form
            hx-post=(endpoints::LOG_IN_API)
            hx-swap="outerHTML"
            hx-indicator="#indicator"
            hx-disabled-elt="#email, #password, #submit-button"
            class="space-y-4 md:space-y-6"
        {
            @if let Some(redirect_url) = redirect_url {
                input type="hidden" name="redirect_url" value=(redirect_url);
            }

            (email_input(email, None))
            (password_input("", 0, error_message))

            div class="flex items-center gap-x-3"
            {
                input
                    type="checkbox"
                    name="remember_me"
                    id="remember_me"
                    class="rounded-xs";

                label
                    for="remember_me"
                    class="block text-sm font-medium text-gray-900 dark:text-white"
                {
                    "Keep me logged in for one week"
                }
            }

            button type="submit" id="submit-button" class=(BUTTON_PRIMARY_STYLE)
            {
                span class="inline htmx-indicator" id="indicator" { (loading_spinner()) }
                "Log in"
            }

            p class="text-sm font-light text-gray-500 dark:text-gray-400"
            {
                "Don't have an account? "
                (link(endpoints::REGISTER_VIEW, "Register here"))
            }
        }
    }
}

/// Keep `raw_url` only if it points back into the app.
fn parse_redirect_url(raw_url: Option<&str>, source: &str) -> Option<String> {
    let raw_url = raw_url?;
    let redirect_url = normalize_redirect_url(raw_url);

    if redirect_url.is_none() {
        tracing::warn!("Invalid redirect URL from {source}: {raw_url}");
    }

    redirect_url
}

/// The query parameters of the log-in page.
#[derive(Debug, Default, Deserialize)]
pub struct RedirectQuery {
    /// Where to send the user after they log in.
    pub redirect_url: Option<String>,
}

/// Display the log-in page.
pub async fn get_log_in_page(Query(query): Query<RedirectQuery>) -> Response {
    let redirect_url = parse_redirect_url(query.redirect_url.as_deref(), "log-in query");
    let form = log_in_form("", None, redirect_url.as_deref());

    base("Log In", &log_in_register("Log in to your account", &form)).into_response()
}

/// The state needed to perform a log-in.
#[derive(Debug, Clone)]
pub struct LoginState {
    /// The key to be used for signing and encrypting private cookies.
    pub cookie_key: Key,
    /// The duration for which cookies used for authentication are valid.
    pub cookie_duration: Duration,
    /// The connection holding the user table.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for LoginState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            cookie_key: state.cookie_key.clone(),
            cookie_duration: state.cookie_duration,
            db_connection: state.db_connection.clone(),
        }
    }
}

impl FromRef<LoginState> for Key {
    fn from_ref(state: &LoginState) -> Self {
        state.cookie_key.clone()
    }
}

/// The raw data entered by the user in the log-in form.
#[derive(Clone, Deserialize)]
pub struct LogInData {
    /// Email entered during log-in.
    pub email: String,

    /// Password entered during log-in.
    pub password: String,

    /// Whether to extend the initial auth cookie duration.
    ///
    /// Checkboxes are only sent when they are ticked, so any value means "yes".
    pub remember_me: Option<String>,

    /// Optional URL to redirect to after logging in.
    pub redirect_url: Option<String>,
}

/// Check the user's email and password.
///
/// Unknown emails and wrong passwords get the same error so that the form
/// does not reveal which emails are registered.
fn check_credentials(data: &LogInData, connection: &Connection) -> Result<crate::User, Error> {
    let user = match get_user_by_email(data.email.trim(), connection) {
        Ok(user) => user,
        Err(Error::NotFound) => return Err(Error::InvalidCredentials),
        Err(error) => return Err(error),
    };

    if user.password_hash.verify(&data.password)? {
        Ok(user)
    } else {
        Err(Error::InvalidCredentials)
    }
}

/// Handler for log-in requests via the POST method.
///
/// On success the auth cookie is set and the client is redirected to the
/// requested page, or the home page. Otherwise the form is returned with an
/// error message explaining the problem.
pub async fn post_log_in(
    State(state): State<LoginState>,
    jar: PrivateCookieJar,
    Form(data): Form<LogInData>,
) -> Response {
    let redirect_url = parse_redirect_url(data.redirect_url.as_deref(), "log-in form");
    let redirect_url = redirect_url.as_deref();

    let user = {
        let Ok(connection) = state.db_connection.lock() else {
            tracing::error!("Could not acquire the database lock during log-in");
            return log_in_form(&data.email, Some(INTERNAL_ERROR_MSG), redirect_url)
                .into_response();
        };

        check_credentials(&data, &connection)
    };

    let user = match user {
        Ok(user) => user,
        Err(Error::InvalidCredentials) => {
            return log_in_form(&data.email, Some(INVALID_CREDENTIALS_ERROR_MSG), redirect_url)
                .into_response();
        }
        Err(error) => {
            tracing::error!("Unhandled error while verifying credentials: {error}");
            return log_in_form(&data.email, Some(INTERNAL_ERROR_MSG), redirect_url)
                .into_response();
        }
    };

    let cookie_duration = if data.remember_me.is_some() {
        REMEMBER_ME_COOKIE_DURATION
    } else {
        state.cookie_duration
    };

    let redirect_url = redirect_url.unwrap_or(endpoints::HOME_VIEW);

    match set_auth_cookie(jar.clone(), user.id, cookie_duration) {
        Ok(jar) => (
            StatusCode::SEE_OTHER,
            HxRedirect(redirect_url.to_owned()),
            jar,
        )
            .into_response(),
        Err(error) => {
            tracing::error!("Error setting auth cookie: {error}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                HxRedirect(endpoints::INTERNAL_ERROR_VIEW.to_owned()),
                invalidate_auth_cookie(jar),
            )
                .into_response()
        }
    }
}


#[cfg(test)]
mod log_in_tests {
    use std::sync::{Arc, Mutex};

    use axum::{Router, http::StatusCode, routing::post};
    use axum_test::TestServer;
    use time::OffsetDateTime;

    use crate::{
        app_state::create_cookie_key,
        auth::{COOKIE_TOKEN, DEFAULT_COOKIE_DURATION},
        endpoints,
        test_utils::{get_test_connection, insert_test_user},
    };

    use super::{
        INVALID_CREDENTIALS_ERROR_MSG, LoginState, REMEMBER_ME_COOKIE_DURATION, post_log_in,
    };

    const EMAIL: &str = "test@example.com";
    const PASSWORD: &str = "averysafeandsecurepassword";

    fn get_test_server(with_user: bool) -> TestServer {
        let connection = get_test_connection();

        if with_user {
            insert_test_user(EMAIL, PASSWORD, &connection);
        }

        let state = LoginState {
            cookie_key: create_cookie_key("foobar"),
            cookie_duration: DEFAULT_COOKIE_DURATION,
            db_connection: Arc::new(Mutex::new(connection)),
        };
        let app = Router::new()
            .route(endpoints::LOG_IN_API, post(post_log_in))
            .with_state(state);

        TestServer::new(app)
    }

    #[track_caller]
    fn assert_close_to_now_plus(got: OffsetDateTime, duration: time::Duration) {
        let want = OffsetDateTime::now_utc() + duration;

        assert!(
            (got - want).abs() < time::Duration::seconds(2),
            "got expiry {got:?}, want {want:?}"
        );
    }

    #[tokio::test]
    async fn log_in_succeeds_with_valid_credentials() {
        let server = get_test_server(true);

        let response = server
            .post(endpoints::LOG_IN_API)
            .form(&[("email", EMAIL), ("password", PASSWORD)])
            .await;

        response.assert_status(StatusCode::SEE_OTHER);
        response.assert_header("hx-redirect", endpoints::HOME_VIEW);
        let cookie = response.cookie(COOKIE_TOKEN);
        assert_close_to_now_plus(
            cookie.expires_datetime().unwrap(),
            DEFAULT_COOKIE_DURATION,
        );
    }

    #[tokio::test]
    async fn log_in_redirects_to_requested_url() {
        let server = get_test_server(true);
        let redirect_url = "/kakeibo/list?type=income";

        let response = server
            .post(endpoints::LOG_IN_API)
            .form(&[
                ("email", EMAIL),
                ("password", PASSWORD),
                ("redirect_url", redirect_url),
            ])
            .await;

        response.assert_header("hx-redirect", redirect_url);
    }

    #[tokio::test]
    async fn log_in_falls_back_on_invalid_redirect_url() {
        let server = get_test_server(true);

        let response = server
            .post(endpoints::LOG_IN_API)
            .form(&[
                ("email", EMAIL),
                ("password", PASSWORD),
                ("redirect_url", "https://example.com"),
            ])
            .await;

        response.assert_header("hx-redirect", endpoints::HOME_VIEW);
    }

    #[tokio::test]
    async fn remember_me_extends_auth_cookie() {
        let server = get_test_server(true);

        let response = server
            .post(endpoints::LOG_IN_API)
            .form(&[
                ("email", EMAIL),
                ("password", PASSWORD),
                ("remember_me", "on"),
            ])
            .await;

        response.assert_status(StatusCode::SEE_OTHER);
        let cookie = response.cookie(COOKIE_TOKEN);
        assert_close_to_now_plus(
            cookie.expires_datetime().unwrap(),
            REMEMBER_ME_COOKIE_DURATION,
        );
    }

    #[tokio::test]
    async fn log_in_fails_with_incorrect_password() {
        let server = get_test_server(true);

        let response = server
            .post(endpoints::LOG_IN_API)
            .form(&[("email", EMAIL), ("password", "wrongpassword")])
            .await;

        response.assert_status_ok();
        response.assert_text_contains(INVALID_CREDENTIALS_ERROR_MSG);
    }

    #[tokio::test]
    async fn log_in_fails_with_unknown_email() {
        let server = get_test_server(false);

        let response = server
            .post(endpoints::LOG_IN_API)
            .form(&[("email", EMAIL), ("password", PASSWORD)])
            .await;

        response.assert_status_ok();
        response.assert_text_contains(INVALID_CREDENTIALS_ERROR_MSG);
    }

    #[tokio::test]
    async fn log_in_fails_with_missing_fields() {
        let server = get_test_server(true);

        server
            .post(endpoints::LOG_IN_API)
            .content_type("application/x-www-form-urlencoded")
            .await
            .assert_status(StatusCode::UNPROCESSABLE_ENTITY);
    }
}
