//! Application router configuration with protected and unprotected route definitions.

use axum::{
    Router,
    middleware,
    routing::{get, post},
};
use tower_http::services::ServeDir;

use crate::{
    AppState,
    auth::{
        auth_guard, auth_guard_hx, get_log_in_page, get_register_page, post_log_in, post_log_out,
        post_register,
    },
    campaign::{
        create_campaign_endpoint, get_campaign_page, get_campaigns_page, get_new_campaign_page,
    },
    donation::{create_donation_endpoint, get_donate_page},
    endpoints,
    home::get_home_page,
    ledger::{create_ledger_entry_endpoint, get_new_entry_page},
    not_found::get_404_not_found,
    report::{get_transparency_export, get_transparency_page},
    volunteer::{create_volunteer_endpoint, get_volunteer_page},
};

/// Return a router with all the app's routes.
pub fn build_router(state: AppState) -> Router {
    let unprotected_routes = Router::new()
        .route(endpoints::ROOT, get(get_home_page))
        .route(endpoints::CAMPAIGNS_VIEW, get(get_campaigns_page))
        .route(endpoints::CAMPAIGN_VIEW, get(get_campaign_page))
        .route(endpoints::DONATE_VIEW, get(get_donate_page))
        .route(endpoints::VOLUNTEER_VIEW, get(get_volunteer_page))
        .route(endpoints::TRANSPARENCY_VIEW, get(get_transparency_page))
        .route(endpoints::TRANSPARENCY_EXPORT, get(get_transparency_export))
        .route(endpoints::LOG_IN_VIEW, get(get_log_in_page))
        .route(endpoints::LOG_IN_API, post(post_log_in))
        .route(endpoints::LOG_OUT, post(post_log_out))
        .route(endpoints::REGISTER_VIEW, get(get_register_page))
        .route(endpoints::USERS_API, post(post_register))
        .route(endpoints::DONATIONS_API, post(create_donation_endpoint))
        .route(endpoints::VOLUNTEERS_API, post(create_volunteer_endpoint));

    let protected_routes = Router::new()
        .route(endpoints::NEW_LEDGER_ENTRY_VIEW, get(get_new_entry_page))
        .route(endpoints::NEW_CAMPAIGN_VIEW, get(get_new_campaign_page))
        .layer(middleware::from_fn_with_state(state.clone(), auth_guard));

    // These POST routes need to use the HX-REDIRECT header for auth redirects
    // to work properly for HTMX requests.
    let protected_routes = protected_routes.merge(
        Router::new()
            .route(endpoints::LEDGER_API, post(create_ledger_entry_endpoint))
            .route(endpoints::CAMPAIGNS_API, post(create_campaign_endpoint))
            .layer(middleware::from_fn_with_state(state.clone(), auth_guard_hx)),
    );

    protected_routes
        .merge(unprotected_routes)
        .nest_service(endpoints::STATIC, ServeDir::new("static/"))
        .fallback(get_404_not_found)
        .with_state(state)
}

#[cfg(test)]
mod router_tests {
    use axum_test::TestServer;
    use rusqlite::Connection;

    use crate::{AppState, db::initialize, endpoints};

    use super::build_router;

    fn get_test_server() -> TestServer {
        let db_connection =
            Connection::open_in_memory().expect("Could not open database in memory.");
        initialize(&db_connection).expect("Could not initialize database.");

        let state = AppState::new(db_connection, "42", "Asia/Jakarta");
        let app = build_router(state);

        let mut server = TestServer::new(app);
        server.save_cookies();

        server
    }

    async fn register_user(server: &TestServer) {
        let response = server
            .post(endpoints::USERS_API)
            .form(&[
                ("username", "milo"),
                ("email", "milo@example.com"),
                ("password", "averylongandsecurepassword"),
                ("confirm_password", "averylongandsecurepassword"),
            ])
            .await;

        response.assert_status_see_other();
    }

    #[tokio::test]
    async fn public_pages_do_not_require_auth() {
        let server = get_test_server();

        for endpoint in [
            endpoints::ROOT,
            endpoints::CAMPAIGNS_VIEW,
            endpoints::VOLUNTEER_VIEW,
            endpoints::TRANSPARENCY_VIEW,
            endpoints::LOG_IN_VIEW,
            endpoints::REGISTER_VIEW,
        ] {
            let response = server.get(endpoint).await;

            response.assert_status_ok();
        }
    }

    #[tokio::test]
    async fn admin_page_redirects_to_log_in_without_cookie() {
        let server = get_test_server();

        let response = server.get(endpoints::NEW_LEDGER_ENTRY_VIEW).await;

        response.assert_status_see_other();
        assert_eq!(
            response.header("location").to_str().unwrap(),
            endpoints::LOG_IN_VIEW
        );
    }

    #[tokio::test]
    async fn admin_page_loads_after_registering() {
        let server = get_test_server();
        register_user(&server).await;

        let response = server.get(endpoints::NEW_LEDGER_ENTRY_VIEW).await;

        response.assert_status_ok();
    }

    #[tokio::test]
    async fn protected_post_without_cookie_gets_hx_redirect() {
        let server = get_test_server();

        let response = server
            .post(endpoints::LEDGER_API)
            .form(&[
                ("description", "Cat food"),
                ("amount", "50000"),
                ("category", "expense"),
                ("date", "2024-06-01"),
            ])
            .await;

        response.assert_status_ok();
        assert_eq!(
            response.header("hx-redirect").to_str().unwrap(),
            endpoints::LOG_IN_VIEW
        );
    }

    #[tokio::test]
    async fn unknown_route_returns_404() {
        let server = get_test_server();

        let response = server.get("/does-not-exist").await;

        response.assert_status_not_found();
    }
}
