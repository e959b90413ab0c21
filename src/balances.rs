//! This file defines the route that serves the aggregated balance and the
//! monthly summary.

use axum::{
    Extension, Json,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::{
    AppState,
    balance::{Balances, MonthlySummary, aggregate},
    models::{Currency, User},
    stores::TransactionStore,
    validation::ValidationErrors,
};

/// The query parameters for `GET /api/balance`.
#[derive(Debug, Clone, Deserialize)]
pub struct BalanceQuery {
    /// The currency to project the total into. Defaults to USD.
    pub display: Option<String>,
}

/// The response body for `GET /api/balance`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BalanceResponse {
    /// The currency the total is projected into.
    pub display: Currency,
    /// Signed running totals per currency.
    pub balances: Balances,
    /// The balance projected into the display currency.
    pub total: f64,
    /// Derived figures for the current calendar month.
    pub monthly: MonthlySummary,
}

/// Handler for `GET /api/balance`: folds the session user's transactions
/// into per-currency totals and projects them into the display currency.
///
/// Balances are recomputed from the stored transactions on every request,
/// nothing is persisted.
pub async fn get_balance(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Query(query): Query<BalanceQuery>,
) -> Response {
    let display = match query.display.as_deref() {
        None => Currency::Usd,
        Some(raw) => match raw.parse() {
            Ok(currency) => currency,
            Err(_) => {
                let mut errors = ValidationErrors::new();
                errors.push("display", "the currency must be one of 'USD', 'AOA' or 'EUR'");
                return errors.into_response();
            }
        },
    };

    let transactions = match state.transaction_store.get_by_user(user.id()) {
        Ok(transactions) => transactions,
        Err(error) => return error.into_response(),
    };

    let balances = aggregate(&transactions);
    let total = balances.total_in(display, &state.rate_table);
    let monthly = MonthlySummary::compute(
        &transactions,
        display,
        &state.rate_table,
        &state.essential_keywords,
        OffsetDateTime::now_utc(),
    );

    (
        StatusCode::OK,
        Json(BalanceResponse {
            display,
            balances,
            total,
            monthly,
        }),
    )
        .into_response()
}

#[cfg(test)]
mod balance_route_tests {
    use axum::http::StatusCode;
    use axum_extra::extract::cookie::Cookie;
    use axum_test::TestServer;
    use serde_json::json;

    use crate::{auth::SESSION_COOKIE, endpoints, test_utils::test_server};

    async fn register(server: &TestServer) -> Cookie<'static> {
        let response = server
            .post(endpoints::SESSION)
            .json(&json!({
                "mode": "register",
                "name": "Ana",
                "email": "a@x.com",
                "password": "secret1",
            }))
            .await;
        response.assert_status(StatusCode::CREATED);

        response.cookie(SESSION_COOKIE)
    }

    async fn add_transaction(
        server: &TestServer,
        cookie: &Cookie<'static>,
        kind: &str,
        amount: f64,
        description: &str,
        currency: &str,
    ) {
        server
            .post(endpoints::TRANSACTIONS)
            .add_cookie(cookie.clone())
            .json(&json!({
                "type": kind,
                "amount": amount,
                "description": description,
                "moeda": currency,
            }))
            .await
            .assert_status(StatusCode::CREATED);
    }

    #[tokio::test]
    async fn balance_projects_into_the_display_currency() {
        let (server, _) = test_server();
        let cookie = register(&server).await;
        add_transaction(&server, &cookie, "ENTRADA", 100.0, "Salário", "USD").await;
        add_transaction(&server, &cookie, "SAIDA", 40.0, "Comida", "USD").await;
        add_transaction(&server, &cookie, "ENTRADA", 50.0, "Venda", "EUR").await;

        let response = server
            .get(endpoints::BALANCE)
            .add_query_param("display", "USD")
            .add_cookie(cookie)
            .await;

        response.assert_status_ok();
        let body = response.json::<serde_json::Value>();
        assert_eq!(body["display"], "USD");
        assert_eq!(body["balances"]["USD"], 60.0);
        assert_eq!(body["balances"]["EUR"], 50.0);
        assert_eq!(body["balances"]["AOA"], 0.0);
        assert_eq!(body["total"], 60.0 + 50.0 * 1.09);
    }

    #[tokio::test]
    async fn balance_includes_the_monthly_summary() {
        let (server, _) = test_server();
        let cookie = register(&server).await;
        add_transaction(&server, &cookie, "ENTRADA", 200.0, "Salário", "USD").await;
        add_transaction(&server, &cookie, "SAIDA", 50.0, "Comida", "USD").await;

        let response = server.get(endpoints::BALANCE).add_cookie(cookie).await;

        response.assert_status_ok();
        let body = response.json::<serde_json::Value>();
        assert_eq!(body["monthly"]["income"], 200.0);
        assert_eq!(body["monthly"]["outcome"], 50.0);
        assert_eq!(body["monthly"]["essentialExpenses"], 50.0);
        assert_eq!(body["monthly"]["savingsRate"], 75.0);
    }

    #[tokio::test]
    async fn unknown_display_currency_is_rejected() {
        let (server, _) = test_server();
        let cookie = register(&server).await;

        let response = server
            .get(endpoints::BALANCE)
            .add_query_param("display", "GBP")
            .add_cookie(cookie)
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn balance_requires_a_session() {
        let (server, _) = test_server();

        server
            .get(endpoints::BALANCE)
            .await
            .assert_status(StatusCode::UNAUTHORIZED);
    }
}
