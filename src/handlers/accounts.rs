//! Account HTTP handlers.
//!
//! Each handler maps one use case of the account service onto a route:
//! - POST /api/v1/accounts - Create account
//! - GET /api/v1/account - View balance and details
//! - POST /api/v1/account/deposit - Deposit money
//! - POST /api/v1/account/withdraw - Withdraw money
//! - PATCH /api/v1/account - Update details
//! - DELETE /api/v1/account - Delete account
//!
//! Account-scoped routes receive `Credentials` from the credentials middleware.

use crate::{
    error::AppError,
    handlers::extract::AppJson,
    middleware::credentials::Credentials,
    models::account::{
        AccountNumberResponse, AccountResponse, AmountRequest, BalanceResponse,
        CreateAccountRequest, UpdateDetailsRequest,
    },
    services::account_service::AccountService,
};
use axum::{Extension, Json, extract::State, http::StatusCode};

/// Create a new account.
///
/// # Request Body
///
/// ```json
/// {
///   "name": "Ann",
///   "email": "a@x.com",
///   "phone": "9876543210",
///   "pin": "1234"
/// }
/// ```
///
/// # Response
///
/// - **Success (201 Created)**: `{"account_number": "A1BC2D3E4"}`
/// - **Error (400)**: Missing field, bad phone or bad PIN
pub async fn create_account(
    State(service): State<AccountService>,
    AppJson(request): AppJson<CreateAccountRequest>,
) -> Result<(StatusCode, Json<AccountNumberResponse>), AppError> {
    let account_number = service.create_account(&request).await?;

    Ok((
        StatusCode::CREATED,
        Json(AccountNumberResponse { account_number }),
    ))
}

/// Show the account's details and balance. The PIN is never returned.
pub async fn get_account(
    State(service): State<AccountService>,
    Extension(credentials): Extension<Credentials>,
) -> Result<Json<AccountResponse>, AppError> {
    let account = service
        .get_details(&credentials.account_number, &credentials.pin)
        .await?;

    Ok(Json(account.into()))
}

/// Deposit money.
///
/// # Request Body
///
/// ```json
/// { "amount": 5000 }
/// ```
///
/// # Response
///
/// - **Success (200 OK)**: `{"balance": 5000}`
/// - **Error (401)**: Invalid account number or PIN
/// - **Error (422)**: Amount above the single-transaction cap
pub async fn deposit(
    State(service): State<AccountService>,
    Extension(credentials): Extension<Credentials>,
    AppJson(request): AppJson<AmountRequest>,
) -> Result<Json<BalanceResponse>, AppError> {
    let balance = service
        .deposit(&credentials.account_number, &credentials.pin, request.amount)
        .await?;

    Ok(Json(BalanceResponse { balance }))
}

/// Withdraw money.
///
/// # Response
///
/// - **Success (200 OK)**: `{"balance": 2000}`
/// - **Error (401)**: Invalid account number or PIN
/// - **Error (422)**: Amount above the current balance
pub async fn withdraw(
    State(service): State<AccountService>,
    Extension(credentials): Extension<Credentials>,
    AppJson(request): AppJson<AmountRequest>,
) -> Result<Json<BalanceResponse>, AppError> {
    let balance = service
        .withdraw(&credentials.account_number, &credentials.pin, request.amount)
        .await?;

    Ok(Json(BalanceResponse { balance }))
}

/// Update any of name, email, phone and PIN. Blank fields are left unchanged.
pub async fn update_account(
    State(service): State<AccountService>,
    Extension(credentials): Extension<Credentials>,
    AppJson(request): AppJson<UpdateDetailsRequest>,
) -> Result<StatusCode, AppError> {
    service
        .update_details(&credentials.account_number, &credentials.pin, &request)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

/// Delete the account permanently.
pub async fn delete_account(
    State(service): State<AccountService>,
    Extension(credentials): Extension<Credentials>,
) -> Result<StatusCode, AppError> {
    service
        .delete_account(&credentials.account_number, &credentials.pin)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}
