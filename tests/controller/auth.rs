use axum::{extract::State, http::StatusCode, Json};
use hangar::{
    model::user::LoginDto,
    server::{
        controller::auth::{get_user, login, logout},
        model::session::user::SessionUserId,
    },
};
use hangar_test_utils::{constant::TEST_PASSWORD, prelude::*};

use crate::util::{json_body, response, status, TestContextExt};

fn credentials(email: &str, password: &str) -> Json<LoginDto> {
    Json(LoginDto {
        email: email.to_string(),
        password: password.to_string(),
    })
}

#[tokio::test]
/// Expect 200 and the user id stored in session for valid credentials
async fn login_stores_user_in_session() -> Result<(), TestError> {
    let test = test_setup_with_crm_tables!()?;
    let staff = test.user().insert_staff().await?;

    let result = login(
        State(test.state()),
        test.session.clone(),
        credentials("staff@example.com", TEST_PASSWORD),
    )
    .await;

    let body = json_body(response(result)).await;
    assert_eq!(body["id"], staff.id);
    assert_eq!(body["role"], "staff");
    assert_eq!(SessionUserId::get(&test.session).await.unwrap(), Some(staff.id));

    Ok(())
}

#[tokio::test]
/// Expect 401 for a wrong password and for an unknown email alike
async fn login_rejects_bad_credentials() -> Result<(), TestError> {
    let test = test_setup_with_crm_tables!()?;
    test.user().insert_staff().await?;

    let wrong_password = login(
        State(test.state()),
        test.session.clone(),
        credentials("staff@example.com", "not-the-password"),
    )
    .await;
    let unknown_email = login(
        State(test.state()),
        test.session.clone(),
        credentials("nobody@example.com", TEST_PASSWORD),
    )
    .await;

    assert_eq!(status(wrong_password), StatusCode::UNAUTHORIZED);
    assert_eq!(status(unknown_email), StatusCode::UNAUTHORIZED);
    assert_eq!(SessionUserId::get(&test.session).await.unwrap(), None);

    Ok(())
}

#[tokio::test]
/// Expect 204 and a cleared session after logout
async fn logout_clears_session() -> Result<(), TestError> {
    let test = test_setup_with_crm_tables!()?;
    test.login(1).await;

    let result = logout(test.session.clone()).await;

    assert_eq!(status(result), StatusCode::NO_CONTENT);
    assert_eq!(SessionUserId::get(&test.session).await.unwrap(), None);

    Ok(())
}

#[tokio::test]
/// Expect 204 even when nobody is logged in
async fn logout_without_session_user() -> Result<(), TestError> {
    let test = test_setup_with_crm_tables!()?;

    let result = logout(test.session.clone()).await;

    assert_eq!(status(result), StatusCode::NO_CONTENT);

    Ok(())
}

#[tokio::test]
/// Expect 401 from the current user endpoint without a login
async fn get_user_requires_login() -> Result<(), TestError> {
    let test = test_setup_with_crm_tables!()?;

    let result = get_user(State(test.state()), test.session.clone()).await;

    assert_eq!(status(result), StatusCode::UNAUTHORIZED);

    Ok(())
}

#[tokio::test]
/// Expect the linked pilot id on a pilot account
async fn get_user_returns_links() -> Result<(), TestError> {
    let test = test_setup_with_crm_tables!()?;
    let pilot = test
        .crm()
        .insert_pilot("Avery", "avery@example.com", entity::sea_orm_active_enums::PilotStatus::Active)
        .await?;
    let user = test.user().insert_pilot_user(pilot.id).await?;
    test.login(user.id).await;

    let result = get_user(State(test.state()), test.session.clone()).await;

    let body = json_body(response(result)).await;
    assert_eq!(body["pilot_id"], pilot.id);
    assert!(body["client_id"].is_null());

    Ok(())
}
