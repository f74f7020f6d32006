use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use entity::sea_orm_active_enums::UserRole;
use hangar::{
    model::user::CreateUserDto,
    server::controller::user::{create_user, delete_user, list_users},
};
use hangar_test_utils::prelude::*;

use crate::util::{status, TestContextExt};

fn new_user(email: &str, role: UserRole, client_id: Option<i32>) -> Json<CreateUserDto> {
    Json(CreateUserDto {
        email: email.to_string(),
        name: "New User".to_string(),
        password: "long-enough-password".to_string(),
        role,
        pilot_id: None,
        client_id,
    })
}

#[tokio::test]
/// Expect 403 when staff try to list users
async fn staff_cannot_list_users() -> Result<(), TestError> {
    let test = test_setup_with_crm_tables!()?;
    let staff = test.user().insert_staff().await?;
    test.login(staff.id).await;

    let result = list_users(State(test.state()), test.session.clone()).await;

    assert_eq!(status(result), StatusCode::FORBIDDEN);

    Ok(())
}

#[tokio::test]
/// Expect 201 for a client account linked to an existing client, 409 for a duplicate email
async fn admin_creates_client_account() -> Result<(), TestError> {
    let test = test_setup_with_crm_tables!()?;
    let admin = test.user().insert_admin().await?;
    let client = test.crm().insert_client("Acme", None).await?;
    test.login(admin.id).await;

    let created = create_user(
        State(test.state()),
        test.session.clone(),
        new_user("ap@acme.test", UserRole::Client, Some(client.id)),
    )
    .await;
    let duplicate = create_user(
        State(test.state()),
        test.session.clone(),
        new_user("ap@acme.test", UserRole::Client, Some(client.id)),
    )
    .await;

    assert_eq!(status(created), StatusCode::CREATED);
    assert_eq!(status(duplicate), StatusCode::CONFLICT);

    Ok(())
}

#[tokio::test]
/// Expect 400 for a client account without a client link
async fn rejects_unlinked_client_account() -> Result<(), TestError> {
    let test = test_setup_with_crm_tables!()?;
    let admin = test.user().insert_admin().await?;
    test.login(admin.id).await;

    let result = create_user(
        State(test.state()),
        test.session.clone(),
        new_user("ap@acme.test", UserRole::Client, None),
    )
    .await;

    assert_eq!(status(result), StatusCode::BAD_REQUEST);

    Ok(())
}

#[tokio::test]
/// Expect 404 when deleting a user that does not exist
async fn delete_missing_user() -> Result<(), TestError> {
    let test = test_setup_with_crm_tables!()?;
    let admin = test.user().insert_admin().await?;
    test.login(admin.id).await;

    let result = delete_user(State(test.state()), test.session.clone(), Path(999)).await;

    assert_eq!(status(result), StatusCode::NOT_FOUND);

    Ok(())
}
