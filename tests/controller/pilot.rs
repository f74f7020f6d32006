use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::NaiveDate;
use entity::sea_orm_active_enums::PilotStatus;
use hangar::{
    model::availability::{AvailabilityRangeParams, AvailableOnParams, SetAvailabilityDto},
    server::controller::{
        availability::{get_availability, list_available_pilots, set_availability},
        pilot::{get_pilot, get_pilot_score},
    },
};
use hangar_test_utils::prelude::*;

use crate::util::{json_body, response, status, TestContextExt};

fn june(day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 6, day).unwrap()
}

#[tokio::test]
/// Expect a pilot to read their own profile but not a colleague's
async fn pilot_reads_only_own_profile() -> Result<(), TestError> {
    let test = test_setup_with_crm_tables!()?;
    let own = test
        .crm()
        .insert_pilot("Avery", "avery@example.com", PilotStatus::Active)
        .await?;
    let other = test
        .crm()
        .insert_pilot("Blake", "blake@example.com", PilotStatus::Active)
        .await?;
    let user = test.user().insert_pilot_user(own.id).await?;
    test.login(user.id).await;

    let own_result = get_pilot(State(test.state()), test.session.clone(), Path(own.id)).await;
    let other_result =
        get_pilot(State(test.state()), test.session.clone(), Path(other.id)).await;

    assert_eq!(status(own_result), StatusCode::OK);
    assert_eq!(status(other_result), StatusCode::FORBIDDEN);

    Ok(())
}

#[tokio::test]
/// Expect the floor score of 1.0 for a new pilot with nothing on file
async fn score_for_new_pilot() -> Result<(), TestError> {
    let test = test_setup_with_crm_tables!()?;
    let staff = test.user().insert_staff().await?;
    let pilot = test
        .crm()
        .insert_pilot("Avery", "avery@example.com", PilotStatus::Active)
        .await?;
    test.login(staff.id).await;

    let result =
        get_pilot_score(State(test.state()), test.session.clone(), Path(pilot.id)).await;

    let body = json_body(response(result)).await;
    assert_eq!(body["score"], 1.0);
    assert_eq!(body["completion"], 2.5);
    assert_eq!(body["compliance"], 0.0);

    Ok(())
}

#[tokio::test]
/// Expect 404 for the score of a pilot that does not exist
async fn score_for_missing_pilot() -> Result<(), TestError> {
    let test = test_setup_with_crm_tables!()?;
    let staff = test.user().insert_staff().await?;
    test.login(staff.id).await;

    let result = get_pilot_score(State(test.state()), test.session.clone(), Path(42)).await;

    assert_eq!(status(result), StatusCode::NOT_FOUND);

    Ok(())
}

#[tokio::test]
/// Expect a pilot's own availability to be set and listed in range
async fn pilot_sets_own_availability() -> Result<(), TestError> {
    let test = test_setup_with_crm_tables!()?;
    let pilot = test
        .crm()
        .insert_pilot("Avery", "avery@example.com", PilotStatus::Active)
        .await?;
    let user = test.user().insert_pilot_user(pilot.id).await?;
    test.login(user.id).await;

    for (day, available) in [(2, true), (3, false)] {
        let result = set_availability(
            State(test.state()),
            test.session.clone(),
            Path((pilot.id, june(day))),
            Json(SetAvailabilityDto { available }),
        )
        .await;
        assert_eq!(status(result), StatusCode::OK);
    }

    let result = get_availability(
        State(test.state()),
        test.session.clone(),
        Path(pilot.id),
        Query(AvailabilityRangeParams {
            from: june(1),
            to: june(30),
        }),
    )
    .await;

    let body = json_body(response(result)).await;
    assert_eq!(body.as_array().map(Vec::len), Some(2));
    assert_eq!(body[0]["date"], "2025-06-02");
    assert_eq!(body[1]["available"], false);

    Ok(())
}

#[tokio::test]
/// Expect 403 when a pilot edits another pilot's calendar
async fn pilot_cannot_set_other_availability() -> Result<(), TestError> {
    let test = test_setup_with_crm_tables!()?;
    let own = test
        .crm()
        .insert_pilot("Avery", "avery@example.com", PilotStatus::Active)
        .await?;
    let other = test
        .crm()
        .insert_pilot("Blake", "blake@example.com", PilotStatus::Active)
        .await?;
    let user = test.user().insert_pilot_user(own.id).await?;
    test.login(user.id).await;

    let result = set_availability(
        State(test.state()),
        test.session.clone(),
        Path((other.id, june(2))),
        Json(SetAvailabilityDto { available: true }),
    )
    .await;

    assert_eq!(status(result), StatusCode::FORBIDDEN);

    Ok(())
}

#[tokio::test]
/// Expect only active pilots explicitly available on the date
async fn lists_available_active_pilots() -> Result<(), TestError> {
    let test = test_setup_with_crm_tables!()?;
    let staff = test.user().insert_staff().await?;
    let available = test
        .crm()
        .insert_pilot("Avery", "avery@example.com", PilotStatus::Active)
        .await?;
    let inactive = test
        .crm()
        .insert_pilot("Blake", "blake@example.com", PilotStatus::Inactive)
        .await?;
    let unmarked = test
        .crm()
        .insert_pilot("Casey", "casey@example.com", PilotStatus::Active)
        .await?;
    test.crm().insert_availability(available.id, june(5), true).await?;
    test.crm().insert_availability(inactive.id, june(5), true).await?;
    test.login(staff.id).await;

    let result = list_available_pilots(
        State(test.state()),
        test.session.clone(),
        Query(AvailableOnParams { date: june(5) }),
    )
    .await;

    let body = json_body(response(result)).await;
    let ids: Vec<_> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["id"].as_i64().unwrap())
        .collect();
    assert_eq!(ids, vec![i64::from(available.id)]);
    assert!(!ids.contains(&i64::from(unmarked.id)));

    Ok(())
}
