use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct AvailabilityDto {
    pub pilot_id: i32,
    pub date: NaiveDate,
    pub available: bool,
}

#[derive(Clone, Deserialize, ToSchema)]
pub struct SetAvailabilityDto {
    pub available: bool,
}

#[derive(Clone, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct AvailabilityRangeParams {
    pub from: NaiveDate,
    pub to: NaiveDate,
}

#[derive(Clone, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct AvailableOnParams {
    pub date: NaiveDate,
}
