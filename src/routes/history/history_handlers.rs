use actix_web::{web, Responder};
use log::info;

use super::history_models::{
    MonthlyHistoryRequest, StaffHours, WorkingHoursRequest, WorkingHoursResponse,
};
use crate::error::AppError;
use crate::routes::reply;
use crate::services::aggregation::{
    format_working_hours, monthly_history, working_hours, working_hours_by_staff, Month,
    MonthlyHistory,
};
use crate::state::AppState;

// Handler for the working hours of one day
pub async fn get_working_hours(
    state: web::Data<AppState>,
    request: web::Json<WorkingHoursRequest>,
) -> impl Responder {
    let date = request.date;
    info!("Received request for working hours on {}", date);

    let result = state.tasks.list_by_date(date).await.map(|tasks| {
        let total_hours = working_hours(&tasks);
        let by_staff = working_hours_by_staff(&tasks)
            .into_iter()
            .map(|(name, hours)| {
                let formatted = format_working_hours(hours as f64);
                (name, StaffHours { hours, formatted })
            })
            .collect();
        WorkingHoursResponse {
            date,
            total_hours,
            formatted: format_working_hours(total_hours as f64),
            by_staff,
        }
    });
    reply("compute working hours", result)
}

async fn load_history(
    state: &AppState,
    request: MonthlyHistoryRequest,
) -> Result<MonthlyHistory, AppError> {
    let month = Month::parse(&request.month)?;
    let tasks = state
        .tasks
        .list_between(month.first_day(), month.last_day())
        .await?;
    Ok(monthly_history(month, &tasks, &request.filter))
}

// Handler for the monthly work history of one person
pub async fn get_monthly_history(
    state: web::Data<AppState>,
    request: web::Json<MonthlyHistoryRequest>,
) -> impl Responder {
    info!("Received request for monthly history of {}", request.month);
    reply(
        "load monthly history",
        load_history(&state, request.into_inner()).await,
    )
}
