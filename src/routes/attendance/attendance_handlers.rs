use actix_web::{web, Responder};
use chrono::NaiveDate;
use log::info;

use super::attendance_models::{
    AttendanceRequest, AttendanceResponse, SetAttendanceRequest, ToggleAttendanceRequest,
};
use crate::error::AppError;
use crate::routes::reply;
use crate::state::AppState;

async fn snapshot(state: &AppState, date: NaiveDate) -> Result<AttendanceResponse, AppError> {
    Ok(AttendanceResponse {
        date,
        selection: state.attendance.selection(date).await,
        selected_names: state.attendance.selected_names(date).await,
    })
}

// Handler to get who is working on a day
pub async fn get_attendance(
    state: web::Data<AppState>,
    request: web::Json<AttendanceRequest>,
) -> impl Responder {
    reply("get attendance", snapshot(&state, request.date).await)
}

pub async fn toggle_attendance(
    state: web::Data<AppState>,
    request: web::Json<ToggleAttendanceRequest>,
) -> impl Responder {
    let working = state
        .attendance
        .toggle(request.date, &request.staff_name)
        .await;
    info!(
        "{} is {} on {}",
        request.staff_name,
        if working { "working" } else { "not working" },
        request.date
    );
    reply("toggle attendance", snapshot(&state, request.date).await)
}

pub async fn set_attendance(
    state: web::Data<AppState>,
    request: web::Json<SetAttendanceRequest>,
) -> impl Responder {
    let SetAttendanceRequest { date, selection } = request.into_inner();
    state.attendance.set(date, selection).await;
    reply("set attendance", snapshot(&state, date).await)
}

pub async fn clear_attendance(
    state: web::Data<AppState>,
    request: web::Json<AttendanceRequest>,
) -> impl Responder {
    info!("Clearing attendance for {}", request.date);
    state.attendance.clear(request.date).await;
    reply("clear attendance", snapshot(&state, request.date).await)
}
