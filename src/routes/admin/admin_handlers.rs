use actix_web::{web, Responder};
use log::info;

use super::admin_models::CleanupStaffRequest;
use crate::routes::reply;
use crate::state::AppState;

// Deactivates staff members that duplicate an older member by name or email
pub async fn cleanup_staff(
    state: web::Data<AppState>,
    _: web::Json<CleanupStaffRequest>,
) -> impl Responder {
    info!("Received request to clean up duplicate staff");
    reply("clean up staff", state.roster().cleanup_duplicates().await)
}
