use actix_web::{web, HttpRequest, Responder};
use log::info;

use super::staff_models::{
    AddStaffRequest, DeleteStaffRequest, ListStaffRequest, ProvisionStaffRequest,
    ProvisionStaffResponse, RenameStaffRequest,
};
use crate::models::staff_member::{NewStaffMember, UserIdentity};
use crate::routes::{current_user, reply};
use crate::state::AppState;

// Handler to get the active staff list
pub async fn list_staff(
    state: web::Data<AppState>,
    _: web::Json<ListStaffRequest>,
) -> impl Responder {
    info!("Received request to list staff");
    reply("list staff", state.roster().list().await)
}

// Handler to add a staff member
pub async fn add_staff(
    state: web::Data<AppState>,
    request: web::Json<AddStaffRequest>,
) -> impl Responder {
    let AddStaffRequest { name, email } = request.into_inner();
    info!("Received request to add staff member: {}", name);

    let member = NewStaffMember {
        name,
        email,
        user_id: None,
    };
    reply("add staff member", state.roster().add(member).await)
}

pub async fn rename_staff(
    state: web::Data<AppState>,
    request: web::Json<RenameStaffRequest>,
) -> impl Responder {
    info!(
        "Received request to rename staff member {} to {}",
        request.id, request.name
    );
    reply(
        "rename staff member",
        state.roster().rename(&request.id, &request.name).await,
    )
}

// Deactivates the member and removes their tasks
pub async fn delete_staff(
    state: web::Data<AppState>,
    request: web::Json<DeleteStaffRequest>,
) -> impl Responder {
    info!("Received request to delete staff member {}", request.id);
    reply("delete staff member", state.roster().delete(&request.id).await)
}

// Registers the signed-in user as staff (called once after login)
pub async fn provision_staff(
    state: web::Data<AppState>,
    req: HttpRequest,
    request: web::Json<ProvisionStaffRequest>,
) -> impl Responder {
    let ProvisionStaffRequest {
        display_name,
        email,
    } = request.into_inner();
    let identity = UserIdentity {
        user_id: current_user(&req),
        display_name,
        email,
    };
    info!("Received request to provision staff for {:?}", identity.user_id);

    let result = state
        .roster()
        .provision(&identity)
        .await
        .map(|staff| ProvisionStaffResponse { staff });
    reply("provision staff member", result)
}
