use serde::{Deserialize, Serialize};

use crate::models::staff_member::StaffMember;

#[derive(Deserialize)]
pub struct ListStaffRequest {}

// Add staff request
#[derive(Deserialize)]
pub struct AddStaffRequest {
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
}

// Rename staff request
#[derive(Deserialize)]
pub struct RenameStaffRequest {
    pub id: String,
    pub name: String,
}

// Delete staff request
#[derive(Deserialize)]
pub struct DeleteStaffRequest {
    pub id: String,
}

// Provisioning request: the signed-in identity
#[derive(Deserialize)]
pub struct ProvisionStaffRequest {
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

#[derive(Serialize)]
pub struct ProvisionStaffResponse {
    pub staff: Option<StaffMember>,
}
