use actix_web::web;

use super::tasks::task_handlers;

pub fn tasks_configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api-tasks")
            .route("/list", web::post().to(task_handlers::list_tasks))
            .route("/add", web::post().to(task_handlers::add_task))
            .route("/update", web::post().to(task_handlers::update_task))
            .route("/update-status", web::post().to(task_handlers::update_task_status))
            .route("/cycle-status", web::post().to(task_handlers::cycle_task_status))
            .route("/delete", web::post().to(task_handlers::delete_task))
            .route("/staff", web::post().to(task_handlers::get_tasks_for_staff))
            .route("/stats", web::post().to(task_handlers::get_task_stats))
            .route("/board", web::post().to(task_handlers::get_board))
    );
}

use super::staff::staff_handlers;

pub fn staff_configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api-staff")
            .route("/list", web::post().to(staff_handlers::list_staff))
            .route("/add", web::post().to(staff_handlers::add_staff))
            .route("/rename", web::post().to(staff_handlers::rename_staff))
            .route("/delete", web::post().to(staff_handlers::delete_staff))
            .route("/provision", web::post().to(staff_handlers::provision_staff))
    );
}

use super::attendance::attendance_handlers;

pub fn attendance_configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api-attendance")
            .route("/list", web::post().to(attendance_handlers::get_attendance))
            .route("/toggle", web::post().to(attendance_handlers::toggle_attendance))
            .route("/set", web::post().to(attendance_handlers::set_attendance))
            .route("/clear", web::post().to(attendance_handlers::clear_attendance))
    );
}

use super::history::history_handlers;

pub fn history_configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api-history")
            .route("/working-hours", web::post().to(history_handlers::get_working_hours))
            .route("/monthly", web::post().to(history_handlers::get_monthly_history))
    );
}

use super::admin::admin_handlers;

pub fn admin_configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/admin")
            .route("/cleanup-staff", web::post().to(admin_handlers::cleanup_staff))
    );
}
