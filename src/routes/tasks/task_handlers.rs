use actix_web::{web, HttpRequest, Responder, ResponseError};
use log::{error, info};

use super::task_models::{
    AddTaskRequest, BoardRequest, BoardResponse, DeleteTaskResponse, ListTasksRequest,
    StaffTasksRequest, TaskIdRequest, UpdateTaskRequest, UpdateTaskStatusRequest,
};
use crate::models::time_slot::time_slots;
use crate::routes::{current_user, reply};
use crate::services::aggregation::working_hours_by_staff;
use crate::services::day_board::DayBoard;
use crate::state::AppState;

// Loads the day board or answers with the store error
macro_rules! load_board {
    ($state:expr, $date:expr) => {
        match $state.board($date).await {
            Ok(board) => board,
            Err(e) => {
                error!("Failed to load tasks for {}: {}", $date, e);
                return e.error_response();
            }
        }
    };
}

// Handler to get the tasks of a day
pub async fn list_tasks(
    state: web::Data<AppState>,
    request: web::Json<ListTasksRequest>,
) -> impl Responder {
    let date = request.date;
    info!("Received request to list tasks for {}", date);
    let result = state.board(date).await.map(DayBoard::into_tasks);
    reply("list tasks", result)
}

// Handler to add a task
pub async fn add_task(
    state: web::Data<AppState>,
    req: HttpRequest,
    request: web::Json<AddTaskRequest>,
) -> impl Responder {
    let AddTaskRequest { date, task } = request.into_inner();
    info!(
        "Received request to add task '{}' for {} on {}",
        task.task_name, task.staff_name, date
    );

    let mut board = load_board!(state, date);
    let result = board.create(task, current_user(&req)).await;
    reply("add task", result)
}

// Handler to update a task
pub async fn update_task(
    state: web::Data<AppState>,
    request: web::Json<UpdateTaskRequest>,
) -> impl Responder {
    let UpdateTaskRequest { date, id, changes } = request.into_inner();
    info!("Received request to update task {}", id);

    let mut board = load_board!(state, date);
    let result = board.update(&id, changes).await;
    reply("update task", result)
}

pub async fn update_task_status(
    state: web::Data<AppState>,
    request: web::Json<UpdateTaskStatusRequest>,
) -> impl Responder {
    info!(
        "Received request to set status of task {} to {}",
        request.id, request.status
    );

    let mut board = load_board!(state, request.date);
    let result = board.update_status(&request.id, request.status).await;
    reply("update task status", result)
}

pub async fn cycle_task_status(
    state: web::Data<AppState>,
    request: web::Json<TaskIdRequest>,
) -> impl Responder {
    info!("Received request to cycle status of task {}", request.id);

    let mut board = load_board!(state, request.date);
    let result = board.cycle_status(&request.id).await;
    reply("cycle task status", result)
}

// Handler to delete a task
pub async fn delete_task(
    state: web::Data<AppState>,
    request: web::Json<TaskIdRequest>,
) -> impl Responder {
    info!("Received request to delete task {}", request.id);

    let mut board = load_board!(state, request.date);
    let result = board
        .delete(&request.id)
        .await
        .map(|_| DeleteTaskResponse {
            id: request.id.clone(),
        });
    reply("delete task", result)
}

pub async fn get_tasks_for_staff(
    state: web::Data<AppState>,
    request: web::Json<StaffTasksRequest>,
) -> impl Responder {
    let board = load_board!(state, request.date);
    reply("list staff tasks", Ok(board.tasks_for_staff(&request.staff_name)))
}

pub async fn get_task_stats(
    state: web::Data<AppState>,
    request: web::Json<ListTasksRequest>,
) -> impl Responder {
    let board = load_board!(state, request.date);
    reply("compute task stats", Ok(board.stats()))
}

// Handler for the hourly grid of one day
pub async fn get_board(
    state: web::Data<AppState>,
    request: web::Json<BoardRequest>,
) -> impl Responder {
    let BoardRequest { date, staff_names } = request.into_inner();
    let staff_names = match staff_names {
        Some(names) => names,
        None => state.attendance.selected_names(date).await,
    };

    let board = load_board!(state, date);
    reply(
        "build board",
        Ok(BoardResponse {
            date,
            slots: time_slots(),
            rows: board.grid(&staff_names),
            stats: board.stats(),
            working_hours_by_staff: working_hours_by_staff(board.tasks()),
        }),
    )
}
