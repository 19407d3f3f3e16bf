use actix_web::{delete, get, web, HttpResponse};
use sqlx::PgPool;
use uuid::Uuid;

use crate::auth::identity::Caller;
use crate::error::AppError;
use crate::handlers::checkin_handler::{delete_checkin, get_checkin};

#[get("/{record_id}")]
async fn get_record(
    pool: web::Data<PgPool>,
    caller: web::ReqData<Caller>,
    record_id: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    get_checkin(pool, caller, record_id).await
}

#[delete("/{record_id}")]
async fn delete_record(
    pool: web::Data<PgPool>,
    caller: web::ReqData<Caller>,
    record_id: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    delete_checkin(pool, caller, record_id).await
}
