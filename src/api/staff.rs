//! # API de Personal
//!
//! Fichas de empleados, turnos y el resumen de nómina (horas × tarifa).

use actix_web::{web, HttpResponse};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::crud;
use super::{AppError, AppResult};
use crate::context::AppContext;
use crate::db::models::{money, DateRange, StaffMember, StaffShift, StaffShiftCreate, StaffShiftUpdate};
use crate::db::{Editable, Query};

#[derive(Deserialize)]
struct RangeParams {
    from: Option<String>,
    to: Option<String>,
}

#[derive(Debug, Serialize, PartialEq)]
pub struct PayrollLine {
    pub staff_id: String,
    pub name: String,
    pub shifts: usize,
    #[serde(with = "rust_decimal::serde::float")]
    pub hours: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub hourly_rate: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub pay: Decimal,
}

/// Horas y salario por empleado para los turnos dentro del rango.
/// Los turnos de empleados que ya no existen se ignoran.
pub fn payroll(staff: &[StaffMember], shifts: &[StaffShift], range: DateRange) -> AppResult<Vec<PayrollLine>> {
    let mut lines: BTreeMap<&str, PayrollLine> = BTreeMap::new();

    for shift in shifts {
        if !range.contains(shift.day()?) {
            continue;
        }
        let Some(member) = staff.iter().find(|m| m.id == shift.staff_id) else {
            tracing::warn!(shift_id = %shift.id, staff_id = %shift.staff_id, "Shift without staff member");
            continue;
        };

        let line = lines.entry(member.id.as_str()).or_insert_with(|| PayrollLine {
            staff_id: member.id.clone(),
            name: member.name.clone(),
            shifts: 0,
            hours: Decimal::ZERO,
            hourly_rate: member.hourly_rate,
            pay: Decimal::ZERO,
        });
        line.shifts += 1;
        line.hours = money::add("hours", line.hours, shift.hours()?)?;
        line.pay = money::mul("pay", line.hours, line.hourly_rate)?.round_dp(2);
    }

    Ok(lines.into_values().collect())
}

async fn payroll_summary(
    ctx: web::Data<AppContext>,
    params: web::Query<RangeParams>,
) -> AppResult<HttpResponse> {
    let range = DateRange::parse(params.from.as_deref(), params.to.as_deref())?;
    let staff = ctx.repo::<StaffMember>().list(Query::new()).await?;
    let shifts = ctx.repo::<StaffShift>().list(Query::new()).await?;

    Ok(HttpResponse::Ok().json(payroll(&staff, &shifts, range)?))
}

/// Alta de turno: el empleado debe existir
async fn create_shift(
    ctx: web::Data<AppContext>,
    data: web::Json<StaffShiftCreate>,
) -> AppResult<HttpResponse> {
    let shift = StaffShift::from_create(data.into_inner())?;
    let member = ctx
        .repo::<StaffMember>()
        .find(&shift.staff_id)
        .await?
        .ok_or_else(|| AppError::validation_field("staff_id", "unknown staff member"))?;

    let shift = ctx.repo::<StaffShift>().insert(shift).await?;
    tracing::info!(staff = %member.name, date = %shift.date, "Shift created");
    Ok(crud::created(format!("Shift added for {}", member.name), shift))
}

/// Edición de turno: el resultado (no sólo los campos enviados) debe
/// terminar después de empezar
async fn update_shift(
    ctx: web::Data<AppContext>,
    path: web::Path<String>,
    data: web::Json<StaffShiftUpdate>,
) -> AppResult<HttpResponse> {
    let patch = StaffShift::prepare_patch(data.into_inner())?;
    let repo = ctx.repo::<StaffShift>();
    let current = repo.get(&path).await?;
    current.check_patch(&patch)?;

    let shift = repo.update(&current.id, &patch).await?;
    Ok(crud::ok("Shift updated".to_string(), shift))
}

/// # Rutas
/// - `GET /staff/payroll?from=&to=`
/// - `GET|POST /staff/shifts` (`staff_id`, `date`), `GET|PUT|DELETE /staff/shifts/{id}`
/// - `GET|POST /staff` (`role`, `active`), `GET|PUT|DELETE /staff/{id}`
pub fn routes(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/staff/payroll").route(web::get().to(payroll_summary)));
    cfg.service(
        web::resource("/staff/shifts")
            .route(web::get().to(crud::list::<StaffShift>))
            .route(web::post().to(create_shift)),
    );
    cfg.service(
        web::resource("/staff/shifts/{id}")
            .route(web::get().to(crud::get::<StaffShift>))
            .route(web::put().to(update_shift))
            .route(web::delete().to(crud::delete::<StaffShift>)),
    );
    cfg.service(crud::collection::<StaffMember>("/staff"));
    cfg.service(crud::member::<StaffMember>("/staff"));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::models::StaffRole;

    fn member(id: &str, rate: i64) -> StaffMember {
        StaffMember {
            id: id.into(),
            name: format!("Member {id}"),
            role: StaffRole::Waiter,
            email: None,
            phone: None,
            hourly_rate: Decimal::from(rate),
            active: true,
            created_at: 0,
        }
    }

    fn shift(staff_id: &str, date: &str, start: &str, end: &str) -> StaffShift {
        StaffShift {
            id: format!("{staff_id}-{date}-{start}"),
            staff_id: staff_id.into(),
            date: date.into(),
            start: start.into(),
            end: end.into(),
            created_at: 0,
        }
    }

    #[test]
    fn payroll_sums_hours_inside_range() {
        let staff = vec![member("a", 12), member("b", 10)];
        let shifts = vec![
            shift("a", "2024-05-01", "09:00", "17:00"),
            shift("a", "2024-05-02", "18:00", "22:30"),
            shift("a", "2024-06-01", "09:00", "17:00"),
            shift("b", "2024-05-03", "12:00", "16:00"),
            shift("ghost", "2024-05-03", "12:00", "16:00"),
        ];
        let range = DateRange::parse(Some("2024-05-01"), Some("2024-05-31")).unwrap();

        let lines = payroll(&staff, &shifts, range).unwrap();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].staff_id, "a");
        assert_eq!(lines[0].shifts, 2);
        assert_eq!(lines[0].hours, Decimal::new(125, 1));
        assert_eq!(lines[0].pay, Decimal::from(150));
        assert_eq!(lines[1].pay, Decimal::from(40));

        let json = serde_json::to_value(&lines[0]).unwrap();
        assert_eq!(json["hours"], serde_json::json!(12.5));
        assert_eq!(json["pay"], serde_json::json!(150.0));
    }
}
