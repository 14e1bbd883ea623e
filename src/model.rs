use chrono::NaiveDate;
use serde::Deserialize;

use crate::error::AppError;

/// Date format submitted by `<input type="date">`.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, sqlx::FromRow)]
pub struct Record {
    pub id: i64,
}

#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct Vehicle {
    pub id: i64,
    pub make: String,
    pub model: String,
    pub year: i32,
    pub nickname: Option<String>,
    pub notes: Option<String>,
}

impl Vehicle {
    pub fn display_name(&self) -> String {
        match &self.nickname {
            Some(nickname) => format!("{nickname} ({} {} {})", self.year, self.make, self.model),
            None => format!("{} {} {}", self.year, self.make, self.model),
        }
    }
}

#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct FuelLog {
    pub id: i64,
    pub vehicle_id: i64,
    pub date: NaiveDate,
    pub odometer: i64,
    pub liters: f64,
    pub price_per_liter: f64,
    pub total_cost: f64,
    pub full_tank: bool,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct Maintenance {
    pub id: i64,
    pub vehicle_id: i64,
    pub date: NaiveDate,
    pub odometer: i64,
    pub service_type: String,
    pub cost: f64,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewVehicle {
    pub make: String,
    pub model: String,
    pub year: i32,
    pub nickname: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewFuelLog {
    pub vehicle_id: i64,
    pub date: NaiveDate,
    pub odometer: i64,
    pub liters: f64,
    pub price_per_liter: f64,
    pub total_cost: f64,
    pub full_tank: bool,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewMaintenance {
    pub vehicle_id: i64,
    pub date: NaiveDate,
    pub odometer: i64,
    pub service_type: String,
    pub cost: f64,
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct PostVehicle {
    pub make: String,
    pub model: String,
    pub year: String,
    pub nickname: Option<String>,
    pub notes: Option<String>,
}

impl PostVehicle {
    pub fn parse(self) -> Result<NewVehicle, AppError> {
        Ok(NewVehicle {
            make: required_text("make", self.make)?,
            model: required_text("model", self.model)?,
            year: parse_int("year", &self.year)?,
            nickname: optional_text(self.nickname),
            notes: optional_text(self.notes),
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct PostMaintenance {
    pub vehicle_id: String,
    pub date: String,
    pub odometer: String,
    pub service_type: String,
    pub cost: String,
    pub notes: Option<String>,
}

impl PostMaintenance {
    pub fn parse(self) -> Result<NewMaintenance, AppError> {
        Ok(NewMaintenance {
            vehicle_id: parse_int("vehicle_id", &self.vehicle_id)?,
            date: parse_date("date", &self.date)?,
            odometer: parse_int("odometer", &self.odometer)?,
            service_type: required_text("service_type", self.service_type)?,
            cost: parse_decimal("cost", &self.cost)?,
            notes: optional_text(self.notes),
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct PostFuelLog {
    pub date: String,
    pub odometer: String,
    pub liters: String,
    pub price_per_liter: String,
    pub total_cost: Option<String>,
    /// Checkbox: present in the body only when ticked.
    pub full_tank: Option<String>,
    pub notes: Option<String>,
}

impl PostFuelLog {
    pub fn parse(self, vehicle_id: i64) -> Result<NewFuelLog, AppError> {
        let liters = parse_decimal("liters", &self.liters)?;
        let price_per_liter = parse_decimal("price_per_liter", &self.price_per_liter)?;
        let total_cost = match self.total_cost.as_deref().map(str::trim) {
            Some(raw) if !raw.is_empty() => parse_decimal("total_cost", raw)?,
            _ => {
                let derived = (liters * price_per_liter * 100.0).round() / 100.0;
                if !derived.is_finite() {
                    return Err(AppError::invalid(
                        "total_cost",
                        "liters x price_per_liter is out of range",
                    ));
                }
                derived
            }
        };

        Ok(NewFuelLog {
            vehicle_id,
            date: parse_date("date", &self.date)?,
            odometer: parse_int("odometer", &self.odometer)?,
            liters,
            price_per_liter,
            total_cost,
            full_tank: self.full_tank.is_some(),
            notes: optional_text(self.notes),
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct ServiceQuery {
    pub vehicle_id: Option<i64>,
}

fn required_text(field: &'static str, value: String) -> Result<String, AppError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(AppError::invalid(field, "is required"));
    }
    Ok(trimmed.to_string())
}

fn optional_text(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_int<T: std::str::FromStr>(field: &'static str, value: &str) -> Result<T, AppError> {
    value
        .trim()
        .parse()
        .map_err(|_| AppError::invalid(field, format!("expected a whole number, got '{value}'")))
}

fn parse_decimal(field: &'static str, value: &str) -> Result<f64, AppError> {
    match value.trim().parse::<f64>() {
        Ok(number) if number.is_finite() => Ok(number),
        _ => Err(AppError::invalid(
            field,
            format!("expected a number, got '{value}'"),
        )),
    }
}

fn parse_date(field: &'static str, value: &str) -> Result<NaiveDate, AppError> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT)
        .map_err(|_| AppError::invalid(field, format!("expected YYYY-MM-DD, got '{value}'")))
}
