//! Treatment models.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Treatment {
    pub treatment_id: i64,
    pub patient_id: i64,
    pub doctor_id: i64,
    pub treatment_type: String,
    pub start_date: String,
    /// `None` while the treatment is ongoing
    pub end_date: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTreatment {
    pub patient_id: i64,
    pub doctor_id: i64,
    pub treatment_type: String,
    pub start_date: String,
    pub end_date: Option<String>,
}
