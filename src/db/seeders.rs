//! Demo account seeding.
//!
//! Upserts the demo login accounts together with the staff, doctor, nurse and
//! patient rows their emails resolve to, so every demo login lands on a
//! dashboard with a resolved identity.

use anyhow::{Context, Result};
use sqlx::SqlitePool;
use tracing::info;

use super::models::Role;
use crate::auth::hash_password;

/// Role-specific profile data for a demo account
#[derive(Debug, Clone, Copy)]
pub enum DemoProfile {
    Patient {
        dob: &'static str,
        insurance: Option<&'static str>,
        primary_doctor: Option<&'static str>,
    },
    Doctor {
        specialization: &'static str,
    },
    Nurse {
        shift_type: &'static str,
        ward: &'static str,
    },
}

#[derive(Debug, Clone, Copy)]
pub struct DemoAccount {
    pub email: &'static str,
    pub password: &'static str,
    pub fname: &'static str,
    pub lname: &'static str,
    pub phone: &'static str,
    pub profile: DemoProfile,
}

impl DemoAccount {
    pub fn role(&self) -> Role {
        match self.profile {
            DemoProfile::Patient { .. } => Role::Patient,
            DemoProfile::Doctor { .. } => Role::Doctor,
            DemoProfile::Nurse { .. } => Role::Nurse,
        }
    }
}

const fn patient(
    email: &'static str,
    fname: &'static str,
    lname: &'static str,
    phone: &'static str,
    dob: &'static str,
    insurance: Option<&'static str>,
    primary_doctor: Option<&'static str>,
) -> DemoAccount {
    DemoAccount {
        email,
        password: "123r",
        fname,
        lname,
        phone,
        profile: DemoProfile::Patient {
            dob,
            insurance,
            primary_doctor,
        },
    }
}

const fn doctor(
    email: &'static str,
    fname: &'static str,
    lname: &'static str,
    phone: &'static str,
    specialization: &'static str,
) -> DemoAccount {
    DemoAccount {
        email,
        password: "doc123",
        fname,
        lname,
        phone,
        profile: DemoProfile::Doctor { specialization },
    }
}

const fn nurse(
    email: &'static str,
    fname: &'static str,
    lname: &'static str,
    phone: &'static str,
    shift_type: &'static str,
    ward: &'static str,
) -> DemoAccount {
    DemoAccount {
        email,
        password: "nur123",
        fname,
        lname,
        phone,
        profile: DemoProfile::Nurse { shift_type, ward },
    }
}

const SMITH: &str = "john.smith@mediconnect.com";
const JOHNSON: &str = "sarah.johnson@mediconnect.com";
const WILLIAMS: &str = "michael.williams@mediconnect.com";

/// Doctors come first so patients can reference them as primary doctor
pub const DEMO_ACCOUNTS: &[DemoAccount] = &[
    doctor(SMITH, "John", "Smith", "555-0101", "Family Medicine"),
    doctor(JOHNSON, "Sarah", "Johnson", "555-0102", "Cardiology"),
    doctor(WILLIAMS, "Michael", "Williams", "555-0103", "Pediatrics"),
    doctor("robert.miller@mediconnect.com", "Robert", "Miller", "555-0104", "Orthopedics"),
    doctor("james.rodriguez@mediconnect.com", "James", "Rodriguez", "555-0105", "Dermatology"),
    nurse("emily.brown@mediconnect.com", "Emily", "Brown", "555-0201", "Day", "General"),
    nurse("david.jones@mediconnect.com", "David", "Jones", "555-0202", "Night", "Emergency"),
    nurse("jessica.garcia@mediconnect.com", "Jessica", "Garcia", "555-0203", "Day", "Pediatrics"),
    nurse("lisa.davis@mediconnect.com", "Lisa", "Davis", "555-0204", "Evening", "Cardiology"),
    nurse("maria.martinez@mediconnect.com", "Maria", "Martinez", "555-0205", "Night", "Laboratory"),
    patient("alice.anderson@email.com", "Alice", "Anderson", "555-1001", "1985-04-12", Some("BlueCross"), Some(SMITH)),
    patient("bob.baker@email.com", "Bob", "Baker", "555-1002", "1979-09-30", Some("Aetna"), Some(JOHNSON)),
    patient("carol.clark@email.com", "Carol", "Clark", "555-1003", "1992-01-05", None, Some(WILLIAMS)),
    patient("daniel.davis@email.com", "Daniel", "Davis", "555-1004", "1968-11-22", Some("Cigna"), Some(SMITH)),
    patient("emma.evans@email.com", "Emma", "Evans", "555-1005", "2001-06-17", Some("UnitedHealth"), None),
    patient("frank.foster@email.com", "Frank", "Foster", "555-1006", "1955-02-28", Some("Medicare"), Some(JOHNSON)),
    patient("grace.green@email.com", "Grace", "Green", "555-1007", "1998-08-08", None, None),
    patient("henry.harris@email.com", "Henry", "Harris", "555-1008", "1974-12-01", Some("Aetna"), Some(WILLIAMS)),
    patient("iris.irving@email.com", "Iris", "Irving", "555-1009", "1989-03-19", Some("BlueCross"), Some(SMITH)),
    patient("jack.jackson@email.com", "Jack", "Jackson", "555-1010", "2010-07-04", Some("Medicaid"), None),
];

/// Seed the demo accounts (runs on every startup when enabled).
///
/// Profile rows are refreshed each time; login rows are only created once.
pub async fn seed_demo_accounts(pool: &SqlitePool) -> Result<usize> {
    info!("Seeding demo accounts...");

    let mut created = 0;
    for account in DEMO_ACCOUNTS {
        let inserted = seed_account(pool, account)
            .await
            .with_context(|| format!("Failed to insert {}", account.email))?;
        if inserted {
            created += 1;
        }
        tracing::debug!(email = %account.email, role = %account.role(), inserted, "Seeded demo account");
    }

    info!(count = DEMO_ACCOUNTS.len(), created, "Finished seeding demo accounts");
    Ok(DEMO_ACCOUNTS.len())
}

/// Returns true when the login row was created by this call
async fn seed_account(pool: &SqlitePool, account: &DemoAccount) -> Result<bool> {
    let existing_role: Option<String> = sqlx::query_scalar("SELECT role FROM users WHERE email = ?")
        .bind(account.email)
        .fetch_optional(pool)
        .await?;

    // Existing logins keep their password hash
    let inserted = match existing_role {
        None => {
            let password_hash = hash_password(account.password)
                .map_err(|e| anyhow::anyhow!("Failed to hash password: {}", e))?;
            let result = sqlx::query(
                "INSERT INTO users (email, password, role) VALUES (?, ?, ?) ON CONFLICT(email) DO NOTHING",
            )
            .bind(account.email)
            .bind(&password_hash)
            .bind(account.role().as_str())
            .execute(pool)
            .await?;
            result.rows_affected() == 1
        }
        Some(role) if role != account.role().as_str() => {
            sqlx::query("UPDATE users SET role = ? WHERE email = ?")
                .bind(account.role().as_str())
                .bind(account.email)
                .execute(pool)
                .await?;
            false
        }
        Some(_) => false,
    };

    match account.profile {
        DemoProfile::Patient {
            dob,
            insurance,
            primary_doctor,
        } => {
            let primary_doc_id = match primary_doctor {
                Some(email) => staff_id_for(pool, email).await?,
                None => None,
            };
            sqlx::query(
                r#"
                INSERT INTO patient (fname, lname, email, phone_no, dob, insurance, primary_doc_id)
                VALUES (?, ?, ?, ?, ?, ?, ?)
                ON CONFLICT(email) DO UPDATE SET
                    fname = excluded.fname,
                    lname = excluded.lname,
                    phone_no = excluded.phone_no,
                    dob = excluded.dob,
                    insurance = excluded.insurance,
                    primary_doc_id = excluded.primary_doc_id
                "#,
            )
            .bind(account.fname)
            .bind(account.lname)
            .bind(account.email)
            .bind(account.phone)
            .bind(dob)
            .bind(insurance)
            .bind(primary_doc_id)
            .execute(pool)
            .await?;
        }
        DemoProfile::Doctor { specialization } => {
            let staff_id = upsert_staff(pool, account).await?;
            sqlx::query(
                r#"
                INSERT INTO doctor (doctor_id, specialization) VALUES (?, ?)
                ON CONFLICT(doctor_id) DO UPDATE SET specialization = excluded.specialization
                "#,
            )
            .bind(staff_id)
            .bind(specialization)
            .execute(pool)
            .await?;
        }
        DemoProfile::Nurse { shift_type, ward } => {
            let staff_id = upsert_staff(pool, account).await?;
            sqlx::query(
                r#"
                INSERT INTO nurse (nurse_id, shift_type, ward) VALUES (?, ?, ?)
                ON CONFLICT(nurse_id) DO UPDATE SET
                    shift_type = excluded.shift_type,
                    ward = excluded.ward
                "#,
            )
            .bind(staff_id)
            .bind(shift_type)
            .bind(ward)
            .execute(pool)
            .await?;
        }
    }

    Ok(inserted)
}

async fn upsert_staff(pool: &SqlitePool, account: &DemoAccount) -> Result<i64> {
    sqlx::query(
        r#"
        INSERT INTO staff (fname, lname, email, phone_no) VALUES (?, ?, ?, ?)
        ON CONFLICT(email) DO UPDATE SET
            fname = excluded.fname,
            lname = excluded.lname,
            phone_no = excluded.phone_no
        "#,
    )
    .bind(account.fname)
    .bind(account.lname)
    .bind(account.email)
    .bind(account.phone)
    .execute(pool)
    .await?;

    staff_id_for(pool, account.email)
        .await?
        .ok_or_else(|| anyhow::anyhow!("Staff row for {} vanished after upsert", account.email))
}

async fn staff_id_for(pool: &SqlitePool, email: &str) -> Result<Option<i64>> {
    let id: Option<i64> = sqlx::query_scalar("SELECT staff_id FROM staff WHERE email = ?")
        .bind(email)
        .fetch_optional(pool)
        .await?;
    Ok(id)
}
