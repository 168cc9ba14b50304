//! Administrative CLI: create the first admin account and seed development
//! data.

use clap::{Parser, Subcommand};
use dialoguer::{Input, Password};
use fake::Fake;
use fake::faker::name::en::{FirstName, LastName};
use sqlx::PgPool;

use gradeport_core::AppError;
use gradeport_models::users::UserRole;

use crate::utils::password::hash_password;

#[derive(Parser)]
#[command(name = "gradeport")]
#[command(about = "Gradeport - university grade management API", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the HTTP server (the default when no subcommand is given)
    Serve,
    /// Create an administrator account
    CreateAdmin {
        /// First name of the admin
        #[arg(short = 'f', long)]
        first_name: Option<String>,

        /// Last name of the admin
        #[arg(short = 'l', long)]
        last_name: Option<String>,

        /// Email address
        #[arg(short = 'e', long)]
        email: Option<String>,

        /// Password (prompted securely if not provided)
        #[arg(short = 'p', long)]
        password: Option<String>,
    },
    /// Seed the database with departments, a session, courses, and students
    Seed {
        /// Number of students to create
        #[arg(short = 's', long, default_value = "50")]
        students: usize,
    },
}

/// Prompt for any argument not given on the command line, then insert the
/// admin row.
pub async fn create_admin(
    db: &PgPool,
    first_name: Option<String>,
    last_name: Option<String>,
    email: Option<String>,
    password: Option<String>,
) -> Result<(), anyhow::Error> {
    let first_name = match first_name {
        Some(v) => v,
        None => Input::new().with_prompt("First name").interact_text()?,
    };
    let last_name = match last_name {
        Some(v) => v,
        None => Input::new().with_prompt("Last name").interact_text()?,
    };
    let email: String = match email {
        Some(v) => v,
        None => Input::new().with_prompt("Email").interact_text()?,
    };
    let password = match password {
        Some(v) => v,
        None => Password::new()
            .with_prompt("Password")
            .with_confirmation("Confirm password", "Passwords do not match")
            .interact()?,
    };

    let hashed = hash_password(&password).map_err(|e: AppError| e.error)?;

    sqlx::query(
        r#"INSERT INTO users (first_name, last_name, email, password, role)
           VALUES ($1, $2, $3, $4, $5)"#,
    )
    .bind(&first_name)
    .bind(&last_name)
    .bind(&email)
    .bind(&hashed)
    .bind(UserRole::Admin.as_str())
    .execute(db)
    .await?;

    println!("✅ Admin account created for {}", email);
    Ok(())
}

/// Seed a development database: a handful of departments, the current
/// session with two semesters, a course per department level, and fake
/// students. Every account gets the password `password123`.
pub async fn seed(db: &PgPool, student_count: usize) -> Result<(), anyhow::Error> {
    let departments = [
        ("Computer Science", "CSC"),
        ("Electrical Engineering", "EEE"),
        ("Mathematics", "MTH"),
    ];

    let mut department_ids = Vec::new();
    for (name, code) in departments {
        let id = sqlx::query_scalar::<_, uuid::Uuid>(
            r#"INSERT INTO departments (name, code) VALUES ($1, $2)
               ON CONFLICT (code) DO UPDATE SET name = EXCLUDED.name
               RETURNING id"#,
        )
        .bind(name)
        .bind(code)
        .fetch_one(db)
        .await?;
        department_ids.push((id, code));
    }

    let session_id = sqlx::query_scalar::<_, uuid::Uuid>(
        r#"INSERT INTO academic_sessions (name, start_date, end_date, is_active)
           VALUES ('2024/2025', '2024-09-01', '2025-07-31', TRUE)
           ON CONFLICT (name) DO UPDATE SET is_active = TRUE
           RETURNING id"#,
    )
    .fetch_one(db)
    .await?;

    for (name, code, start, end) in [
        ("First Semester", "FIRST", "2024-09-01", "2025-01-31"),
        ("Second Semester", "SECOND", "2025-02-01", "2025-07-31"),
    ] {
        sqlx::query(
            r#"INSERT INTO semesters (session_id, name, code, start_date, end_date)
               VALUES ($1, $2, $3, $4::date, $5::date)
               ON CONFLICT (session_id, code) DO NOTHING"#,
        )
        .bind(session_id)
        .bind(name)
        .bind(code)
        .bind(start)
        .bind(end)
        .execute(db)
        .await?;
    }

    for (department_id, code) in &department_ids {
        sqlx::query(
            r#"INSERT INTO courses (code, title, credit_units, level, department_id)
               VALUES ($1, $2, 3, '100L', $3)
               ON CONFLICT (code) DO NOTHING"#,
        )
        .bind(format!("{}101", code))
        .bind(format!("Introduction to {}", code))
        .bind(department_id)
        .execute(db)
        .await?;
    }

    for index in 0..student_count {
        let first_name: String = FirstName().fake();
        let last_name: String = LastName().fake();
        let (department_id, code) = &department_ids[index % department_ids.len()];
        let matric = format!("{}/2024/{:03}", code, index + 1);
        let email = format!(
            "{}.{}{}@students.example.edu.ng",
            first_name.to_lowercase(),
            last_name.to_lowercase(),
            index
        );

        sqlx::query(
            r#"INSERT INTO students
               (matric_number, first_name, last_name, email, level, status, gender,
                department_id, session_id)
               VALUES ($1, $2, $3, $4, '100L', 'active', $5, $6, $7)
               ON CONFLICT (matric_number) DO NOTHING"#,
        )
        .bind(&matric)
        .bind(&first_name)
        .bind(&last_name)
        .bind(&email)
        .bind(if index % 2 == 0 { "female" } else { "male" })
        .bind(department_id)
        .bind(session_id)
        .execute(db)
        .await?;
    }

    println!(
        "✅ Seeded {} departments, 1 session, 2 semesters, {} courses, {} students",
        departments.len(),
        department_ids.len(),
        student_count
    );
    Ok(())
}
