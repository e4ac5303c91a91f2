//! Demo-data seeder for local development.
//!
//! Creates a handful of teachers and parents (password `password123`),
//! students, a term of progress data, and some messages, notifications
//! and resources to click around in.

use chrono::{Duration, NaiveDate, Utc};
use fake::Fake;
use fake::faker::lorem::en::Sentence;
use fake::faker::name::en::Name;
use rand::Rng;
use rand::seq::SliceRandom;
use sqlx::PgPool;
use uuid::Uuid;

use crate::modules::users::model::UserRole;
use crate::utils::password::hash_password;

const SUBJECTS: &[&str] = &[
    "Mathematics",
    "English",
    "Science",
    "History",
    "Geography",
    "Art",
];

const TERMS: &[&str] = &["Term 1", "Term 2", "Term 3"];

pub async fn seed(db: &PgPool) -> Result<(), Box<dyn std::error::Error>> {
    let mut rng = rand::thread_rng();

    // One hash for every seeded account keeps the seeder fast; bcrypt at
    // default cost is slow enough to notice otherwise.
    let password = hash_password("password123").map_err(|e| e.error.to_string())?;

    let mut subject_ids = Vec::new();
    for subject in SUBJECTS {
        let (id,): (Uuid,) = sqlx::query_as(
            "INSERT INTO subjects (name) VALUES ($1)
             ON CONFLICT (name) DO UPDATE SET name = EXCLUDED.name
             RETURNING id",
        )
        .bind(subject)
        .fetch_one(db)
        .await?;
        subject_ids.push(id);
    }

    let mut teacher_ids = Vec::new();
    for i in 0..3 {
        let name: String = Name().fake();
        let email = seed_email(&name, "teacher", i);
        teacher_ids.push(insert_user(db, &name, &email, &password, UserRole::Teacher).await?);
    }

    let mut parent_ids = Vec::new();
    let mut student_ids = Vec::new();
    for i in 0..5 {
        let name: String = Name().fake();
        let email = seed_email(&name, "parent", i);
        let parent_id = insert_user(db, &name, &email, &password, UserRole::Parent).await?;

        for child in 0..rng.gen_range(1..=2) {
            let student_name: String = Name().fake();
            let grade = rng.gen_range(1..=12).to_string();
            let (student_id,): (Uuid,) = sqlx::query_as(
                "INSERT INTO students (name, grade, student_code, parent_id)
                 VALUES ($1, $2, $3, $4)
                 RETURNING id",
            )
            .bind(&student_name)
            .bind(&grade)
            .bind(format!("STU-{:04}-{}", i, child))
            .bind(parent_id)
            .fetch_one(db)
            .await?;
            student_ids.push(student_id);
        }

        parent_ids.push(parent_id);
    }

    for &student_id in &student_ids {
        for &subject_id in subject_ids.iter().take(4) {
            let term = TERMS.choose(&mut rng).copied().unwrap_or("Term 1");
            let total = 20;
            let present = rng.gen_range(12..=total);

            let (progress_id,): (Uuid,) = sqlx::query_as(
                "INSERT INTO progress
                     (student_id, subject_id, academic_year, term, grade,
                      attendance_present, attendance_total)
                 VALUES ($1, $2, $3, $4, $5, $6, $7)
                 RETURNING id",
            )
            .bind(student_id)
            .bind(subject_id)
            .bind("2025/2026")
            .bind(term)
            .bind(rng.gen_range(25.0..100.0_f64).round())
            .bind(present)
            .bind(total)
            .fetch_one(db)
            .await?;

            for n in 0..rng.gen_range(1..=3) {
                let max_score = 20.0_f64;
                sqlx::query(
                    "INSERT INTO assessments
                         (progress_id, kind, title, score, max_score, taken_on)
                     VALUES ($1, 'quiz', $2, $3, $4, $5)",
                )
                .bind(progress_id)
                .bind(format!("Quiz {}", n + 1))
                .bind(rng.gen_range(5.0..max_score).round())
                .bind(max_score)
                .bind(seed_date(&mut rng))
                .execute(db)
                .await?;
            }
        }
    }

    for &parent_id in &parent_ids {
        let teacher_id = *teacher_ids.choose(&mut rng).expect("teachers seeded");

        sqlx::query(
            "INSERT INTO messages (sender_id, receiver_id, content)
             VALUES ($1, $2, $3)",
        )
        .bind(parent_id)
        .bind(teacher_id)
        .bind(Sentence(4..10).fake::<String>())
        .execute(db)
        .await?;

        sqlx::query(
            "INSERT INTO messages (sender_id, receiver_id, content)
             VALUES ($1, $2, $3)",
        )
        .bind(teacher_id)
        .bind(parent_id)
        .bind(Sentence(4..10).fake::<String>())
        .execute(db)
        .await?;

        sqlx::query(
            "INSERT INTO notifications
                 (user_id, sender_id, title, body, kind, priority, expires_at)
             VALUES ($1, $2, $3, $4, 'event', 'normal', $5)",
        )
        .bind(parent_id)
        .bind(teacher_id)
        .bind("Upcoming school event")
        .bind(Sentence(6..12).fake::<String>())
        .bind(Utc::now() + Duration::days(30))
        .execute(db)
        .await?;
    }

    for (n, &teacher_id) in teacher_ids.iter().enumerate() {
        sqlx::query(
            "INSERT INTO resources
                 (title, description, category, subject, grade, file_url, file_type,
                  file_size, uploaded_by)
             VALUES ($1, $2, 'study-materials', $3, $4, $5, 'pdf', $6, $7)",
        )
        .bind(format!("Revision pack {}", n + 1))
        .bind(Sentence(6..12).fake::<String>())
        .bind(SUBJECTS.choose(&mut rng).copied().unwrap_or("Mathematics"))
        .bind(rng.gen_range(1..=12).to_string())
        .bind(format!("https://files.homelink.app/packs/{}.pdf", n + 1))
        .bind(rng.gen_range(50_000..5_000_000_i64))
        .bind(teacher_id)
        .execute(db)
        .await?;
    }

    Ok(())
}

async fn insert_user(
    db: &PgPool,
    name: &str,
    email: &str,
    password: &str,
    role: UserRole,
) -> Result<Uuid, sqlx::Error> {
    let (id,): (Uuid,) = sqlx::query_as(
        "INSERT INTO users (name, email, password, role)
         VALUES ($1, $2, $3, $4)
         ON CONFLICT (email) DO UPDATE SET name = EXCLUDED.name
         RETURNING id",
    )
    .bind(name)
    .bind(email)
    .bind(password)
    .bind(role)
    .fetch_one(db)
    .await?;

    Ok(id)
}

fn seed_email(name: &str, role: &str, index: usize) -> String {
    let slug: String = name
        .to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .collect();
    format!("{}.{}{}@example.com", role, slug, index)
}

fn seed_date(rng: &mut impl Rng) -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, rng.gen_range(1..=6), rng.gen_range(1..=28))
        .expect("valid seed date")
}
