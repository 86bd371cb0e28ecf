//! # Seed Data Generator
//!
//! Populates the database with a herd and its history for development.
//!
//! ## Usage
//! ```bash
//! # Generate 50 animals (default)
//! cargo run -p vet-db --bin seed
//!
//! # Generate custom amount
//! cargo run -p vet-db --bin seed -- --animals 200
//!
//! # Specify database path (VET_DB_PATH is honoured too)
//! cargo run -p vet-db --bin seed -- --db ./data/vet.db
//! ```
//!
//! ## Generated Data
//! - Directories: executors, diseases, bulls, vaccines, medicines
//! - Animals: numbered `00001..`, mostly cows spread over herd groups
//! - Operations: a few per animal over the last year, saved through the
//!   operation form workflow so reproductive counters stay consistent

use chrono::{Days, NaiveDate, Utc};
use std::env;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use vet_core::{
    Animal, Bull, Disease, Executor, Gender, Medicine, Operation, OperationType, Vaccine,
};
use vet_db::{Database, DbConfig};

const EXECUTORS: &[(&str, &str)] = &[
    ("Иванов И.И.", "Ветврач"),
    ("Петрова А.С.", "Зоотехник"),
    ("Сидоров П.В.", "Осеменатор"),
];

const DISEASES: &[&str] = &["Мастит", "Кетоз", "Эндометрит", "Пододерматит"];

const BULLS: &[(&str, &str, &str)] = &[
    ("Буян", "RU-7731", "Голштинская"),
    ("Гром", "RU-1102", "Симментальская"),
    ("Орлик", "RU-5520", "Айрширская"),
];

const VACCINES: &[&str] = &["Бовилис", "Эмульцин", "Комбовак"];

const MEDICINES: &[(&str, &str)] = &[
    ("Пенициллин", "Бензилпенициллин"),
    ("Окситоцин", "Окситоцин"),
    ("Мастиет форте", "Тетрациклин"),
];

const GROUPS: &[&str] = &["Дойные", "Сухостой", "Тёлки", "Телята"];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,vet=debug,sqlx=warn")),
        )
        .init();

    // Parse command line arguments
    let args: Vec<String> = env::args().collect();

    let mut count: usize = 50;
    let mut config = DbConfig::from_env("./vet_dev.db");

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--animals" | "-n" => {
                if i + 1 < args.len() {
                    count = args[i + 1].parse().unwrap_or(50);
                    i += 1;
                }
            }
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    config = DbConfig::new(&args[i + 1]);
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Vet Records Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -n, --animals <N>  Number of animals to generate (default: 50)");
                println!("  -d, --db <PATH>    Database file path (default: $VET_DB_PATH or ./vet_dev.db)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    info!(path = %config.database_path.display(), animals = count, "Seeding database");
    let db = Database::new(config).await?;

    let existing = db.animals().count().await?;
    if existing > 0 {
        warn!(existing, "Database already has animals, skipping seed");
        return Ok(());
    }

    seed_directories(&db).await?;

    let start = std::time::Instant::now();
    let today = Utc::now().date_naive();
    let mut operations = 0;

    for index in 0..count {
        let animal_id = db.animals().add(&generate_animal(index)).await?;

        for op in generate_operations(animal_id, index, today) {
            if let Err(e) = db.record_operation(&op).await {
                warn!(animal_id, error = %e, "Failed to record operation");
                continue;
            }
            operations += 1;
        }
    }

    info!(
        animals = count,
        operations,
        elapsed = ?start.elapsed(),
        "Seed complete"
    );

    db.close().await;
    Ok(())
}

async fn seed_directories(db: &Database) -> Result<(), Box<dyn std::error::Error>> {
    for (name, position) in EXECUTORS {
        let mut executor = Executor::new(*name);
        executor.position = Some(position.to_string());
        db.executors().add(&executor).await?;
    }

    for name in DISEASES {
        db.diseases().add(&Disease::new(*name)).await?;
    }

    for (name, number, breed) in BULLS {
        let mut bull = Bull::new(*name);
        bull.number = Some(number.to_string());
        bull.breed = Some(breed.to_string());
        db.bulls().add(&bull).await?;
    }

    for name in VACCINES {
        db.vaccines().add(&Vaccine::new(*name)).await?;
    }

    for (name, ingredient) in MEDICINES {
        let mut medicine = Medicine::new(*name);
        medicine.active_ingredient = Some(ingredient.to_string());
        db.medicines().add(&medicine).await?;
    }

    info!("Directories seeded");
    Ok(())
}

/// Generates one animal; every tenth is a bull, the rest are cows.
fn generate_animal(seed: usize) -> Animal {
    let (gender, animal_type) = if seed % 10 == 9 {
        (Gender::Male, "Бык")
    } else {
        (Gender::Female, "Корова")
    };

    let mut animal = Animal::new(format!("{:05}", seed + 1), gender, animal_type);
    animal.responder = Some(format!("R-{:04}", (seed * 37) % 10_000));
    animal.group = Some(GROUPS[seed % GROUPS.len()].to_string());
    animal.birth_date = NaiveDate::from_ymd_opt(2018 + (seed % 5) as i32, 1 + (seed % 12) as u32, 1);

    if animal.is_female() {
        animal.average_milk = Some(18.0 + (seed % 15) as f64);
    }

    animal
}

/// A short history within the last year, oldest first.
fn generate_operations(animal_id: i64, seed: usize, today: NaiveDate) -> Vec<Operation> {
    let day = |offset: usize| today.checked_sub_days(Days::new(offset as u64)).unwrap_or(today);

    let mut examination = Operation::new(animal_id, OperationType::Examination, day(300 - seed % 30));
    examination.executor_id = Some(1 + (seed % EXECUTORS.len()) as i64);

    let mut vaccination = Operation::new(animal_id, OperationType::Vaccination, day(200 - seed % 20));
    vaccination.vaccine = Some(VACCINES[seed % VACCINES.len()].to_string());

    let mut ops = vec![examination, vaccination];

    if seed % 10 != 9 {
        let mut insemination =
            Operation::new(animal_id, OperationType::Insemination, day(120 - seed % 20));
        insemination.bull = Some(BULLS[seed % BULLS.len()].0.to_string());
        ops.push(insemination);
    }

    if seed % 4 == 0 {
        let mut treatment = Operation::new(animal_id, OperationType::Treatment, day(30 - seed % 10));
        treatment.diagnosis = Some(DISEASES[seed % DISEASES.len()].to_string());
        treatment.medicine = Some(MEDICINES[seed % MEDICINES.len()].0.to_string());
        treatment.dose = Some("10 мл".to_string());
        ops.push(treatment);
    }

    ops
}
