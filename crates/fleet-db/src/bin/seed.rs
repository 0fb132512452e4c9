//! # Seed Data Generator
//!
//! Populates the database with a small fleet for development.
//!
//! ## Usage
//! ```bash
//! # Seed ./fleet_dev.db
//! cargo run -p fleet-db --bin seed
//!
//! # Specify database path
//! cargo run -p fleet-db --bin seed -- --db ./data/fleet.db
//! ```
//!
//! ## Generated Data
//! - One car per entry in `FLEET`, one of them in maintenance
//! - An administrator and a handful of clients
//! - Rentals relative to today: one finished, one running, one overdue

use chrono::{Duration, Local, NaiveDate};
use std::env;

use fleet_core::{CarStatus, NewCar, NewRental, NewUser, PricingStrategy, UserRole};
use fleet_db::{Database, DbConfig};

/// (brand, model, daily price in cents)
const FLEET: &[(&str, &str, i64)] = &[
    ("Toyota", "Corolla", 4_500),
    ("Toyota", "RAV4", 7_000),
    ("Volkswagen", "Golf", 5_000),
    ("Volkswagen", "Passat", 6_500),
    ("Skoda", "Octavia", 5_500),
    ("Ford", "Focus", 4_800),
    ("BMW", "320d", 11_000),
    ("Audi", "A4", 10_500),
    ("Kia", "Ceed", 4_200),
    ("Tesla", "Model 3", 13_000),
];

/// (username, full name)
const CLIENTS: &[(&str, &str)] = &[
    ("anowak", "Anna Nowak"),
    ("jsmith", "John Smith"),
    ("mrossi", "Marco Rossi"),
    ("lmeyer", "Lena Meyer"),
];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();

    let mut db_path = String::from("./fleet_dev.db");

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = args[i + 1].clone();
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Fleet Rental Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -d, --db <PATH>    Database file path (default: ./fleet_dev.db)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("🌱 Fleet Rental Seed Data Generator");
    println!("===================================");
    println!("Database: {}", db_path);
    println!();

    let db = Database::new(DbConfig::new(&db_path)).await?;

    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    let existing = db.car_repo().count().await?;
    if existing > 0 {
        println!("⚠ Database already has {} cars", existing);
        println!("  Skipping seed to avoid duplicates.");
        println!("  Delete the database file to regenerate.");
        return Ok(());
    }

    // Cars
    let mut cars = Vec::with_capacity(FLEET.len());
    for (idx, (brand, model, price)) in FLEET.iter().enumerate() {
        let status = if idx == FLEET.len() - 1 {
            CarStatus::Maintenance
        } else {
            CarStatus::Available
        };

        let car = db
            .car_repo()
            .insert(&NewCar {
                brand: brand.to_string(),
                model: model.to_string(),
                status,
                daily_price_cents: *price,
            })
            .await?;
        cars.push(car);
    }
    println!("✓ Inserted {} cars", cars.len());

    // Users
    db.user_repo()
        .insert(&NewUser {
            username: "admin".to_string(),
            full_name: "Fleet Administrator".to_string(),
            role: UserRole::Administrator,
        })
        .await?;

    let mut clients = Vec::with_capacity(CLIENTS.len());
    for (username, full_name) in CLIENTS {
        let user = db
            .user_repo()
            .insert(&NewUser {
                username: username.to_string(),
                full_name: full_name.to_string(),
                role: UserRole::Client,
            })
            .await?;
        clients.push(user);
    }
    println!("✓ Inserted {} clients and 1 administrator", clients.len());

    // Rentals relative to today
    let today = Local::now().date_naive();
    let days = |n: i64| today + Duration::days(n);

    // (car index, client index, start, end, completed)
    let plan: [(usize, usize, NaiveDate, NaiveDate, bool); 3] = [
        (0, 0, days(-20), days(-14), true),
        (2, 1, days(-2), days(5), false),
        (6, 2, days(-10), days(-3), false),
    ];

    for (car_idx, client_idx, start, end, completed) in plan {
        let car = &cars[car_idx];
        let strategy = fleet_core::PricingCalculator::optimal_strategy(start, end);
        let cost = strategy.cost(car.daily_price(), start, end);

        let mut rental = db
            .rental_repo()
            .insert(&NewRental {
                car_id: car.id,
                user_id: clients[client_idx].id,
                start_date: start,
                end_date: end,
                total_cost_cents: cost.cents(),
            })
            .await?;

        if completed {
            rental.completed = true;
            rental.actual_return_date = Some(end);
            rental.total_cost_cents = PricingStrategy::Daily
                .cost(car.daily_price(), start, end)
                .cents();
            db.rental_repo().update(&rental).await?;
        } else {
            db.car_repo().update_status(car.id, CarStatus::Rented).await?;
        }

        println!(
            "  Rental #{}: {} for {} ({} to {}){}",
            rental.id,
            car.full_name(),
            clients[client_idx].full_name,
            start,
            end,
            if completed { " [returned]" } else { "" }
        );
    }

    println!();
    println!("✓ Seed complete! Run `fleet reconcile` to fine the overdue rental.");

    Ok(())
}
