//! Command-line surface.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};

use fleet_core::{CarId, RentalId, UserId};

#[derive(Debug, Parser)]
#[command(name = "fleet", version, about = "Car rental operations: bookings, returns, overdue fines")]
pub struct Cli {
    /// Config file (default: fleet.toml in the platform config dir)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Database file, overrides the config
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,

    /// Treat this date (YYYY-MM-DD) as today
    #[arg(long, global = true)]
    pub as_of: Option<NaiveDate>,

    /// Skip the overdue sweep normally run before the command
    #[arg(long, global = true)]
    pub no_reconcile: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Create or update overdue fines for every active rental
    Reconcile,

    /// Price an interval for a car with the best strategy
    Quote {
        #[arg(long)]
        car: CarId,
        #[arg(long)]
        from: NaiveDate,
        #[arg(long)]
        to: NaiveDate,
    },

    /// Check whether a car can be booked for an interval
    Available {
        #[arg(long)]
        car: CarId,
        #[arg(long)]
        from: NaiveDate,
        #[arg(long)]
        to: NaiveDate,
    },

    /// Book a car; priced with the best strategy unless a cost is given
    Book {
        #[arg(long)]
        car: CarId,
        #[arg(long)]
        user: UserId,
        #[arg(long)]
        from: NaiveDate,
        #[arg(long)]
        to: NaiveDate,
        /// Agreed total in cents
        #[arg(long)]
        cost_cents: Option<i64>,
    },

    /// Return a rented car
    Return {
        #[arg(long)]
        rental: RentalId,
        /// Return date (default: today)
        #[arg(long)]
        on: Option<NaiveDate>,
        /// Fine factor for a late return (default: from config)
        #[arg(long, conflicts_with = "no_fine")]
        fine_multiplier: Option<f64>,
        /// Complete without recording an overdue fine
        #[arg(long)]
        no_fine: bool,
    },

    /// Search rentals; criteria combine with AND
    Search {
        /// Part of the client's username or full name
        #[arg(long)]
        client: Option<String>,
        #[arg(long)]
        from: Option<NaiveDate>,
        #[arg(long)]
        to: Option<NaiveDate>,
        /// Part of the car brand
        #[arg(long)]
        brand: Option<String>,
    },

    /// Fines recorded against a rental
    Fines {
        #[arg(long)]
        rental: RentalId,
    },

    /// Rentals not yet returned
    Active,
}
