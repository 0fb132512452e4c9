//! # Command Handlers
//!
//! Each handler takes the shared [`Context`] and returns something
//! serializable; `dispatch` turns it into the JSON printed on stdout.
//!
//! ```text
//! fleet/
//! ├── rental.rs    ◄─── quote, available, book, return, fines, active
//! ├── search.rs    ◄─── search
//! └── reconcile.rs ◄─── overdue sweep
//! ```

pub mod reconcile;
pub mod rental;
pub mod search;

use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;

use fleet_core::Clock;
use fleet_db::Database;
use fleet_rental::{RentalLifecycleManager, RentalSearchEngine};

use crate::cli::Command;
use crate::config::FleetConfig;
use crate::error::CliResult;

/// Everything a command may need.
pub struct Context {
    pub store: Arc<Database>,
    pub clock: Arc<dyn Clock>,
    pub manager: RentalLifecycleManager<Database>,
    pub search: RentalSearchEngine<Database>,
    pub config: FleetConfig,
}

pub async fn dispatch(ctx: &Context, command: Command) -> CliResult<Value> {
    match command {
        Command::Reconcile => to_json(reconcile::reconcile(ctx).await?),
        Command::Quote { car, from, to } => to_json(rental::quote(ctx, car, from, to).await?),
        Command::Available { car, from, to } => to_json(rental::available(ctx, car, from, to).await),
        Command::Book {
            car,
            user,
            from,
            to,
            cost_cents,
        } => to_json(rental::book(ctx, car, user, from, to, cost_cents).await?),
        Command::Return {
            rental,
            on,
            fine_multiplier,
            no_fine,
        } => to_json(rental::return_car(ctx, rental, on, fine_multiplier, no_fine).await?),
        Command::Search {
            client,
            from,
            to,
            brand,
        } => to_json(search::search(ctx, client, from, to, brand).await?),
        Command::Fines { rental } => to_json(rental::fines(ctx, rental).await?),
        Command::Active => to_json(rental::active(ctx).await?),
    }
}

fn to_json<T: Serialize>(value: T) -> CliResult<Value> {
    Ok(serde_json::to_value(value)?)
}
