use chrono::NaiveDate;

use fleet_core::Rental;
use fleet_rental::SearchCriteria;

use super::Context;
use crate::error::CliResult;

pub async fn search(
    ctx: &Context,
    client: Option<String>,
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
    brand: Option<String>,
) -> CliResult<Vec<Rental>> {
    let criteria = SearchCriteria {
        client_name: client,
        date_from: from,
        date_to: to,
        car_brand: brand,
    };
    Ok(ctx.search.search(&criteria).await?)
}
