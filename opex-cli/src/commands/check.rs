use anyhow::Result;
use chrono::NaiveDate;
use opex_core::{AlertKind, AlertRequest, AlertSelector, CalendarStore, Tier};

use crate::render::render_alert;

pub fn run(
    store: &CalendarStore,
    selector: &AlertSelector,
    today: NaiveDate,
    kind: AlertKind,
    tier: Tier,
    json: bool,
) -> Result<()> {
    let request = AlertRequest::new(today, kind, tier);
    let result = selector.select(store, &request)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        println!("{}", render_alert(&result));
    }

    Ok(())
}
