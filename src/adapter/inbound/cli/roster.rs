//! Roster listing.

use serde_json::json;
use tabled::{Table, Tabled};

use crate::adapter::inbound::cli::command::ConfigPathArg;
use crate::adapter::inbound::cli::output;
use crate::domain::personality::Personality;
use crate::error::Result;
use crate::infrastructure::config::settings::Config;

#[derive(Tabled)]
struct PersonalityRow {
    #[tabled(rename = "Id")]
    id: u32,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Rating")]
    rating: u32,
    #[tabled(rename = "Style")]
    style: String,
    #[tabled(rename = "Depth")]
    depth: u8,
    #[tabled(rename = "Openings")]
    openings: String,
}

impl From<&Personality> for PersonalityRow {
    fn from(p: &Personality) -> Self {
        Self {
            id: p.id.value(),
            name: p.name.clone(),
            rating: p.rating,
            style: p.style.to_string(),
            depth: p.budget.depth,
            openings: p.openings.join(", "),
        }
    }
}

/// List the configured roster, or the built-in one.
pub fn list(args: &ConfigPathArg) -> Result<()> {
    let config = Config::load_or_default(&args.config)?;
    let registry = config.registry();

    if output::is_json() {
        let roster: Vec<&Personality> = registry.all().collect();
        output::json_output(json!({
            "command": "roster",
            "personalities": roster,
        }));
        return Ok(());
    }
    if output::is_quiet() {
        return Ok(());
    }

    output::header(env!("CARGO_PKG_VERSION"));
    output::section("Roster");
    let rows: Vec<PersonalityRow> = registry.all().map(PersonalityRow::from).collect();
    output::lines(&Table::new(rows).to_string());
    Ok(())
}
