//! Interactive menu shown when `nakgo` runs without a subcommand.

use dialoguer::{Confirm, Input, Select};
use nakgo_regulation::RegulationTable;
use nakgo_regulation_models::Region;
use nakgo_zone::{ZoneTable, loader::ZoneSession};
use nakgo_zone_models::ViewportState;

use crate::report;

#[derive(Debug, Clone, Copy)]
enum Tool {
    Check,
    Species,
    Regulations,
    Fines,
    Zones,
    Server,
}

impl Tool {
    const ALL: &[Self] = &[
        Self::Check,
        Self::Species,
        Self::Regulations,
        Self::Fines,
        Self::Zones,
        Self::Server,
    ];

    #[must_use]
    const fn label(self) -> &'static str {
        match self {
            Self::Check => "Check a catch",
            Self::Species => "List species",
            Self::Regulations => "Regional regulations",
            Self::Fines => "Fine schedule",
            Self::Zones => "Zones in a viewport",
            Self::Server => "Start server",
        }
    }
}

/// Runs the menu loop until a tool finishes.
///
/// # Errors
///
/// Returns an error if a prompt fails or the chosen tool fails.
pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    println!("nakgo-algo");
    println!();

    let labels: Vec<&str> = Tool::ALL.iter().map(|t| t.label()).collect();

    let idx = Select::new()
        .with_prompt("What would you like to do?")
        .items(&labels)
        .default(0)
        .interact()?;

    match Tool::ALL[idx] {
        Tool::Check => {
            let table = RegulationTable::embedded();
            let names = table.species_ids();
            let species = Select::new()
                .with_prompt("Species")
                .items(&names)
                .default(0)
                .interact()?;
            let length: f64 = Input::new().with_prompt("Length (cm)").interact_text()?;
            let date = chrono::Local::now().date_naive();
            print!("{}", report::check(&table, names[species], length, Some(date))?);
        }
        Tool::Species => print!("{}", report::species(&RegulationTable::embedded())),
        Tool::Regulations => {
            let names: Vec<String> = Region::all().iter().map(ToString::to_string).collect();
            let idx = Select::new()
                .with_prompt("Region")
                .items(&names)
                .default(0)
                .interact()?;
            print!("{}", report::regulations(Some(Region::all()[idx])));
        }
        Tool::Fines => print!("{}", report::fines()),
        Tool::Zones => {
            let table = ZoneTable::embedded();
            let mut session = ZoneSession::new();
            loop {
                let bbox: String = Input::new()
                    .with_prompt("Viewport (west,south,east,north)")
                    .default("126.76,37.41,127.18,37.70".to_string())
                    .interact_text()?;
                let zoom: u8 = Input::new()
                    .with_prompt("Map level")
                    .default(7)
                    .interact_text()?;
                match ViewportState::from_bbox(&bbox, zoom) {
                    Some(viewport) => {
                        let delta = session.on_idle(&viewport, table.zones());
                        print!("{}", report::zone_delta(&delta, zoom));
                    }
                    None => println!("Invalid bbox '{bbox}', expected west,south,east,north"),
                }
                if !Confirm::new()
                    .with_prompt("Move the map again?")
                    .default(true)
                    .interact()?
                {
                    break;
                }
            }
        }
        Tool::Server => {
            tokio::task::spawn_blocking(|| {
                actix_web::rt::System::new().block_on(nakgo_server::interactive::run())
            })
            .await??;
        }
    }

    Ok(())
}
