// Rust Poll Calendar
// Command-line entry point: seeds a poll draft from a suggestions file

use std::fs;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use chrono::{Datelike, NaiveDate};

use rust_poll_calendar::models::calendar_day::{CalendarDay, DateCellState};
use rust_poll_calendar::models::external_slot::Suggestions;
use rust_poll_calendar::services::calendar::CalendarNavigator;
use rust_poll_calendar::services::persistence::JsonFileStore;
use rust_poll_calendar::services::session::{CalendarEvents, PollEditor};
use rust_poll_calendar::services::settings::{clock_for, SettingsService};
use rust_poll_calendar::services::slots::block_covered_until;
use rust_poll_calendar::utils::clock::Clock;
use rust_poll_calendar::utils::date::format_minutes;

const USAGE: &str = "usage: rust-poll-calendar <suggestions.json> [YYYY-MM]";

fn main() -> Result<()> {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let Some(suggestions_path) = args.next().map(PathBuf::from) else {
        bail!(USAGE);
    };
    let month = args.next().map(|raw| parse_month(&raw)).transpose()?;

    log::info!("Starting Rust Poll Calendar");

    let settings = SettingsService::from_env()?.load()?;
    let clock = clock_for(&settings);

    let data = fs::read_to_string(&suggestions_path)
        .with_context(|| format!("Failed to read {}", suggestions_path.display()))?;
    let suggestions: Suggestions = serde_json::from_str(&data)
        .with_context(|| format!("Failed to parse {}", suggestions_path.display()))?;

    let mut editor = PollEditor::new(settings.clone(), clock, ());
    if let Some(month) = month {
        editor = editor.with_navigator(CalendarNavigator::creation_flow(month, 1, &settings));
    }
    let granularity = editor.apply_suggestions(&suggestions);

    for month in editor.visible_months().to_vec() {
        println!("{}", month.format("%B %Y"));
        println!(" Mo  Tu  We  Th  Fr  Sa  Su");
        let grid = editor.month_grid(month).to_vec();
        let cells: Vec<String> = grid
            .into_iter()
            .map(|day| render_day(&editor, day))
            .collect();
        for week in cells.chunks(7) {
            println!("{}", week.join(" "));
        }
        println!();
    }

    println!("Granularity: {}", granularity);
    for date in editor.selected_dates().iter().copied().collect::<Vec<_>>() {
        let slots = editor.slots().slots_for(date);
        let ranges: Vec<String> = editor
            .blocks_for(date)
            .iter()
            .map(|block| {
                format!(
                    "{}-{}",
                    format_minutes(block.start_minutes()),
                    format_minutes(block_covered_until(block, slots, granularity))
                )
            })
            .collect();
        println!("{}  {}", date, ranges.join(", "));
    }

    let store = JsonFileStore::new(JsonFileStore::default_path()?);
    editor.save(&store)?;
    println!("Draft saved to {}", store.path().display());

    Ok(())
}

fn parse_month(raw: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(&format!("{}-01", raw), "%Y-%m-%d")
        .with_context(|| format!("Invalid month {:?}; expected YYYY-MM", raw))
}

fn render_day<C: Clock, E: CalendarEvents>(editor: &PollEditor<C, E>, day: CalendarDay) -> String {
    match day.date {
        Some(date) => render_cell(editor.date_cell(date), date.day()),
        None => "   ".to_string(),
    }
}

/// Three columns per day: selection marker then the right-aligned day number.
fn render_cell(state: DateCellState, day: u32) -> String {
    if state.disabled {
        "  .".to_string()
    } else {
        let marker = if state.selected { '*' } else { ' ' };
        format!("{}{:>2}", marker, day)
    }
}
