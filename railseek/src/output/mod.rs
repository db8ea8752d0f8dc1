//! Table rendering.
//!
//! Turns an ordered result set into a bordered terminal table. Train
//! codes are coloured by class and the seats column by availability.
//! Transfer itineraries render as two rows sharing an index, with the
//! connection gap on the second row.

use comfy_table::presets::UTF8_FULL;
use comfy_table::{Cell, Color, Table};

use crate::domain::{Train, TrainClass, Transfer};
use crate::query::QueryOutcome;

/// Render a final, ordered outcome.
pub fn render(outcome: &QueryOutcome) -> Table {
    match outcome {
        QueryOutcome::Trains(trains) => render_trains(trains),
        QueryOutcome::Transfers(transfers) => render_transfers(transfers),
    }
}

/// Render direct/expanded results, one row per train.
pub fn render_trains(trains: &[Train]) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec!["train", "dep", "from", "to", "arr", "seats", "duration"]);

    for train in trains {
        table.add_row(train_cells(train));
    }
    table
}

/// Render transfer itineraries, two rows per itinerary.
pub fn render_transfers(transfers: &[Transfer]) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec![
        "#", "train", "dep", "from", "to", "arr", "seats", "duration", "change",
    ]);

    for (idx, transfer) in transfers.iter().enumerate() {
        let mut first = vec![Cell::new(idx)];
        first.extend(train_cells(&transfer.first));
        first.push(Cell::new(""));
        table.add_row(first);

        let mut second = vec![Cell::new("")];
        second.extend(train_cells(&transfer.second));
        second.push(Cell::new(transfer.gap_display()));
        table.add_row(second);
    }
    table
}

/// The per-train cells shared by both layouts.
fn train_cells(train: &Train) -> Vec<Cell> {
    let no_colour = match train.class() {
        TrainClass::HighSpeed => Color::Cyan,
        TrainClass::Conventional => Color::Yellow,
    };

    let seats: Vec<&str> = train.seats.iter().map(|s| s.label()).collect();
    let seats_cell = if train.has_remaining() {
        Cell::new(seats.join("/")).fg(Color::Green)
    } else {
        Cell::new(seats.join("/"))
    };

    vec![
        Cell::new(&train.no).fg(no_colour),
        Cell::new(train.departure),
        Cell::new(&train.from_name),
        Cell::new(&train.to_name),
        Cell::new(train.arrival),
        seats_cell,
        Cell::new(&train.duration),
    ]
}
