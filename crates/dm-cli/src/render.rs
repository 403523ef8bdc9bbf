//! Plain-text output for the CLI.

use std::fmt::Write;

use dm_core::{MatrixLayout, MatrixView, describe};
use dm_store::{DateFormat, HistoryEntry, PairEntry};

/// One line per group: `personal   left=1 top=6 ...`.
pub fn points_table(view: &impl MatrixView) -> String {
    let mut out = String::new();
    let mut current = "";
    for (id, value) in view.points() {
        let (group, field) = id.key().split_once('.').unwrap_or(("", id.key()));
        if group != current {
            if !out.is_empty() {
                out.push('\n');
            }
            let _ = write!(out, "{group:<10}");
            current = group;
        }
        let _ = write!(out, " {field}={value}");
    }
    out
}

pub fn history_line(e: &HistoryEntry, fmt: DateFormat) -> String {
    let main = e.matrix.main_arcana();
    format!(
        "{}  {} {:<20} {}  {:>2} {}",
        e.id,
        if e.is_favorite { '*' } else { ' ' },
        e.person_name,
        fmt.format(e.birth_date),
        main.get(),
        describe(main).name
    )
}

pub fn pair_line(e: &PairEntry, fmt: DateFormat) -> String {
    format!(
        "{}  {:<30} {} & {}",
        e.id,
        e.pair_names(),
        fmt.format(e.first.birth_date),
        fmt.format(e.second.birth_date)
    )
}

pub fn layout_table(layout: &MatrixLayout) -> String {
    let mut out = String::new();
    for n in &layout.nodes {
        let _ = writeln!(
            out,
            "{:<26} {:>2}  x={:>7.2} y={:>7.2} r={:>5.2} {}{}",
            n.key,
            n.value.get(),
            n.x,
            n.y,
            n.radius,
            n.chakra.hex(),
            if n.filled { "" } else { " (outline)" }
        );
    }
    for label in &layout.age_labels {
        let _ = writeln!(out, "age {:>2}  x={:>7.2} y={:>7.2}", label.age, label.x, label.y);
    }
    out
}
