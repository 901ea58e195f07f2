//! Markdown export functionality

use crate::document::Exercise;
use examgrid_engine::engine::{CellRef, Column};
use std::io::Write;

/// Write the used part of the grid as a markdown table of display values.
pub fn write_markdown<W: Write>(out: &mut W, exercise: &Exercise) -> std::io::Result<()> {
    let used = exercise.used_rows();

    writeln!(out, "# Exercise")?;
    writeln!(out)?;

    if used == 0 {
        writeln!(out, "*Empty grid*")?;
        return Ok(());
    }

    // Header row with column letters
    write!(out, "|   |")?;
    for col in Column::ALL {
        write!(out, " {} |", col.letter())?;
    }
    writeln!(out)?;

    write!(out, "|---|")?;
    for _ in Column::ALL {
        write!(out, "---|")?;
    }
    writeln!(out)?;

    for row in 0..used {
        write!(out, "| {} |", row + 1)?; // 1-based row numbers
        for col in Column::ALL {
            let display = exercise.display(&CellRef::new(col.index(), row));
            write!(out, " {} |", escape_markdown(&display))?;
        }
        writeln!(out)?;
    }

    Ok(())
}

fn escape_markdown(s: &str) -> String {
    s.replace('|', "\\|")
}
