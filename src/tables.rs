use chrono::{DateTime, Local};
use comfy_table::{Attribute, Cell, CellAlignment, Color, Table, modifiers, presets};

use crate::core::inverter::InverterReading;

pub fn build_inverters_table(inverters: &[InverterReading]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(presets::UTF8_FULL_CONDENSED)
        .apply_modifier(modifiers::UTF8_ROUND_CORNERS)
        .enforce_styling();
    table.set_header(vec!["Serial", "Reported", "Type", "Power", "Max"]);
    for inverter in inverters {
        let reported_at = DateTime::from_timestamp(inverter.last_report_date, 0)
            .map_or_else(|| inverter.last_report_date.to_string(), |timestamp| {
                timestamp.with_timezone(&Local).format("%b %d %H:%M:%S").to_string()
            });
        table.add_row(vec![
            Cell::new(&inverter.serial_number),
            Cell::new(reported_at).add_attribute(Attribute::Dim),
            Cell::new(inverter.device_type).add_attribute(Attribute::Dim),
            Cell::new(format!("{} W", inverter.last_report_watts))
                .set_alignment(CellAlignment::Right)
                .fg(if inverter.last_report_watts > 0 { Color::Green } else { Color::DarkGrey }),
            Cell::new(format!("{} W", inverter.max_report_watts))
                .set_alignment(CellAlignment::Right)
                .add_attribute(Attribute::Dim),
        ]);
    }
    table
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_inverters_table_ok() {
        let inverters = [InverterReading {
            serial_number: "482207012345".to_string(),
            last_report_date: 1_670_000_000,
            device_type: 1,
            last_report_watts: 212,
            max_report_watts: 295,
        }];
        let rendered = build_inverters_table(&inverters).to_string();
        assert!(rendered.contains("482207012345"));
        assert!(rendered.contains("212 W"));
    }
}
