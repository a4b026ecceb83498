//! Tabular report model: a header plus rows of already-formatted cells.
//! No I/O; currency cells use two decimals, areas are normalized.

use fa_core::computed::{BlockSummary, CacheBundle};
use fa_core::entities::{Announcement, BlockDescriptor};
use fa_core::money::format2;
use fa_core::Period;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ReportTable {
    pub header: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl ReportTable {
    fn with_header(cols: &[&str]) -> Self {
        Self { header: cols.iter().map(|c| c.to_string()).collect(), rows: Vec::new() }
    }
}

pub const UNIT_DETAIL_HEADER: [&str; 16] = [
    "Unit",
    "Block",
    "Floor",
    "Unit Type",
    "Area",
    "Elevator Share",
    "Heating Share",
    "Security Share",
    "Building Staff Share",
    "Electricity Share",
    "Water Share",
    "Management Share",
    "Extras Share",
    "Total Fee",
    "Heating Zone",
    "Period",
];

pub const BLOCK_SUMMARY_HEADER: [&str; 10] = [
    "Block",
    "Unit Type",
    "Units",
    "Elevator Users",
    "Ground Floor Units",
    "Area",
    "Heating Zone",
    "Average Fee per Unit",
    "Block Total Fee",
    "Period",
];

pub const EXPENSE_DETAIL_HEADER: [&str; 6] = ["Category", "Description", "Total", "Per-Unit Share", "Method", "Period"];

pub const ANNOUNCEMENTS_TITLE: &str = "Announcements";
pub const ANNOUNCEMENTS_HEADER: [&str; 4] = ["Title", "Body", "Priority", "Date"];

/// One row per unit, in bundle (floor, number) order.
pub fn unit_detail_table(bundle: &CacheBundle) -> ReportTable {
    let mut t = ReportTable::with_header(&UNIT_DETAIL_HEADER);
    for u in &bundle.units {
        let mut row = vec![
            u.unit.display_name.clone(),
            u.unit.block.to_string(),
            u.unit.floor_label.clone(),
            u.unit.unit_type.clone(),
            u.unit.area.normalize().to_string(),
        ];
        row.extend(u.fees.shares().iter().map(|s| format2(*s)));
        row.push(format2(u.fees.total));
        row.push(u.unit.heating_zone.to_string());
        row.push(u.period.to_string());
        t.rows.push(row);
    }
    t
}

/// One row per block that produced a summary.
pub fn block_summary_table(rows: &[(BlockDescriptor, BlockSummary)], period: Period) -> ReportTable {
    let mut t = ReportTable::with_header(&BLOCK_SUMMARY_HEADER);
    for (d, s) in rows {
        t.rows.push(vec![
            d.block.to_string(),
            d.unit_type.clone(),
            d.unit_count.to_string(),
            d.elevator_users.to_string(),
            d.ground_floor_units.to_string(),
            d.area.normalize().to_string(),
            d.heating_zone.to_string(),
            format2(s.average_fee),
            format2(s.total_fee),
            period.to_string(),
        ]);
    }
    t
}

pub fn expense_detail_table(bundle: &CacheBundle) -> ReportTable {
    let mut t = ReportTable::with_header(&EXPENSE_DETAIL_HEADER);
    for r in &bundle.expense_rows {
        t.rows.push(vec![
            r.label.clone(),
            r.description.clone(),
            format2(r.total),
            format2(r.exemplar_share),
            r.method.to_string(),
            bundle.period.to_string(),
        ]);
    }
    t
}

/// Dates render as `dd.mm.yyyy`; a missing date is an empty cell.
pub fn announcements_table(notes: &[Announcement]) -> ReportTable {
    let mut t = ReportTable::with_header(&ANNOUNCEMENTS_HEADER);
    for n in notes {
        t.rows.push(vec![
            n.title.clone(),
            n.body.clone(),
            n.priority.clone(),
            n.date.map(|d| d.format("%d.%m.%Y").to_string()).unwrap_or_default(),
        ]);
    }
    t
}
