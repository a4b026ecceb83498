//! End-to-end: compute → cache → export over the in-memory store.

use chrono::{NaiveDate, TimeZone, Utc};

use fa_core::entities::{
    Announcement, BlockDescriptor, ExpenseSnapshot, ExtraExpense, HeatingZone, RawAmount, Unit,
};
use fa_core::variables::EngineConfig;
use fa_core::Decimal;
use fa_io::MemoryStore;
use fa_pipeline::{compute, ComputeRequest, EngineCtx, FixedClock, PipelineError};
use fa_report::{run_export, ExportRequest, ReportError, ReportKind};

fn d(s: &str) -> Decimal {
    s.parse().unwrap()
}

fn unit(block: &str, floor: i32, no: u32, zone: HeatingZone, cap: &str, elevator: bool) -> Unit {
    Unit {
        global_id: format!("{block}-{no}"),
        block: block.parse().unwrap(),
        floor,
        floor_label: if floor == 0 { "Ground".into() } else { format!("Floor {floor}") },
        unit_number: no,
        display_name: format!("{block}{no}"),
        unit_type: "3+1".into(),
        area: d("10"),
        uses_elevator: elevator,
        heating_zone: zone,
        heating_capacity: d(cap),
        active: true,
    }
}

fn roster() -> Vec<Unit> {
    let mut v = Vec::new();
    for i in 0..10u32 {
        let floor = (i / 2) as i32;
        let no = if floor == 0 { i + 1 } else { floor as u32 * 100 + i % 2 + 1 };
        v.push(unit("A", floor, no, HeatingZone::One, "450", false));
    }
    for i in 0..168u32 {
        let floor = (i / 8) as i32 + 1;
        v.push(unit("D", floor, floor as u32 * 100 + i % 8 + 1, HeatingZone::Two, "0", true));
    }
    v
}

fn block(no: u32, letter: &str, units: u32, elevator: u32, zone: HeatingZone) -> BlockDescriptor {
    BlockDescriptor {
        block_no: no,
        block: letter.parse().unwrap(),
        unit_type: "3+1".into(),
        unit_count: units,
        elevator_users: elevator,
        ground_floor_units: units - elevator,
        area: d("10"),
        heating_zone: zone,
        heating_capacity: Decimal::ZERO,
    }
}

fn store() -> MemoryStore {
    let mut snap = ExpenseSnapshot::empty("2024-01".parse().unwrap());
    snap.fuel_zone1 = Some(d("10000"));
    snap.fuel_zone2 = Some(d("16800"));
    snap.elevator = Some(d("3360"));
    snap.security = Some(d("3560"));
    snap.janitorial = Some(d("1780"));
    snap.electricity = Some(d("1780"));
    snap.water = Some(d("890"));
    snap.management = Some(d("356"));
    snap.miscellaneous = Some(d("178"));
    snap.extras = vec![ExtraExpense {
        name: "Garden Landscaping".into(),
        description: Some("Spring planting, pruning".into()),
        amount: RawAmount::Text("1780".into()),
    }];

    MemoryStore::new()
        .with_units(roster())
        .with_snapshot(snap)
        .with_blocks(vec![
            block(1, "A", 10, 0, HeatingZone::One),
            block(4, "D", 168, 168, HeatingZone::Two),
            block(6, "F", 12, 0, HeatingZone::Two),
        ])
        .with_announcements(vec![Announcement {
            title: "Elevator maintenance".into(),
            body: "Block D elevators off, 09:00-12:00".into(),
            priority: "high".into(),
            date: NaiveDate::from_ymd_opt(2024, 1, 15),
        }])
}

fn clock() -> FixedClock {
    FixedClock(Utc.with_ymd_and_hms(2024, 2, 1, 9, 0, 0).unwrap())
}

fn req(kind: ReportKind, block: Option<&str>) -> ExportRequest {
    ExportRequest { kind, period: "2024-01".into(), block: block.map(Into::into) }
}

#[test]
fn expense_detail_after_compute() {
    let s = store();
    let cfg = EngineConfig::default();
    let c = clock();
    let ctx = EngineCtx::new(&s, &cfg, &c);

    let missing = run_export(ctx, &req(ReportKind::ExpenseDetail, Some("A"))).unwrap_err();
    assert!(matches!(missing, ReportError::NotFound(_)));

    compute(ctx, &ComputeRequest::new("A", "2024-01")).unwrap();
    let out = run_export(ctx, &req(ReportKind::ExpenseDetail, Some("A"))).unwrap();

    assert_eq!(out.title, "2024-01 Period A Block Expense Detail Report");
    assert_eq!(out.row_count, 10);
    let lines: Vec<&str> = out.content.lines().collect();
    assert_eq!(lines[0], "Category,Description,Total,Per-Unit Share,Method,Period");
    assert_eq!(
        lines[1],
        "Heating Zone 1 Fuel,Fuel for the zone 1 heating plant,10000.00,1000.00,Heating-Capacity Pro-Rata,2024-01"
    );
    assert_eq!(lines[3], "Elevator,Elevator maintenance and power,3360.00,0.00,Restricted-to-Users-of-Elevator,2024-01");
    assert_eq!(
        lines[10],
        "Garden Landscaping,\"Spring planting, pruning\",1780.00,10.00,Equal Split,2024-01"
    );
    assert_eq!(lines[11], "");
    assert_eq!(lines[12], "Announcements");
    assert_eq!(lines[13], "Title,Body,Priority,Date");
    assert_eq!(lines[14], "Elevator maintenance,\"Block D elevators off, 09:00-12:00\",high,15.01.2024");
}

#[test]
fn expense_detail_export_is_byte_identical() {
    let s = store();
    let cfg = EngineConfig::default();
    let c = clock();
    let ctx = EngineCtx::new(&s, &cfg, &c);
    compute(ctx, &ComputeRequest::new("D", "2024-01")).unwrap();

    let a = run_export(ctx, &req(ReportKind::ExpenseDetail, Some("D"))).unwrap();
    let b = run_export(ctx, &req(ReportKind::ExpenseDetail, Some("D"))).unwrap();
    assert_eq!(a.content.as_bytes(), b.content.as_bytes());
}

#[test]
fn unit_detail_computes_on_demand() {
    let s = store();
    let cfg = EngineConfig::default();
    let c = clock();
    let ctx = EngineCtx::new(&s, &cfg, &c);
    assert_eq!(s.bundle_count(), 0);

    let out = run_export(ctx, &req(ReportKind::UnitDetail, Some("a"))).unwrap();
    assert_eq!(out.title, "A Block Unit Detail Report - 2024-01");
    assert_eq!(out.row_count, 10);
    assert_eq!(s.bundle_count(), 1);

    let lines: Vec<&str> = out.content.lines().collect();
    assert!(lines[0].starts_with("Unit,Block,Floor,Unit Type,Area,Elevator Share,Heating Share"));
    assert_eq!(
        lines[1],
        "A1,A,Ground,3+1,10,0.00,1000.00,20.00,10.00,10.00,5.00,2.00,11.00,1058.00,1,2024-01"
    );

    let e = run_export(ctx, &req(ReportKind::UnitDetail, None)).unwrap_err();
    assert!(matches!(e, ReportError::Validation(_)));
}

#[test]
fn block_summary_skips_blocks_without_units() {
    let s = store();
    let cfg = EngineConfig::default();
    let c = clock();
    let out = run_export(EngineCtx::new(&s, &cfg, &c), &req(ReportKind::BlockSummary, None)).unwrap();

    assert_eq!(out.title, "All Blocks Summary Report - 2024-01");
    assert_eq!(out.row_count, 2);
    assert!(out.block.is_none());
    let lines: Vec<&str> = out.content.lines().collect();
    assert_eq!(
        lines[0],
        "Block,Unit Type,Units,Elevator Users,Ground Floor Units,Area,Heating Zone,Average Fee per Unit,Block Total Fee,Period"
    );
    assert_eq!(lines[1], "A,3+1,10,0,10,10,1,1058.00,10580.00,2024-01");
    assert_eq!(lines[2], "D,3+1,168,168,0,10,2,178.00,29904.00,2024-01");
}

#[test]
fn block_summary_without_snapshot_fails() {
    let s = store();
    let cfg = EngineConfig::default();
    let c = clock();
    let ctx = EngineCtx::new(&s, &cfg, &c);
    let r = ExportRequest { kind: ReportKind::BlockSummary, period: "2030-05".into(), block: None };

    match run_export(ctx, &r) {
        Err(ReportError::Pipeline(PipelineError::NotFound(m))) => assert!(m.contains("2030-05")),
        other => panic!("expected not found, got {other:?}"),
    }
    assert_eq!(s.bundle_count(), 0);
}

#[test]
fn unknown_period_is_reported() {
    let s = store();
    let cfg = EngineConfig::default();
    let c = clock();
    let ctx = EngineCtx::new(&s, &cfg, &c);
    let bad = ExportRequest { kind: ReportKind::UnitDetail, period: "2024-1".into(), block: Some("A".into()) };
    assert!(matches!(run_export(ctx, &bad), Err(ReportError::Validation(_))));

    let none = ExportRequest { kind: ReportKind::UnitDetail, period: "2023-05".into(), block: Some("A".into()) };
    assert!(matches!(run_export(ctx, &none), Err(ReportError::Pipeline(_))));
}
