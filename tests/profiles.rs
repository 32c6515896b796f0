mod common;

use chrono::NaiveDate;
use ddr_normalize::{
    pipeline::{Document, parse},
    profile::{ColumnRule, InputLayout, SectionCapture, UnitProfile},
    units,
};

use common::TestWorkspace;

const CUSTOM_UNIT: &str = r#"
name: zone-11
description: Hand-written memo profile
input:
  kind: text
  strip_chars: "*"
  description:
    style: well
    well_field: Well
  fields:
    - name: Rig
      aliases: ["rig"]
  sections:
    - name: Activity
      patterns:
        - text: "activity"
          mode: prefix
    - name: Plan
      patterns:
        - text: "plan"
          mode: prefix
  capture: first
report_date:
  label: Tanggal
columns:
  region:
    rule: const
    value: Region 4
  zone:
    rule: const
    value: Zone 11
  rig_name:
    rule: field
    name: Rig
  well_name:
    rule: field
    name: Well
  summary_report:
    rule: field
    name: Activity
  next_plan:
    rule: field
    name: Plan
partitions:
  - sort:
      - column: well_name
"#;

#[test]
fn custom_yaml_profile_parses_a_memo() {
    let workspace = TestWorkspace::new();
    let path = workspace.write("zone-11.yaml", CUSTOM_UNIT);
    let profile = UnitProfile::load(&path).expect("load custom profile");

    assert_eq!(profile.name, "zone-11");
    let InputLayout::Text(layout) = &profile.input else {
        panic!("expected text layout");
    };
    assert_eq!(layout.capture, SectionCapture::First);
    assert_eq!(layout.joiner, "\n");
    assert_eq!(profile.merge_sort.len(), 3);

    let memo = "\
*Laporan Zona 11*
Tanggal: 5 Maret 2026
2. ZZ-2
Rig: Apex 2
Activity:
- Run casing
1. ZZ-1
Rig: Apex 1
Activity: Drilling
Plan:
POOH
";
    let table = parse(&Document::text("memo.txt", memo), &profile, None).expect("parse memo");
    assert_eq!(table.len(), 2);
    let first = &table.rows[0];
    assert_eq!(first.well_name.as_deref(), Some("ZZ-1"));
    assert_eq!(first.summary_report.as_deref(), Some("Drilling"));
    assert_eq!(first.next_plan.as_deref(), Some("POOH"));
    assert_eq!(first.region.as_deref(), Some("Region 4"));
    assert_eq!(
        first.report_date,
        NaiveDate::from_ymd_opt(2026, 3, 5).unwrap()
    );
    let second = &table.rows[1];
    assert_eq!(second.summary_report.as_deref(), Some("Run casing"));
    assert_eq!(second.next_plan, None);
    assert_eq!(second.aph, None);
}

#[test]
fn malformed_profile_reports_the_file() {
    let workspace = TestWorkspace::new();
    let path = workspace.write("broken.yaml", "name: broken\ninput:\n  kind: telegram\n");
    let err = UnitProfile::load(&path).unwrap_err();
    assert!(format!("{err:#}").contains("broken.yaml"));
}

#[test]
fn exported_builtin_reloads_identically() {
    let workspace = TestWorkspace::new();
    let path = workspace.path().join("region-1.yaml");
    let profile = units::builtin("region-1").unwrap();
    profile.save(&path).expect("save profile");
    let reloaded = UnitProfile::load(&path).expect("reload profile");
    assert_eq!(reloaded, profile);
    assert!(matches!(reloaded.columns.aph, ColumnRule::ByZone { .. }));
}
