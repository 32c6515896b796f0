//! Built-in profiles for the known reporting units.

use crate::{
    profile::{
        AphOverride, ColumnRule, ColumnRules, DescriptionSpec, DescriptionStyle, FieldKind,
        FieldSpec, InputLayout, LabelMatch, LabeledSummary, Partition, ReportDateRule, RigRule,
        SectionCapture, SectionSpec, SheetLayout, SheetSelector, SortKey, SummaryRule,
        TextLayout, TimeStamp, UnitProfile, WellNameRule, ZoneFilter, default_merge_sort,
    },
    schema::Column,
};

/// Number, dot, whitespace, then the well; `2.875" casing` stays body text.
const SPACED_RECORD_PATTERN: &str = r"^(\d+)\.\s+(\S.*)$";

/// Number and dot followed by a well name starting with a letter.
const LETTERED_RECORD_PATTERN: &str = r"^(\d+)\.\s*([A-Za-z].*)$";

pub const BUILTIN_UNITS: &[&str] = &[
    "region-1", "region-2", "region-5", "zone-7", "zone-8", "zone-9", "zone-10",
];

pub fn builtin(name: &str) -> Option<UnitProfile> {
    let profile = match name {
        "region-1" => region_1(),
        "region-2" => region_2(),
        "region-5" => region_5(),
        "zone-7" => zone_7(),
        "zone-8" => zone_8(),
        "zone-9" => zone_9(),
        "zone-10" => zone_10(),
        _ => return None,
    };
    Some(profile)
}

pub fn all() -> Vec<UnitProfile> {
    BUILTIN_UNITS.iter().filter_map(|name| builtin(name)).collect()
}

fn sorted_by(keys: &[SortKey]) -> Partition {
    Partition {
        sort: keys.to_vec(),
        ..Partition::default()
    }
}

fn pdsi_is_pep() -> Vec<AphOverride> {
    vec![AphOverride {
        rig_contains: "PDSI".to_string(),
        code: "PEP".to_string(),
    }]
}

fn region_1() -> UnitProfile {
    let zone_4_rig = RigRule {
        strip_rig_token: true,
        pdsi_spacing: true,
        ..RigRule::default()
    }
    .with_aliases(&[
        ("Airlangga #55", "Airlangga-55"),
        ("PDSI ACS#21", "ACS-21"),
        ("#36.1/Skytop 650M", "PDSI #36.1/Skytop 650M"),
    ]);

    UnitProfile {
        name: "region-1".to_string(),
        description: "Region 1 daily drilling workbook (Zona 1, 2 & 3, 4)".to_string(),
        input: InputLayout::Sheet(SheetLayout {
            sheet: SheetSelector::ReportDate {
                patterns: vec!["%-d %b".to_string(), "%d %b".to_string()],
            },
            header_row: 13,
            required_columns: ["Zona", "Nama Sumur", "RIG", "Jenis Kegiatan", "Kegiatan"]
                .iter()
                .map(|c| c.to_string())
                .collect(),
            zone_filter: Some(ZoneFilter {
                column: "Zona".to_string(),
                values: vec![
                    "Zona 1".to_string(),
                    "Zona 2 & 3".to_string(),
                    "Zona 4".to_string(),
                ],
            }),
        }),
        report_date: ReportDateRule {
            filename: Some(r"tanggal (\d{1,2} \w{3} \d{4})".to_string()),
            ..ReportDateRule::default()
        },
        columns: ColumnRules {
            region: ColumnRule::constant("Region 1"),
            zone: ColumnRule::mapped(
                "Zona",
                &[
                    ("Zona 1", "Zone 1"),
                    ("Zona 2 & 3", "Zone 2&3"),
                    ("Zona 4", "Zone 4"),
                ],
                false,
            ),
            aph: ColumnRule::by_zone(&[("Zone 1", "PEP"), ("Zone 2&3", "PHR"), ("Zone 4", "PEP")]),
            rig_name: ColumnRule::field("RIG"),
            well_name: ColumnRule::field("Nama Sumur"),
            well_type: ColumnRule::mapped("Jenis Kegiatan", &[("Eksplorasi", "Exploration")], true),
            location: ColumnRule::constant("Onshore"),
            summary_report: ColumnRule::field("Kegiatan"),
            ..ColumnRules::default()
        },
        aph_overrides: Vec::new(),
        partitions: vec![
            Partition {
                zone: Some("Zone 1".to_string()),
                well_name: WellNameRule::Slash,
                summary: SummaryRule::PlanSplit,
                rig: RigRule {
                    strip_rig_token: true,
                    ..RigRule::default()
                },
                ..Partition::default()
            },
            Partition {
                zone: Some("Zone 2&3".to_string()),
                well_name: WellNameRule::Alternates,
                summary: SummaryRule::Labeled(LabeledSummary {
                    summary_label: Some("Laporan:".to_string()),
                    status_label: "Status Pagi".to_string(),
                    status_time: TimeStamp::Required,
                    plan_label: "Rencana:".to_string(),
                }),
                sort: vec![SortKey::new(Column::RigName)],
                ..Partition::default()
            },
            Partition {
                zone: Some("Zone 4".to_string()),
                well_name: WellNameRule::Parenthetical,
                summary: SummaryRule::Labeled(LabeledSummary {
                    summary_label: None,
                    status_label: "Status Pagi".to_string(),
                    status_time: TimeStamp::Optional,
                    plan_label: "Plan:".to_string(),
                }),
                rig: zone_4_rig,
                sort: vec![SortKey::new(Column::RigName)],
                ..Partition::default()
            },
        ],
        merge_sort: default_merge_sort(),
    }
}

fn region_2() -> UnitProfile {
    UnitProfile {
        name: "region-2".to_string(),
        description: "Region 2 drilling workbook (Zone 5 ONWJ, Zone 6 OSES)".to_string(),
        input: InputLayout::Sheet(SheetLayout {
            sheet: SheetSelector::Name {
                name: "Bor Report Region 02".to_string(),
            },
            header_row: 5,
            required_columns: [
                "Report Date",
                "Region",
                "Zone",
                "Unit Name",
                "Well Name/ Location",
                "Job Type",
                "Summary",
                "Next Plan",
            ]
            .iter()
            .map(|c| c.to_string())
            .collect(),
            zone_filter: Some(ZoneFilter {
                column: "Zone".to_string(),
                values: vec!["Zone_05".to_string(), "Zone_06".to_string()],
            }),
        }),
        report_date: ReportDateRule {
            field: Some("Report Date".to_string()),
            ..ReportDateRule::default()
        },
        columns: ColumnRules {
            region: ColumnRule::mapped("Region", &[("Reg_02", "Region 2")], true),
            zone: ColumnRule::mapped(
                "Zone",
                &[("Zone_05", "Zone 5"), ("Zone_06", "Zone 6")],
                false,
            ),
            aph: ColumnRule::by_zone(&[("Zone 5", "ONWJ"), ("Zone 6", "OSES")]),
            rig_name: ColumnRule::field("Unit Name"),
            well_name: ColumnRule::field("Well Name/ Location"),
            well_type: ColumnRule::mapped(
                "Job Type",
                &[("BOR EKS", "Exploration"), ("BOR DEV", "Development")],
                true,
            ),
            location: ColumnRule::constant("Offshore"),
            summary_report: ColumnRule::field("Summary"),
            next_plan: ColumnRule::field("Next Plan"),
            ..ColumnRules::default()
        },
        aph_overrides: Vec::new(),
        partitions: vec![Partition {
            rig: RigRule::default().with_aliases(&[("PVD-I", "PVD-II")]),
            sort: vec![SortKey::new(Column::Zone), SortKey::new(Column::RigName)],
            ..Partition::default()
        }],
        merge_sort: default_merge_sort(),
    }
}

fn region_5() -> UnitProfile {
    let assets = |algeria: &str, iraq: &str, malaysia: &str| {
        ColumnRule::mapped(
            "Asset",
            &[("ALGERIA", algeria), ("IRAQ", iraq), ("MALAYSIA", malaysia)],
            false,
        )
    };
    UnitProfile {
        name: "region-5".to_string(),
        description: "Region 5 international assets memo (Algeria, Iraq, Malaysia)".to_string(),
        input: InputLayout::Text(TextLayout {
            record_pattern: r"^\((\d+)\.\)\s*(.+)$".to_string(),
            group_pattern: Some(r"^ASSET\s*(.*)$".to_string()),
            group_field: Some("Asset".to_string()),
            title_field: Some("Region".to_string()),
            description: DescriptionSpec {
                style: DescriptionStyle::WellAndRig,
                well_field: Some("Well Name".to_string()),
                rig_field: Some("Rig Name".to_string()),
                ..DescriptionSpec::default()
            },
            fields: vec![FieldSpec::new(
                "Spud Date",
                &["* spud date"],
                LabelMatch::Exact,
                FieldKind::Date,
            )],
            sections: vec![
                SectionSpec::new("Current Operation", &["* current operation 24 hrs"], &[]),
                SectionSpec::new("Look Ahead", &["* 24 hrs look ahead"], &[]),
            ],
            stop_prefixes: vec!["*".to_string(), "---".to_string()],
            joiner: " ".to_string(),
            ..TextLayout::default()
        }),
        report_date: ReportDateRule {
            label: Some("Report Date".to_string()),
            ..ReportDateRule::default()
        },
        columns: ColumnRules {
            region: ColumnRule::Titled {
                name: "Region".to_string(),
            },
            zone: assets("Zone 15", "Zone 16", "Zone 17"),
            aph: ColumnRule::constant("PIEP"),
            rig_name: ColumnRule::field("Rig Name"),
            well_name: ColumnRule::field("Well Name"),
            well_type: ColumnRule::constant("Development"),
            location: assets("Onshore", "Onshore", "Offshore"),
            spud_date: ColumnRule::field("Spud Date"),
            summary_report: ColumnRule::field("Current Operation"),
            next_plan: ColumnRule::field("Look Ahead"),
            ..ColumnRules::default()
        },
        aph_overrides: Vec::new(),
        partitions: vec![sorted_by(&[
            SortKey::new(Column::Zone),
            SortKey::new(Column::RigName),
            SortKey::new(Column::WellName),
        ])],
        merge_sort: default_merge_sort(),
    }
}

fn zone_7() -> UnitProfile {
    let prefix = |name: &str, alias: &str| FieldSpec::text(name, &[alias], LabelMatch::Prefix);
    UnitProfile {
        name: "zone-7".to_string(),
        description: "Zone 7 morning drilling memo (Laporan Pagi Pemboran PEP)".to_string(),
        input: InputLayout::Text(TextLayout {
            record_pattern: SPACED_RECORD_PATTERN.to_string(),
            group_pattern: Some(r"^FIELD\s+(.+)$".to_string()),
            group_field: Some("Field".to_string()),
            require_group: true,
            require_description: true,
            terminators: vec!["Terima kasih".to_string(), "Salam".to_string()],
            description: DescriptionSpec {
                style: DescriptionStyle::Well,
                well_field: Some("Well Name".to_string()),
                ..DescriptionSpec::default()
            },
            fields: vec![
                prefix("Nama Lokasi", "nama lokasi"),
                prefix("Nama Rig", "nama rig"),
                prefix("Company Man", "coman on"),
                FieldSpec::new("Hari ke", &["hari ke"], LabelMatch::Prefix, FieldKind::Number),
                prefix("Kedalaman", "kedalaman"),
                prefix("DSR", "dsr"),
                prefix("AFE", "afe"),
                prefix("Realisasi", "realisasi"),
            ],
            sections: vec![
                SectionSpec::new("Summary Report", &[], &["summary report"]),
                SectionSpec::new("Current Status", &[], &["current status"]),
                SectionSpec::new("Next Plan", &[], &["next plan"]),
            ],
            stop_labels: vec![
                "penambahan".to_string(),
                "casing".to_string(),
                "plan".to_string(),
            ],
            ..TextLayout::default()
        }),
        report_date: ReportDateRule {
            filename: Some(r"(\d{4}-\d{2}-\d{2})".to_string()),
            ..ReportDateRule::default()
        },
        columns: ColumnRules {
            region: ColumnRule::constant("Region 2"),
            zone: ColumnRule::constant("Zone 7"),
            aph: ColumnRule::constant("PEP"),
            rig_name: ColumnRule::field("Nama Rig"),
            well_name: ColumnRule::field("Well Name"),
            well_type: ColumnRule::constant("Development"),
            location: ColumnRule::constant("Onshore"),
            summary_report: ColumnRule::field("Summary Report"),
            current_status: ColumnRule::field("Current Status"),
            next_plan: ColumnRule::field("Next Plan"),
            ..ColumnRules::default()
        },
        aph_overrides: Vec::new(),
        partitions: vec![Partition {
            summary_fallback: true,
            sort: vec![
                SortKey::new(Column::Zone),
                SortKey::new(Column::RigName),
                SortKey::new(Column::WellName),
            ],
            ..Partition::default()
        }],
        merge_sort: default_merge_sort(),
    }
}

fn zone_8() -> UnitProfile {
    let number = |name: &str, alias: &str| {
        FieldSpec::new(name, &[alias], LabelMatch::Prefix, FieldKind::Number)
    };
    UnitProfile {
        name: "zone-8".to_string(),
        description: "Zone 8 daily drilling memo (Laporan Harian DWI PHM)".to_string(),
        input: InputLayout::Text(TextLayout {
            truncate_at: Some("WELL INTERVENTION".to_string()),
            strip_chars: "*_".to_string(),
            fields: vec![
                FieldSpec::text("Nama Sumur", &["nama sumur"], LabelMatch::Prefix),
                FieldSpec::text("Nama Rig", &["nama rig"], LabelMatch::Prefix),
                number("Hari ke", "hari ke"),
                number("Kedalaman", "kedalaman"),
                number("Progres", "progres"),
                number("AFE", "afe"),
                number("Realisasi Biaya", "realisasi biaya"),
                FieldSpec::new("EMD", &["emd"], LabelMatch::Prefix, FieldKind::Date),
            ],
            sections: vec![
                SectionSpec::new("Summary Report", &[], &["summary report"]),
                SectionSpec::new("Current Status", &[], &["current status"]),
                SectionSpec::new("Next Plan", &[], &["next plan"]),
            ],
            capture: SectionCapture::First,
            ..TextLayout::default()
        }),
        report_date: ReportDateRule {
            filename: Some(r"(\d{4}-\d{2}-\d{2})".to_string()),
            ..ReportDateRule::default()
        },
        columns: ColumnRules {
            region: ColumnRule::constant("Region 3"),
            zone: ColumnRule::constant("Zone 8"),
            aph: ColumnRule::constant("PHM"),
            rig_name: ColumnRule::field("Nama Rig"),
            well_name: ColumnRule::field("Nama Sumur"),
            well_type: ColumnRule::constant("Development"),
            location: ColumnRule::constant("Offshore"),
            summary_report: ColumnRule::field("Summary Report"),
            current_status: ColumnRule::field("Current Status"),
            next_plan: ColumnRule::field("Next Plan"),
            ..ColumnRules::default()
        },
        aph_overrides: Vec::new(),
        partitions: vec![sorted_by(&[SortKey::case_insensitive(Column::RigName)])],
        merge_sort: default_merge_sort(),
    }
}

fn zone_9() -> UnitProfile {
    UnitProfile {
        name: "zone-9".to_string(),
        description: "Zone 9 morning drilling memo (Region 3 Zona 9)".to_string(),
        input: InputLayout::Text(TextLayout {
            group_pattern: Some(r"(?i)^field\s+(.+)$".to_string()),
            group_field: Some("Field".to_string()),
            strip_chars: "*".to_string(),
            description: DescriptionSpec {
                style: DescriptionStyle::WellWithAlternate,
                well_field: Some("Nama Sumur".to_string()),
                alternate_field: Some("Nama Sumur_2".to_string()),
                ..DescriptionSpec::default()
            },
            fields: vec![
                FieldSpec::text("Nama Rig", &["nama rig", "rig name"], LabelMatch::Exact),
                FieldSpec::new("WOL Hari ke", &["wol hari"], LabelMatch::Prefix, FieldKind::Number),
                FieldSpec::text(
                    "Hari ke",
                    &["hari ke", "days", "drilling days"],
                    LabelMatch::Exact,
                ),
                FieldSpec::new("AFE Cost", &["afe"], LabelMatch::Contains, FieldKind::Number),
                FieldSpec::new(
                    "Realisasi Biaya",
                    &["realisasi"],
                    LabelMatch::Contains,
                    FieldKind::Amount,
                ),
            ],
            sections: vec![
                SectionSpec::new("Summary Report", &["summary report", "24 hrs summary"], &[]),
                SectionSpec::new("Current Status", &["current status"], &[]),
                SectionSpec::new("Plan", &[], &["next plan", "plan"]),
            ],
            capture: SectionCapture::First,
            decoration: "-=".to_string(),
            trim_trailing_period: true,
            ..TextLayout::default()
        }),
        report_date: ReportDateRule {
            filename: Some(r"(\d{4}-\d{2}-\d{2})".to_string()),
            ..ReportDateRule::default()
        },
        columns: ColumnRules {
            region: ColumnRule::constant("Region 3"),
            zone: ColumnRule::constant("Zone 9"),
            aph: ColumnRule::constant("PHSS"),
            rig_name: ColumnRule::field("Nama Rig"),
            well_name: ColumnRule::field("Nama Sumur"),
            well_name_2: ColumnRule::field("Nama Sumur_2"),
            well_type: ColumnRule::constant("Development"),
            location: ColumnRule::constant("Onshore"),
            summary_report: ColumnRule::field("Summary Report"),
            current_status: ColumnRule::field("Current Status"),
            next_plan: ColumnRule::field("Plan"),
            ..ColumnRules::default()
        },
        aph_overrides: pdsi_is_pep(),
        partitions: vec![Partition {
            rig: RigRule {
                strip_rig_token: true,
                ..RigRule::default()
            }
            .with_aliases(&[("PDSI#21.2/OW 700-M", "PDSI #21.2/OW 700-M")]),
            sort: vec![SortKey::case_insensitive(Column::RigName)],
            ..Partition::default()
        }],
        merge_sort: default_merge_sort(),
    }
}

fn zone_10() -> UnitProfile {
    UnitProfile {
        name: "zone-10".to_string(),
        description: "Zone 10 morning drilling memo (Laporan Pagi Drilling Zona-10)".to_string(),
        input: InputLayout::Text(TextLayout {
            record_pattern: LETTERED_RECORD_PATTERN.to_string(),
            strip_chars: "*".to_string(),
            description: DescriptionSpec {
                style: DescriptionStyle::Well,
                well_field: Some("Nama Sumur".to_string()),
                ..DescriptionSpec::default()
            },
            fields: vec![
                FieldSpec::text("Nama Sumur", &["nama sumur", "well name"], LabelMatch::Exact),
                FieldSpec::text("Nama Rig", &["nama rig", "rig name"], LabelMatch::Exact),
                FieldSpec::new("AFE", &["afe"], LabelMatch::Prefix, FieldKind::Number),
                FieldSpec::new(
                    "Realisasi Biaya",
                    &["realisasi"],
                    LabelMatch::Prefix,
                    FieldKind::Amount,
                ),
            ],
            sections: vec![
                SectionSpec::new("Summary Report", &["summary report", "24 hrs summary"], &[]),
                SectionSpec::new("Morning Status", &["morning status", "current status"], &[]),
                SectionSpec::new("Next Plan", &["next plan", "plan ahead"], &["plan"]),
            ],
            stop_labels: [
                "hari ke",
                "est. tgl selesai",
                "kedalaman",
                "progres",
                "casing setting depth",
                "plan - actual",
                "penambahan",
                "dsr",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            joiner: " ".to_string(),
            decoration: "=".to_string(),
            ..TextLayout::default()
        }),
        report_date: ReportDateRule {
            filename: Some(r"(\d{4}-\d{2}-\d{2})".to_string()),
            ..ReportDateRule::default()
        },
        columns: ColumnRules {
            region: ColumnRule::constant("Region 3"),
            zone: ColumnRule::constant("Zone 10"),
            aph: ColumnRule::constant("PHKT"),
            rig_name: ColumnRule::field("Nama Rig"),
            well_name: ColumnRule::field("Nama Sumur"),
            well_type: ColumnRule::constant("Development"),
            location: ColumnRule::constant("Onshore"),
            summary_report: ColumnRule::field("Summary Report"),
            current_status: ColumnRule::field("Morning Status"),
            next_plan: ColumnRule::field("Next Plan"),
            ..ColumnRules::default()
        },
        aph_overrides: pdsi_is_pep(),
        partitions: vec![Partition {
            rig: RigRule {
                strip_rig_token: true,
                ..RigRule::default()
            },
            sort: vec![SortKey::case_insensitive(Column::RigName)],
            ..Partition::default()
        }],
        merge_sort: default_merge_sort(),
    }
}
