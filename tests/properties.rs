use chrono::{Days, NaiveDate};
use ddr_normalize::{
    data::{Value, parse_number},
    extract::ParsedFields,
    mapper::SchemaMapper,
    normalize::{clean_free_text, split_well_name},
    units,
};
use proptest::prelude::*;

fn any_date() -> impl Strategy<Value = NaiveDate> {
    (2000i32..2100, 1u32..=12, 1u32..=28)
        .prop_map(|(y, m, d)| NaiveDate::from_ymd_opt(y, m, d).expect("valid date"))
}

const FREE_TEXT: &str = "[-:= \\t]{0,4}[A-Za-z0-9][A-Za-z0-9 ]{0,20}(\\n[-A-Za-z ]{0,10}){0,3}";
const WELL: &str = "[A-Z]{2,4}-[0-9]{1,3}";

proptest! {
    #[test]
    fn free_text_never_starts_with_formula_characters(raw in FREE_TEXT) {
        let cleaned = clean_free_text(&raw);
        prop_assert!(!cleaned.starts_with(['-', ':', '=']));
        prop_assert!(!cleaned.starts_with(char::is_whitespace));
        // Interior lines are left alone.
        if let Some((_, rest)) = raw.trim().split_once('\n') {
            prop_assert!(cleaned.ends_with(rest.trim_end()));
        }
    }

    #[test]
    fn operation_date_is_one_day_before_report_date(date in any_date(), well in WELL) {
        let profile = units::builtin("zone-8").expect("zone-8 profile");
        let mapper = SchemaMapper::new(&profile).expect("mapper");
        let fields: ParsedFields = [("Nama Sumur".to_string(), Some(Value::text(well.clone())))]
            .into_iter()
            .collect();
        let row = mapper.map(&fields, date).expect("row");
        prop_assert_eq!(row.report_date, date);
        prop_assert_eq!(row.operation_date, date.checked_sub_days(Days::new(1)).unwrap());
        prop_assert_eq!(row.well_name_2, Some(well));
    }

    #[test]
    fn parse_number_never_panics(raw in ".{0,24}") {
        if let Some(value) = parse_number(&raw) {
            prop_assert!(value.is_finite());
            prop_assert!(value >= 0.0);
        }
    }

    #[test]
    fn parenthetical_alternate_is_recovered(name in WELL, alt in "[A-Z]{2,4}-[0-9]{1,3}[A-Z]?") {
        let names = split_well_name(&format!("{name} ({alt})"));
        prop_assert_eq!(names.primary, name);
        prop_assert_eq!(names.secondary, alt);
    }
}
