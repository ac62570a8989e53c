//! Voltage regulator events.

use super::FormatterTable;
use crate::event::FieldView;

const REGULATOR_SET_VOLTAGE_COMPLETE: &str = r#""name=%s, val=%u", __get_str(name), (int)REC->val"#;
const REGULATOR_SET_VOLTAGE: &str = r#""name=%s (%d-%d)", __get_str(name), (int)REC->min, (int)REC->max"#;
const REGULATOR_FUNCS: &str = r#""name=%s", __get_str(name)"#;

pub(super) fn register(table: &mut FormatterTable) {
    table.insert(REGULATOR_SET_VOLTAGE_COMPLETE, regulator_set_voltage_complete);
    table.insert(REGULATOR_SET_VOLTAGE, regulator_set_voltage);
    table.insert(REGULATOR_FUNCS, regulator_funcs);
}

fn regulator_set_voltage_complete(view: &FieldView<'_>) -> Option<String> {
    let name = view.data_loc_str("name")?;
    let val = view.uint("val")?;
    Some(format!("name={name}, val={val}"))
}

fn regulator_set_voltage(view: &FieldView<'_>) -> Option<String> {
    let name = view.data_loc_str("name")?;
    let min = view.int("min")?;
    let max = view.int("max")?;
    Some(format!("name={name} ({min}-{max})"))
}

fn regulator_funcs(view: &FieldView<'_>) -> Option<String> {
    let name = view.data_loc_str("name")?;
    Some(format!("name={name}"))
}
