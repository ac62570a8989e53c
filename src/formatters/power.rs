//! CPU frequency/idle and clock events.

use super::FormatterTable;
use crate::event::FieldView;

const CPU_FREQUENCY_HM: &str = r#""state=%u cpu_id=%u", REC->state, REC->cpu_id"#;
const CPU_FREQUENCY: &str = r#""state=%lu cpu_id=%lu", (unsigned long)REC->state, (unsigned long)REC->cpu_id"#;
const CLOCK_SET_RATE_HM: &str = r#""%s state=%lu cpu_id=%lu", ((char *)((void *)((char *)REC + (REC->__data_loc_name & 0xffff)))), (unsigned long)REC->state, (unsigned long)REC->cpu_id"#;
const CLOCK_SET_RATE: &str = r#""%s state=%lu cpu_id=%lu", __get_str(name), (unsigned long)REC->state, (unsigned long)REC->cpu_id"#;
const CPU_FREQUENCY_LIMITS_HM: &str = r#""min=%lu max=%lu cpu_id=%lu", (unsigned long)REC->min, (unsigned long)REC->max, (unsigned long)REC->cpu_id"#;
const CPU_FREQUENCY_LIMITS: &str = r#""min=%lu max=%lu cpu_id=%lu", (unsigned long)REC->min_freq, (unsigned long)REC->max_freq, (unsigned long)REC->cpu_id"#;
const CPU_IDLE_HM: &str = r#""state=%u cpu_id=%u", REC->state, REC->cpu_id"#;
const CPU_IDLE: &str = r#""state=%lu cpu_id=%lu", (unsigned long)REC->state, (unsigned long)REC->cpu_id"#;

pub(super) fn register(table: &mut FormatterTable) {
    // cpu_frequency and cpu_idle share field names across both kernel
    // variants, so one formatter serves both keys. (The two _HM keys are
    // identical strings; the table simply holds one entry for them.)
    table.insert(CPU_FREQUENCY_HM, cpu_frequency);
    table.insert(CPU_FREQUENCY, cpu_frequency);
    table.insert(CLOCK_SET_RATE_HM, clock_set_rate);
    table.insert(CLOCK_SET_RATE, clock_set_rate);
    table.insert(CPU_FREQUENCY_LIMITS_HM, cpu_frequency_limits_hm);
    table.insert(CPU_FREQUENCY_LIMITS, cpu_frequency_limits);
    table.insert(CPU_IDLE_HM, cpu_idle);
    table.insert(CPU_IDLE, cpu_idle);
}

fn cpu_frequency(view: &FieldView<'_>) -> Option<String> {
    let state = view.uint("state")?;
    let cpu_id = view.uint("cpu_id")?;
    Some(format!("state={state} cpu_id={cpu_id}"))
}

fn clock_set_rate(view: &FieldView<'_>) -> Option<String> {
    let name = view.data_loc_str("name")?;
    let state = view.uint("state")?;
    let cpu_id = view.uint("cpu_id")?;
    Some(format!("{name} state={state} cpu_id={cpu_id}"))
}

fn cpu_frequency_limits_hm(view: &FieldView<'_>) -> Option<String> {
    let min = view.uint("min")?;
    let max = view.uint("max")?;
    let cpu_id = view.uint("cpu_id")?;
    Some(format!("min={min} max={max} cpu_id={cpu_id}"))
}

fn cpu_frequency_limits(view: &FieldView<'_>) -> Option<String> {
    let min = view.uint("min_freq")?;
    let max = view.uint("max_freq")?;
    let cpu_id = view.uint("cpu_id")?;
    Some(format!("min={min} max={max} cpu_id={cpu_id}"))
}

fn cpu_idle(view: &FieldView<'_>) -> Option<String> {
    let state = view.uint("state")?;
    let cpu_id = view.uint("cpu_id")?;
    Some(format!("state={state} cpu_id={cpu_id}"))
}
