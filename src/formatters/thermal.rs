//! Thermal power-allocator events.

use super::FormatterTable;
use crate::event::FieldView;

const THERMAL_POWER_ALLOCATOR: &str = r#""thermal_zone_id=%d req_power={%s} total_req_power=%u granted_power={%s} total_granted_power=%u power_range=%u max_allocatable_power=%u current_temperature=%d delta_temperature=%d", REC->tz_id, __print_array(__get_dynamic_array(req_power), REC->num_actors, 4), REC->total_req_power, __print_array(__get_dynamic_array(granted_power), REC->num_actors, 4), REC->total_granted_power, REC->power_range, REC->max_allocatable_power, REC->current_temp, REC->delta_temp"#;
const THERMAL_POWER_ALLOCATOR_PID: &str = r#""thermal_zone_id=%d err=%d err_integral=%d p=%lld i=%lld d=%lld output=%d", REC->tz_id, REC->err, REC->err_integral, REC->p, REC->i, REC->d, REC->output"#;

pub(super) fn register(table: &mut FormatterTable) {
    table.insert(THERMAL_POWER_ALLOCATOR, thermal_power_allocator);
    table.insert(THERMAL_POWER_ALLOCATOR_PID, thermal_power_allocator_pid);
}

/// `{b0, b1, ...}` over the bytes of a dynamic array, `num_actors` entries
/// of 4 bytes each, clamped to what the payload actually holds.
fn power_array(view: &FieldView<'_>, name: &str, num_actors: u64) -> Option<String> {
    let loc = (view.uint(name)? & 0xffff) as usize;
    let tail = view.payload_at(loc)?;
    let len = tail.len().min(num_actors as usize * 4);
    let entries: Vec<String> = tail[..len].iter().map(|b| b.to_string()).collect();
    Some(format!("{{{}}}", entries.join(", ")))
}

fn thermal_power_allocator(view: &FieldView<'_>) -> Option<String> {
    let tz_id = view.int("tz_id")?;
    let num_actors = view.uint("num_actors")?;
    let req_power = power_array(view, "req_power", num_actors)?;
    let total_req_power = view.uint("total_req_power")?;
    let granted_power = power_array(view, "granted_power", num_actors)?;
    let total_granted_power = view.uint("total_granted_power")?;
    let power_range = view.uint("power_range")?;
    let max_allocatable_power = view.uint("max_allocatable_power")?;
    let current_temp = view.int("current_temp")?;
    let delta_temp = view.int("delta_temp")?;

    Some(format!("thermal_zone_id={tz_id} req_power={req_power} total_req_power={total_req_power} granted_power={granted_power} total_granted_power={total_granted_power}     power_range={power_range} max_allocatable_power={max_allocatable_power} current_temperature={current_temp} delta_temperature={delta_temp}"))
}

fn thermal_power_allocator_pid(view: &FieldView<'_>) -> Option<String> {
    let tz_id = view.int("tz_id")?;
    let err = view.int("err")?;
    let err_integral = view.int("err_integral")?;
    let p = view.int("p")?;
    let i = view.int("i")?;
    let d = view.int("d")?;
    let output = view.int("output")?;
    Some(format!(
        "thermal_zone_id={tz_id} err={err} err_integral={err_integral} p={p} i={i} d={d} \
         output={output}"
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::testutil::EventBuilder;

    #[test]
    fn power_arrays_print_bytewise() {
        let (format, payload) = EventBuilder::new("thermal_power_allocator", 95, THERMAL_POWER_ALLOCATOR)
            .common(0, 0, 1)
            .i32("tz_id", 3)
            .data_loc("req_power", "\u{9}\u{8}\u{7}\u{6}")
            .u32("total_req_power", 100)
            .data_loc("granted_power", "\u{1}\u{2}\u{3}\u{4}")
            .u32("total_granted_power", 90)
            .u32("num_actors", 1)
            .u32("power_range", 5)
            .u32("max_allocatable_power", 200)
            .i32("current_temp", 45)
            .i32("delta_temp", -2)
            .build();
        let view = FieldView::new(&format, &payload);
        assert_eq!(
            thermal_power_allocator(&view).unwrap(),
            "thermal_zone_id=3 req_power={9, 8, 7, 6} total_req_power=100 \
             granted_power={1, 2, 3, 4} total_granted_power=90     power_range=5 \
             max_allocatable_power=200 current_temperature=45 delta_temperature=-2"
        );
    }
}
