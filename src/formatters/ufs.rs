//! UFS host controller events.

use super::FormatterTable;
use crate::event::FieldView;

const UFSHCD_COMMAND_HM: &str = r#""%s: %s: tag: %u, DB: 0x%x, size: %d, IS: %u, LBA: %llu, opcode: 0x%x", REC->str, REC->dev_name, REC->tag, REC->doorbell, REC->transfer_len, REC->intr, REC->lba, (uint32_t)REC->opcode"#;
const UFSHCD_COMMAND: &str = r#""%s: %s: tag: %u, DB: 0x%x, size: %d, IS: %u, LBA: %llu, opcode: 0x%x (%s), group_id: 0x%x", __get_str(str), __get_str(dev_name), REC->tag, REC->doorbell, REC->transfer_len, REC->intr, REC->lba, (u32)REC->opcode, __print_symbolic(REC->opcode, { 0x8a, "WRITE_16" }, { 0x2a, "WRITE_10" }, { 0x88, "READ_16" }, { 0x28, "READ_10" }, { 0x35, "SYNC" }, { 0x42, "UNMAP" }), (u32)REC->group_id"#;
const UFSHCD_UPIU: &str = r#""%s: %s: HDR:%s, CDB:%s", __get_str(str), __get_str(dev_name), __print_hex(REC->hdr, sizeof(REC->hdr)), __print_hex(REC->tsf, sizeof(REC->tsf))"#;
const UFSHCD_UIC_COMMAND: &str = r#""%s: %s: cmd: 0x%x, arg1: 0x%x, arg2: 0x%x, arg3: 0x%x", __get_str(str), __get_str(dev_name), REC->cmd, REC->arg1, REC->arg2, REC->arg3"#;
const UFSHCD_FUNCS: &str = r#""%s: took %lld usecs, dev_state: %s, link_state: %s, err %d", __get_str(dev_name), REC->usecs, __print_symbolic(REC->dev_state, { 1, "UFS_ACTIVE_PWR_MODE" }, { 2, "UFS_SLEEP_PWR_MODE" }, { 3, "UFS_POWERDOWN_PWR_MODE" }), __print_symbolic(REC->link_state, { 0, "UIC_LINK_OFF_STATE" }, { 1, "UIC_LINK_ACTIVE_STATE" }, { 2, "UIC_LINK_HIBERN8_STATE" }), REC->err"#;
const UFSHCD_PROFILE_FUNCS: &str = r#""%s: %s: took %lld usecs, err %d", __get_str(dev_name), __get_str(profile_info), REC->time_us, REC->err"#;
const UFSHCD_AUTO_BKOPS_STATE: &str = r#""%s: auto bkops - %s", __get_str(dev_name), __get_str(state)"#;
const UFSHCD_CLK_SCALING: &str = r#""%s: %s %s from %u to %u Hz", __get_str(dev_name), __get_str(state), __get_str(clk), REC->prev_state, REC->curr_state"#;
const UFSHCD_CLK_GATING: &str = r#""%s: gating state changed to %s", __get_str(dev_name), __print_symbolic(REC->state, { 0, "CLKS_OFF" }, { 1, "CLKS_ON" }, { 2, "REQ_CLKS_OFF" }, { 3, "REQ_CLKS_ON" })"#;

pub(super) fn register(table: &mut FormatterTable) {
    table.insert(UFSHCD_COMMAND_HM, ufshcd_command_hm);
    table.insert(UFSHCD_COMMAND, ufshcd_command);
    table.insert(UFSHCD_UPIU, ufshcd_upiu);
    table.insert(UFSHCD_UIC_COMMAND, ufshcd_uic_command);
    table.insert(UFSHCD_FUNCS, ufshcd_funcs);
    table.insert(UFSHCD_PROFILE_FUNCS, ufshcd_profile_funcs);
    table.insert(UFSHCD_AUTO_BKOPS_STATE, ufshcd_auto_bkops_state);
    table.insert(UFSHCD_CLK_SCALING, ufshcd_clk_scaling);
    table.insert(UFSHCD_CLK_GATING, ufshcd_clk_gating);
}

fn ufshcd_command_hm(view: &FieldView<'_>) -> Option<String> {
    let dev_name = view.cstr("dev_name[16]")?;
    let command_str = view.cstr("str[16]")?;
    let tag = view.uint("tag")?;
    let doorbell = view.uint("doorbell")?;
    let transfer_len = view.int("transfer_len")?;
    let intr = view.uint("intr")?;
    let lba = view.uint("lba")?;
    let opcode = view.uint("opcode")?;
    Some(format!(
        "{command_str}: {dev_name}: tag: {tag}, DB: 0x{doorbell:x}, size: {transfer_len}, \
         IS: {intr}, LBA: {lba}, opcode: 0x{opcode:x}"
    ))
}

fn scsi_opcode_name(opcode: u64) -> &'static str {
    match opcode {
        0x8a => "WRITE_16",
        0x2a => "WRITE_10",
        0x88 => "READ_16",
        0x28 => "READ_10",
        0x35 => "SYNC",
        0x42 => "UNMAP",
        _ => "",
    }
}

fn ufshcd_command(view: &FieldView<'_>) -> Option<String> {
    let dev_name = view.data_loc_str("dev_name")?;
    let command_str = view.data_loc_str("str")?;
    let tag = view.uint("tag")?;
    let doorbell = view.uint("doorbell")?;
    let transfer_len = view.int("transfer_len")?;
    let intr = view.uint("intr")?;
    let lba = view.uint("lba")?;
    let opcode = view.uint("opcode")?;
    let group_id = view.uint("group_id")?;
    Some(format!(
        "{command_str}: {dev_name}: tag: {tag}, DB: 0x{doorbell:x}, size: {transfer_len}, \
         IS: {intr}, LBA: {lba}, opcode: 0x{opcode:x} ({}), group_id: 0x{group_id:x}",
        scsi_opcode_name(opcode)
    ))
}

/// The UPIU header and CDB are fixed byte arrays printed as one wide hex
/// number each (12 and 16 bytes, beyond u64).
fn ufshcd_upiu(view: &FieldView<'_>) -> Option<String> {
    let dev_name = view.data_loc_str("dev_name")?;
    let command_str = view.data_loc_str("str")?;
    let hdr = view.uint_wide("hdr[12]")?;
    let tsf = view.uint_wide("tsf[16]")?;
    Some(format!(
        "{command_str}: {dev_name}: HDR:0x{hdr:x}, CDB:0x{tsf:x}"
    ))
}

fn ufshcd_uic_command(view: &FieldView<'_>) -> Option<String> {
    let dev_name = view.data_loc_str("dev_name")?;
    let command_str = view.data_loc_str("str")?;
    let cmd = view.uint("cmd")?;
    let arg1 = view.uint("arg1")?;
    let arg2 = view.uint("arg2")?;
    let arg3 = view.uint("arg3")?;
    Some(format!(
        "{command_str}: {dev_name}: cmd: 0x{cmd:x}, arg1: 0x{arg1:x}, arg2: 0x{arg2:x}, \
         arg3: 0x{arg3:x}"
    ))
}

fn ufshcd_funcs(view: &FieldView<'_>) -> Option<String> {
    let usecs = view.int("usecs")?;
    let err = view.int("err")?;
    let dev_name = view.data_loc_str("dev_name")?;
    let dev_state = view.int("dev_state")?;
    let link_state = view.int("link_state")?;

    let dev_state = match dev_state {
        1 => "UFS_ACTIVE_PWR_MODE",
        2 => "UFS_SLEEP_PWR_MODE",
        3 => "UFS_POWERDOWN_PWR_MODE",
        _ => "",
    };
    let link_state = match link_state {
        0 => "UIC_LINK_OFF_STATE",
        1 => "UIC_LINK_ACTIVE_STATE",
        2 => "UIC_LINK_HIBERN8_STATE",
        _ => "",
    };
    Some(format!(
        "{dev_name}: took {usecs} usecs, dev_state: {dev_state}, link_state: {link_state}, \
         err {err}"
    ))
}

fn ufshcd_profile_funcs(view: &FieldView<'_>) -> Option<String> {
    let dev_name = view.data_loc_str("dev_name")?;
    let profile_info = view.data_loc_str("profile_info")?;
    let time_us = view.int("time_us")?;
    let err = view.int("err")?;
    Some(format!(
        "{dev_name}: {profile_info}: took {time_us} usecs, err {err}"
    ))
}

fn ufshcd_auto_bkops_state(view: &FieldView<'_>) -> Option<String> {
    let dev_name = view.data_loc_str("dev_name")?;
    let state = view.data_loc_str("state")?;
    Some(format!("{dev_name}: auto bkops - {state}"))
}

fn ufshcd_clk_scaling(view: &FieldView<'_>) -> Option<String> {
    let dev_name = view.data_loc_str("dev_name")?;
    let state = view.data_loc_str("state")?;
    let clk = view.data_loc_str("clk")?;
    let prev_state = view.uint("prev_state")?;
    let curr_state = view.uint("curr_state")?;
    Some(format!(
        "{dev_name}: {state} {clk} from {prev_state} to {curr_state} Hz"
    ))
}

fn ufshcd_clk_gating(view: &FieldView<'_>) -> Option<String> {
    let dev_name = view.data_loc_str("dev_name")?;
    let state = match view.int("state")? {
        0 => "CLKS_OFF",
        1 => "CLKS_ON",
        2 => "REQ_CLKS_OFF",
        3 => "REQ_CLKS_ON",
        _ => "",
    };
    Some(format!("{dev_name}: gating state changed to {state}"))
}
