//! MMC request events. The kernel templates for these are the longest in
//! the catalogue; their literal text, including the runs of spaces and the
//! `sbc_retires` spelling, is reproduced exactly.

use super::FormatterTable;
use crate::event::FieldView;

const MMC_REQUEST_START: &str = r#""%s: start struct mmc_request[%p]: cmd_opcode=%u cmd_arg=0x%x cmd_flags=0x%x cmd_retries=%u stop_opcode=%u stop_arg=0x%x stop_flags=0x%x stop_retries=%u sbc_opcode=%u sbc_arg=0x%x sbc_flags=0x%x sbc_retires=%u blocks=%u block_size=%u blk_addr=%u data_flags=0x%x tag=%d can_retune=%u doing_retune=%u retune_now=%u need_retune=%d hold_retune=%d retune_period=%u", __get_str(name), REC->mrq, REC->cmd_opcode, REC->cmd_arg, REC->cmd_flags, REC->cmd_retries, REC->stop_opcode, REC->stop_arg, REC->stop_flags, REC->stop_retries, REC->sbc_opcode, REC->sbc_arg, REC->sbc_flags, REC->sbc_retries, REC->blocks, REC->blksz, REC->blk_addr, REC->data_flags, REC->tag, REC->can_retune, REC->doing_retune, REC->retune_now, REC->need_retune, REC->hold_retune, REC->retune_period"#;
const MMC_REQUEST_DONE: &str = r#""%s: end struct mmc_request[%p]: cmd_opcode=%u cmd_err=%d cmd_resp=0x%x 0x%x 0x%x 0x%x cmd_retries=%u stop_opcode=%u stop_err=%d stop_resp=0x%x 0x%x 0x%x 0x%x stop_retries=%u sbc_opcode=%u sbc_err=%d sbc_resp=0x%x 0x%x 0x%x 0x%x sbc_retries=%u bytes_xfered=%u data_err=%d tag=%d can_retune=%u doing_retune=%u retune_now=%u need_retune=%d hold_retune=%d retune_period=%u", __get_str(name), REC->mrq, REC->cmd_opcode, REC->cmd_err, REC->cmd_resp[0], REC->cmd_resp[1], REC->cmd_resp[2], REC->cmd_resp[3], REC->cmd_retries, REC->stop_opcode, REC->stop_err, REC->stop_resp[0], REC->stop_resp[1], REC->stop_resp[2], REC->stop_resp[3], REC->stop_retries, REC->sbc_opcode, REC->sbc_err, REC->sbc_resp[0], REC->sbc_resp[1], REC->sbc_resp[2], REC->sbc_resp[3], REC->sbc_retries, REC->bytes_xfered, REC->data_err, REC->tag, REC->can_retune, REC->doing_retune, REC->retune_now, REC->need_retune, REC->hold_retune, REC->retune_period"#;

pub(super) fn register(table: &mut FormatterTable) {
    table.insert(MMC_REQUEST_START, mmc_request_start);
    table.insert(MMC_REQUEST_DONE, mmc_request_done);
}

/// First four bytes of a response register field, printed individually.
fn resp_bytes(view: &FieldView<'_>, name: &str) -> Option<[u8; 4]> {
    let bytes = view.bytes(name)?;
    bytes.get(..4)?.try_into().ok()
}

fn mmc_request_start(view: &FieldView<'_>) -> Option<String> {
    let name = view.cstr("name")?;
    let mrq = view.uint("mrq")?;
    let cmd_opcode = view.uint("cmd_opcode")?;
    let cmd_arg = view.uint("cmd_arg")?;
    let cmd_flags = view.uint("cmd_flags")?;
    let cmd_retries = view.uint("cmd_retries")?;
    let stop_opcode = view.uint("stop_opcode")?;
    let stop_arg = view.uint("stop_arg")?;
    let stop_flags = view.uint("stop_flags")?;
    let stop_retries = view.uint("stop_retries")?;
    let sbc_opcode = view.uint("sbc_opcode")?;
    let sbc_arg = view.uint("sbc_arg")?;
    let sbc_flags = view.uint("sbc_flags")?;
    let sbc_retries = view.uint("sbc_retries")?;
    let blocks = view.uint("blocks")?;
    let blk_addr = view.uint("blk_addr")?;
    let blksz = view.uint("blksz")?;
    let data_flags = view.uint("data_flags")?;
    let tag = view.int("tag")?;
    let can_retune = view.uint("can_retune")?;
    let doing_retune = view.uint("doing_retune")?;
    let retune_now = view.uint("retune_now")?;
    let need_retune = view.uint("need_retune")?;
    let hold_retune = view.int("hold_retune")?;
    let retune_period = view.int("retune_period")?;

    Some(format!("{name}: start struct mmc_request[0x{mrq:x}]: cmd_opcode={cmd_opcode} cmd_arg=0x{cmd_arg:x} cmd_flags=0x{cmd_flags:x}     cmd_retries={cmd_retries} stop_opcode={stop_opcode} stop_arg=0x{stop_arg:x} stop_flags=0x{stop_flags:x} stop_retries={stop_retries} sbc_opcode={sbc_opcode}     sbc_arg=0x{sbc_arg:x} sbc_flags=0x{sbc_flags:x} sbc_retires={sbc_retries} blocks={blocks} block_size={blksz} blk_addr={blk_addr} data_flags=0x{data_flags:x}     tag={tag} can_retune={can_retune} doing_retune={doing_retune} retune_now={retune_now} need_retune={need_retune} hold_retune={hold_retune} retune_period={retune_period}"))
}

fn mmc_request_done(view: &FieldView<'_>) -> Option<String> {
    let name = view.cstr("name")?;
    let mrq = view.uint("mrq")?;
    let cmd_opcode = view.uint("cmd_opcode")?;
    let cmd_err = view.int("cmd_err")?;
    let cmd_resp = resp_bytes(view, "cmd_resp")?;
    let cmd_retries = view.uint("cmd_retries")?;
    let stop_opcode = view.uint("stop_opcode")?;
    let stop_err = view.int("stop_err")?;
    let stop_resp = resp_bytes(view, "stop_resp")?;
    let stop_retries = view.uint("stop_retries")?;
    let sbc_opcode = view.uint("sbc_opcode")?;
    let sbc_err = view.int("sbc_err")?;
    let sbc_resp = resp_bytes(view, "sbc_resp")?;
    let sbc_retries = view.uint("sbc_retries")?;
    let bytes_xfered = view.uint("bytes_xfered")?;
    let data_err = view.int("data_err")?;
    let tag = view.int("tag")?;
    let can_retune = view.uint("can_retune")?;
    let doing_retune = view.uint("doing_retune")?;
    let retune_now = view.uint("retune_now")?;
    let need_retune = view.int("need_retune")?;
    let hold_retune = view.int("hold_retune")?;
    let retune_period = view.uint("retune_period")?;

    Some(format!("{name}: end struct mmc_request[0x{mrq:x}]: cmd_opcode={cmd_opcode} cmd_err={cmd_err} cmd_resp=0x{:x} 0x{:x} 0x{:x} 0x{:x}     cmd_retries={cmd_retries} stop_opcode={stop_opcode} stop_err={stop_err} stop_resp=0x{:x} 0x{:x} 0x{:x} 0x{:x} stop_retries={stop_retries} sbc_opcode={sbc_opcode}     sbc_err={sbc_err} sbc_resp=0x{:x} 0x{:x} 0x{:x} 0x{:x} sbc_retries={sbc_retries} bytes_xfered={bytes_xfered} data_err={data_err} tag={tag} can_retune={can_retune}     doing_retune={doing_retune} retune_now={retune_now} need_retune={need_retune} hold_retune={hold_retune} retune_period={retune_period}",
        cmd_resp[0], cmd_resp[1], cmd_resp[2], cmd_resp[3],
        stop_resp[0], stop_resp[1], stop_resp[2], stop_resp[3],
        sbc_resp[0], sbc_resp[1], sbc_resp[2], sbc_resp[3]))
}
