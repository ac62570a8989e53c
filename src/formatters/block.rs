//! Block layer events.

use super::{split_dev, FormatterTable};
use crate::event::FieldView;

const BLOCK_BIO_REMAP: &str = r#""%d,%d %s %llu + %u <- (%d,%d) %llu", ((unsigned int) ((REC->dev) >> 20)), ((unsigned int) ((REC->dev) & ((1U << 20) - 1))), REC->rwbs, (unsigned long long)REC->sector, REC->nr_sector, ((unsigned int) ((REC->old_dev) >> 20)), ((unsigned int) ((REC->old_dev) & ((1U << 20) - 1))), (unsigned long long)REC->old_sector"#;
const BLOCK_RQ_ISSUE_HM: &str = r#""%d,%d %s %u (%s) %llu + %u [%s]", ((unsigned int) ((REC->dev) >> 20U)), ((unsigned int) ((REC->dev) & ((1U << 20U) - 1U))), REC->rwbs, REC->bytes, REC->cmd, (unsigned long long)REC->sector, REC->nr_sector, REC->comm"#;
const BLOCK_RQ_ISSUE_OR_INSERT: &str = r#""%d,%d %s %u (%s) %llu + %u [%s]", ((unsigned int) ((REC->dev) >> 20)), ((unsigned int) ((REC->dev) & ((1U << 20) - 1))), REC->rwbs, REC->bytes, __get_str(cmd), (unsigned long long)REC->sector, REC->nr_sector, REC->comm"#;
const BLOCK_RQ_COMPLETE_HM: &str = r#""%d,%d %s (%s) %llu + %u [%d]", ((unsigned int) ((REC->dev) >> 20U)), ((unsigned int) ((REC->dev) & ((1U << 20U) - 1U))), REC->rwbs, REC->cmd, (unsigned long long)REC->sector, REC->nr_sector, REC->error"#;
const BLOCK_RQ_COMPLETE: &str = r#""%d,%d %s (%s) %llu + %u [%d]", ((unsigned int) ((REC->dev) >> 20)), ((unsigned int) ((REC->dev) & ((1U << 20) - 1))), REC->rwbs, __get_str(cmd), (unsigned long long)REC->sector, REC->nr_sector, REC->error"#;

pub(super) fn register(table: &mut FormatterTable) {
    table.insert(BLOCK_BIO_REMAP, block_bio_remap);
    table.insert(BLOCK_RQ_ISSUE_HM, block_rq_issue_hm);
    table.insert(BLOCK_RQ_ISSUE_OR_INSERT, block_rq_issue_or_insert);
    table.insert(BLOCK_RQ_COMPLETE_HM, block_rq_complete_hm);
    table.insert(BLOCK_RQ_COMPLETE, block_rq_complete);
}

fn block_bio_remap(view: &FieldView<'_>) -> Option<String> {
    let (major, minor) = split_dev(view.uint("dev")?);
    let sector = view.uint("sector")?;
    let nr_sector = view.uint("nr_sector")?;
    let (old_major, old_minor) = split_dev(view.uint("old_dev")?);
    let old_sector = view.uint("old_sector")?;
    let rwbs = view.cstr("rwbs[8]")?;
    Some(format!(
        "{major},{minor} {rwbs} {sector} + {nr_sector} <- ({old_major},{old_minor}) {old_sector}"
    ))
}

fn block_rq_issue_hm(view: &FieldView<'_>) -> Option<String> {
    let (major, minor) = split_dev(view.uint("dev")?);
    let sector = view.uint("sector")?;
    let nr_sector = view.uint("nr_sector")?;
    let bytes = view.uint("bytes")?;
    let rwbs = view.cstr("rwbs[8]")?;
    let comm = view.cstr("comm[16]")?;
    let cmd = view.cstr("cmd[16]")?;
    Some(format!(
        "{major},{minor} {rwbs} {bytes} ({cmd}) {sector} + {nr_sector} [{comm}]"
    ))
}

fn block_rq_issue_or_insert(view: &FieldView<'_>) -> Option<String> {
    let (major, minor) = split_dev(view.uint("dev")?);
    let sector = view.uint("sector")?;
    let nr_sector = view.uint("nr_sector")?;
    let bytes = view.uint("bytes")?;
    let rwbs = view.cstr("rwbs[8]")?;
    let comm = view.cstr("comm[16]")?;
    let cmd = view.data_loc_str("cmd")?;
    Some(format!(
        "{major},{minor} {rwbs} {bytes} ({cmd}) {sector} + {nr_sector} [{comm}]"
    ))
}

fn block_rq_complete_hm(view: &FieldView<'_>) -> Option<String> {
    let (major, minor) = split_dev(view.uint("dev")?);
    let sector = view.uint("sector")?;
    let nr_sector = view.uint("nr_sector")?;
    let error = view.int("error")?;
    let rwbs = view.cstr("rwbs[8]")?;
    let cmd = view.cstr("cmd[16]")?;
    Some(format!(
        "{major},{minor} {rwbs} ({cmd}) {sector} + {nr_sector} [{error}]"
    ))
}

fn block_rq_complete(view: &FieldView<'_>) -> Option<String> {
    let (major, minor) = split_dev(view.uint("dev")?);
    let sector = view.uint("sector")?;
    let nr_sector = view.uint("nr_sector")?;
    let error = view.int("error")?;
    let rwbs = view.cstr("rwbs[8]")?;
    let cmd = view.data_loc_str("cmd")?;
    Some(format!(
        "{major},{minor} {rwbs} ({cmd}) {sector} + {nr_sector} [{error}]"
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::testutil::EventBuilder;

    #[test]
    fn rq_complete_splits_the_device_number() {
        let (format, payload) = EventBuilder::new("block_rq_complete", 70, BLOCK_RQ_COMPLETE)
            .common(0, 0, 1)
            .u32("dev", (8 << 20) | 17)
            .u64("sector", 2048)
            .u32("nr_sector", 8)
            .i32("error", 0)
            .str_field("rwbs[8]", "WS", 8)
            .data_loc("cmd", "")
            .build();
        let view = FieldView::new(&format, &payload);
        assert_eq!(
            block_rq_complete(&view).unwrap(),
            "8,17 WS () 2048 + 8 [0]"
        );
    }

    #[test]
    fn bio_remap_shows_both_devices() {
        let (format, payload) = EventBuilder::new("block_bio_remap", 71, BLOCK_BIO_REMAP)
            .common(0, 0, 1)
            .u32("dev", (259 << 20) | 2)
            .u64("sector", 1000)
            .u32("nr_sector", 16)
            .u32("old_dev", (8 << 20) | 1)
            .u64("old_sector", 500)
            .str_field("rwbs[8]", "R", 8)
            .build();
        let view = FieldView::new(&format, &payload);
        assert_eq!(
            block_bio_remap(&view).unwrap(),
            "259,2 R 1000 + 16 <- (8,1) 500"
        );
    }
}
