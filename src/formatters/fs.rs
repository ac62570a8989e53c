//! Filesystem events: ext4 delayed allocation and fsync, filemap page
//! cache and writeback-error tracking.

use super::{split_dev, FormatterTable};
use crate::event::FieldView;

const EXT4_DA_WRITE_BEGIN: &str = r#""dev %d,%d ino %lu pos %lld len %u flags %u", ((unsigned int) ((REC->dev) >> 20)), ((unsigned int) ((REC->dev) & ((1U << 20) - 1))), (unsigned long) REC->ino, REC->pos, REC->len, REC->flags"#;
const EXT4_DA_WRITE_END: &str = r#""dev %d,%d ino %lu pos %lld len %u copied %u", ((unsigned int) ((REC->dev) >> 20)), ((unsigned int) ((REC->dev) & ((1U << 20) - 1))), (unsigned long) REC->ino, REC->pos, REC->len, REC->copied"#;
const EXT4_SYNC_FILE_ENTER: &str = r#""dev %d,%d ino %lu parent %lu datasync %d ", ((unsigned int) ((REC->dev) >> 20)), ((unsigned int) ((REC->dev) & ((1U << 20) - 1))), (unsigned long) REC->ino, (unsigned long) REC->parent, REC->datasync"#;
const EXT4_SYNC_FILE_EXIT: &str = r#""dev %d,%d ino %lu ret %d", ((unsigned int) ((REC->dev) >> 20)), ((unsigned int) ((REC->dev) & ((1U << 20) - 1))), (unsigned long) REC->ino, REC->ret"#;
const FILE_CHECK_AND_ADVANCE_WB_ERR: &str = r#""file=%p dev=%d:%d ino=0x%lx old=0x%x new=0x%x", REC->file, ((unsigned int)((REC->s_dev) >> 20)), ((unsigned int)((REC->s_dev) & ((1U << 20) - 1))), REC->i_ino, REC->old, REC->new"#;
const FILEMAP_SET_WB_ERR: &str = r#""dev=%d:%d ino=0x%lx errseq=0x%x", ((unsigned int)((REC->s_dev) >> 20)), ((unsigned int)((REC->s_dev) & ((1U << 20) - 1))), REC->i_ino, REC->errseq"#;
const MM_FILEMAP_ADD_OR_DELETE_PAGE_CACHE: &str = r#""dev %d:%d ino %lx page=%px pfn=%lu ofs=%lu", ((unsigned int)((REC->s_dev) >> 20)), ((unsigned int)((REC->s_dev) & ((1U << 20) - 1))), REC->i_ino, REC->pg, REC->pfn, REC->index << 12"#;

pub(super) fn register(table: &mut FormatterTable) {
    table.insert(EXT4_DA_WRITE_BEGIN, ext4_da_write_begin);
    table.insert(EXT4_DA_WRITE_END, ext4_da_write_end);
    table.insert(EXT4_SYNC_FILE_ENTER, ext4_sync_file_enter);
    table.insert(EXT4_SYNC_FILE_EXIT, ext4_sync_file_exit);
    table.insert(FILE_CHECK_AND_ADVANCE_WB_ERR, file_check_and_advance_wb_err);
    table.insert(FILEMAP_SET_WB_ERR, filemap_set_wb_err);
    table.insert(
        MM_FILEMAP_ADD_OR_DELETE_PAGE_CACHE,
        mm_filemap_page_cache_op,
    );
}

fn ext4_da_write_begin(view: &FieldView<'_>) -> Option<String> {
    let (major, minor) = split_dev(view.uint("dev")?);
    let ino = view.uint("ino")?;
    let pos = view.int("pos")?;
    let len = view.uint("len")?;
    let flags = view.uint("flags")?;
    Some(format!(
        "dev {major},{minor} ino {ino} pos {pos} len {len} flags {flags}"
    ))
}

fn ext4_da_write_end(view: &FieldView<'_>) -> Option<String> {
    let (major, minor) = split_dev(view.uint("dev")?);
    let ino = view.uint("ino")?;
    let pos = view.int("pos")?;
    let len = view.uint("len")?;
    let copied = view.uint("copied")?;
    Some(format!(
        "dev {major},{minor} ino {ino} pos {pos} len {len} copied {copied}"
    ))
}

fn ext4_sync_file_enter(view: &FieldView<'_>) -> Option<String> {
    let (major, minor) = split_dev(view.uint("dev")?);
    let ino = view.uint("ino")?;
    let parent = view.uint("parent")?;
    let datasync = view.int("datasync")?;
    // The kernel template carries a trailing space here.
    Some(format!(
        "dev {major},{minor} ino {ino} parent {parent} datasync {datasync} "
    ))
}

fn ext4_sync_file_exit(view: &FieldView<'_>) -> Option<String> {
    let (major, minor) = split_dev(view.uint("dev")?);
    let ino = view.uint("ino")?;
    let ret = view.int("ret")?;
    Some(format!("dev {major},{minor} ino {ino} ret {ret}"))
}

fn file_check_and_advance_wb_err(view: &FieldView<'_>) -> Option<String> {
    let file = view.uint("file")?;
    let i_ino = view.uint("i_ino")?;
    let (major, minor) = split_dev(view.uint("s_dev")?);
    let old = view.uint("old")?;
    let new = view.uint("new")?;
    Some(format!(
        "file=0x{file:x} dev={major}:{minor} ino=0x{i_ino:x} old=0x{old:x} new=0x{new:x}"
    ))
}

fn filemap_set_wb_err(view: &FieldView<'_>) -> Option<String> {
    let i_ino = view.uint("i_ino")?;
    let (major, minor) = split_dev(view.uint("s_dev")?);
    let errseq = view.uint("errseq")?;
    Some(format!(
        "dev={major}:{minor} ino=0x{i_ino:x} errseq=0x{errseq:x}"
    ))
}

fn mm_filemap_page_cache_op(view: &FieldView<'_>) -> Option<String> {
    let pfn = view.uint("pfn")?;
    let i_ino = view.uint("i_ino")?;
    let index = view.uint("index")?;
    let (major, minor) = split_dev(view.uint("s_dev")?);
    let pg = view.uint("pg")?;
    Some(format!(
        "dev {major}:{minor} ino 0x{i_ino:x} page=0x{pg:x} pfn={pfn} ofs={}",
        index << 12
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::testutil::EventBuilder;

    #[test]
    fn da_write_begin() {
        let (format, payload) = EventBuilder::new("ext4_da_write_begin", 60, EXT4_DA_WRITE_BEGIN)
            .common(0, 0, 1)
            .u32("dev", (254 << 20) | 6)
            .u64("ino", 1337)
            .i64("pos", 8192)
            .u32("len", 512)
            .u32("flags", 0)
            .build();
        let view = FieldView::new(&format, &payload);
        assert_eq!(
            ext4_da_write_begin(&view).unwrap(),
            "dev 254,6 ino 1337 pos 8192 len 512 flags 0"
        );
    }

    #[test]
    fn sync_file_enter_keeps_trailing_space() {
        let (format, payload) = EventBuilder::new("ext4_sync_file_enter", 61, EXT4_SYNC_FILE_ENTER)
            .common(0, 0, 1)
            .u32("dev", (254 << 20) | 6)
            .u64("ino", 1337)
            .u64("parent", 2)
            .i32("datasync", 1)
            .build();
        let view = FieldView::new(&format, &payload);
        assert_eq!(
            ext4_sync_file_enter(&view).unwrap(),
            "dev 254,6 ino 1337 parent 2 datasync 1 "
        );
    }

    #[test]
    fn filemap_index_becomes_a_byte_offset() {
        let (format, payload) = EventBuilder::new(
            "mm_filemap_add_to_page_cache",
            62,
            MM_FILEMAP_ADD_OR_DELETE_PAGE_CACHE,
        )
        .common(0, 0, 1)
        .u64("pfn", 99)
        .u64("i_ino", 0x1f)
        .u64("index", 3)
        .u32("s_dev", (254 << 20) | 6)
        .u64("pg", 0xffffffc012345678)
        .build();
        let view = FieldView::new(&format, &payload);
        assert_eq!(
            mm_filemap_page_cache_op(&view).unwrap(),
            "dev 254:6 ino 0x1f page=0xffffffc012345678 pfn=99 ofs=12288"
        );
    }
}
