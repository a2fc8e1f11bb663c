//! Rendering of decoded stat responses as human-readable text blocks.
//!
//! Formatting is pure and never fails: absent sub-messages render as their
//! protobuf defaults, and timestamps are shown raw without validation. The
//! only locale-dependent piece is the human-readable local-time line, which
//! is derived from the raw seconds alone.

use chrono::{Local, TimeZone};
use prost_types::Timestamp;

use crate::proto::StatResponse;

/// Render one decoded response as a text block.
///
/// Successful responses list the path, size, symbolic mode, inode, hard
/// link count, owner and group, and the three stat timestamps. Failed
/// responses list only the path and the remote error text. Either way the
/// block ends with a blank line so consecutive renders stay visually
/// distinct.
pub fn format_response(response: &StatResponse) -> String {
    let status = response.status.clone().unwrap_or_default();
    if !status.success {
        return format!(
            "stat on \"{}\" failed:\n{}\n\n",
            response.path, status.error_details
        );
    }

    let extra = response.extra.clone().unwrap_or_default();
    let owner = extra.owner.clone().unwrap_or_default();
    let group = extra.owner_group.clone().unwrap_or_default();

    let mut block = format!(
        "path: {}\n\
         size: {} bytes\n\
         mode: {}\n\
         node: {}\n\
         hardlinks number: {}\n",
        response.path,
        response.size,
        file_mode_string(response.mode),
        extra.inode,
        extra.hardlinks_number,
    );
    block.push_str(&format!(
        "owner {{\n  uid: {}\n  name: \"{}\"\n}}\n",
        owner.uid, owner.name
    ));
    block.push_str(&format!(
        "owner group {{\n  gid: {}\n  name: \"{}\"\n}}\n",
        group.gid, group.name
    ));
    block.push_str(&format_timestamp(
        "last access",
        extra.last_access_time.as_ref(),
    ));
    block.push('\n');
    block.push_str(&format_timestamp(
        "last data modification",
        extra.last_data_modification_time.as_ref(),
    ));
    block.push('\n');
    block.push_str(&format_timestamp(
        "last status change",
        extra.last_status_change_time.as_ref(),
    ));
    block.push_str("\n\n");
    block
}

/// Render POSIX mode bits as the classic 10-character `-rwxr-xr-x` string,
/// including setuid/setgid/sticky (`s`/`S`, `t`/`T`) and the file type
/// character.
pub fn file_mode_string(mode: u32) -> String {
    let mut out = String::with_capacity(10);
    out.push(file_type_char(mode));
    out.push_str(&triad(mode >> 6, mode & 0o4000 != 0, 's'));
    out.push_str(&triad(mode >> 3, mode & 0o2000 != 0, 's'));
    out.push_str(&triad(mode, mode & 0o1000 != 0, 't'));
    out
}

fn file_type_char(mode: u32) -> char {
    match mode & 0o170000 {
        0o140000 => 's', // socket
        0o120000 => 'l', // symlink
        0o100000 => '-', // regular file
        0o060000 => 'b', // block device
        0o040000 => 'd', // directory
        0o020000 => 'c', // character device
        0o010000 => 'p', // fifo
        _ => '?',
    }
}

fn triad(bits: u32, special: bool, special_char: char) -> String {
    let r = if bits & 0o4 != 0 { 'r' } else { '-' };
    let w = if bits & 0o2 != 0 { 'w' } else { '-' };
    let x = match (bits & 0o1 != 0, special) {
        (true, false) => 'x',
        (false, false) => '-',
        (true, true) => special_char,
        (false, true) => special_char.to_ascii_uppercase(),
    };
    format!("{r}{w}{x}")
}

fn format_timestamp(label: &str, timestamp: Option<&Timestamp>) -> String {
    let ts = timestamp.cloned().unwrap_or_default();
    format!(
        "{} {{\n  seconds: {}\n  nanos: {}\n  human readable: \"{}\"\n}}",
        label,
        ts.seconds,
        ts.nanos,
        human_readable(ts.seconds)
    )
}

fn human_readable(seconds: i64) -> String {
    match Local.timestamp_opt(seconds, 0).earliest() {
        Some(time) => time.format("%Y-%m-%d %H:%M:%S").to_string(),
        None => "out of range".to_string(),
    }
}
