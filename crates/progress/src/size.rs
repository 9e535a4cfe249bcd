use crate::ProgressError;

const PREFIXES: [&str; 4] = ["Ki", "Mi", "Gi", "Ti"];

/// Formats a byte count with binary prefixes, e.g. `2048` → `"2 KiB"`.
///
/// Floor-divides by 1024 while the value is at least 1024 and a prefix is
/// left, so anything from 1 PiB upwards is still shown in TiB.
pub fn format_size(bytes: u64) -> String {
    let mut value = bytes;
    let mut prefix = "";
    for next in PREFIXES {
        if value < 1024 {
            break;
        }
        value /= 1024;
        prefix = next;
    }
    format!("{value} {prefix}B")
}

/// Like [`format_size`] for sizes coming from signed sources.
pub fn try_format_size(bytes: i64) -> Result<String, ProgressError> {
    let bytes = u64::try_from(bytes)
        .map_err(|_| ProgressError::InvalidArgument(format!("negative size: {bytes}")))?;
    Ok(format_size(bytes))
}
