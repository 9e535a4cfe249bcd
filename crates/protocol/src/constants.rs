/// Form field carrying the JSON file manifest.
///
/// The server reads declared sizes from this field while it streams the
/// file parts, so it must be the first field of the multipart body.
pub const FILESIZE_FIELD: &str = "filesize";

/// Form field the selected files are posted under.
pub const DEFAULT_FILE_FIELD: &str = "upload";

/// Suffix appended to the page path to reach the push channel.
pub const PENDING_SUFFIX: &str = "pending";

/// Query parameter carrying the session identifier, on both the upload
/// request and the push channel.
pub const SESSION_QUERY_PARAM: &str = "id";

/// Maximum accepted size of one inbound push message (16 MiB).
pub const MAX_MESSAGE_SIZE: usize = 16 * 1024 * 1024;
