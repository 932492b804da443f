use chrono::NaiveDate;

/// MIME type of the downloaded brief.
pub const BRIEF_MIME_TYPE: &str = "text/markdown";

/// `marketing-brief-<YYYY-MM-DD>.md` for the given (UTC) date.
pub fn brief_filename(date: NaiveDate) -> String {
    format!("marketing-brief-{}.md", date.format("%Y-%m-%d"))
}
