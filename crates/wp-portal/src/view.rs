use chrono::{DateTime, Utc};
use wp_types::{Account, WaveRecord};

const TIME_FORMAT: &str = "%a %b %d %Y %H:%M:%S UTC";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewState {
    pub account: Option<Account>,
    pub draft: String,
    pub waves: Vec<WaveRecord>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WaveRow {
    pub address: String,
    pub time: String,
    pub message: String,
}

/// Everything the page shows, in display order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageView {
    pub show_connect: bool,
    pub draft: String,
    pub rows: Vec<WaveRow>,
}

impl WaveRow {
    /// Labelled lines of one `.wave-log` entry, in display order.
    pub fn fields(&self) -> [(&'static str, &str); 3] {
        [
            ("Waver", self.address.as_str()),
            ("Time", self.time.as_str()),
            ("Message", self.message.as_str()),
        ]
    }
}

pub trait Renderer {
    fn render(&self, page: &PageView);
}

pub fn format_time(timestamp: &DateTime<Utc>) -> String {
    timestamp.format(TIME_FORMAT).to_string()
}

impl From<&WaveRecord> for WaveRow {
    fn from(record: &WaveRecord) -> Self {
        Self {
            address: record.address.clone(),
            time: format_time(&record.timestamp),
            message: record.message.clone(),
        }
    }
}

impl From<&ViewState> for PageView {
    fn from(state: &ViewState) -> Self {
        Self {
            show_connect: state.account.is_none(),
            draft: state.draft.clone(),
            rows: state.waves.iter().map(WaveRow::from).collect(),
        }
    }
}
