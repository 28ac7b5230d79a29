use serde::{Deserialize, Serialize};

/// Metadata the server reports for an INSERT, UPDATE or DELETE.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WriteOutcome {
    pub affected_rows: u64,
    pub insert_id: u64,
    pub warning_status: u16,
}

impl WriteOutcome {
    /// No row changed, no id generated, no warning raised: the statement
    /// matched nothing.
    pub fn touched_nothing(&self) -> bool {
        self.affected_rows == 0 && self.insert_id == 0 && self.warning_status == 0
    }
}
