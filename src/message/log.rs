use super::record::MessageRecord;

/// Append-only, ordered log of chat messages.
///
/// Entries are never edited, removed or reordered; iteration order is
/// append order.
#[derive(Debug, Default, Clone)]
pub struct MessageLog {
    records: Vec<MessageRecord>,
}

impl MessageLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a record and return a reference to the stored entry
    pub fn append(&mut self, record: MessageRecord) -> &MessageRecord {
        self.records.push(record);
        &self.records[self.records.len() - 1]
    }

    /// All records in append order
    pub fn snapshot(&self) -> &[MessageRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn last(&self) -> Option<&MessageRecord> {
        self.records.last()
    }

    pub fn iter(&self) -> impl Iterator<Item = &MessageRecord> {
        self.records.iter()
    }
}
