use crate::domain::CallRecord;

/// Receives the full record list after every change to a call history.
pub trait CallHistoryEventTarget {
    fn call_history_did_update(&self, records: &[CallRecord]);
}

pub trait CallHistory {
    fn all_records(&self) -> &[CallRecord];
    fn add(&mut self, record: CallRecord);
    fn remove(&mut self, record: &CallRecord);
    fn remove_all(&mut self);
    fn update_target(&mut self, target: Box<dyn CallHistoryEventTarget>);
}

#[derive(Default)]
pub struct InMemoryCallHistory {
    records: Vec<CallRecord>,
    target: Option<Box<dyn CallHistoryEventTarget>>,
}

impl InMemoryCallHistory {
    pub fn new() -> Self {
        Self::default()
    }

    fn notify(&self) {
        if let Some(target) = &self.target {
            target.call_history_did_update(&self.records);
        }
    }
}

impl CallHistory for InMemoryCallHistory {
    fn all_records(&self) -> &[CallRecord] {
        &self.records
    }

    fn add(&mut self, record: CallRecord) {
        self.records.push(record);
        self.notify();
    }

    /// Drops the first record equal to `record`, if any.
    fn remove(&mut self, record: &CallRecord) {
        if let Some(position) = self.records.iter().position(|item| item == record) {
            self.records.remove(position);
            self.notify();
        }
    }

    fn remove_all(&mut self) {
        self.records.clear();
        self.notify();
    }

    fn update_target(&mut self, target: Box<dyn CallHistoryEventTarget>) {
        self.target = Some(target);
    }
}
