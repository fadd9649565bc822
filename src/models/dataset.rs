use crate::models::{EnrichedRecord, RawRecord};

/// Both rental files as read from disk.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawDataset {
    pub day: Vec<RawRecord>,
    pub hour: Vec<RawRecord>,
}

impl RawDataset {
    pub fn new(day: Vec<RawRecord>, hour: Vec<RawRecord>) -> Self {
        Self { day, hour }
    }

    pub fn total_records(&self) -> usize {
        self.day.len() + self.hour.len()
    }
}

/// Both rental files after normalization. Immutable once built.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    pub day: Vec<EnrichedRecord>,
    pub hour: Vec<EnrichedRecord>,
}

impl Dataset {
    pub fn new(day: Vec<EnrichedRecord>, hour: Vec<EnrichedRecord>) -> Self {
        Self { day, hour }
    }

    pub fn total_records(&self) -> usize {
        self.day.len() + self.hour.len()
    }

    pub fn is_empty(&self) -> bool {
        self.day.is_empty() && self.hour.is_empty()
    }
}
