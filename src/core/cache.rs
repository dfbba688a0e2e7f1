use std::collections::HashMap;

use crate::core::inverter::InverterReading;

/// Last accepted reading per inverter serial number.
///
/// Entries are never evicted: an inverter that goes silent keeps its last reading for the
/// lifetime of the process.
#[must_use]
#[derive(Default)]
pub struct ChangeCache(HashMap<String, InverterReading>);

impl ChangeCache {
    /// Store the reading and tell whether it differs from the known one.
    ///
    /// Readings are compared by `last_report_date` only.
    pub fn update(&mut self, reading: &InverterReading) -> bool {
        match self.0.get_mut(&reading.serial_number) {
            Some(known) if known.last_report_date == reading.last_report_date => false,
            Some(known) => {
                known.clone_from(reading);
                true
            }
            None => {
                self.0.insert(reading.serial_number.clone(), reading.clone());
                true
            }
        }
    }

    #[cfg(test)]
    pub fn get(&self, serial_number: &str) -> Option<&InverterReading> {
        self.0.get(serial_number)
    }

    /// Number of known inverters.
    pub fn len(&self) -> usize {
        self.0.len()
    }
}
