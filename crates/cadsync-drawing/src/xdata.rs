//! Extended entity data (XDATA)
//!
//! Application-specific data attached to an entity, grouped per registered
//! application name (group code 1001). cadsync stores its ownership tag here.

use crate::types::Handle;

/// A single typed XDATA value
#[derive(Debug, Clone, PartialEq)]
pub enum XDataValue {
    /// Group code 1000
    String(String),
    /// Group code 1002, `{` or `}`
    ControlString(String),
    /// Group code 1005
    Handle(Handle),
    /// Group code 1040
    Real(f64),
    /// Group code 1070
    Integer16(i16),
    /// Group code 1071
    Integer32(i32),
    /// Any other XDATA group code, kept as read
    Raw { code: i32, value: String },
}

impl XDataValue {
    /// The DXF group code this value is written with.
    pub fn code(&self) -> i32 {
        match self {
            XDataValue::String(_) => 1000,
            XDataValue::ControlString(_) => 1002,
            XDataValue::Handle(_) => 1005,
            XDataValue::Real(_) => 1040,
            XDataValue::Integer16(_) => 1070,
            XDataValue::Integer32(_) => 1071,
            XDataValue::Raw { code, .. } => *code,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            XDataValue::String(s) => Some(s),
            _ => None,
        }
    }
}

/// XDATA of one registered application
#[derive(Debug, Clone, PartialEq)]
pub struct ExtendedDataRecord {
    /// Group code 1001
    pub application_name: String,
    pub values: Vec<XDataValue>,
}

impl ExtendedDataRecord {
    pub fn new(application_name: impl Into<String>) -> Self {
        Self {
            application_name: application_name.into(),
            values: Vec::new(),
        }
    }

    pub fn add_value(&mut self, value: XDataValue) {
        self.values.push(value);
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// All XDATA records attached to an entity
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExtendedData {
    records: Vec<ExtendedDataRecord>,
}

impl ExtendedData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_record(&mut self, record: ExtendedDataRecord) {
        self.records.push(record);
    }

    pub fn records(&self) -> &[ExtendedDataRecord] {
        &self.records
    }

    pub fn get_record(&self, application_name: &str) -> Option<&ExtendedDataRecord> {
        self.records
            .iter()
            .find(|r| r.application_name == application_name)
    }

    /// Replace the record of the same application, or append it.
    pub fn set_record(&mut self, record: ExtendedDataRecord) {
        match self
            .records
            .iter_mut()
            .find(|r| r.application_name == record.application_name)
        {
            Some(existing) => *existing = record,
            None => self.records.push(record),
        }
    }

    /// Remove an application's record, returning it if present.
    pub fn remove_record(&mut self, application_name: &str) -> Option<ExtendedDataRecord> {
        let idx = self
            .records
            .iter()
            .position(|r| r.application_name == application_name)?;
        Some(self.records.remove(idx))
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_record_replaces_same_application() {
        let mut xdata = ExtendedData::new();
        let mut first = ExtendedDataRecord::new("CADSYNC");
        first.add_value(XDataValue::String("a".into()));
        xdata.set_record(first);

        let mut second = ExtendedDataRecord::new("CADSYNC");
        second.add_value(XDataValue::String("b".into()));
        xdata.set_record(second.clone());

        assert_eq!(xdata.len(), 1);
        assert_eq!(xdata.get_record("CADSYNC"), Some(&second));
    }

    #[test]
    fn remove_record_leaves_other_applications() {
        let mut xdata = ExtendedData::new();
        xdata.add_record(ExtendedDataRecord::new("CADSYNC"));
        xdata.add_record(ExtendedDataRecord::new("ACAD"));

        assert!(xdata.remove_record("CADSYNC").is_some());
        assert!(xdata.remove_record("CADSYNC").is_none());
        assert!(xdata.get_record("ACAD").is_some());
    }

    #[test]
    fn value_codes() {
        assert_eq!(XDataValue::Handle(Handle::new(1)).code(), 1005);
        assert_eq!(XDataValue::Integer32(1).code(), 1071);
        assert_eq!(
            XDataValue::Raw {
                code: 1010,
                value: "0.0".into()
            }
            .code(),
            1010
        );
    }
}
