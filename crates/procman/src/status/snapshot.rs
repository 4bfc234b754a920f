use super::record::{self, Record};
use crate::error::MalformedRecord;
use std::{fmt, str::FromStr};

/// Memory layout and ancestry of a process, decoded from its status record.
///
/// A snapshot is either decoded completely or not at all.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ProcessStatusSnapshot {
    pub pid: u32,
    pub parent_pid: u32,
    /// Executable name without the surrounding parentheses.
    pub name: String,
    /// Resident set size in pages.
    pub resident_set_size: u64,
    /// Soft limit on the resident set size in bytes.
    pub resident_set_size_limit: u64,
    pub code_segment_start: u64,
    pub code_segment_end: u64,
    pub stack_start: u64,
    pub data_segment_start: u64,
    pub data_segment_end: u64,
    pub heap_break_start: u64,
    pub arguments_start: u64,
    pub arguments_end: u64,
    pub environment_start: u64,
    pub environment_end: u64,
}

impl ProcessStatusSnapshot {
    /// Resident set size in bytes for the given page size.
    pub fn resident_set_bytes(&self, page_size: u64) -> u64 {
        self.resident_set_size.saturating_mul(page_size)
    }

    /// Labelled values in display order.
    pub fn fields(&self) -> Vec<(&'static str, FieldValue)> {
        use FieldValue::{Address, Id};
        vec![
            ("PID", Id(self.pid)),
            ("PPID", Id(self.parent_pid)),
            ("RSS", Address(self.resident_set_size)),
            ("RSSlim", Address(self.resident_set_size_limit)),
            ("Start_code", Address(self.code_segment_start)),
            ("End_code", Address(self.code_segment_end)),
            ("Start_stack", Address(self.stack_start)),
            ("Start_data", Address(self.data_segment_start)),
            ("End_data", Address(self.data_segment_end)),
            ("Start_brk", Address(self.heap_break_start)),
            ("Arg_start", Address(self.arguments_start)),
            ("Arg_end", Address(self.arguments_end)),
            ("Env_start", Address(self.environment_start)),
            ("Env_end", Address(self.environment_end)),
        ]
    }
}

impl FromStr for ProcessStatusSnapshot {
    type Err = MalformedRecord;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let record = Record::tokenize(text)?;
        Ok(Self {
            pid: record.field(record::PID, "pid")?,
            parent_pid: record.field(record::PPID, "ppid")?,
            name: record.name().to_owned(),
            resident_set_size: record.field(record::RSS, "rss")?,
            resident_set_size_limit: record.field(record::RSSLIM, "rsslim")?,
            code_segment_start: record.field(record::START_CODE, "startcode")?,
            code_segment_end: record.field(record::END_CODE, "endcode")?,
            stack_start: record.field(record::START_STACK, "startstack")?,
            data_segment_start: record.field(record::START_DATA, "start_data")?,
            data_segment_end: record.field(record::END_DATA, "end_data")?,
            heap_break_start: record.field(record::START_BRK, "start_brk")?,
            arguments_start: record.field(record::ARG_START, "arg_start")?,
            arguments_end: record.field(record::ARG_END, "arg_end")?,
            environment_start: record.field(record::ENV_START, "env_start")?,
            environment_end: record.field(record::ENV_END, "env_end")?,
        })
    }
}

/// A snapshot value as handed to a renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldValue {
    /// Process identifier, shown in decimal.
    Id(u32),
    /// Address or size, shown in hexadecimal.
    Address(u64),
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Id(id) => write!(f, "{id}"),
            Self::Address(addr) => write!(f, "{addr:#x}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::status::record::MIN_FIELDS;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    /// Build a 52-field record with `values` placed at their positions.
    fn record_with(values: &[(usize, u64)]) -> String {
        let mut tokens: Vec<String> = (0..52).map(|_| "0".to_owned()).collect();
        tokens[0] = "1234".into();
        tokens[1] = "(x)".into();
        tokens[2] = "S".into();
        for &(index, value) in values {
            tokens[index] = value.to_string();
        }
        tokens.join(" ") + "\n"
    }

    #[test]
    fn decodes_fixed_positions() {
        let text = record_with(&[
            (3, 1),
            (23, 530),
            (24, 18_446_744_073_709_551_615),
            (25, 0x5600_0000_0000),
            (26, 0x5600_0001_0000),
            (27, 0x7ffc_0000_0000),
            (44, 0x5600_0002_0000),
            (45, 0x5600_0002_1000),
            (46, 0x5600_0003_0000),
            (47, 0x7ffc_0000_1000),
            (48, 0x7ffc_0000_1100),
            (49, 0x7ffc_0000_1100),
            (50, 0x7ffc_0000_1ff0),
        ]);

        let snapshot: ProcessStatusSnapshot = text.parse().unwrap();
        assert_eq!(
            snapshot,
            ProcessStatusSnapshot {
                pid: 1234,
                parent_pid: 1,
                name: "x".into(),
                resident_set_size: 530,
                resident_set_size_limit: u64::MAX,
                code_segment_start: 0x5600_0000_0000,
                code_segment_end: 0x5600_0001_0000,
                stack_start: 0x7ffc_0000_0000,
                data_segment_start: 0x5600_0002_0000,
                data_segment_end: 0x5600_0002_1000,
                heap_break_start: 0x5600_0003_0000,
                arguments_start: 0x7ffc_0000_1000,
                arguments_end: 0x7ffc_0000_1100,
                environment_start: 0x7ffc_0000_1100,
                environment_end: 0x7ffc_0000_1ff0,
            }
        );
    }

    #[test]
    fn truncated_record_is_malformed() {
        let text = record_with(&[]);
        let truncated: Vec<&str> = text.split_whitespace().take(MIN_FIELDS - 1).collect();
        let err = truncated
            .join(" ")
            .parse::<ProcessStatusSnapshot>()
            .unwrap_err();
        assert_eq!(
            err,
            MalformedRecord::TooShort {
                expected: MIN_FIELDS,
                found: MIN_FIELDS - 1
            }
        );
    }

    #[test]
    fn non_numeric_field_is_malformed() {
        let text = record_with(&[]).replacen(" S 0 ", " S nope ", 1);
        let err = text.parse::<ProcessStatusSnapshot>().unwrap_err();
        assert_eq!(
            err,
            MalformedRecord::InvalidField {
                field: "ppid",
                index: 3,
                token: "nope".into()
            }
        );
    }

    #[test]
    fn negative_address_is_malformed() {
        let mut tokens: Vec<String> = record_with(&[])
            .split_whitespace()
            .map(str::to_owned)
            .collect();
        tokens[46] = "-1".into();
        let err = tokens.join(" ").parse::<ProcessStatusSnapshot>().unwrap_err();
        assert!(matches!(
            err,
            MalformedRecord::InvalidField { field: "start_brk", index: 46, .. }
        ));
    }

    #[test]
    fn fields_render_ids_decimal_and_addresses_hex() {
        let snapshot: ProcessStatusSnapshot = record_with(&[(3, 1), (23, 255)]).parse().unwrap();
        let fields = snapshot.fields();
        assert_eq!(fields.len(), 14);
        assert_eq!(fields[0], ("PID", FieldValue::Id(1234)));
        assert_eq!(fields[0].1.to_string(), "1234");
        assert_eq!(fields[2].1.to_string(), "0xff");
        assert_eq!(snapshot.resident_set_bytes(4096), 255 * 4096);
    }

    proptest! {
        #[test]
        fn decoding_is_deterministic(values in prop::collection::vec(any::<u64>(), 13)) {
            let positions = [3usize, 23, 24, 25, 26, 27, 44, 45, 46, 47, 48, 49, 50];
            let mut placed: Vec<(usize, u64)> = positions.iter().copied().zip(values).collect();
            // ppid is a pid, not an address
            placed[0].1 %= u64::from(u32::MAX);
            let text = record_with(&placed);

            let first: ProcessStatusSnapshot = text.parse().unwrap();
            let second: ProcessStatusSnapshot = text.parse().unwrap();
            prop_assert_eq!(&first, &second);
            prop_assert_eq!(u64::from(first.parent_pid), placed[0].1);
            prop_assert_eq!(first.environment_end, placed[12].1);
        }
    }
}
