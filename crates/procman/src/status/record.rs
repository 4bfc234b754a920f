//! Tokenizing of `/proc/<pid>/stat`.
//!
//! Positions follow `proc(5)` with 0-based indexing.

use crate::error::MalformedRecord;
use std::str::FromStr;

pub(crate) const PID: usize = 0;
pub(crate) const COMM: usize = 1;
pub(crate) const PPID: usize = 3;
pub(crate) const RSS: usize = 23;
pub(crate) const RSSLIM: usize = 24;
pub(crate) const START_CODE: usize = 25;
pub(crate) const END_CODE: usize = 26;
pub(crate) const START_STACK: usize = 27;
pub(crate) const START_DATA: usize = 44;
pub(crate) const END_DATA: usize = 45;
pub(crate) const START_BRK: usize = 46;
pub(crate) const ARG_START: usize = 47;
pub(crate) const ARG_END: usize = 48;
pub(crate) const ENV_START: usize = 49;
pub(crate) const ENV_END: usize = 50;

/// Number of tokens a record needs to cover every position read.
pub const MIN_FIELDS: usize = ENV_END + 1;

#[derive(Debug)]
pub(crate) struct Record<'a> {
    tokens: Vec<&'a str>,
}

impl<'a> Record<'a> {
    /// Split a record on whitespace, keeping the parenthesised command name
    /// as one token even when it contains spaces.
    pub(crate) fn tokenize(text: &'a str) -> Result<Self, MalformedRecord> {
        let tokens: Vec<&str> = match (text.find('('), text.rfind(')')) {
            (Some(open), Some(close)) if open < close => text[..open]
                .split_whitespace()
                .chain(std::iter::once(&text[open..=close]))
                .chain(text[close + 1..].split_whitespace())
                .collect(),
            _ => text.split_whitespace().collect(),
        };

        if tokens.len() < MIN_FIELDS {
            return Err(MalformedRecord::TooShort {
                expected: MIN_FIELDS,
                found: tokens.len(),
            });
        }
        Ok(Self { tokens })
    }

    pub(crate) fn name(&self) -> &'a str {
        let comm = self.tokens[COMM];
        comm.strip_prefix('(')
            .and_then(|c| c.strip_suffix(')'))
            .unwrap_or(comm)
    }

    pub(crate) fn field<T: FromStr>(
        &self,
        index: usize,
        field: &'static str,
    ) -> Result<T, MalformedRecord> {
        let token = self.tokens[index];
        token.parse().map_err(|_| MalformedRecord::InvalidField {
            field,
            index,
            token: token.to_owned(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn padded(head: &str) -> String {
        let mut record = head.to_owned();
        for _ in 0..60 {
            record.push_str(" 0");
        }
        record
    }

    #[test]
    fn comm_with_spaces_is_one_token() {
        let text = padded("42 (tmux: server) S 7");
        let record = Record::tokenize(&text).unwrap();
        assert_eq!(record.name(), "tmux: server");
        assert_eq!(record.field::<u32>(PPID, "ppid").unwrap(), 7);
    }

    #[test]
    fn comm_with_parens_uses_last_close() {
        let text = padded("42 (a) b) S 9");
        let record = Record::tokenize(&text).unwrap();
        assert_eq!(record.name(), "a) b");
        assert_eq!(record.field::<u32>(PPID, "ppid").unwrap(), 9);
    }

    #[test]
    fn record_without_parens_splits_plainly() {
        let text = padded("42 sh S 3");
        let record = Record::tokenize(&text).unwrap();
        assert_eq!(record.name(), "sh");
        assert_eq!(record.field::<u32>(PPID, "ppid").unwrap(), 3);
    }

    #[test]
    fn short_record_reports_count() {
        let err = Record::tokenize("1 (x) S 0 0").unwrap_err();
        assert_eq!(
            err,
            MalformedRecord::TooShort {
                expected: MIN_FIELDS,
                found: 5
            }
        );
    }
}
