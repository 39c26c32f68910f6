use crate::record::{FieldAllowlist, Record};
use std::io::BufRead;
use thiserror::Error;

const DOC_OPEN: &str = "<DOC>";
const DOC_CLOSE: &str = "</DOC>";

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("document opened at line {opened_at} has no closing </DOC> before end of input")]
    UnterminatedDoc { opened_at: usize },

    #[error("field <{tag}> opened at line {opened_at} has no closing </{tag}> before end of input")]
    UnterminatedField { tag: String, opened_at: usize },

    #[error("tag at line {line} has no '>' terminator")]
    UnterminatedTagName { line: usize },

    #[error("read error at line {line}: {source}")]
    Io {
        line: usize,
        #[source]
        source: std::io::Error,
    },
}

/// Parser position within the current document block.
enum State {
    /// Scanning for the next `<DOC>` marker.
    Outside,
    /// Inside a document, scanning for tag lines or `</DOC>`.
    InDoc,
    /// Consuming the multi-line value of one tag block.
    InField {
        tag: String,
        close: String,
        value: String,
        keep: bool,
        opened_at: usize,
    },
}

/// Streaming parser for tag-delimited newswire collections.
///
/// Scans the input line by line and emits one [`Record`] per
/// `<DOC>`..`</DOC>` block. A tag name is the substring between the
/// first `<` on a line and the first `>` after it; lines without any
/// `<` are noise and skipped. Values accumulate verbatim across
/// continuation lines (no separator is inserted), and the segment
/// before the closing tag on the final line is trimmed before it is
/// appended. Tags outside the allowlist are consumed with the same
/// close-tag-aware loop and discarded, so their interior lines can
/// never be misread as new tags.
///
/// Single pass, no lookahead beyond the current tag block; the iterator
/// ends at end of input.
pub struct RecordParser<'a, R: BufRead> {
    reader: R,
    allowlist: &'a FieldAllowlist,
    line_no: usize,
}

impl<'a, R: BufRead> RecordParser<'a, R> {
    pub fn new(reader: R, allowlist: &'a FieldAllowlist) -> Self {
        Self {
            reader,
            allowlist,
            line_no: 0,
        }
    }

    /// Lines consumed so far.
    pub fn line_no(&self) -> usize {
        self.line_no
    }

    fn next_line(&mut self) -> Result<Option<String>, ParseError> {
        let mut buf = String::new();
        let read = self.reader.read_line(&mut buf).map_err(|source| ParseError::Io {
            line: self.line_no + 1,
            source,
        })?;
        if read == 0 {
            return Ok(None);
        }
        self.line_no += 1;
        while buf.ends_with('\n') || buf.ends_with('\r') {
            buf.pop();
        }
        Ok(Some(buf))
    }

    fn parse_next(&mut self) -> Result<Option<Record>, ParseError> {
        let mut state = State::Outside;
        let mut record = Record::new();
        let mut doc_opened_at = 0;

        loop {
            let line = match self.next_line()? {
                Some(line) => line,
                None => {
                    return match state {
                        State::Outside => Ok(None),
                        State::InDoc => Err(ParseError::UnterminatedDoc {
                            opened_at: doc_opened_at,
                        }),
                        State::InField { tag, opened_at, .. } => {
                            Err(ParseError::UnterminatedField { tag, opened_at })
                        }
                    };
                }
            };

            state = match state {
                State::Outside => {
                    if line.contains(DOC_OPEN) {
                        record = Record::new();
                        doc_opened_at = self.line_no;
                        State::InDoc
                    } else {
                        State::Outside
                    }
                }
                State::InDoc => {
                    if line.contains(DOC_CLOSE) {
                        return Ok(Some(record));
                    }
                    self.begin_field(&line, &mut record)?
                }
                State::InField {
                    tag,
                    close,
                    mut value,
                    keep,
                    opened_at,
                } => {
                    if let Some(pos) = line.find(&close) {
                        if keep {
                            value.push_str(line[..pos].trim());
                            record.append_field(&tag, &value);
                        }
                        State::InDoc
                    } else {
                        if keep {
                            value.push_str(&line);
                        }
                        State::InField {
                            tag,
                            close,
                            value,
                            keep,
                            opened_at,
                        }
                    }
                }
            };
        }
    }

    /// Interpret one in-document line as the start of a tag block, or
    /// skip it if it cannot open one.
    fn begin_field(&self, line: &str, record: &mut Record) -> Result<State, ParseError> {
        // Lines without markup are noise between tag blocks.
        let Some(lt) = line.find('<') else {
            return Ok(State::InDoc);
        };
        let rest = &line[lt + 1..];
        let Some(gt) = rest.find('>') else {
            return Err(ParseError::UnterminatedTagName { line: self.line_no });
        };
        let tag = &rest[..gt];

        // A stray close tag or an empty tag name opens no field block.
        if tag.is_empty() || tag.starts_with('/') {
            return Ok(State::InDoc);
        }

        let keep = self.allowlist.contains(tag);
        let open = format!("<{tag}>");
        let close = format!("</{tag}>");

        // Everything after the open-tag literal starts the value. A tag
        // written with extra markup on the line (never seen in the
        // target collections) contributes an empty start.
        let remainder = match line.find(&open) {
            Some(pos) => &line[pos + open.len()..],
            None => "",
        };

        if let Some(pos) = remainder.find(&close) {
            if keep {
                record.append_field(tag, remainder[..pos].trim());
            }
            return Ok(State::InDoc);
        }

        Ok(State::InField {
            tag: tag.to_string(),
            close,
            value: if keep { remainder.to_string() } else { String::new() },
            keep,
            opened_at: self.line_no,
        })
    }
}

impl<'a, R: BufRead> Iterator for RecordParser<'a, R> {
    type Item = Result<Record, ParseError>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.parse_next() {
            Ok(Some(record)) => Some(Ok(record)),
            Ok(None) => None,
            Err(err) => Some(Err(err)),
        }
    }
}
