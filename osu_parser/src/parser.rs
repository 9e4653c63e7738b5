use log::debug;
use osu_schema::Beatmap;

use crate::cursor::Cursor;
use crate::keyword::Keyword;
use crate::{fields, hit_objects, timing, ParseError};

const FORMAT_MAGIC: &str = "osu file format v";

/// Parser state. Sections are ordered the way they appear in a well-formed
/// file; `Header` and `Root` come before any bracketed section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub(crate) enum Section {
    Header,
    Root,
    General,
    Editor,
    Metadata,
    Difficulty,
    Events,
    TimingPoints,
    Colours,
    HitObjects,
    Unknown,
}

impl Section {
    fn from_keyword(keyword: Keyword) -> Option<Section> {
        Some(match keyword {
            Keyword::General => Section::General,
            Keyword::Editor => Section::Editor,
            Keyword::Metadata => Section::Metadata,
            Keyword::Difficulty => Section::Difficulty,
            Keyword::Events => Section::Events,
            Keyword::TimingPoints => Section::TimingPoints,
            Keyword::Colours => Section::Colours,
            Keyword::HitObjects => Section::HitObjects,
            _ => return None,
        })
    }
}

/// Everything the line handlers share while a document is being read.
#[derive(Debug)]
pub(crate) struct Parser {
    pub(crate) beatmap: Beatmap,
    pub(crate) section: Section,
    /// Index of the timing point governing the latest hit object. Only moves forward.
    pub(crate) timing_cursor: usize,
    /// Beat duration of the latest uninherited timing point, in seconds.
    pub(crate) parent_beat: Option<f64>,
}

impl Parser {
    pub(crate) fn new() -> Self {
        Self {
            beatmap: Beatmap::default(),
            section: Section::Header,
            timing_cursor: 0,
            parent_beat: None,
        }
    }

    /// Feeds one line of the document. `line_no` is 1-based.
    pub(crate) fn feed_line(&mut self, line: &str, line_no: usize) -> Result<(), ParseError> {
        let line = line.trim_end();
        let trimmed = line.trim_start();
        if trimmed.is_empty() || trimmed.starts_with("//") {
            return Ok(());
        }

        let mut cursor = Cursor::new(line, line_no);
        if self.section != Section::Header && trimmed.starts_with('[') {
            return self.section_header(&mut cursor);
        }

        match self.section {
            Section::Header => self.header(&mut cursor),
            Section::Root => Err(cursor.error("E1102", "content outside of any section")),
            Section::General => fields::general(self, &mut cursor),
            Section::Editor => fields::editor(self, &mut cursor),
            Section::Metadata => fields::metadata(self, &mut cursor),
            Section::Difficulty => fields::difficulty(self, &mut cursor),
            Section::Events => fields::events(self, &mut cursor),
            Section::TimingPoints => timing::timing_point(self, &mut cursor),
            Section::Colours => fields::colours(self, &mut cursor),
            Section::HitObjects => hit_objects::hit_object(self, &mut cursor),
            Section::Unknown => Ok(()),
        }
    }

    /// Called once the last line has been fed.
    pub(crate) fn finish(self) -> Result<Beatmap, ParseError> {
        if self.section == Section::Header {
            return Err(ParseError::new(
                "E1101",
                format!("missing '{FORMAT_MAGIC}<version>' header"),
                0,
            ));
        }
        Ok(self.beatmap)
    }

    fn header(&mut self, cursor: &mut Cursor<'_>) -> Result<(), ParseError> {
        let bad_header = |cursor: &Cursor<'_>| {
            cursor.error(
                "E1101",
                format!("expected '{FORMAT_MAGIC}<version>' as the first line"),
            )
        };

        if !cursor.skip_past(FORMAT_MAGIC) {
            return Err(bad_header(cursor));
        }
        let version = cursor.parse_int::<u32>().map_err(|_| bad_header(cursor))?;
        cursor.expect_end().map_err(|_| bad_header(cursor))?;

        self.beatmap.version = version;
        self.section = Section::Root;
        Ok(())
    }

    fn section_header(&mut self, cursor: &mut Cursor<'_>) -> Result<(), ParseError> {
        cursor.skip_blanks();
        cursor.consume('[');
        let name = cursor.parse_until(']');
        if !cursor.consume(']') {
            return Err(cursor.error("E1001", "expected ']' closing the section name"));
        }
        cursor.expect_end()?;

        match Keyword::lookup(name).and_then(Section::from_keyword) {
            Some(section) => {
                if section < self.section && self.section != Section::Unknown {
                    debug!("line {}: section [{name}] appears out of order", cursor.line_no());
                }
                self.section = section;
            }
            None => {
                debug!("line {}: skipping unknown section [{name}]", cursor.line_no());
                self.section = Section::Unknown;
            }
        }
        Ok(())
    }
}

pub(crate) fn parse_document(src: &str) -> Result<Beatmap, ParseError> {
    let mut parser = Parser::new();
    for (i, line) in src.lines().enumerate() {
        parser.feed_line(line, i + 1)?;
    }
    parser.finish()
}
