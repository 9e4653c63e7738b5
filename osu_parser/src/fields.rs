//! Handlers for the key/value sections and the events section.

use log::debug;
use osu_schema::{Break, Color, SampleSet};

use crate::cursor::Cursor;
use crate::keyword::Keyword;
use crate::parser::Parser;
use crate::ParseError;

fn misplaced_key(cursor: &Cursor<'_>, key: Keyword, section: &str) -> ParseError {
    cursor.error("E1003", format!("unknown key in [{section}]: {}", key.name()))
}

fn parse_flag(cursor: &mut Cursor<'_>) -> Result<bool, ParseError> {
    Ok(cursor.parse_int::<i64>()? != 0)
}

fn parse_seconds(cursor: &mut Cursor<'_>) -> Result<f64, ParseError> {
    Ok(cursor.parse_float()? / 1000.0)
}

pub(crate) fn general(parser: &mut Parser, cursor: &mut Cursor<'_>) -> Result<(), ParseError> {
    let key = cursor.parse_keyword()?;
    cursor.expect(':')?;

    let general = &mut parser.beatmap.general;
    match key {
        Keyword::AudioFilename => {
            let name = cursor.parse_string();
            if name.contains(['/', '\\']) {
                return Err(cursor.error(
                    "E6002",
                    format!("audio filename must not contain a path separator: {name}"),
                ));
            }
            general.audio_filename = Some(name.to_string());
        }
        Keyword::AudioLeadIn => general.audio_lead_in = parse_seconds(cursor)?,
        Keyword::PreviewTime => {
            let preview = parse_seconds(cursor)?;
            general.preview_time = (preview >= 0.0).then_some(preview);
        }
        Keyword::Countdown => general.countdown = cursor.parse_int()?,
        Keyword::Mode => general.mode = cursor.parse_int()?,
        Keyword::SampleSet => {
            let name = cursor.parse_identifier();
            general.sample_set = SampleSet::from_name(name)
                .ok_or_else(|| cursor.error("E1001", format!("unknown sample set: {name}")))?;
        }
        Keyword::StackLeniency => general.stack_leniency = cursor.parse_float()?,
        Keyword::LetterboxInBreaks => general.letterbox_in_breaks = parse_flag(cursor)?,
        Keyword::WidescreenStoryboard => general.widescreen_storyboard = parse_flag(cursor)?,
        Keyword::AlwaysShowPlayfield
        | Keyword::CountdownOffset
        | Keyword::EditorBookmarks
        | Keyword::EditorDistanceSpacing
        | Keyword::EpilepsyWarning
        | Keyword::OverlayPosition
        | Keyword::SamplesMatchPlaybackSpeed
        | Keyword::SkinPreference
        | Keyword::SpecialStyle
        | Keyword::StoryFireInFront
        | Keyword::TimelineZoom
        | Keyword::UseSkinSprites => {
            debug!("line {}: ignoring General key {}", cursor.line_no(), key.name());
            cursor.parse_string();
        }
        _ => return Err(misplaced_key(cursor, key, "General")),
    }
    cursor.expect_end()
}

/// Editor settings are tool-private: unknown keys are skipped, not rejected.
pub(crate) fn editor(parser: &mut Parser, cursor: &mut Cursor<'_>) -> Result<(), ParseError> {
    cursor.skip_blanks();
    let word = cursor.parse_identifier();
    cursor.expect(':')?;

    let editor = &mut parser.beatmap.editor;
    match Keyword::lookup(word) {
        Some(Keyword::Bookmarks) => {
            editor.bookmarks.clear();
            while !cursor.is_at_end() {
                editor.bookmarks.push(parse_seconds(cursor)?);
                if !cursor.consume_separator(',') {
                    break;
                }
            }
        }
        Some(Keyword::DistanceSpacing) => editor.distance_spacing = cursor.parse_float()?,
        Some(Keyword::BeatDivisor) => editor.beat_divisor = cursor.parse_int()?,
        Some(Keyword::GridSize) => editor.grid_size = cursor.parse_int()?,
        Some(Keyword::TimelineZoom) => editor.timeline_zoom = cursor.parse_float()?,
        _ => {
            debug!("line {}: skipping Editor key {word}", cursor.line_no());
            cursor.parse_string();
        }
    }
    cursor.expect_end()
}

pub(crate) fn metadata(parser: &mut Parser, cursor: &mut Cursor<'_>) -> Result<(), ParseError> {
    let key = cursor.parse_keyword()?;
    cursor.expect(':')?;

    let metadata = &mut parser.beatmap.metadata;
    let text = match key {
        Keyword::Title => &mut metadata.title,
        Keyword::TitleUnicode => &mut metadata.title_unicode,
        Keyword::Artist => &mut metadata.artist,
        Keyword::ArtistUnicode => &mut metadata.artist_unicode,
        Keyword::Creator => &mut metadata.creator,
        Keyword::Version => &mut metadata.version,
        Keyword::Source => &mut metadata.source,
        Keyword::Tags => {
            metadata.tags = cursor.parse_string().split_whitespace().map(str::to_string).collect();
            return Ok(());
        }
        Keyword::BeatmapID => {
            metadata.beatmap_id = Some(cursor.parse_int()?);
            return cursor.expect_end();
        }
        Keyword::BeatmapSetID => {
            metadata.beatmap_set_id = Some(cursor.parse_int()?);
            return cursor.expect_end();
        }
        _ => return Err(misplaced_key(cursor, key, "Metadata")),
    };
    *text = cursor.parse_string().to_string();
    Ok(())
}

pub(crate) fn difficulty(parser: &mut Parser, cursor: &mut Cursor<'_>) -> Result<(), ParseError> {
    let key = cursor.parse_keyword()?;
    cursor.expect(':')?;

    let difficulty = &mut parser.beatmap.difficulty;
    match key {
        Keyword::HPDrainRate => difficulty.hp_drain_rate = cursor.parse_float()?,
        Keyword::CircleSize => difficulty.set_circle_size(cursor.parse_float()?),
        Keyword::OverallDifficulty => difficulty.set_overall_difficulty(cursor.parse_float()?),
        Keyword::ApproachRate => difficulty.set_approach_rate(cursor.parse_float()?),
        Keyword::SliderMultiplier => difficulty.slider_multiplier = cursor.parse_float()?,
        Keyword::SliderTickRate => difficulty.slider_tick_rate = cursor.parse_float()?,
        _ => return Err(misplaced_key(cursor, key, "Difficulty")),
    }
    cursor.expect_end()
}

enum EventKind {
    Background,
    Break,
    Other,
}

/// Keeps the background image and break periods; storyboard and video lines
/// are acknowledged and dropped.
pub(crate) fn events(parser: &mut Parser, cursor: &mut Cursor<'_>) -> Result<(), ParseError> {
    cursor.skip_blanks();
    let kind = if cursor.peek().is_some_and(|c| c.is_ascii_digit()) {
        match cursor.parse_int::<i64>()? {
            0 => EventKind::Background,
            2 => EventKind::Break,
            _ => EventKind::Other,
        }
    } else {
        match Keyword::lookup(cursor.parse_identifier()) {
            Some(Keyword::Background) => EventKind::Background,
            Some(Keyword::Break) => EventKind::Break,
            _ => EventKind::Other,
        }
    };

    match kind {
        EventKind::Background => {
            cursor.expect(',')?;
            cursor.float_field(',')?;
            let file = if cursor.peek() == Some('"') {
                cursor.parse_quoted()?
            } else {
                cursor.parse_until(',').trim()
            };
            if cursor.consume_separator(',') {
                cursor.int_field::<i64>(',')?;
                cursor.parse_int::<i64>()?;
            }
            cursor.expect_end()?;
            parser.beatmap.events.background = Some(file.to_string());
        }
        EventKind::Break => {
            cursor.expect(',')?;
            let start = cursor.float_field(',')? / 1000.0;
            let end = parse_seconds(cursor)?;
            cursor.expect_end()?;
            parser.beatmap.events.breaks.push(Break { start, end });
        }
        EventKind::Other => {
            debug!("line {}: discarding event", cursor.line_no());
            cursor.parse_string();
        }
    }
    Ok(())
}

pub(crate) fn colours(parser: &mut Parser, cursor: &mut Cursor<'_>) -> Result<(), ParseError> {
    cursor.skip_blanks();
    let word = cursor.parse_identifier();
    if Keyword::lookup(word) != Some(Keyword::Combo) {
        debug!("line {}: skipping colour {word}", cursor.line_no());
        cursor.parse_string();
        return Ok(());
    }

    cursor.parse_int::<u32>()?;
    cursor.expect(':')?;
    let red = channel(cursor, Some(','))?;
    let green = channel(cursor, Some(','))?;
    let blue = channel(cursor, None)?;
    cursor.expect_end()?;

    parser.beatmap.colors.push(Color { red, green, blue });
    Ok(())
}

fn channel(cursor: &mut Cursor<'_>, sep: Option<char>) -> Result<u8, ParseError> {
    let value = cursor.parse_int::<i64>()?;
    let channel = u8::try_from(value)
        .map_err(|_| cursor.error("E5001", format!("colour channel out of range 0-255: {value}")))?;
    if let Some(sep) = sep {
        cursor.expect(sep)?;
    }
    Ok(channel)
}
