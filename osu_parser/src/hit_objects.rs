use osu_schema::{
    CurveKind, EdgeSound, HitObject, HitObjectKind, HitType, Path, SampleSet, Slider, SoundAdditions,
    Vec2,
};

use crate::assemble;
use crate::cursor::Cursor;
use crate::parser::Parser;
use crate::ParseError;

/// Upper bound on slider repeats; every repeat allocates an edge.
pub(crate) const MAX_SLIDER_REPEAT: u32 = 10_000;

/// Trailing `sample_set:additions_set:index:volume:filename` block, as written.
#[derive(Debug, Default)]
struct RawSample {
    sample_set: SampleSet,
    additions_set: SampleSet,
    index: u32,
    volume: u32,
    filename: Option<String>,
}

/// Slider fields before sample defaults are known.
#[derive(Debug)]
struct RawSlider {
    path: Path,
    repeat: u32,
    length: f64,
    edge_sounds: Vec<SoundAdditions>,
    edge_sets: Vec<(SampleSet, SampleSet)>,
}

enum RawKind {
    Circle,
    Slider(RawSlider),
    Spinner { end_time: f64 },
    HoldNote { end_time: f64 },
}

/// `x,y,time,type,hit_sound[,type-specific fields][,sample block]`
pub(crate) fn hit_object(parser: &mut Parser, cursor: &mut Cursor<'_>) -> Result<(), ParseError> {
    let x = cursor.float_field(',')?;
    let y = cursor.float_field(',')?;
    let time = cursor.float_field(',')? / 1000.0;
    let hit_type = HitType(cursor.int_field::<u8>(',')?);
    let sound_additions = SoundAdditions(cursor.parse_int::<u8>()?);
    if !hit_type.has_single_base_type() {
        return Err(cursor.error(
            "E4003",
            format!(
                "type {} must set exactly one of circle, slider, spinner and hold",
                hit_type.0
            ),
        ));
    }
    let position = Vec2::new(x, y);

    let mut sample = RawSample::default();
    let kind = if hit_type.is_slider() {
        cursor.expect(',')?;
        let slider = parse_slider(cursor, position)?;
        if cursor.consume_separator(',') {
            sample = parse_sample(cursor)?;
        }
        RawKind::Slider(slider)
    } else if hit_type.is_spinner() {
        cursor.expect(',')?;
        let end_time = cursor.parse_float()? / 1000.0;
        if cursor.consume_separator(',') {
            sample = parse_sample(cursor)?;
        }
        RawKind::Spinner { end_time }
    } else if hit_type.is_hold() {
        cursor.expect(',')?;
        let end_time = cursor.parse_float()? / 1000.0;
        if cursor.consume(':') {
            sample = parse_sample(cursor)?;
        }
        RawKind::HoldNote { end_time }
    } else {
        if cursor.consume_separator(',') {
            sample = parse_sample(cursor)?;
        }
        RawKind::Circle
    };
    cursor.expect_end()?;

    let timing_point = seek_timing_point(parser, time)
        .ok_or_else(|| cursor.error("E4004", "hit object appears before any timing point"))?;
    let tp = &parser.beatmap.timing_points[timing_point];

    let sample_set = sample.sample_set.or(tp.sample_set);
    let additions_set = sample.additions_set.or(sample_set);
    let sample_index = if sample.index == 0 {
        tp.sample_index
    } else {
        sample.index
    };
    let volume = if sample.volume == 0 {
        tp.volume
    } else {
        f64::from(sample.volume.min(100)) / 100.0
    };

    let kind = match kind {
        RawKind::Circle => HitObjectKind::Circle,
        RawKind::Spinner { end_time } => HitObjectKind::Spinner { end_time },
        RawKind::HoldNote { end_time } => HitObjectKind::HoldNote { end_time },
        RawKind::Slider(raw) => {
            let edges = resolve_edges(&raw, sound_additions, sample_set, additions_set);
            let length = if raw.length > 0.0 {
                raw.length
            } else {
                raw.path.length()
            };
            let velocity = 100.0 * parser.beatmap.difficulty.slider_multiplier;
            HitObjectKind::Slider(Slider {
                path: raw.path,
                repeat: raw.repeat,
                length,
                duration: length / velocity * tp.beat_duration,
                edges,
            })
        }
    };

    let hit = HitObject {
        position,
        time,
        hit_type,
        sound_additions,
        sample_set,
        additions_set,
        sample_index,
        volume,
        sample_filename: sample.filename,
        combo: 0,
        combo_seq: 0,
        color: None,
        timing_point,
        kind,
    };
    assemble::push_hit_object(parser, cursor, hit)
}

/// Advances the parser's timing cursor to the last point starting at or
/// before `time`. Hits before the first point use the first point.
fn seek_timing_point(parser: &mut Parser, time: f64) -> Option<usize> {
    let points = &parser.beatmap.timing_points;
    if points.is_empty() {
        return None;
    }
    while parser.timing_cursor + 1 < points.len() && points[parser.timing_cursor + 1].offset <= time
    {
        parser.timing_cursor += 1;
    }
    Some(parser.timing_cursor)
}

fn malformed(cursor: &Cursor<'_>, what: &str) -> ParseError {
    cursor.error("E4002", format!("malformed slider: {what}"))
}

/// `curve|x:y|x:y...,repeat,length[,edge_sounds[,edge_sets]]`
fn parse_slider(cursor: &mut Cursor<'_>, head: Vec2) -> Result<RawSlider, ParseError> {
    let letter = cursor.parse_until('|').trim();
    let mut chars = letter.chars();
    let kind = match (chars.next(), chars.next()) {
        (Some(c), None) => CurveKind::from_letter(c),
        _ => None,
    }
    .ok_or_else(|| malformed(cursor, &format!("unknown curve type '{letter}'")))?;

    let mut points = vec![head];
    while cursor.consume('|') {
        let x = cursor
            .float_field(':')
            .map_err(|_| malformed(cursor, "control point must be written x:y"))?;
        let y = cursor
            .parse_float()
            .map_err(|_| malformed(cursor, "control point must be written x:y"))?;
        points.push(Vec2::new(x, y));
    }
    if points.len() < 2 {
        return Err(malformed(cursor, "no control points"));
    }

    cursor.expect(',')?;
    let repeat = cursor.int_field::<u32>(',')?;
    if repeat == 0 {
        return Err(malformed(cursor, "repeat count must be at least 1"));
    }
    if repeat > MAX_SLIDER_REPEAT {
        return Err(malformed(
            cursor,
            &format!("repeat count {repeat} exceeds {MAX_SLIDER_REPEAT}"),
        ));
    }
    let length = cursor.parse_float()?;

    let mut path =
        Path::from_control_points(kind, &points).map_err(|e| malformed(cursor, &e.to_string()))?;
    if length > 0.0 {
        path.normalize(length);
    }

    let mut slider = RawSlider {
        path,
        repeat,
        length,
        edge_sounds: Vec::new(),
        edge_sets: Vec::new(),
    };

    // Edge sounds never contain ':' and edge sets always contain '|', which
    // tells both apart from the sample block.
    if next_field(cursor).is_some_and(|field| !field.contains(':')) {
        cursor.consume_separator(',');
        loop {
            slider.edge_sounds.push(SoundAdditions(cursor.parse_int()?));
            if !cursor.consume('|') {
                break;
            }
        }
        if next_field(cursor).is_some_and(|field| field.contains('|')) {
            cursor.consume_separator(',');
            loop {
                let sample_set = parse_sample_set(cursor)?;
                cursor.expect(':')?;
                let additions_set = parse_sample_set(cursor)?;
                slider.edge_sets.push((sample_set, additions_set));
                if !cursor.consume('|') {
                    break;
                }
            }
        }
    }

    let edges = repeat as usize + 1;
    if !slider.edge_sounds.is_empty() && slider.edge_sounds.len() != edges {
        return Err(malformed(
            cursor,
            &format!("expected {edges} edge sounds, got {}", slider.edge_sounds.len()),
        ));
    }
    if !slider.edge_sets.is_empty() && slider.edge_sets.len() != edges {
        return Err(malformed(
            cursor,
            &format!("expected {edges} edge sample sets, got {}", slider.edge_sets.len()),
        ));
    }
    Ok(slider)
}

/// The comma-separated field following the cursor, if a comma comes next.
fn next_field<'a>(cursor: &Cursor<'a>) -> Option<&'a str> {
    let after = cursor.rest().trim_start().strip_prefix(',')?;
    after.split(',').next()
}

/// Fills every edge, falling back to the hit's own sounds and sample sets.
fn resolve_edges(
    slider: &RawSlider,
    sound_additions: SoundAdditions,
    sample_set: SampleSet,
    additions_set: SampleSet,
) -> Vec<EdgeSound> {
    (0..=slider.repeat as usize)
        .map(|i| {
            let (edge_set, edge_additions) = slider.edge_sets.get(i).copied().unwrap_or_default();
            EdgeSound {
                sound_additions: slider.edge_sounds.get(i).copied().unwrap_or(sound_additions),
                sample_set: edge_set.or(sample_set),
                additions_set: edge_additions.or(additions_set),
            }
        })
        .collect()
}

fn parse_sample_set(cursor: &mut Cursor<'_>) -> Result<SampleSet, ParseError> {
    let index = cursor.parse_int::<i64>()?;
    SampleSet::from_index(index)
        .ok_or_else(|| cursor.error("E1001", format!("unknown sample set index: {index}")))
}

fn parse_sample(cursor: &mut Cursor<'_>) -> Result<RawSample, ParseError> {
    let mut sample = RawSample {
        sample_set: parse_sample_set(cursor)?,
        ..RawSample::default()
    };
    cursor.expect(':')?;
    sample.additions_set = parse_sample_set(cursor)?;

    if cursor.consume(':') && !cursor.is_at_end() {
        sample.index = cursor.parse_int()?;
        if cursor.consume(':') && !cursor.is_at_end() {
            sample.volume = cursor.parse_int()?;
            if cursor.consume(':') {
                let name = cursor.parse_string();
                sample.filename = (!name.is_empty()).then(|| name.to_string());
            }
        }
    }
    Ok(sample)
}
