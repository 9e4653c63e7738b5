use log::debug;
use osu_schema::{Beatmap, HitObject, HitObjectKind, HitType, SoundAdditions};

use crate::cursor::Cursor;
use crate::parser::Parser;
use crate::{ParseError, ParseOptions};

fn color_index(combo: u32, colors: usize) -> Option<usize> {
    (colors > 0).then(|| combo as usize % colors)
}

/// Links a freshly parsed hit after the previous one, deriving its combo
/// number, position in the combo and colour.
///
/// The first hit always opens combo 0. Its new-combo flag and combo skip are
/// not applied.
pub(crate) fn push_hit_object(
    parser: &mut Parser,
    cursor: &Cursor<'_>,
    mut hit: HitObject,
) -> Result<(), ParseError> {
    let hits = &mut parser.beatmap.hit_objects;
    match hits.last() {
        None => {
            hit.combo = 0;
            hit.combo_seq = 1;
        }
        Some(previous) => {
            if hit.time < previous.time {
                return Err(cursor.error(
                    "E4001",
                    format!(
                        "hit object at {}s comes before the previous one at {}s",
                        hit.time, previous.time
                    ),
                ));
            }
            if hit.hit_type.is_new_combo() {
                hit.combo = previous.combo + 1 + hit.hit_type.combo_skip();
                hit.combo_seq = 1;
            } else {
                hit.combo = previous.combo;
                hit.combo_seq = previous.combo_seq + 1;
            }
        }
    }
    hit.color = color_index(hit.combo, parser.beatmap.colors.len());
    hits.push(hit);
    Ok(())
}

/// Whole-document pass run after the last line.
pub(crate) fn finish(mut beatmap: Beatmap, options: &ParseOptions) -> Result<Beatmap, ParseError> {
    if beatmap.general.audio_filename.is_none() {
        return Err(ParseError::new("E6001", "missing AudioFilename in [General]", 0));
    }
    if options.require_hit_objects && beatmap.hit_objects.is_empty() {
        return Err(ParseError::new("E6003", "beatmap has no hit objects", 0));
    }

    // A [Colours] section placed after [HitObjects] still applies.
    let colors = beatmap.colors.len();
    for hit in &mut beatmap.hit_objects {
        hit.color = color_index(hit.combo, colors);
    }

    if options.append_sentinel {
        match sentinel_after(&beatmap) {
            Some(sentinel) => beatmap.hit_objects.push(sentinel),
            None => debug!("no timing points, sentinel not appended"),
        }
    }
    Ok(beatmap)
}

/// Silent circle at infinite time, opening a combo of its own. It refers to
/// the last timing point, so a beatmap without timing points gets none.
fn sentinel_after(beatmap: &Beatmap) -> Option<HitObject> {
    let timing_point = beatmap.timing_points.len().checked_sub(1)?;
    let sample_set = beatmap.timing_points[timing_point].sample_set;
    let last = beatmap.hit_objects.last();
    let combo = last.map_or(0, |hit| hit.combo + 1);

    Some(HitObject {
        position: last.map_or_else(Default::default, HitObject::end_position),
        time: f64::INFINITY,
        hit_type: HitType::CIRCLE | HitType::NEW_COMBO,
        sound_additions: SoundAdditions::NONE,
        sample_set,
        additions_set: sample_set,
        sample_index: 0,
        volume: 0.0,
        sample_filename: None,
        combo,
        combo_seq: 1,
        color: color_index(combo, beatmap.colors.len()),
        timing_point,
        kind: HitObjectKind::Circle,
    })
}
