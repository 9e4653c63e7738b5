use osu_schema::{Beatmap, HitObject, HitObjectKind, Path, Vec2};

pub fn run_inspect(beatmap: &Beatmap, samples: usize) -> anyhow::Result<()> {
    let meta = &beatmap.metadata;
    println!(
        "{} - {} [{}] by {}",
        meta.artist, meta.title, meta.version, meta.creator
    );
    println!(
        "format v{}, audio {}",
        beatmap.version,
        beatmap.general.audio_filename.as_deref().unwrap_or("-")
    );
    println!(
        "{} timing points, {} hit objects, {} colours, {} breaks",
        beatmap.timing_points.len(),
        beatmap.hit_objects.len(),
        beatmap.colors.len(),
        beatmap.events.breaks.len()
    );
    if let Some(last) = beatmap.hit_objects.iter().rev().find(|hit| !hit.is_sentinel()) {
        println!("ends at {:.3}s", last.end_time());
    }

    if beatmap.hit_objects.is_empty() {
        println!("Beatmap has no hit objects.");
        return Ok(());
    }

    println!();
    println!(" Time(s) | Kind    | Combo   | Colour  | Position       | End(s)");
    println!("---------|---------|---------|---------|----------------|---------");

    for hit in &beatmap.hit_objects {
        println!(
            "{:>8.3} | {:<7} | {:>3}/{:<3} | {:<7} | {:<14} | {:>8.3}",
            hit.time,
            kind_name(&hit.kind),
            hit.combo,
            hit.combo_seq,
            colour_label(beatmap, hit),
            format_point(hit.position),
            hit.end_time()
        );

        if let HitObjectKind::Slider(slider) = &hit.kind {
            let points: Vec<String> = sample_path(&slider.path, samples)
                .into_iter()
                .map(format_point)
                .collect();
            if !points.is_empty() {
                println!("         |   path: {}", points.join(" -> "));
            }
        }
    }

    Ok(())
}

fn kind_name(kind: &HitObjectKind) -> &'static str {
    match kind {
        HitObjectKind::Circle => "circle",
        HitObjectKind::Slider(_) => "slider",
        HitObjectKind::Spinner { .. } => "spinner",
        HitObjectKind::HoldNote { .. } => "hold",
    }
}

fn colour_label(beatmap: &Beatmap, hit: &HitObject) -> String {
    match beatmap.color_of(hit) {
        Some(c) => format!("#{:02x}{:02x}{:02x}", c.red, c.green, c.blue),
        None => "-".to_string(),
    }
}

fn format_point(p: Vec2) -> String {
    format!("({:.1}, {:.1})", p.x, p.y)
}

/// `samples` evenly spaced points over one traversal, both ends included.
fn sample_path(path: &Path, samples: usize) -> Vec<Vec2> {
    match samples {
        0 => Vec::new(),
        1 => vec![path.evaluate(0.0)],
        n => (0..n)
            .map(|i| path.evaluate(i as f64 / (n - 1) as f64))
            .collect(),
    }
}
