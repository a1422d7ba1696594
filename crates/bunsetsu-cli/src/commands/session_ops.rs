use std::path::Path;
use std::sync::Arc;

use bunsetsu_core::candidate::{flag, Candidate, Segment};
use bunsetsu_core::{Resources, Segmenter};
use serde::Serialize;

use crate::text::parse_choices;

#[derive(Serialize)]
struct SegmentView<'a> {
    from: usize,
    reading: &'a str,
    surface: &'a str,
}

#[derive(Serialize)]
struct CandidateView<'a> {
    surface: &'a str,
    score: i64,
    flags: Vec<&'static str>,
}

const FLAG_NAMES: &[(u32, &str)] = &[
    (flag::OCHAIRE, "ochaire"),
    (flag::SINGLEWORD, "singleword"),
    (flag::HIRAGANA, "hiragana"),
    (flag::KATAKANA, "katakana"),
    (flag::GUESS, "guess"),
    (flag::USEDICT, "usedict"),
    (flag::COMPOUND, "compound"),
    (flag::COMPOUND_PART, "compound_part"),
    (flag::BEST, "best"),
];

fn flag_names(cand: &Candidate) -> Vec<&'static str> {
    FLAG_NAMES
        .iter()
        .filter(|(bit, _)| cand.has_flag(*bit))
        .map(|&(_, name)| name)
        .collect()
}

fn open_session(container: &str, history: Option<&str>) -> Segmenter {
    let res = die!(
        Resources::open(Path::new(container)),
        "Error opening container: {}"
    );
    let res = Arc::new(res);
    match history {
        Some(path) => die!(
            Segmenter::open_history(res, Path::new(path)),
            "Error opening history: {}"
        ),
        None => Segmenter::new(res),
    }
}

fn segment_view(seg: &Segment) -> SegmentView<'_> {
    SegmentView {
        from: seg.from,
        reading: &seg.reading,
        surface: seg.chosen().map_or(seg.reading.as_str(), |c| c.surface.as_str()),
    }
}

fn print_segments(session: &Segmenter, json: bool) {
    if json {
        let views: Vec<_> = session.segments().iter().map(segment_view).collect();
        let out = die!(serde_json::to_string_pretty(&views), "Error: {}");
        println!("{out}");
    } else {
        let segs: Vec<String> = session
            .segments()
            .iter()
            .map(segment_view)
            .map(|v| format!("{}({})", v.surface, v.reading))
            .collect();
        println!("{}", segs.join(" | "));
    }
}

pub fn segment_cmd(container: &str, kana: &str, history: Option<&str>, json: bool) {
    let mut session = open_session(container, history);
    session.set_string(kana);
    print_segments(&session, json);
}

pub fn candidates_cmd(container: &str, kana: &str, json: bool) {
    let mut session = open_session(container, None);
    session.set_string(kana);
    if json {
        let all: Vec<Vec<CandidateView>> = session
            .segments()
            .iter()
            .map(|seg| {
                seg.cands
                    .iter()
                    .map(|c| CandidateView {
                        surface: &c.surface,
                        score: c.score,
                        flags: flag_names(c),
                    })
                    .collect()
            })
            .collect();
        let out = die!(serde_json::to_string_pretty(&all), "Error: {}");
        println!("{out}");
        return;
    }
    for (i, seg) in session.segments().iter().enumerate() {
        println!("[{i}] {} (from {}, len {})", seg.reading, seg.from, seg.len);
        for (j, cand) in seg.cands.iter().enumerate() {
            println!(
                "  {j:>3}: {:<12} {:>10}  {}",
                cand.surface,
                cand.score,
                flag_names(cand).join(",")
            );
        }
    }
}

/// Convert, pick the listed candidates (segment order) and commit the
/// result into the learning store at `store`.
pub fn commit_cmd(container: &str, kana: &str, store: &str, choose: Option<&str>) {
    let mut session = open_session(container, Some(store));
    session.set_string(kana);
    let choices = die!(parse_choices(choose.unwrap_or("")), "Error: {}");
    for (i, &c) in choices.iter().enumerate() {
        die!(session.select(i, c), "Error: {}");
    }
    let ops = die!(session.commit(), "Error committing: {}");
    die!(session.flush(), "Error writing history: {}");
    print_segments(&session, false);
    eprintln!("Learned {} update(s) into {store}", ops.len());
}
