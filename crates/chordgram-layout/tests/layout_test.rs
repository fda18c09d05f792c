use chordgram_layout::{
    ArcGenerator, ChordGenerator, RibbonGenerator, SortOrder, group_ticks, tick_count,
};
use std::f64::consts::TAU;

fn sample_matrix() -> Vec<Vec<f64>> {
    vec![
        vec![11975.0, 5871.0, 8916.0, 2868.0],
        vec![1951.0, 10048.0, 2060.0, 6171.0],
        vec![8010.0, 16145.0, 8090.0, 8045.0],
        vec![1013.0, 990.0, 940.0, 6907.0],
    ]
}

fn diagram_generator() -> ChordGenerator {
    ChordGenerator::new()
        .pad_angle(0.05)
        .sort_subgroups(SortOrder::Descending)
}

fn assert_parses(d: &str) {
    let segments: Vec<_> = svgtypes::PathParser::from(d)
        .collect::<Result<_, _>>()
        .unwrap_or_else(|e| panic!("invalid path data {d:?}: {e}"));
    assert!(!segments.is_empty(), "empty path data");
}

#[test]
fn sample_matrix_yields_one_group_per_row_and_a_chord_per_pair() {
    let layout = diagram_generator().layout(&sample_matrix());
    assert_eq!(layout.groups.len(), 4);
    // Every pair (including the diagonal) carries flow: n * (n + 1) / 2 chords.
    assert_eq!(layout.chords.len(), 10);
    assert_eq!(layout.chords.iter().filter(|c| c.is_self_loop()).count(), 4);
}

#[test]
fn groups_and_padding_fill_the_circle() {
    let layout = diagram_generator().layout(&sample_matrix());
    let covered: f64 = layout
        .groups
        .iter()
        .map(|g| g.end_angle - g.start_angle)
        .sum();
    assert!((covered + 4.0 * 0.05 - TAU).abs() < 1e-9);

    for pair in layout.groups.windows(2) {
        assert!((pair[1].start_angle - pair[0].end_angle - 0.05).abs() < 1e-9);
    }
}

#[test]
fn subgroups_stay_inside_their_group() {
    let layout = diagram_generator().layout(&sample_matrix());
    for chord in &layout {
        for end in [chord.source, chord.target] {
            let g = layout.groups[end.index];
            assert!(end.start_angle >= g.start_angle - 1e-9);
            assert!(end.end_angle <= g.end_angle + 1e-9);
        }
        assert!(chord.source.value >= chord.target.value);
    }
}

#[test]
fn generated_paths_are_valid_svg() {
    let layout = diagram_generator().layout(&sample_matrix());
    let arc = ArcGenerator::new(420.0, 450.0).unwrap();
    let ribbon = RibbonGenerator::new(419.0).unwrap();
    for g in &layout.groups {
        assert_parses(&arc.group_path(g));
    }
    for c in &layout {
        assert_parses(&ribbon.path(c));
    }
}

#[test]
fn sample_tick_counts_follow_group_totals() {
    let layout = diagram_generator().layout(&sample_matrix());
    let counts: Vec<usize> = layout
        .groups
        .iter()
        .map(|g| group_ticks(g, 1000.0).unwrap().len())
        .collect();
    assert_eq!(counts, vec![30, 21, 41, 10]);
    for (g, n) in layout.groups.iter().zip(&counts) {
        assert_eq!(tick_count(g.value, 1000.0).unwrap(), *n);
    }
}

#[test]
fn ticks_start_at_the_group_start_and_never_pass_its_end() {
    let layout = diagram_generator().layout(&sample_matrix());
    for g in &layout.groups {
        let ticks: Vec<_> = group_ticks(g, 1000.0).unwrap().collect();
        assert_eq!(ticks[0].angle, g.start_angle);
        assert!(ticks.iter().all(|t| t.angle < g.end_angle));
    }
}
