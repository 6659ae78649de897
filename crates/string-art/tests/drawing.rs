//! End-to-end drawing tests over the bundled patterns.
//!
//! A partial draw, a stepwise walk, and a backward seek must all leave the
//! canvas exactly as a direct draw to the same position would.

use pretty_assertions::assert_eq;
use string_art::{
    Artwork, Config, Dimensions, DrawOptions, DrawOutcome, Pattern, Point, RecordingRenderer,
    SvgRenderer,
};

fn canvas() -> RecordingRenderer {
    RecordingRenderer::new(Dimensions::square(300.0))
}

fn small(pattern: Pattern) -> Box<dyn Artwork> {
    let partial = match pattern {
        Pattern::Circle => Config::new().with("n", 24.0).with("multiplier", 3.0),
        Pattern::Star => Config::new().with("sides", 5.0).with("sideNails", 6.0),
        Pattern::Polygon => Config::new().with("nailsPerSide", 6.0).with("drawCenter", true),
        Pattern::Lotus => Config::new().with("density", 6.0).with("layers", 2.0),
        Pattern::MaurerRose => Config::new().with("points", 40.0),
        Pattern::Comet => Config::new().with("n", 30.0),
        Pattern::Parabola => Config::new().with("n", 12.0),
    };
    pattern.create_with(&partial).unwrap()
}

fn full_lines(pattern: Pattern) -> Vec<(Point, Point)> {
    let mut renderer = canvas();
    small(pattern).draw(&mut renderer, DrawOptions::full()).unwrap();
    renderer.lines()
}

#[test]
fn full_draw_matches_step_count() {
    for &pattern in Pattern::all() {
        let mut art = small(pattern);
        let mut renderer = canvas();
        let outcome = art.draw(&mut renderer, DrawOptions::full()).unwrap();
        assert_eq!(outcome, DrawOutcome::Complete { position: art.step_count() }, "{}", pattern.name());
        assert_eq!(renderer.lines().len(), art.step_count(), "{}", pattern.name());
    }
}

#[test]
fn partial_draw_is_a_prefix_of_the_full_draw() {
    for &pattern in Pattern::all() {
        let full = full_lines(pattern);
        let k = full.len() / 3;

        let mut renderer = canvas();
        let outcome = small(pattern).draw(&mut renderer, DrawOptions::to_position(k)).unwrap();
        assert_eq!(outcome.position(), k);
        assert_eq!(renderer.lines(), full[..k].to_vec(), "{}", pattern.name());
    }
}

#[test]
fn stepwise_goto_equals_direct_draw() {
    for &pattern in Pattern::all() {
        let full = full_lines(pattern);
        let mut art = small(pattern);
        let mut renderer = canvas();
        art.draw(&mut renderer, DrawOptions::to_position(0)).unwrap();

        for position in 1..=full.len() {
            assert_eq!(art.goto(&mut renderer, position).unwrap().position(), position);
        }
        assert_eq!(renderer.lines(), full, "{}", pattern.name());
    }
}

#[test]
fn backward_seek_equals_fresh_draw() {
    for &pattern in Pattern::all() {
        let mut art = small(pattern);
        let mut renderer = canvas();
        art.draw(&mut renderer, DrawOptions::full()).unwrap();
        let back = art.step_count() / 2;
        art.goto(&mut renderer, back).unwrap();

        let mut fresh = canvas();
        small(pattern).draw(&mut fresh, DrawOptions::to_position(back)).unwrap();
        assert_eq!(renderer.lines(), fresh.lines(), "{}", pattern.name());
        assert_eq!(art.position(), back);
    }
}

#[test]
fn layers_follow_the_color_bands() {
    let partial = Config::new()
        .with("n", 30.0)
        .with("isMultiColor", true)
        .with("colorCount", 3.0)
        .with("mirrorColors", true);
    let mut art = Pattern::Comet.create_with(&partial).unwrap();
    let mut renderer = canvas();
    art.draw(&mut renderer, DrawOptions::full()).unwrap();

    let starts: Vec<usize> = art.layers().iter().map(|layer| layer.start_step).collect();
    assert_eq!(starts, vec![0, 6, 12, 18, 24]);
    let colors = renderer.colors();
    assert_eq!(colors.len(), 5);
    assert_eq!(colors[0], colors[4]);
    assert_eq!(colors[1], colors[3]);
}

#[test]
fn share_link_round_trip() {
    let art = Pattern::Lotus
        .create_with(&Config::new().with("sides", 9.0).with("density", 88.0))
        .unwrap();
    assert_eq!(art.serialize_config(), "9_88");
    assert_eq!(art.share_url(), "?pattern=lotus&config=9_88");

    let restored = string_art::patterns::from_url(&art.share_url()).unwrap();
    assert_eq!(restored.config(), art.config());
}

#[test]
fn svg_output_has_strings_and_nails() {
    let mut art = small(Pattern::Star);
    let mut renderer = SvgRenderer::new(Dimensions::square(300.0));
    art.draw(&mut renderer, DrawOptions::full()).unwrap();

    let svg = renderer.to_svg().unwrap();
    assert!(svg.starts_with("<?xml"));
    assert!(svg.contains("<g id=\"strings\""));
    assert!(svg.contains("<g id=\"nails-default\""));
    assert!(svg.contains("<circle"));
    assert!(svg.trim_end().ends_with("</svg>"));
}
