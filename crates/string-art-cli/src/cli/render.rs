//! Render command - draw a pattern to SVG (stdout or file) or PNG.

use std::fs;
use std::io::{self, Write};

use image::RgbaImage;
use tiny_skia::Pixmap;

use string_art::{Artwork, Dimensions, DrawOptions, SvgRenderer};

use super::common::{build_artwork, canvas_size, parse_art_args, ArtArgs};

/// Draw `art` with the size and position from `args` and return the SVG text.
pub fn render_svg(art: &mut dyn Artwork, args: &ArtArgs) -> Result<(String, Dimensions), String> {
    let size = canvas_size(args, art);
    let mut renderer = SvgRenderer::new(size);
    let options = match args.position {
        Some(position) => DrawOptions::to_position(position),
        None => DrawOptions::full(),
    };

    let outcome = art.draw(&mut renderer, options).map_err(|e| e.to_string())?;
    log::info!(
        "{}: drew {} of {} steps on {}x{}",
        art.id(),
        outcome.position(),
        art.step_count(),
        size.width,
        size.height
    );

    let svg = renderer.to_svg().map_err(|e| e.to_string())?;
    Ok((svg, size))
}

/// Rasterize SVG text with resvg.
pub fn rasterize(svg: &str, size: Dimensions) -> Result<RgbaImage, String> {
    let width = size.width.round().max(1.0) as u32;
    let height = size.height.round().max(1.0) as u32;

    let tree = usvg::Tree::from_str(svg, &usvg::Options::default())
        .map_err(|e| format!("failed to parse generated SVG: {}", e))?;
    let mut pixmap = Pixmap::new(width, height).ok_or("failed to create pixmap")?;
    resvg::render(&tree, tiny_skia::Transform::default(), &mut pixmap.as_mut());

    RgbaImage::from_raw(width, height, pixmap.take()).ok_or_else(|| "failed to build image".to_string())
}

/// Write to `output`: stdout for none or `-`, PNG for `.png`, SVG otherwise.
pub fn write_output(svg: &str, size: Dimensions, output: Option<&str>) -> Result<(), String> {
    match output {
        None | Some("-") => io::stdout().write_all(svg.as_bytes()).map_err(|e| e.to_string()),
        Some(path) if path.to_lowercase().ends_with(".png") => {
            let image = rasterize(svg, size)?;
            image.save(path).map_err(|e| format!("failed to write {}: {}", path, e))?;
            eprintln!("Wrote {}", path);
            Ok(())
        }
        Some(path) => {
            fs::write(path, svg).map_err(|e| format!("failed to write {}: {}", path, e))?;
            eprintln!("Wrote {}", path);
            Ok(())
        }
    }
}

pub fn cmd_render(args: &[String]) -> Result<(), String> {
    let parsed = parse_art_args(args)?;
    let mut art = build_artwork(&parsed)?;
    let (svg, size) = render_svg(art.as_mut(), &parsed)?;
    write_output(&svg, size, parsed.output.as_deref())
}

#[cfg(test)]
mod tests {
    use super::*;
    use string_art::Pattern;

    #[test]
    fn position_limits_the_drawing() {
        let mut art = Pattern::Parabola.create().unwrap();
        let args = ArtArgs { position: Some(0), size: Some(Dimensions::square(100.0)), ..ArtArgs::default() };
        let (svg, size) = render_svg(art.as_mut(), &args).unwrap();
        assert_eq!(size, Dimensions::square(100.0));
        assert_eq!(art.position(), 0);
        assert!(svg.contains("<svg"));
    }

    #[test]
    fn rasterizes_to_the_canvas_size() {
        let mut art = Pattern::Star.create().unwrap();
        let args = ArtArgs { size: Some(Dimensions::new(120.0, 80.0)), ..ArtArgs::default() };
        let (svg, size) = render_svg(art.as_mut(), &args).unwrap();
        let image = rasterize(&svg, size).unwrap();
        assert_eq!(image.dimensions(), (120, 80));
    }
}
