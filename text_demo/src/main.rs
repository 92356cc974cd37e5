//! Text mesh demo
//!
//! Rasterizes a string with a TTF/OTF font (or a baked atlas), places it as a
//! label and reports the resulting mesh. Optionally exports the glyph atlas
//! as a PNG for inspection.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Arg, ArgAction, ArgMatches, Command};
use text_mesh::config::Config;
use text_mesh::foundation::math::{Point3, Vec3};
use text_mesh::text::{
    BakedFont, FontAtlas, FontAtlasSettings, GlyphSource, TextLabel, TextMeshBuilder,
    TextMeshConfig,
};

const DEFAULT_PIXEL_SIZE: &str = "256";
const DEFAULT_CHAR_SIZE: &str = "32";

fn command() -> Command {
    Command::new("text_demo")
        .about("Builds a text mesh from a font and a string")
        .arg(
            Arg::new("font")
                .value_name("FONT")
                .help("TTF/OTF font, or a baked font description (.ron/.toml) with --baked-image")
                .required(true),
        )
        .arg(Arg::new("text").value_name("TEXT").help("Text to lay out").required(true))
        .arg(
            Arg::new("size")
                .value_name("PIXELS")
                .help("Pixel size glyphs are rasterized at")
                .value_parser(clap::value_parser!(u32).range(1..))
                .default_value(DEFAULT_PIXEL_SIZE),
        )
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("FILE")
                .help("Text mesh configuration (.toml or .ron)"),
        )
        .arg(
            Arg::new("atlas-settings")
                .long("atlas-settings")
                .value_name("FILE")
                .help("Font atlas page settings (.toml or .ron)"),
        )
        .arg(
            Arg::new("atlas")
                .short('o')
                .long("atlas")
                .value_name("PNG")
                .help("Write the glyph atlas image to this file"),
        )
        .arg(
            Arg::new("bold")
                .long("bold")
                .help("Request bold glyphs")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("bold-font")
                .long("bold-font")
                .value_name("FONT")
                .help("Separate face used for bold glyphs"),
        )
        .arg(
            Arg::new("baked-image")
                .long("baked-image")
                .value_name("PNG")
                .help("Atlas image of a baked font; FONT is then its description"),
        )
        .arg(
            Arg::new("char-size")
                .long("char-size")
                .value_name("UNITS")
                .help("On-screen character size")
                .value_parser(clap::value_parser!(f32))
                .default_value(DEFAULT_CHAR_SIZE),
        )
        .arg(
            Arg::new("position")
                .long("position")
                .value_name("X,Y")
                .help("Label position")
                .default_value("200,500"),
        )
}

fn path_arg(matches: &ArgMatches, id: &str) -> Option<PathBuf> {
    matches.get_one::<String>(id).map(PathBuf::from)
}

fn parse_position(value: &str) -> Result<Vec3> {
    let (x, y) = value
        .split_once(',')
        .with_context(|| format!("Position {value:?} is not of the form X,Y"))?;
    let x = x.trim().parse().with_context(|| format!("Invalid x coordinate {x:?}"))?;
    let y = y.trim().parse().with_context(|| format!("Invalid y coordinate {y:?}"))?;
    Ok(Vec3::new(x, y, 0.0))
}

fn load_source(matches: &ArgMatches, font_path: PathBuf) -> Result<Box<dyn GlyphSource>> {
    if let Some(image_path) = path_arg(matches, "baked-image") {
        let font = BakedFont::load(&font_path, &image_path)
            .with_context(|| format!("Failed to load baked font {}", font_path.display()))?;
        log::info!("Loaded baked font authored at {}px", font.native_size());
        return Ok(Box::new(font));
    }

    let mut font = FontAtlas::from_file(&font_path)
        .with_context(|| format!("Failed to load font {}", font_path.display()))?;

    if let Some(settings_path) = path_arg(matches, "atlas-settings") {
        let settings = FontAtlasSettings::load_from_file(&settings_path)
            .with_context(|| format!("Failed to load atlas settings {}", settings_path.display()))?;
        font = font
            .with_settings(settings)
            .with_context(|| format!("Invalid atlas settings in {}", settings_path.display()))?;
    }

    if let Some(bold_path) = path_arg(matches, "bold-font") {
        let data = std::fs::read(&bold_path)
            .with_context(|| format!("Failed to read {}", bold_path.display()))?;
        font = font
            .with_bold_face(&data)
            .with_context(|| format!("Failed to load bold font {}", bold_path.display()))?;
    }

    Ok(Box::new(font))
}

fn run(matches: &ArgMatches) -> Result<()> {
    let font_path = path_arg(matches, "font").context("Missing font argument")?;
    let text = matches.get_one::<String>("text").context("Missing text argument")?;
    let size = *matches.get_one::<u32>("size").context("Missing size")?;
    let char_size = *matches.get_one::<f32>("char-size").context("Missing char size")?;
    let position = matches.get_one::<String>("position").context("Missing position")?;
    let position = parse_position(position)?;

    let mut config = match path_arg(matches, "config") {
        Some(path) => TextMeshConfig::load_from_file(&path)
            .with_context(|| format!("Failed to load configuration {}", path.display()))?,
        None => TextMeshConfig::default(),
    };
    if matches.get_flag("bold") {
        config.bold = true;
    }

    let builder = TextMeshBuilder::new(config).context("Invalid text mesh configuration")?;
    let mut source = load_source(matches, font_path)?;

    let mut label = TextLabel::new(size);
    label.set_text(text.as_str());
    label.set_position(position);
    label.set_char_size(char_size);

    let model = label.model_matrix();
    let mesh = label.mesh(&builder, source.as_mut()).context("Failed to build text mesh")?;

    log::info!(
        "{} glyphs: {} vertices, {} indices ({} bytes of vertex data)",
        mesh.glyph_count(),
        mesh.vertices().len(),
        mesh.indices().len(),
        mesh.vertex_bytes().len() + mesh.tex_coord_bytes().len()
    );

    match mesh.bounds() {
        Some(bounds) => {
            let min = model.transform_point(&Point3::new(bounds.min_x, bounds.min_y, 0.0));
            let max = model.transform_point(&Point3::new(bounds.max_x, bounds.max_y, 0.0));
            log::info!(
                "Mesh bounds {:.1}x{:.1}, on screen ({:.1}, {:.1}) to ({:.1}, {:.1})",
                bounds.width(),
                bounds.height(),
                min.x,
                min.y,
                max.x,
                max.y
            );
        }
        None => log::info!("Nothing to draw"),
    }

    let atlas = mesh.atlas();
    log::info!(
        "Atlas {}x{}, {} channel(s), {} bytes",
        atlas.width,
        atlas.height,
        atlas.channels,
        atlas.size_bytes()
    );

    if let Some(path) = path_arg(matches, "atlas") {
        if atlas.is_empty() {
            log::warn!("Atlas is empty, not writing {}", path.display());
        } else {
            atlas
                .save_png(&path)
                .with_context(|| format!("Failed to write atlas to {}", path.display()))?;
            log::info!("Atlas written to {}", path.display());
        }
    }

    Ok(())
}

fn main() -> Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    let matches = command().get_matches();
    run(&matches).map_err(|e| {
        log::error!("{:#}", e);
        e
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_is_well_formed() {
        command().debug_assert();
    }

    #[test]
    fn test_defaults() {
        let matches = command().get_matches_from(["text_demo", "font.ttf", "Hello world\n"]);

        assert_eq!(matches.get_one::<u32>("size"), Some(&256));
        assert_eq!(matches.get_one::<f32>("char-size"), Some(&32.0));
        assert!(!matches.get_flag("bold"));
        assert!(path_arg(&matches, "atlas").is_none());
    }

    #[test]
    fn test_zero_size_is_rejected() {
        assert!(command().try_get_matches_from(["text_demo", "font.ttf", "x", "0"]).is_err());
    }

    #[test]
    fn test_parse_position() {
        assert_eq!(parse_position("200, 500").unwrap(), Vec3::new(200.0, 500.0, 0.0));
        assert!(parse_position("200").is_err());
        assert!(parse_position("a,1").is_err());
    }
}
