use std::ffi::OsString;
use std::path::PathBuf;
use std::process;

use clap::{value_parser, Arg, ArgAction, Command};

use crate::config::Config;
use crate::terminal::Theme;

/// Everything the user can ask for on the command line.
#[derive(Debug, Clone)]
pub struct Args {
    pub input_file: PathBuf,

    /// `Some(theme)` when color support is requested.
    pub color: Option<Theme>,
    /// Keep the light fixed in world space instead of following the camera.
    pub static_light: bool,

    pub flip_faces: bool,
    pub invert_x: bool,
    pub invert_y: bool,
    pub invert_z: bool,

    /// Animation speeds in degrees per second, when animating.
    pub animate_azimuth: Option<f32>,
    pub animate_altitude: Option<f32>,

    pub zoom: f32,
    pub azimuth: f32,
    pub altitude: f32,
}

pub fn command(config: &Config) -> Command {
    Command::new("objview")
        .about("Render an OBJ model as live ASCII art with an orbit camera")
        .version(env!("CARGO_PKG_VERSION"))
        .after_help(
            "Controls:\n\
             \x20 Left/Right, h/l, a/d   rotate azimuth\n\
             \x20 Up/Down, k/j, w/s      rotate altitude\n\
             \x20 +, =, i                zoom in\n\
             \x20 -, o                   zoom out\n\
             \x20 Tab                    toggle HUD\n\
             \x20 q, Esc                 quit",
        )
        .arg(
            Arg::new("file")
                .value_name("FILE.OBJ")
                .help("Wavefront OBJ model to display")
                .required(true)
                .value_parser(value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("color")
                .short('c')
                .long("color")
                .value_name("THEME")
                .help("Enable color support, with an optional theme")
                .num_args(0..=1)
                .default_missing_value("dark")
                .value_parser(["dark", "light", "transparent"]),
        )
        .arg(
            Arg::new("light")
                .short('l')
                .long("light")
                .help("Keep the light fixed in world space (off: light follows the camera)")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("az")
                .long("az")
                .value_name("DEG_S")
                .help("Animate azimuth, with an optional speed in deg/s")
                .num_args(0..=1)
                .default_missing_value(config.animation_step_azimuth.to_string())
                .value_parser(value_parser!(f32)),
        )
        .arg(
            Arg::new("al")
                .long("al")
                .value_name("DEG_S")
                .help("Animate altitude, with an optional speed in deg/s")
                .num_args(0..=1)
                .default_missing_value(config.animation_step_altitude.to_string())
                .value_parser(value_parser!(f32)),
        )
        .arg(
            Arg::new("zoom")
                .short('z')
                .long("zoom")
                .value_name("X")
                .help("Initial zoom")
                .value_parser(value_parser!(f32)),
        )
        .arg(
            Arg::new("azimuth")
                .long("azimuth")
                .value_name("DEG")
                .help("Initial azimuth")
                .value_parser(value_parser!(f32)),
        )
        .arg(
            Arg::new("altitude")
                .long("altitude")
                .value_name("DEG")
                .help("Initial altitude")
                .value_parser(value_parser!(f32)),
        )
        .arg(
            Arg::new("flip")
                .long("flip")
                .help("Flip face winding order")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("invert-x")
                .long("invert-x")
                .help("Mirror geometry along the X axis")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("invert-y")
                .long("invert-y")
                .help("Mirror geometry along the Y axis")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("invert-z")
                .long("invert-z")
                .help("Mirror geometry along the Z axis")
                .action(ArgAction::SetTrue),
        )
}

/// Parses the process arguments, exiting with status 0 for help/version
/// and 1 for anything malformed. Runs before the terminal changes modes,
/// so errors land on a usable stderr.
pub fn parse(config: &Config) -> Args {
    match try_parse_from(config, std::env::args_os()) {
        Ok(args) => args,
        Err(e) if !e.use_stderr() => {
            let _ = e.print();
            process::exit(0);
        }
        Err(e) => {
            let _ = e.print();
            process::exit(1);
        }
    }
}

pub fn try_parse_from<I, T>(config: &Config, args: I) -> Result<Args, clap::Error>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let matches = command(config).try_get_matches_from(args)?;

    let color = matches
        .get_one::<String>("color")
        .map(|name| Theme::parse(name).unwrap_or_default());

    Ok(Args {
        input_file: matches
            .get_one::<PathBuf>("file")
            .expect("file is required")
            .clone(),
        color,
        static_light: matches.get_flag("light"),
        flip_faces: matches.get_flag("flip"),
        invert_x: matches.get_flag("invert-x"),
        invert_y: matches.get_flag("invert-y"),
        invert_z: matches.get_flag("invert-z"),
        animate_azimuth: matches.get_one::<f32>("az").copied(),
        animate_altitude: matches.get_one::<f32>("al").copied(),
        zoom: matches
            .get_one::<f32>("zoom")
            .copied()
            .unwrap_or(config.zoom_start),
        azimuth: matches
            .get_one::<f32>("azimuth")
            .copied()
            .unwrap_or(config.azimuth_start),
        altitude: matches
            .get_one::<f32>("altitude")
            .copied()
            .unwrap_or(config.altitude_start),
    })
}
