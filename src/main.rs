use std::fs::File;
use std::process;
use std::thread;
use std::time::{Duration, Instant};

use anyhow::Result;
use crossterm::event::KeyCode;
use log::{info, LevelFilter};
use simplelog::WriteLogger;

use objview::cli::{self, Args};
use objview::config::Config;
use objview::core::{Camera, Light, Object};
use objview::pipeline::{Buffer, Renderer};
use objview::terminal::{Input, Palette, Terminal};
use objview::Metrics;

fn main() {
    let config = Config::default();
    let args = cli::parse(&config);
    init_logging();

    // Everything that can fail happens before the terminal changes modes.
    let mut object = match Object::load(&args.input_file) {
        Ok(obj) => obj,
        Err(e) => {
            eprintln!("error: {e:#}");
            process::exit(1);
        }
    };

    object.normalize();
    // Unit-cube models read tiny at zoom 1; scale up so a typical mesh
    // covers at least half the screen.
    object.scale(3.0);

    if args.flip_faces {
        object.flip_faces();
    }
    if args.invert_x {
        object.invert_x();
    }
    if args.invert_y {
        object.invert_y();
    }
    if args.invert_z {
        object.invert_z();
    }

    if let Err(e) = run(&config, &args, &object) {
        eprintln!("error: {e:#}");
        process::exit(1);
    }
}

/// Opt-in file logging; a TUI cannot log to the screen it draws on.
fn init_logging() {
    if let Ok(path) = std::env::var("OBJVIEW_LOG") {
        match File::create(&path) {
            Ok(file) => {
                let _ = WriteLogger::init(LevelFilter::Debug, simplelog::Config::default(), file);
            }
            Err(e) => eprintln!("warning: cannot open log file {path}: {e}"),
        }
    }
}

fn make_buffer(config: &Config, cols: u16, rows: u16) -> Buffer {
    Buffer::new(
        cols as usize,
        rows as usize,
        config.logical_width(cols, rows),
        config.logical_height,
    )
}

fn run(config: &Config, args: &Args, object: &Object) -> Result<()> {
    let mut terminal = Terminal::new()?;

    let palette = args
        .color
        .map(|theme| Palette::build(&object.materials, theme));
    if let Some(p) = &palette {
        terminal.apply_theme(p)?;
    }

    let (cols, rows) = terminal.size()?;
    let mut buffer = make_buffer(config, cols, rows);
    info!("render surface {cols}x{rows}");

    let mut camera = Camera::with_view(config, args.azimuth, args.altitude, args.zoom);
    let light = Light::default();
    let renderer = Renderer::new(config);

    let mut metrics = Metrics::new();
    let mut hud = false;
    let mut animate = args.animate_azimuth.is_some() || args.animate_altitude.is_some();
    let mut needs_redraw = true;

    loop {
        let frame_start = Instant::now();
        let dt = metrics.tick();

        if animate {
            // Degrees per second, scaled by wall-clock time, so the spin
            // speed is independent of the frame rate.
            if let Some(speed) = args.animate_altitude {
                camera.rotate_down(speed * dt);
            }
            if let Some(speed) = args.animate_azimuth {
                camera.rotate_left(speed * dt);
            }
            needs_redraw = true;
        }

        match terminal.poll(Duration::from_millis(1))? {
            Some(Input::Resize(new_cols, new_rows)) => {
                buffer = make_buffer(config, new_cols, new_rows);
                if let Some(p) = &palette {
                    terminal.apply_theme(p)?;
                }
                info!("resized to {new_cols}x{new_rows}");
                needs_redraw = true;
            }
            Some(Input::Key(KeyCode::Char('q' | 'Q'))) | Some(Input::Key(KeyCode::Esc)) => break,
            Some(Input::Key(KeyCode::Tab)) => {
                hud = !hud;
                needs_redraw = true;
            }
            Some(Input::Key(key)) => {
                // First manual input takes over from animation.
                animate = false;
                handle_control(key, &mut camera);
                needs_redraw = true;
            }
            None => {}
        }

        if needs_redraw {
            buffer.clear();
            renderer.render(
                &mut buffer,
                object,
                &camera,
                &light,
                args.static_light,
                palette.is_some(),
            );
            terminal.draw(&buffer, palette.as_ref())?;
            if hud {
                terminal.draw_hud(&camera, metrics.fps(), palette.as_ref())?;
            }
            needs_redraw = false;
        } else if hud {
            terminal.draw_hud(&camera, metrics.fps(), palette.as_ref())?;
        }

        // Cap the frame rate; a slow frame just shows up as a larger dt
        // next time around, there is no catch-up.
        if let Some(remaining) = config.frame_duration.checked_sub(frame_start.elapsed()) {
            thread::sleep(remaining);
        }
    }

    Ok(())
}

/// Arrow keys, vim keys and wasd all drive the same camera operations.
fn handle_control(key: KeyCode, camera: &mut Camera) {
    match key {
        KeyCode::Left | KeyCode::Char('h' | 'H' | 'a' | 'A') => camera.step_left(),
        KeyCode::Right | KeyCode::Char('l' | 'L' | 'd' | 'D') => camera.step_right(),
        KeyCode::Up | KeyCode::Char('k' | 'K' | 'w' | 'W') => camera.step_up(),
        KeyCode::Down | KeyCode::Char('j' | 'J' | 's' | 'S') => camera.step_down(),
        KeyCode::Char('+' | '=' | 'i' | 'I') => camera.step_in(),
        KeyCode::Char('-' | 'o' | 'O') => camera.step_out(),
        _ => {}
    }
}
