//! Terminal frontend for the PalBoy palette editor. Maps the picture
//! hardware onto ANSI escapes, the joypad onto the keyboard, and battery RAM
//! onto a small save file.

mod error;
mod input;
mod screen;
mod timing;

use crate::error::StartupError;
use crate::input::TermJoypad;
use crate::screen::{ColorDepth, ScreenState, TermBus, TermGrid, TermRegs};
use crate::timing::TermClock;
use console::{style, Term};
use palboy::debug::NoDbgLogger;
use palboy::{
    DirectBackend, Editor, FileSram, FrameClock, Lfsr, PacketBackend, RenderBackend, SAVE_LEN,
    SAVE_SLOTS,
};
use std::cell::RefCell;
use std::process;
use std::rc::Rc;

/// Refresh rate of the display hardware this is modelled on.
const FRAME_RATE: f64 = 59.73;

const DEFAULT_SAVE_PATH: &str = "palboy.sav";

const VERSION_LINE: &str = concat!("Version ", env!("CARGO_PKG_VERSION"));

struct Options {
    save_path: String,
    seed: Option<u16>,
    palette: Option<[u16; SAVE_SLOTS]>,
    force_packets: bool,
}

fn main() {
    env_logger::init();

    let options = match parse_args() {
        Ok(options) => options,
        Err(msg) => {
            eprintln!("{}", msg);
            print_usage();
            process::exit(2);
        }
    };

    if let Err(err) = run(options) {
        eprintln!("{}", err);
        process::exit(1);
    }
}

fn run(options: Options) -> Result<(), StartupError> {
    let term = Term::stdout();
    let depth = detect_color_depth(&term)?;

    if let Some(palette) = options.palette {
        write_preset(&options.save_path, &palette)?;
    }
    let sram = FileSram::create(&options.save_path)?;

    title_screen(&term)?;
    term.clear_screen()?;
    term.hide_cursor()?;

    let rng = match options.seed {
        Some(seed) => Lfsr::with_seed(seed),
        None => Lfsr::from_time(),
    };

    let screen = Rc::new(RefCell::new(ScreenState::new(depth)));
    let joypad = input::spawn(Term::stdout());
    let mut clock = TermClock::new(Rc::clone(&screen), Term::stdout(), FRAME_RATE);
    let grid = TermGrid(Rc::clone(&screen));

    // The 256-color cube is to this editor what a TV was to the packet
    // hardware. Full-color terminals get the color registers directly.
    if options.force_packets || depth == ColorDepth::Ansi256 {
        // Give the packet receiver a moment before the first transfer.
        clock.wait_frames(4);
        let backend = PacketBackend::new(TermBus(Rc::clone(&screen)));
        run_editor(Editor::new(backend, sram, rng), joypad, clock, grid);
    } else {
        let backend = DirectBackend::new(TermRegs(Rc::clone(&screen)));
        run_editor(Editor::new(backend, sram, rng), joypad, clock, grid);
    }

    term.show_cursor()?;
    term.clear_screen()?;
    term.write_line(&format!("Palette saved to {}", options.save_path))?;
    Ok(())
}

fn run_editor<B: RenderBackend>(
    mut editor: Editor<B, FileSram, NoDbgLogger>,
    mut joypad: TermJoypad,
    mut clock: TermClock,
    mut grid: TermGrid,
) {
    editor.run(&mut joypad, &mut clock, &mut grid);
}

fn parse_args() -> Result<Options, String> {
    let mut options = Options {
        save_path: DEFAULT_SAVE_PATH.to_string(),
        seed: None,
        palette: None,
        force_packets: false,
    };

    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match &arg[..] {
            "--save" => {
                options.save_path = args.next().ok_or("--save needs a file path")?;
            }
            "--seed" => {
                let value = args.next().ok_or("--seed needs a number")?;
                options.seed = Some(parse_number(&value)?);
            }
            "--palette" => {
                let mut slots = [0u16; SAVE_SLOTS];
                for slot in slots.iter_mut() {
                    let value = args.next().ok_or("--palette needs four colors")?;
                    *slot = parse_number(&value)?;
                }
                options.palette = Some(slots);
            }
            "--packets" => options.force_packets = true,
            "--help" | "-h" => {
                print_usage();
                process::exit(0);
            }
            _ => return Err(format!("Unknown argument: {}", arg)),
        }
    }

    Ok(options)
}

fn parse_number(value: &str) -> Result<u16, String> {
    match parse_int::parse::<u16>(value) {
        Ok(number) => Ok(number),
        Err(err) => Err(format!("Could not parse '{}': {}", value, err)),
    }
}

fn print_usage() {
    eprintln!("Usage: palboy-term [options]");
    eprintln!();
    eprintln!("  --save <path>        Save file to edit (default {})", DEFAULT_SAVE_PATH);
    eprintln!("  --palette <a b c d>  Start from these four colors (e.g. 0x7FFF)");
    eprintln!("  --seed <number>      Fix the randomizer seed");
    eprintln!("  --packets            Use the packet protocol even in full color");
}

fn detect_color_depth(term: &Term) -> Result<ColorDepth, StartupError> {
    if !term.features().colors_supported() {
        return Err(StartupError::Unsupported);
    }

    let colorterm = std::env::var("COLORTERM").unwrap_or_default();
    if colorterm == "truecolor" || colorterm == "24bit" {
        Ok(ColorDepth::TrueColor)
    } else {
        Ok(ColorDepth::Ansi256)
    }
}

fn write_preset(path: &str, palette: &[u16; SAVE_SLOTS]) -> Result<(), StartupError> {
    let mut bytes = [0; SAVE_LEN];
    for (slot, color) in palette.iter().enumerate() {
        bytes[2 * slot..2 * slot + 2].copy_from_slice(&color.to_le_bytes());
    }
    std::fs::write(path, &bytes)?;
    Ok(())
}

fn title_screen(term: &Term) -> Result<(), StartupError> {
    term.clear_screen()?;
    term.write_line(&format!("{}", style("PalBoy").bold()))?;
    term.write_line("------")?;
    term.write_line(VERSION_LINE)?;
    term.write_line("")?;
    term.write_line("Four colors, five bits per channel, kept in a")?;
    term.write_line("battery save just like a cartridge would.")?;
    term.write_line("")?;
    term.write_line("  Left/Right   pick a color component")?;
    term.write_line("  Up/Down      change it")?;
    term.write_line("  X, Z         toggle brightest / darkest")?;
    term.write_line("  Space        randomize all four colors")?;
    term.write_line("  Esc, Q       quit")?;
    term.write_line("")?;
    term.write_line("Press any key to start.")?;
    term.read_key()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn the_title_version_comes_from_the_manifest() {
        assert!(VERSION_LINE.starts_with("Version "));
        assert!(VERSION_LINE.ends_with(env!("CARGO_PKG_VERSION")));
    }

    #[test]
    fn numbers_parse_in_hex_and_decimal() {
        assert_eq!(parse_number("0x7FFF"), Ok(0x7FFF));
        assert_eq!(parse_number("31"), Ok(31));
        assert!(parse_number("banana").is_err());
        assert!(parse_number("0x10000").is_err());
    }
}
