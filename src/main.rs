use clap::Parser;
use liquid_tank::{FillStyle, TankCommand, TankOptions, TankWindow};
use rand::Rng;
use std::io::{self, BufRead};
use std::path::PathBuf;
use std::process;
use std::sync::mpsc::{self, Sender};
use std::thread;
use std::time::Duration;

/// Shows a liquid tank gauge. Values are read from stdin, one per line,
/// unless --demo is given.
#[derive(Debug, Parser)]
#[command(name = "liquid-tank", version)]
struct Args {
    /// TOML file with tank options
    #[arg(long)]
    config: Option<PathBuf>,

    /// TTF/OTF font used for the value label
    #[arg(long)]
    font: Option<PathBuf>,

    #[arg(long, allow_negative_numbers = true)]
    min: Option<f64>,

    #[arg(long, allow_negative_numbers = true)]
    max: Option<f64>,

    #[arg(long)]
    dark: bool,

    /// Paint all segments as a vertical gradient
    #[arg(long)]
    segmented: bool,

    /// Value shown when the window opens
    #[arg(long, allow_negative_numbers = true)]
    initial: Option<f64>,

    /// Feed random values instead of reading stdin
    #[arg(long)]
    demo: bool,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    if let Err(err) = run(Args::parse()) {
        log::error!("{err}");
        process::exit(1);
    }
}

fn run(args: Args) -> liquid_tank::Result<()> {
    let mut options = match &args.config {
        Some(path) => TankOptions::load(path)?,
        None => TankOptions::default(),
    };
    if let Some(min) = args.min {
        options.min = min;
    }
    if let Some(max) = args.max {
        options.max = max;
    }
    options.dark |= args.dark;
    if args.segmented {
        options.fill_style = FillStyle::Segmented;
    }
    let (min, max) = (options.min, options.max);

    let mut window = TankWindow::new(options.into_config());
    if let Some(path) = &args.font {
        window = window.with_font_data(std::fs::read(path)?);
    }
    if let Some(value) = args.initial {
        window = window.with_initial_value(value);
    }

    let (sender, receiver) = mpsc::channel();
    if args.demo {
        thread::spawn(move || random_values(sender, min, max));
    } else {
        thread::spawn(move || stdin_values(sender));
    }

    window.show_with_commands(receiver)
}

fn stdin_values(sender: Sender<TankCommand>) {
    for line in io::stdin().lock().lines() {
        let Ok(line) = line else { break };
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        match line.parse::<f64>() {
            Ok(value) => {
                if sender.send(TankCommand::SetValue(value)).is_err() {
                    break;
                }
            }
            Err(_) => log::warn!("ignoring non-numeric input {line:?}"),
        }
    }
}

fn random_values(sender: Sender<TankCommand>, min: f64, max: f64) {
    let mut rng = rand::rng();
    let span = (max - min).abs().max(f64::EPSILON);
    loop {
        // occasionally overshoot to show the fill saturating
        let value = min + rng.random_range(-0.1..1.1) * span;
        if sender.send(TankCommand::SetValue(value)).is_err() {
            break;
        }
        thread::sleep(Duration::from_millis(rng.random_range(400..1200)));
    }
}
