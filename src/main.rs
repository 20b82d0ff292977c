mod viewer;

use std::io::BufRead;
use std::path::PathBuf;

use treemorph::{Mode, ModeSignal, Scene, SceneConfig};
use winit::event_loop::{ControlFlow, EventLoop};

use viewer::{App, ViewerError};

const USAGE: &str = "usage: treemorph [--config scene.json] [--seed N] [--stdin-gestures]";

#[derive(Debug, Default, PartialEq)]
struct Args {
    config: Option<PathBuf>,
    seed: Option<u64>,
    stdin_gestures: bool,
}

impl Args {
    fn parse(mut args: impl Iterator<Item = String>) -> Result<Self, ViewerError> {
        let mut parsed = Args::default();
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--config" => {
                    let path = args
                        .next()
                        .ok_or_else(|| ViewerError::Args(format!("--config expects a path\n{}", USAGE)))?;
                    parsed.config = Some(PathBuf::from(path));
                }
                "--seed" => {
                    let seed = args
                        .next()
                        .and_then(|s| s.parse().ok())
                        .ok_or_else(|| ViewerError::Args(format!("--seed expects a number\n{}", USAGE)))?;
                    parsed.seed = Some(seed);
                }
                "--stdin-gestures" => parsed.stdin_gestures = true,
                other => {
                    return Err(ViewerError::Args(format!("unknown argument {}\n{}", other, USAGE)));
                }
            }
        }
        Ok(parsed)
    }
}

/// Feed classifier labels from stdin into the signal, one per line.
fn spawn_gesture_reader(signal: ModeSignal) {
    std::thread::spawn(move || {
        for line in std::io::stdin().lock().lines() {
            let line = match line {
                Ok(line) => line,
                Err(e) => {
                    log::warn!("stdin closed: {}", e);
                    break;
                }
            };
            let label = line.trim();
            if label.is_empty() {
                continue;
            }
            match signal.apply_gesture(label) {
                Some(mode) => log::debug!("gesture {} -> {}", label, mode),
                None => log::trace!("ignored gesture {}", label),
            }
        }
    });
}

fn run() -> Result<(), ViewerError> {
    let args = Args::parse(std::env::args().skip(1))?;

    let mut config = match &args.config {
        Some(path) => SceneConfig::load(path)?,
        None => SceneConfig::default(),
    };
    if let Some(seed) = args.seed {
        config = config.with_seed(seed);
    }

    let scene = Scene::new(config)?;
    let signal = ModeSignal::new(Mode::Aggregate);
    if args.stdin_gestures {
        spawn_gesture_reader(signal.clone());
    }

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = App::new(scene, signal);
    event_loop.run_app(&mut app)?;

    match app.take_error() {
        Some(e) => Err(e),
        None => Ok(()),
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    if let Err(e) = run() {
        log::error!("{}", e);
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<Args, ViewerError> {
        Args::parse(args.iter().map(|s| s.to_string()))
    }

    #[test]
    fn test_parse_empty() {
        assert_eq!(parse(&[]).unwrap(), Args::default());
    }

    #[test]
    fn test_parse_all_flags() {
        let args = parse(&["--config", "scene.json", "--seed", "42", "--stdin-gestures"]).unwrap();
        assert_eq!(args.config, Some(PathBuf::from("scene.json")));
        assert_eq!(args.seed, Some(42));
        assert!(args.stdin_gestures);
    }

    #[test]
    fn test_parse_rejects_bad_seed() {
        assert!(matches!(parse(&["--seed", "abc"]), Err(ViewerError::Args(_))));
        assert!(matches!(parse(&["--seed"]), Err(ViewerError::Args(_))));
    }

    #[test]
    fn test_parse_rejects_unknown() {
        assert!(matches!(parse(&["--fullscreen"]), Err(ViewerError::Args(_))));
    }
}
