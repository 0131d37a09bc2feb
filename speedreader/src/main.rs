use std::{
    env,
    io::{self, Write},
    path::Path,
    thread,
    time::Duration,
};

use rsvp_core::{
    calculate_chunk_orp,
    config::ReaderSettings,
    launch::LaunchEvent,
    nav::Advance,
    session::format_remaining,
    state::HistoryStore,
    types::{clamp_wpm, ChunkSize, ProgressSink},
    Clock, Reader, SystemClock, Ticker,
};
use tracing::{error, info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod source;

use source::TextSource;

const FRAME: Duration = Duration::from_millis(16);

struct Options {
    input: Option<String>,
    launch: bool,
    fresh: bool,
}

fn main() {
    init_tracing();

    let options = parse_args(env::args().skip(1));
    let source = match options.input.as_deref() {
        None | Some("-") => TextSource::stdin(),
        Some(path) => TextSource::open(Path::new(path)),
    };
    let source = match source {
        Ok(s) => s,
        Err(e) => {
            error!(%e, "failed to read input");
            eprintln!("Failed to read input: {}", e);
            return;
        }
    };

    let stored = ReaderSettings::load();
    let settings = settings_with_env_overrides(stored);
    let history = match HistoryStore::open_default() {
        Ok(store) => Some(store),
        Err(e) => {
            warn!(%e, "reading history unavailable; progress will not be saved");
            None
        }
    };

    let mut reader = Reader::new(&settings);
    reader.load_content(&source.content, source.meta());

    let saved_index = history
        .as_ref()
        .filter(|_| !options.fresh)
        .and_then(|store| saved_position(store, &reader));
    if let Some(index) = saved_index {
        reader.jump_to(index);
        info!(index = reader.session().position(), "resumed reading");
    }
    // attached after the jump so resuming is not reported as progress
    if let Some(store) = history {
        reader = reader.with_sink(Box::new(store) as Box<dyn ProgressSink>);
    }

    let session = reader.session();
    if session.is_empty() {
        eprintln!("Nothing to read.");
        return;
    }
    info!(
        title = session.title(),
        words = session.word_count(),
        wpm = session.wpm(),
        chunk = session.chunk_size().get(),
        "starting"
    );
    eprintln!(
        "{} - {} words, about {} at {} wpm",
        session.title(),
        session.word_count(),
        format_remaining(session.time_remaining()),
        session.wpm()
    );

    let started = if options.launch {
        reader.start_launch()
    } else {
        reader.play()
    };
    if started {
        run(&mut reader, &SystemClock::new(), !options.launch);
    }

    let changed = changed_settings(stored, &settings, &reader);
    if changed != stored {
        if let Err(e) = changed.save() {
            warn!(%e, "failed to save settings");
        }
    }
}

/// Stored settings with only the values changed during this session applied, so
/// environment overrides never end up on disk.
fn changed_settings(
    mut stored: ReaderSettings,
    started_with: &ReaderSettings,
    reader: &Reader,
) -> ReaderSettings {
    let session = reader.session();
    if session.wpm() != started_with.wpm {
        stored.wpm = session.wpm();
    }
    if session.chunk_size() != started_with.chunk_size {
        stored.chunk_size = session.chunk_size();
    }
    stored
}

/// Where the loaded content was left off, if it was read before.
fn saved_position(history: &HistoryStore, reader: &Reader) -> Option<usize> {
    let id = reader.session().content_id()?;
    history
        .get(id)
        .map(|item| item.current_index)
        .filter(|&index| index > 0)
}

fn run(reader: &mut Reader, clock: &impl Clock, show_first: bool) {
    let mut show = show_first;
    loop {
        let report = reader.on_tick(clock.now_ms());
        match report.launch {
            Some(LaunchEvent::CountdownStep(n)) => eprintln!("{n}..."),
            Some(LaunchEvent::RampStarted) => show = true,
            Some(LaunchEvent::RampCompleted) => {
                info!(wpm = reader.session().wpm(), "reached target speed")
            }
            None => {}
        }
        if report.advance == Some(Advance::Moved) {
            show = true;
        }
        if std::mem::take(&mut show) {
            let chunk = reader.session().current_chunk();
            if let Err(e) = write_flash(&mut io::stdout().lock(), chunk) {
                warn!(%e, "output closed; stopping");
                reader.pause();
                break;
            }
        }
        let session = reader.session();
        if !session.is_playing() && !session.launch().is_launching {
            break;
        }
        thread::sleep(FRAME);
    }
    info!(position = reader.session().position(), "finished");
}

fn write_flash(out: &mut impl Write, chunk: &[String]) -> io::Result<()> {
    let orp = calculate_chunk_orp(chunk);
    writeln!(out, "{}[{}]{}", orp.before, orp.focal, orp.after)?;
    out.flush()
}

fn parse_args(args: impl Iterator<Item = String>) -> Options {
    let mut options = Options {
        input: None,
        launch: false,
        fresh: false,
    };
    for arg in args {
        match arg.as_str() {
            "--launch" => options.launch = true,
            "--fresh" => options.fresh = true,
            _ if options.input.is_none() => options.input = Some(arg),
            _ => eprintln!("Ignoring extra argument: {}", arg),
        }
    }
    options
}

fn settings_with_env_overrides(mut settings: ReaderSettings) -> ReaderSettings {
    if let Some(wpm) = env::var("SPEEDREADER_WPM")
        .ok()
        .and_then(|s| s.parse::<i32>().ok())
    {
        settings.wpm = clamp_wpm(wpm);
    }
    if let Some(chunk) = env::var("SPEEDREADER_CHUNK")
        .ok()
        .and_then(|s| s.parse::<usize>().ok())
        .and_then(ChunkSize::new)
    {
        settings.chunk_size = chunk;
    }
    settings
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(io::stderr))
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use rsvp_core::types::ProgressReport;

    fn args(list: &[&str]) -> impl Iterator<Item = String> {
        list.iter().map(|s| s.to_string()).collect::<Vec<_>>().into_iter()
    }

    #[test]
    fn parses_path_and_flags_in_any_order() {
        let options = parse_args(args(&["--fresh", "notes.txt", "--launch", "extra"]));
        assert_eq!(options.input.as_deref(), Some("notes.txt"));
        assert!(options.launch);
        assert!(options.fresh);
    }

    #[test]
    fn overrides_are_not_persisted() {
        let stored = ReaderSettings::default();
        let overridden = ReaderSettings {
            wpm: 600,
            chunk_size: ChunkSize::Two,
            ..stored
        };
        let mut reader = Reader::new(&overridden);
        assert_eq!(changed_settings(stored, &overridden, &reader), stored);

        reader.set_wpm(650);
        let changed = changed_settings(stored, &overridden, &reader);
        assert_eq!(changed.wpm, 650);
        assert_eq!(changed.chunk_size, stored.chunk_size);
    }

    #[test]
    fn finds_saved_position_for_loaded_content() {
        let dir = tempfile::tempdir().unwrap();
        let mut history = HistoryStore::open(&dir.path().join("history.json")).unwrap();
        let mut reader = Reader::new(&ReaderSettings::default());
        assert_eq!(saved_position(&history, &reader), None);

        reader.load_content("one two three four five", None);
        let report = ProgressReport {
            current_index: 3,
            ..reader.session().progress_report().unwrap()
        };
        history.record(&report).unwrap();
        assert_eq!(saved_position(&history, &reader), Some(3));

        reader.load_content("different words entirely", None);
        assert_eq!(saved_position(&history, &reader), None);
    }

    struct ClosedPipe;

    impl Write for ClosedPipe {
        fn write(&mut self, _: &[u8]) -> io::Result<usize> {
            Err(io::ErrorKind::BrokenPipe.into())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn flash_marks_focal_letter_and_reports_write_errors() {
        let mut out = Vec::new();
        let chunk = vec!["reading".to_string()];
        write_flash(&mut out, &chunk).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "re[a]ding\n");
        assert!(write_flash(&mut ClosedPipe, &chunk).is_err());
    }
}
