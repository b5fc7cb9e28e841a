// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

use std::env;
use std::fs;
use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use chrono::Utc;
use midi_editor::config::{config_path, AppConfig};
use midi_editor::logging;
use midi_editor::store::backup_file_name;
use midi_editor::{
    JsonFileStorage, NoteDraft, NoteId, NoteUpdate, Song, SongDraft, SongId, SongStore,
};
use tracing::Level;

fn print_usage() {
    println!("MIDI Editor - Song note store");
    println!();
    println!("Usage: midi-editor [--config <PATH>] [--verbose] <COMMAND>");
    println!();
    println!("Commands:");
    println!("  --list                                   List songs (* marks the current song)");
    println!("  --show [SONG]                            Show a song and its notes (default: current)");
    println!("  --create-song <NAME> [DURATION]          Create a song and select it");
    println!("  --delete-song <SONG>                     Delete a song and its notes");
    println!("  --select <SONG>                          Select the current song");
    println!("  --add-note <SONG> <TRACK> <TIME> <TITLE> Add a note");
    println!("  --move-note <SONG> <NOTE> <TRACK> <TIME> Move a note to another slot");
    println!("  --delete-note <SONG> <NOTE>              Delete a note");
    println!("  --export [PATH]                          Export all songs (\"-\" for stdout)");
    println!("  --import <PATH>                          Replace all songs with an export file");
    println!("  --clear                                  Delete all songs");
    println!("  --help                                   Show this help message");
}

/// Global flags plus the command words. Global flags may appear anywhere.
struct Options {
    config: Option<PathBuf>,
    verbose: bool,
    command: Vec<String>,
}

fn parse_options(args: &[String]) -> Result<Options> {
    let mut options = Options {
        config: None,
        verbose: false,
        command: Vec::new(),
    };

    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--config" => {
                let path = iter
                    .next()
                    .ok_or_else(|| anyhow!("--config requires a file path"))?;
                options.config = Some(PathBuf::from(path));
            }
            "--verbose" | "-v" => options.verbose = true,
            _ => options.command.push(arg.clone()),
        }
    }
    Ok(options)
}

fn arg<'a>(command: &'a [String], index: usize, what: &str) -> Result<&'a str> {
    command
        .get(index)
        .map(String::as_str)
        .ok_or_else(|| anyhow!("{} requires {}", command[0], what))
}

fn parse_song_id(s: &str) -> Result<SongId> {
    s.parse().map_err(|_| anyhow!("Invalid song id: {}", s))
}

fn parse_note_id(s: &str) -> Result<NoteId> {
    s.parse().map_err(|_| anyhow!("Invalid note id: {}", s))
}

fn parse_track(s: &str) -> Result<u8> {
    s.parse().map_err(|_| anyhow!("Invalid track number: {}", s))
}

fn parse_seconds(s: &str) -> Result<f64> {
    s.parse().map_err(|_| anyhow!("Invalid time in seconds: {}", s))
}

fn open_store(config: &AppConfig) -> Result<SongStore<JsonFileStorage>> {
    let storage = config.open_storage()?;
    let path = storage.path().to_path_buf();
    let store = SongStore::open(storage)
        .with_context(|| format!("Failed to open song store at {:?}", path))?;
    Ok(store.with_strict_import(config.import.strict))
}

fn print_songs(store: &SongStore<JsonFileStorage>) {
    if store.is_empty() {
        println!("No songs yet. Create one with --create-song <NAME>");
        return;
    }

    for song in store.songs() {
        let marker = if store.current_song_id() == Some(song.id()) { "*" } else { " " };
        println!(
            "{} {}  {:>6.1}s  {:>3} notes  {}",
            marker,
            song.id(),
            song.duration(),
            song.notes().len(),
            song.name()
        );
    }
}

fn print_song(song: &Song) {
    println!("{} ({})", song.name(), song.id());
    if !song.description().is_empty() {
        println!("  {}", song.description());
    }
    println!("  Duration: {}s", song.duration());
    if !song.tags().is_empty() {
        println!("  Tags: {}", song.tags().join(", "));
    }
    println!("  Updated: {}", song.updated_at().to_rfc3339());
    println!();

    if song.notes().is_empty() {
        println!("  No notes");
        return;
    }

    for note in song.notes() {
        println!(
            "  {:<12} {:>8.2}s  {:<2} {}  [{}]",
            song.track_label(note.track()).unwrap_or("?"),
            note.time(),
            note.icon(),
            note.title(),
            note.id()
        );
    }
}

fn export(store: &mut SongStore<JsonFileStorage>, target: Option<&str>) -> Result<()> {
    let data = store.export_data()?;
    match target {
        Some("-") => println!("{}", data),
        target => {
            let path = target
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(backup_file_name(Utc::now().date_naive())));
            fs::write(&path, data)
                .with_context(|| format!("Failed to write export file: {:?}", path))?;
            println!("Exported {} songs to {:?}", store.len(), path);
        }
    }
    Ok(())
}

fn import(store: &mut SongStore<JsonFileStorage>, path: &str) -> Result<()> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read import file: {:?}", path))?;

    match store.import_data(&text) {
        Ok(count) => {
            println!("Data imported successfully: {} songs", count);
            Ok(())
        }
        Err(e) => {
            eprintln!("Failed to import data. Please check the file format.");
            eprintln!("  {}", e);
            std::process::exit(1);
        }
    }
}

fn main() -> Result<()> {
    let args: Vec<String> = env::args().skip(1).collect();
    let options = parse_options(&args)?;

    let Some(name) = options.command.first() else {
        println!("MIDI Editor - Song note store");
        println!("Run with --help for usage information");
        return Ok(());
    };
    if name == "--help" || name == "-h" {
        print_usage();
        return Ok(());
    }

    let config = match config_path(options.config.clone()) {
        Some(path) => AppConfig::load_or_default(path)?,
        None => AppConfig::default(),
    };
    let level = if options.verbose {
        Level::DEBUG
    } else {
        config.logging.max_level()?
    };
    logging::init(level)?;

    let mut store = open_store(&config)?;
    let command = options.command.as_slice();

    match name.as_str() {
        "--list" => print_songs(&store),
        "--show" => {
            let song = match command.get(1) {
                Some(id) => store.song(parse_song_id(id)?),
                None => store.current_song(),
            };
            match song {
                Some(song) => print_song(song),
                None => println!("No such song"),
            }
        }
        "--create-song" => {
            let mut draft = SongDraft::new(arg(command, 1, "a song name")?);
            if let Some(duration) = command.get(2) {
                draft = draft.with_duration(parse_seconds(duration)?);
            }
            let song = store.create_song(draft)?;
            println!("Created song {} ({})", song.name(), song.id());
        }
        "--delete-song" => {
            let id = parse_song_id(arg(command, 1, "a song id")?)?;
            match store.delete_song(id)? {
                Some(song) => println!("Deleted song {} and {} notes", song.name(), song.notes().len()),
                None => println!("No such song"),
            }
        }
        "--select" => {
            let id = parse_song_id(arg(command, 1, "a song id")?)?;
            if store.song(id).is_none() {
                return Err(anyhow!("No such song: {}", id));
            }
            store.set_current_song(id)?;
            println!("Selected song {}", id);
        }
        "--add-note" => {
            let song_id = parse_song_id(arg(command, 1, "a song id")?)?;
            let track = parse_track(arg(command, 2, "a track number")?)?;
            let time = parse_seconds(arg(command, 3, "a time in seconds")?)?;
            arg(command, 4, "a note title")?;
            let title = command[4..].join(" ");
            let note = store.add_note(song_id, NoteDraft::new(track, time, title))?;
            println!("Added note {} at track {}, {}s", note.id(), note.track(), note.time());
        }
        "--move-note" => {
            let song_id = parse_song_id(arg(command, 1, "a song id")?)?;
            let note_id = parse_note_id(arg(command, 2, "a note id")?)?;
            let track = parse_track(arg(command, 3, "a track number")?)?;
            let time = parse_seconds(arg(command, 4, "a time in seconds")?)?;
            let note = store.update_note(song_id, note_id, NoteUpdate::moved_to(track, time))?;
            println!("Moved note {} to track {}, {}s", note.id(), note.track(), note.time());
        }
        "--delete-note" => {
            let song_id = parse_song_id(arg(command, 1, "a song id")?)?;
            let note_id = parse_note_id(arg(command, 2, "a note id")?)?;
            match store.delete_note(song_id, note_id)? {
                Some(note) => println!("Deleted note {}", note.title()),
                None => println!("No such note"),
            }
        }
        "--export" => export(&mut store, command.get(1).map(String::as_str))?,
        "--import" => import(&mut store, arg(command, 1, "a file path")?)?,
        "--clear" => {
            store.clear_all_data()?;
            println!("All songs deleted");
        }
        _ => {
            eprintln!("Unknown option: {}", name);
            print_usage();
            std::process::exit(1);
        }
    }

    Ok(())
}
