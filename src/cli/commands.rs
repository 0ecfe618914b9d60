//! CLI Command Implementations

use std::fs;
use std::path::Path;

use anyhow::{bail, Context, Result};
use log::info;

use super::script::{parse_steps, run_step};
use crate::config::EditorConfig;
use crate::editor::RegionEditor;
use crate::engine::HeadlessEngineFactory;

/// Load the configuration file if one was given, defaults otherwise
pub fn load_config(path: Option<&Path>) -> Result<EditorConfig> {
    match path {
        Some(path) => EditorConfig::from_file(path)
            .with_context(|| format!("Failed to load config from {}", path.display())),
        None => Ok(EditorConfig::default()),
    }
}

/// Read a track and bring a headless editor to ready
pub fn open_editor(
    input: &Path,
    config: EditorConfig,
) -> Result<RegionEditor<HeadlessEngineFactory>> {
    let audio = fs::read(input).with_context(|| format!("Failed to read {}", input.display()))?;

    let mut editor = RegionEditor::new(HeadlessEngineFactory, config);
    editor
        .initialize(&audio)
        .with_context(|| format!("Failed to load audio from {}", input.display()))?;
    editor.pump_events();

    if !editor.is_ready() {
        bail!("Engine did not become ready for {}", input.display());
    }
    Ok(editor)
}

/// Print duration and default region.
pub fn inspect(input: &Path, config: EditorConfig) -> Result<()> {
    info!("Inspecting: {}", input.display());

    let editor = open_editor(input, config)?;
    let duration = editor
        .engine()
        .and_then(|e| e.audio())
        .map(|a| a.duration())
        .unwrap_or_default();
    let peak_db = editor.engine().and_then(|e| e.peak_level_db());
    let region = editor.session().cut();

    println!("File: {}", input.display());
    println!("Duration: {:.3}s", duration);
    if let Some(db) = peak_db {
        println!("Peak level: {:.1} dBFS", db);
    }
    println!("Default region: {}", region);
    println!("Region length: {:.3}s", region.width());

    Ok(())
}

/// Print the waveform envelope.
pub fn peaks(input: &Path, buckets: usize, config: EditorConfig) -> Result<()> {
    info!("Computing {} peaks for: {}", buckets, input.display());

    let editor = open_editor(input, config)?;
    let peaks = editor
        .engine()
        .map(|e| e.peaks(buckets))
        .unwrap_or_default();

    println!("{}", serde_json::to_string_pretty(&peaks)?);
    Ok(())
}

/// Run a scripted session, one JSON line per step.
pub fn run(input: &Path, steps: &[String], config: EditorConfig) -> Result<()> {
    let steps = parse_steps(steps).context("Invalid script")?;
    info!("Running {} step(s) on: {}", steps.len(), input.display());

    let mut editor = open_editor(input, config)?;
    println!(
        "{}",
        serde_json::json!({ "step": "ready", "snapshot": editor.snapshot() })
    );

    for step in steps {
        let report = run_step(&mut editor, step);
        println!("{}", serde_json::to_string(&report)?);
        if let Some(notice) = &report.notice {
            eprintln!("{}", notice);
        }
    }

    editor.teardown();
    Ok(())
}
