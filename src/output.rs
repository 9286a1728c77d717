use std::io::{self, Write};

use serde::Serialize;

use crate::app::{DetailResult, ListResult, ProgressEvent, ProgressSink, SearchResult};
use crate::domain::{Record, capitalize, format_id, stat_label};

#[derive(Debug, Clone, Copy)]
pub enum OutputMode {
    Interactive,
    NonInteractive,
}

pub struct JsonOutput;

impl JsonOutput {
    pub fn print_list(result: &ListResult) -> io::Result<()> {
        Self::print_json(result)
    }

    pub fn print_search(result: &SearchResult) -> io::Result<()> {
        Self::print_json(result)
    }

    pub fn print_detail(result: &DetailResult) -> io::Result<()> {
        Self::print_json(result)
    }

    fn print_json<T: Serialize>(value: &T) -> io::Result<()> {
        let json = serde_json::to_string_pretty(value).map_err(io::Error::other)?;
        let mut stdout = io::stdout();
        stdout.write_all(json.as_bytes())?;
        stdout.write_all(b"\n")?;
        Ok(())
    }
}

impl ProgressSink for JsonOutput {
    fn event(&self, _event: ProgressEvent) {}
}

pub struct TextOutput;

impl TextOutput {
    pub fn print_list(result: &ListResult) -> io::Result<()> {
        let mut stdout = io::stdout().lock();
        for record in &result.records {
            writeln!(stdout, "{}", record_line(record))?;
        }
        writeln!(
            stdout,
            "-- {} loaded{}",
            result.loaded,
            if result.has_more { ", more available" } else { "" }
        )?;
        Ok(())
    }

    pub fn print_search(result: &SearchResult) -> io::Result<()> {
        let mut stdout = io::stdout().lock();
        for record in &result.matches {
            writeln!(stdout, "{}", record_line(record))?;
        }
        writeln!(
            stdout,
            "-- {} match(es) for \"{}\" in {} scanned",
            result.matches.len(),
            result.query,
            result.scanned
        )?;
        Ok(())
    }

    pub fn print_detail(result: &DetailResult) -> io::Result<()> {
        let record = &result.record;
        let mut stdout = io::stdout().lock();
        writeln!(stdout, "{}", record_line(record))?;
        writeln!(
            stdout,
            "  Height: {:.1} m   Weight: {:.1} kg",
            record.height_m(),
            record.weight_kg()
        )?;
        if !record.abilities.is_empty() {
            let abilities = record
                .abilities
                .iter()
                .map(|ability| capitalize(ability))
                .collect::<Vec<_>>();
            writeln!(stdout, "  Abilities: {}", abilities.join(", "))?;
        }
        for stat in &record.stats {
            writeln!(
                stdout,
                "  {:<12} {:>3} {}",
                stat_label(&stat.name),
                stat.value,
                stat_bar(stat.value, 20)
            )?;
        }
        if let Some(artwork) = record.artwork() {
            writeln!(stdout, "  Artwork: {artwork}")?;
        }
        if result.evolutions.is_empty() {
            writeln!(stdout, "  Evolutions: none available")?;
        } else {
            let chain = result
                .evolutions
                .iter()
                .map(|evolution| {
                    format!("#{} {}", format_id(evolution.id), capitalize(&evolution.name))
                })
                .collect::<Vec<_>>();
            writeln!(stdout, "  Evolutions: {}", chain.join(" > "))?;
        }
        Ok(())
    }
}

impl ProgressSink for TextOutput {
    fn event(&self, event: ProgressEvent) {
        match event.elapsed {
            Some(elapsed) => tracing::info!(
                latency_ms = elapsed.as_millis() as u64,
                "{}",
                event.message
            ),
            None => tracing::info!("{}", event.message),
        }
    }
}

pub fn record_line(record: &Record) -> String {
    format!(
        "#{} {:<14} {}",
        format_id(record.id),
        capitalize(&record.name),
        record.types.join("/")
    )
}

pub fn stat_bar(value: u8, width: usize) -> String {
    let filled = usize::from(value) * width / 255;
    let mut out = String::with_capacity(width + 2);
    out.push('[');
    for i in 0..width {
        out.push(if i < filled { '#' } else { '.' });
    }
    out.push(']');
    out
}
