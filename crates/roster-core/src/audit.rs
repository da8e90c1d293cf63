//! The audit pass: probe each player's image, report a verdict per player,
//! then write the roster back out unchanged.

use std::io::{self, Write};
use std::path::Path;
use thiserror::Error;

use crate::config::AuditConfig;
use crate::probe::{HeadProbe, ImageProbe};
use crate::roster::{load_roster, save_roster, PlayerRecord, Roster, RosterError};

/// Reachability verdict for one player's image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Valid,
    InvalidOrMissing,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditEntry {
    pub player_name: String,
    pub verdict: Verdict,
}

impl AuditEntry {
    /// Console line for this entry.
    pub fn message(&self) -> String {
        match self.verdict {
            Verdict::Valid => format!("Valid image found for {}", self.player_name),
            Verdict::InvalidOrMissing => format!(
                "Invalid or missing image for {}. Please update.",
                self.player_name
            ),
        }
    }
}

/// Verdicts for a whole roster, in roster order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuditReport {
    pub entries: Vec<AuditEntry>,
}

impl AuditReport {
    pub fn valid_count(&self) -> usize {
        self.entries
            .iter()
            .filter(|e| e.verdict == Verdict::Valid)
            .count()
    }

    pub fn invalid_count(&self) -> usize {
        self.entries.len() - self.valid_count()
    }
}

#[derive(Debug, Error)]
pub enum AuditError {
    #[error(transparent)]
    Roster(#[from] RosterError),

    #[error("failed to write report: {0}")]
    Report(#[source] io::Error),
}

/// Judge one record. An absent or empty image never reaches the probe.
pub fn judge<P: ImageProbe + ?Sized>(record: &PlayerRecord, probe: &P) -> Verdict {
    match record.image_url() {
        Some(url) if probe.is_reachable(url) => Verdict::Valid,
        _ => Verdict::InvalidOrMissing,
    }
}

/// Probe every record in order and write one line per record to `out`.
///
/// Probe failures only downgrade the verdict; the pass always covers the
/// whole roster.
pub fn audit_roster<P, W>(roster: &Roster, probe: &P, out: &mut W) -> Result<AuditReport, AuditError>
where
    P: ImageProbe + ?Sized,
    W: Write,
{
    let mut report = AuditReport::default();
    for record in roster {
        let entry = AuditEntry {
            player_name: record.name().to_string(),
            verdict: judge(record, probe),
        };
        match entry.verdict {
            Verdict::Valid => tracing::info!(player = %entry.player_name, "valid image"),
            Verdict::InvalidOrMissing => tracing::warn!(
                player = %entry.player_name,
                image = record.image_url().unwrap_or(""),
                "invalid or missing image"
            ),
        }
        writeln!(out, "{}", entry.message()).map_err(AuditError::Report)?;
        // Each probe can block for the full timeout; show progress as it happens.
        out.flush().map_err(AuditError::Report)?;
        report.entries.push(entry);
    }
    Ok(report)
}

/// Audit `roster`, save every record unchanged to `output`, then confirm on `out`.
pub fn audit_and_save<P, W>(
    roster: &Roster,
    probe: &P,
    output: &Path,
    out: &mut W,
) -> Result<AuditReport, AuditError>
where
    P: ImageProbe + ?Sized,
    W: Write,
{
    let report = audit_roster(roster, probe, out)?;

    let updated: Vec<&PlayerRecord> = roster.iter().collect();
    save_roster(output, &updated)?;

    writeln!(
        out,
        "\nUpdated roster has been saved to {}.",
        output.display()
    )
    .map_err(AuditError::Report)?;

    tracing::info!(
        output = %output.display(),
        total = report.entries.len(),
        valid = report.valid_count(),
        invalid = report.invalid_count(),
        "roster audit complete"
    );
    Ok(report)
}

/// Full run for `cfg`: load the input, audit it with a HEAD probe, save the copy.
///
/// A missing or unreadable input fails before any probe or output.
pub fn run_audit<W: Write>(cfg: &AuditConfig, out: &mut W) -> Result<AuditReport, AuditError> {
    let roster = load_roster(&cfg.input_path)?;
    tracing::info!(
        input = %cfg.input_path.display(),
        players = roster.len(),
        "auditing roster images"
    );
    let probe = HeadProbe::new(cfg.probe_timeout());
    audit_and_save(&roster, &probe, &cfg.output_path, out)
}
