//! Terminal prompts and console output for interactive runs.
//!
//! Everything here is generic over `BufRead` / `Write` so it can be driven
//! from tests with in-memory buffers.

use std::io::{self, BufRead, Write};

use crate::model::{Playlist, Track};
use crate::upgrade::{
    CandidateOption, OmitReason, ReplacementChooser, UpgradeDecision, UpgradeObserver,
    UpgradeReport,
};

/// Read one line; `None` on end of input.
fn read_line<R: BufRead>(input: &mut R) -> io::Result<Option<String>> {
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_string()))
}

/// Ask a yes/no question until answered.
///
/// An empty answer (or end of input) picks `default`.
pub fn ask_yes_no<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    question: &str,
    default: bool,
) -> io::Result<bool> {
    let hint = if default { "[Yn]" } else { "[yN]" };
    writeln!(output)?;
    loop {
        write!(output, "{} {} ", question, hint)?;
        output.flush()?;

        let Some(answer) = read_line(input)? else {
            return Ok(default);
        };
        match answer.to_lowercase().as_str() {
            "" => return Ok(default),
            "y" => return Ok(true),
            "n" => return Ok(false),
            _ => continue,
        }
    }
}

/// Let the user pick one item from a numbered list.
///
/// A single item is picked without asking. Returns `None` for an empty
/// list or when input ends.
pub fn choose<'a, T, R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    title: &str,
    items: &'a [T],
    label: impl Fn(&T) -> String,
) -> io::Result<Option<&'a T>> {
    match items {
        [] => return Ok(None),
        [only] => return Ok(Some(only)),
        _ => {}
    }

    writeln!(output)?;
    for (index, item) in items.iter().enumerate() {
        writeln!(output, "  {}: {}", index, label(item))?;
    }
    writeln!(output)?;

    loop {
        write!(output, "{}: ", title)?;
        output.flush()?;

        let Some(answer) = read_line(input)? else {
            return Ok(None);
        };
        if let Some(item) = answer.parse::<usize>().ok().and_then(|i| items.get(i)) {
            return Ok(Some(item));
        }
    }
}

/// Ask for a plex.tv username and a hidden password.
pub fn ask_credentials() -> io::Result<(String, String)> {
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    println!("Please provide your login credentials for your Plex account");
    write!(stdout, "Username: ")?;
    stdout.flush()?;
    let username = read_line(&mut stdin.lock())?.unwrap_or_default();
    let password = rpassword::prompt_password("Password (will not be echoed): ")?;
    Ok((username, password))
}

/// Manual-mode chooser that lists candidates and reads one line.
pub struct LineChooser<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> LineChooser<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    fn ask(&mut self, options: &[CandidateOption]) -> io::Result<Option<String>> {
        writeln!(self.output)?;
        for option in options {
            writeln!(self.output, "  {}: {}", option.index, option.description)?;
        }
        writeln!(self.output)?;
        write!(
            self.output,
            "Select replacement track (No input so as not to make any changes): "
        )?;
        self.output.flush()?;
        read_line(&mut self.input)
    }
}

impl LineChooser<io::StdinLock<'static>, io::Stdout> {
    /// Chooser backed by the process's terminal.
    pub fn stdio() -> Self {
        Self::new(io::stdin().lock(), io::stdout())
    }
}

impl<R: BufRead, W: Write> ReplacementChooser for LineChooser<R, W> {
    fn choose(&mut self, _original: &Track, options: &[CandidateOption]) -> Option<String> {
        match self.ask(options) {
            Ok(answer) => answer,
            Err(e) => {
                tracing::warn!(target: "upgrade", error = %e, "Could not read selection");
                None
            }
        }
    }
}

/// Prints each decision as it is made.
pub struct ConsoleObserver<W> {
    output: W,
}

impl<W: Write> ConsoleObserver<W> {
    pub fn new(output: W) -> Self {
        Self { output }
    }

    fn line(&mut self, text: std::fmt::Arguments<'_>) {
        // Console output is best effort; a closed stdout must not abort a run.
        let _ = writeln!(self.output, "{}", text);
    }
}

impl<W: Write> UpgradeObserver for ConsoleObserver<W> {
    fn playlist_created(&mut self, playlist: &Playlist) {
        self.line(format_args!("Successfully created playlist {}.", playlist.title));
    }

    fn needs_upgrade(&mut self, track: &Track) {
        self.line(format_args!("❌ {} must be upgraded.", track));
    }

    fn decision(&mut self, decision: &UpgradeDecision) {
        match decision {
            UpgradeDecision::Kept(track) => self.line(format_args!("✅ {}", track)),
            UpgradeDecision::Replaced { replacement, .. } => {
                self.line(format_args!("🆕 {} will be used instead.", replacement))
            }
            UpgradeDecision::Omitted {
                reason: OmitReason::NoCandidates,
                ..
            } => self.line(format_args!(
                "❔ No potential replacement tracks found. No changes to the track will be made."
            )),
            UpgradeDecision::Omitted {
                reason: OmitReason::NoneSelected,
                ..
            } => self.line(format_args!(
                "❔ No replacement track selected. No changes to the track will be made."
            )),
        }
    }
}

/// Print the end-of-run summary.
pub fn print_summary<W: Write>(output: &mut W, report: &UpgradeReport) -> io::Result<()> {
    writeln!(output)?;
    if !report.committed {
        writeln!(
            output,
            "Dry run: {} track(s) would be replaced, {} could not be upgraded, {} already meet the requirements.",
            report.replaced(),
            report.omitted(),
            report.kept()
        )?;
        return Ok(());
    }

    let batch = &report.batch;
    if !batch.has_changes() && batch.items_omitted.is_empty() {
        writeln!(
            output,
            "Every track in {} already meets the requirements.",
            report.playlist.title
        )?;
        return Ok(());
    }
    if !batch.items_to_remove.is_empty() {
        writeln!(output, "The following tracks were removed:")?;
        for track in &batch.items_to_remove {
            writeln!(output, "❌ {}", track)?;
        }
        writeln!(output)?;
    }
    if !batch.items_to_add.is_empty() {
        writeln!(output, "The following tracks were added:")?;
        for track in &batch.items_to_add {
            writeln!(output, "🆕 {}", track)?;
        }
        writeln!(output)?;
    }
    if !batch.items_omitted.is_empty() {
        writeln!(output, "The following tracks couldn't be upgraded:")?;
        for track in &batch.items_omitted {
            writeln!(output, "❔ {}", track)?;
        }
        writeln!(output)?;
    }
    writeln!(output, "Successfully upgraded playlist {}.", report.playlist.title)?;
    Ok(())
}
