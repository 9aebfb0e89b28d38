use std::io::{self, BufRead};
use std::sync::Arc;
use std::sync::mpsc::RecvTimeoutError;
use std::thread;
use std::time::Duration;

use anyhow::{Context, Result, anyhow, bail};
use log::debug;
use usersearch::{FileLookup, GateHandle, GateState, HttpLookup, Lookup, StaticLookup};

use crate::cli::{OutputFormat, print_json, print_plain};
use crate::settings::{LookupSource, ResolvedConfig};

/// Extra time allowed on top of the quiet period and lookup timeout.
const SETTLE_SLACK: Duration = Duration::from_secs(1);
/// How often the interactive loop checks whether stdin has closed.
const INPUT_POLL: Duration = Duration::from_millis(50);

/// Drives a gate from command-line input and prints what it shows.
pub(crate) struct SearchWorkflow {
    handle: GateHandle,
    min_length: usize,
    keystroke_delay: Duration,
    settle_timeout: Duration,
    format: OutputFormat,
}

impl SearchWorkflow {
    pub(crate) fn from_config(config: ResolvedConfig, format: OutputFormat) -> Result<Self> {
        let ResolvedConfig {
            gate,
            source,
            keystroke_delay,
        } = config;

        let lookup_timeout = match &source {
            LookupSource::Http { timeout, .. } => *timeout,
            LookupSource::File { .. } | LookupSource::Static => Duration::ZERO,
        };
        let lookup = build_lookup(source)?;
        let handle = GateHandle::spawn(gate, lookup)?;

        Ok(Self {
            handle,
            min_length: gate.min_length,
            keystroke_delay,
            settle_timeout: gate.quiet_period + lookup_timeout + SETTLE_SLACK,
            format,
        })
    }

    /// Submit each query in order and report the state the last one settles in.
    pub(crate) fn run_queries(self, queries: &[String]) -> Result<()> {
        if queries.is_empty() {
            bail!("no query given; pass one or more QUERY arguments or use --interactive");
        }

        for (index, query) in queries.iter().enumerate() {
            if index > 0 && !self.keystroke_delay.is_zero() {
                thread::sleep(self.keystroke_delay);
            }
            self.handle.submit(query.as_str())?;
        }

        let state = self
            .handle
            .settle(self.settle_timeout)?
            .ok_or_else(|| anyhow!("timed out waiting for the search to settle"))?;
        self.emit(&state, None)
    }

    /// Submit stdin lines as they arrive and print every published update.
    pub(crate) fn run_interactive(self) -> Result<()> {
        let submitter = self.handle.submitter();
        let reader = thread::Builder::new()
            .name("usersearch-stdin".into())
            .spawn(move || -> Result<()> {
                for line in io::stdin().lock().lines() {
                    let line = line.context("failed to read stdin")?;
                    submitter.submit(line.trim_end_matches('\r'))?;
                }
                Ok(())
            })?;

        let mut last_shown: Option<GateState> = None;
        loop {
            match self.handle.recv_timeout(INPUT_POLL) {
                Ok(update) => {
                    self.emit(&update.state, Some(update.revision))?;
                    last_shown = Some(update.state);
                }
                Err(RecvTimeoutError::Timeout) if reader.is_finished() => break,
                Err(RecvTimeoutError::Timeout) => {}
                Err(RecvTimeoutError::Disconnected) => break,
            }
        }

        reader
            .join()
            .map_err(|_| anyhow!("stdin reader panicked"))??;
        debug!("stdin closed, waiting for the last input to settle");

        match self.handle.settle(self.settle_timeout)? {
            Some(state) if last_shown.as_ref() != Some(&state) => self.emit(&state, None),
            Some(_) => Ok(()),
            None => bail!("timed out waiting for the search to settle"),
        }
    }

    fn emit(&self, state: &GateState, revision: Option<u64>) -> Result<()> {
        match self.format {
            OutputFormat::Plain => {
                print_plain(state, self.min_length);
                Ok(())
            }
            OutputFormat::Json => print_json(state, revision),
        }
    }
}

fn build_lookup(source: LookupSource) -> Result<Arc<dyn Lookup>> {
    let lookup: Arc<dyn Lookup> = match source {
        LookupSource::Http { endpoint, timeout } => Arc::new(
            HttpLookup::new(endpoint, timeout).context("failed to build HTTP client")?,
        ),
        LookupSource::File { path } => Arc::new(FileLookup::new(path)),
        LookupSource::Static => Arc::new(StaticLookup::sample()),
    };
    Ok(lookup)
}
