//! Incremental line-oriented rendering of the app state.
//!
//! Each call to [`TranscriptView::render`] writes only what changed since
//! the previous call: new notices, the topic list when (re)entering the
//! picker, and transcript entries not yet printed.

use std::io::{self, Write};

use debate_chat::{catalog, Author, ChatEntry, ChatSession};

use crate::app::{App, Mode};

pub const PENDING_INDICATOR: &str = "debater is thinking...";

pub struct TranscriptView<W: Write> {
    out: W,
    generation: Option<u64>,
    rendered_entries: usize,
    pending_shown: bool,
}

impl<W: Write> TranscriptView<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            generation: None,
            rendered_entries: 0,
            pending_shown: false,
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    pub fn write_banner(&mut self, text: &str) -> io::Result<()> {
        writeln!(self.out, "{text}")?;
        writeln!(self.out)?;
        self.out.flush()
    }

    pub fn render(&mut self, app: &mut App) -> io::Result<()> {
        let generation = app.session_generation();
        let entering = self.generation != Some(generation);
        if entering {
            self.generation = Some(generation);
            self.rendered_entries = 0;
            self.pending_shown = false;
        }

        match app.mode() {
            Mode::ChoosingTopic => {
                if entering {
                    self.write_topic_list()?;
                }
            }
            Mode::Chatting(session) => {
                if entering {
                    self.write_session_header(session)?;
                }
                self.write_new_entries(session)?;
            }
        }

        for notice in app.take_notices() {
            writeln!(self.out, "* {notice}")?;
        }

        self.out.flush()
    }

    fn write_topic_list(&mut self) -> io::Result<()> {
        writeln!(self.out, "Choose a debate topic (number or title):")?;
        for (index, topic) in catalog().iter().enumerate() {
            writeln!(self.out, "  {}. {} - {}", index + 1, topic.title, topic.description)?;
        }
        Ok(())
    }

    fn write_session_header(&mut self, session: &ChatSession) -> io::Result<()> {
        let topic = session.topic();
        writeln!(self.out)?;
        writeln!(self.out, "== {} ==", topic.title)?;
        writeln!(self.out, "{}", topic.description)?;
        writeln!(self.out, "(type /help for commands)")?;
        writeln!(self.out)
    }

    fn write_new_entries(&mut self, session: &ChatSession) -> io::Result<()> {
        let entries = session.transcript().entries();
        for entry in entries.iter().skip(self.rendered_entries) {
            if entry.is_pending() {
                if !self.pending_shown {
                    writeln!(self.out, "  ({PENDING_INDICATOR})")?;
                    self.pending_shown = true;
                }
                continue;
            }

            write_entry(&mut self.out, entry)?;
            self.rendered_entries += 1;
            self.pending_shown = false;
        }
        Ok(())
    }
}

fn write_entry(out: &mut impl Write, entry: &ChatEntry) -> io::Result<()> {
    let label = match (entry.author(), entry.is_error()) {
        (Author::User, _) => "you",
        (Author::Assistant, false) => "debater",
        (Author::Assistant, true) => "debater (error)",
    };

    let mut lines = entry.text().lines();
    writeln!(out, "{label}> {}", lines.next().unwrap_or_default())?;
    let indent = " ".repeat(label.len() + 2);
    for line in lines {
        writeln!(out, "{indent}{line}")?;
    }
    Ok(())
}
