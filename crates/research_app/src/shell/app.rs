//! Interactive loop: reads commands, drives the session, prints its view.

use std::io::{self, BufRead, Write};

use anyhow::{Context, Result};
use research_core::{update, AppState, HistoryId, Msg};
use research_engine::EngineHandle;
use research_logging::{research_info, research_warn};

use super::config::AppConfig;
use super::effects::EffectRunner;
use super::input::{self, Command, HELP};
use super::render::{self, Renderer};

pub fn run(config: AppConfig, api_key: String) -> Result<()> {
    let engine =
        EngineHandle::new(config.engine_config()).context("failed to start research engine")?;
    let mut shell = Shell::new(EffectRunner::new(engine), io::stdout());

    if !api_key.trim().is_empty() {
        shell.dispatch(Msg::ApiKeyChanged(api_key))?;
    }
    shell.say(HELP)?;

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    loop {
        shell.prompt()?;
        let Some(line) = lines.next() else {
            break;
        };
        let line = line.context("failed to read input")?;
        match input::parse(&line) {
            Ok(Command::Quit) => break,
            Ok(command) => shell.execute(command)?,
            Err(err) => shell.say(&err.to_string())?,
        }
    }

    research_info!("research shell exiting");
    Ok(())
}

struct Shell<W: Write> {
    state: AppState,
    runner: EffectRunner,
    renderer: Renderer,
    out: W,
}

impl<W: Write> Shell<W> {
    fn new(runner: EffectRunner, out: W) -> Self {
        Self {
            state: AppState::new(),
            runner,
            renderer: Renderer::default(),
            out,
        }
    }

    fn execute(&mut self, command: Command) -> Result<()> {
        match command {
            Command::Empty | Command::Quit => {}
            Command::Help => self.say(HELP)?,
            Command::SetKey(key) => {
                self.dispatch(Msg::ApiKeyChanged(key))?;
                self.say("API key set.")?;
            }
            Command::Search(query) => {
                self.dispatch(Msg::QueryChanged(query))?;
                self.dispatch(Msg::SearchSubmitted)?;
                self.wait_until_idle()?;
            }
            Command::History => {
                let text = render::history(&self.state.view());
                self.say(&text)?;
            }
            Command::Show(position) => {
                if let Some(id) = self.history_id(position)? {
                    self.show_row(id, render::detail)?;
                }
            }
            Command::Quiz(position) => {
                if let Some(history_id) = self.history_id(position)? {
                    self.dispatch(Msg::QuizRequested { history_id })?;
                    self.wait_until_idle()?;
                }
            }
            Command::Answer { position, option } => {
                let Some(history_id) = self.history_id(position)? else {
                    return Ok(());
                };
                let choice = self
                    .state
                    .quiz(history_id)
                    .and_then(|quiz| quiz.option(option))
                    .map(str::to_string);
                match choice {
                    Some(choice) => {
                        self.dispatch(Msg::AnswerSubmitted { history_id, choice })?;
                        self.show_row(history_id, render::grade)?;
                    }
                    None => self.say(&format!("No quiz for #{position} yet. Try: quiz {position}"))?,
                }
            }
        }
        Ok(())
    }

    /// Applies a message, runs resulting effects, and prints whatever changed.
    fn dispatch(&mut self, msg: Msg) -> Result<()> {
        let state = std::mem::take(&mut self.state);
        let (state, effects) = update(state, msg);
        self.state = state;
        self.runner.run(effects);

        if self.state.consume_dirty() {
            let view = self.state.view();
            let text = self.renderer.frame(&view);
            if !text.is_empty() {
                write!(self.out, "{text}")?;
                self.out.flush()?;
            }
            if view.notice.is_some() {
                // Shown once; the next identical notice prints again.
                let (state, _) = update(std::mem::take(&mut self.state), Msg::NoticeDismissed);
                self.state = state;
                self.state.consume_dirty();
            }
        }
        Ok(())
    }

    /// Feeds engine events back into the session until the active job ends.
    fn wait_until_idle(&mut self) -> Result<()> {
        while self.state.is_busy() || self.runner.has_pending() {
            match self.runner.next_msg() {
                Some(msg) => self.dispatch(msg)?,
                None => {
                    research_warn!("engine stopped while a job was active");
                    anyhow::bail!("research engine stopped unexpectedly");
                }
            }
        }
        Ok(())
    }

    fn history_id(&mut self, position: usize) -> Result<Option<HistoryId>> {
        let id = self.state.history_id_at(position);
        if id.is_none() {
            self.say(&format!("There is no history entry #{position}."))?;
        }
        Ok(id)
    }

    fn show_row(
        &mut self,
        history_id: HistoryId,
        draw: fn(&research_core::HistoryRowView) -> String,
    ) -> Result<()> {
        let view = self.state.view();
        if let Some(row) = view.row(history_id) {
            let text = draw(row);
            self.say(&text)?;
        }
        Ok(())
    }

    fn prompt(&mut self) -> Result<()> {
        write!(self.out, "\n> ")?;
        self.out.flush()?;
        Ok(())
    }

    fn say(&mut self, text: &str) -> Result<()> {
        writeln!(self.out, "{text}")?;
        Ok(())
    }
}
