//! Interactive study loop over a line-based terminal.

use std::io::{self, BufRead, Write};

use study_engine::{SelectOutcome, StudyError, StudySession, PRESET_TOPICS};

use crate::render::{
    parse_option, render_feedback, render_final_score, render_practiced, render_question,
    render_session,
};

const HELP: &str = "\
Commands:
  topic <text>        Generate content for a topic
  pick <n>            Generate content for preset topic n
  select <q> <opt>    Select option (letter or number) on question q
  submit <q>          Submit the selected option on question q
  reset <q>           Clear question q so it can be answered again
  score               Show the current score
  theme               Toggle light/dark theme
  show                Show the whole page again
  help                Show this help
  quit                Leave";

/// One line of user input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Generate content for free text.
    Topic(String),
    /// Generate content for a preset, 0-based.
    Pick(usize),
    /// Select an option, both 0-based.
    Select {
        /// Question index.
        question: usize,
        /// Option index.
        option: usize,
    },
    /// Submit a question, 0-based.
    Submit(usize),
    /// Reset a question, 0-based.
    Reset(usize),
    /// Show the score.
    Score,
    /// Toggle the theme.
    Theme,
    /// Redraw the page.
    Show,
    /// Show help.
    Help,
    /// Leave the loop.
    Quit,
}

impl Command {
    /// Parses a line. Question and preset numbers are 1-based on input.
    pub fn parse(line: &str) -> Result<Self, String> {
        let line = line.trim();
        let (word, rest) = line
            .split_once(char::is_whitespace)
            .map_or((line, ""), |(w, r)| (w, r.trim()));

        match word.to_lowercase().as_str() {
            "topic" | "t" => Ok(Self::Topic(rest.to_string())),
            "pick" | "p" => parse_number(rest, "preset").map(Self::Pick),
            "select" | "s" => {
                let (question, option) = rest
                    .split_once(char::is_whitespace)
                    .ok_or("Usage: select <question> <option>")?;
                let question = parse_number(question, "question")?;
                let option = parse_option(option)
                    .ok_or_else(|| format!("Unknown option '{}'", option.trim()))?;
                Ok(Self::Select { question, option })
            }
            "submit" => parse_number(rest, "question").map(Self::Submit),
            "reset" | "r" => parse_number(rest, "question").map(Self::Reset),
            "score" => Ok(Self::Score),
            "theme" => Ok(Self::Theme),
            "show" | "" => Ok(Self::Show),
            "help" | "?" => Ok(Self::Help),
            "quit" | "q" | "exit" => Ok(Self::Quit),
            other => Err(format!("Unknown command '{other}'. Type `help` for commands.")),
        }
    }
}

/// Parses a 1-based number into a 0-based index.
fn parse_number(raw: &str, what: &str) -> Result<usize, String> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(format!("Missing {what} number"));
    }
    raw.parse::<usize>()
        .ok()
        .and_then(|n| n.checked_sub(1))
        .ok_or_else(|| format!("Invalid {what} number '{raw}' (numbers start at 1)"))
}

/// Runs the loop until `quit` or end of input.
pub fn run<R: BufRead, W: Write>(
    session: &mut StudySession,
    input: R,
    output: &mut W,
) -> io::Result<()> {
    writeln!(output, "{}", render_practiced(session.practiced_today()))?;
    writeln!(output, "Type `help` for commands.")?;

    for line in input.lines() {
        let line = line?;
        match Command::parse(&line) {
            Ok(Command::Quit) => break,
            Ok(command) => {
                let text = execute(session, command);
                writeln!(output, "{}", text.trim_end())?;
            }
            Err(message) => writeln!(output, "{message}")?,
        }
        output.flush()?;
    }
    Ok(())
}

/// Applies one command to the session and returns what to print.
pub fn execute(session: &mut StudySession, command: Command) -> String {
    match command {
        Command::Topic(text) => generate(session, &text),
        Command::Pick(index) => match PRESET_TOPICS.get(index) {
            Some(topic) => generate(session, topic),
            None => format!("There are {} preset topics.", PRESET_TOPICS.len()),
        },
        Command::Select { question, option } => match session.select(question, option) {
            Ok(SelectOutcome::Applied) => show_question(session, question),
            Ok(SelectOutcome::Ignored) => format!(
                "Question {} is locked. Reset it to change your answer.",
                question + 1
            ),
            Err(e) => describe_error(&e),
        },
        Command::Submit(question) => match session.submit(question) {
            Ok(outcome) => {
                let mut out = match session.engine().questions().get(question) {
                    Some(q) => render_feedback(q, outcome.feedback()),
                    None => String::new(),
                };
                if !outcome.is_accepted() {
                    out.push_str(" (already submitted)");
                }
                if let Some(score) = session.final_score() {
                    out.push('\n');
                    out.push_str(&render_final_score(score));
                }
                out
            }
            Err(e) => describe_error(&e),
        },
        Command::Reset(question) => match session.reset(question) {
            Ok(()) => show_question(session, question),
            Err(e) => describe_error(&e),
        },
        Command::Score => {
            let score = session.score_summary();
            let mut out = format!(
                "Answered {} of {}, {} correct",
                score.num_submitted, score.total, score.num_correct
            );
            if let Some(final_score) = session.final_score() {
                out.push('\n');
                out.push_str(&render_final_score(final_score));
            }
            out
        }
        Command::Theme => format!("Theme: {}", session.toggle_theme()),
        Command::Show => render_session(session),
        Command::Help => HELP.to_string(),
        Command::Quit => String::new(),
    }
}

fn generate(session: &mut StudySession, topic: &str) -> String {
    match session.generate(topic) {
        Ok(_) => render_session(session),
        Err(StudyError::EmptyTopic) => session.status().to_string(),
        Err(_) => format!("{}\n\n{}", render_session(session), session.status()),
    }
}

fn show_question(session: &StudySession, question: usize) -> String {
    let engine = session.engine();
    match (engine.questions().get(question), engine.question_view(question)) {
        (Some(q), Ok(view)) => render_question(question + 1, q, view),
        (_, Err(e)) => describe_error(&e),
        (None, Ok(_)) => String::new(),
    }
}

fn describe_error(err: &StudyError) -> String {
    match err {
        StudyError::InvalidSelection {
            question,
            option: None,
        } => format!("There is no question {}.", question + 1),
        StudyError::InvalidSelection {
            question,
            option: Some(_),
        } => format!("Question {} has no such option.", question + 1),
        other => other.to_string(),
    }
}
