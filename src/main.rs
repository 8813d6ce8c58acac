use anyhow::{Context, Result};
use nu_ansi_term::Color;
use reedline::{
    FileBackedHistory, Prompt, PromptEditMode, PromptHistorySearch, PromptHistorySearchStatus,
    Reedline, Signal,
};
use std::borrow::Cow;
use std::env;
use std::fs;
use std::io::{self, BufRead, Read, Write};
use std::path::{Path, PathBuf};
use std::process;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;
use tush::config::{self, Config, DEFAULT_LOG_FILTER};
use tush::parser::Parser;
use tush::{Builtins, CommandBuilder, Runtime, ShellError};

const USAGE: &str = "\
Usage: tush [OPTIONS] [SCRIPT]

Options:
  -c COMMAND        Evaluate COMMAND and exit
  --ast -c COMMAND  Print the parsed command line as JSON and exit
  -h, --help        Show this help
  --version         Show version

With no SCRIPT, reads commands interactively (or line by line from a
non-terminal stdin).
";

fn main() -> Result<()> {
    init_logging(&config::log_filter_from_env());
    let config = Config::from_env();

    let args: Vec<String> = env::args().skip(1).collect();
    let mut shell = Shell::new(config);

    let code = match args.as_slice() {
        [] => shell.run_interactive()?,
        [flag] if flag == "-h" || flag == "--help" => {
            print!("{}", USAGE);
            0
        }
        [flag] if flag == "--version" => {
            println!("tush {}", env!("CARGO_PKG_VERSION"));
            0
        }
        [flag, line] if flag == "-c" => shell.run_command(line),
        [ast, flag, line] if ast == "--ast" && flag == "-c" => shell.print_ast(line)?,
        [script] if !script.starts_with('-') => shell.run_script(Path::new(script))?,
        _ => {
            eprint!("{}", USAGE);
            2
        }
    };

    io::stdout().flush().ok();
    process::exit(code);
}

fn init_logging(log_filter: &str) {
    let filter = EnvFilter::try_new(log_filter)
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

/// One shell session: a command builder plus the context every line
/// shares, so `cd` persists from one line to the next.
struct Shell {
    builder: CommandBuilder,
    runtime: Runtime,
    config: Config,
}

impl Shell {
    fn new(config: Config) -> Self {
        Self {
            builder: CommandBuilder::new(Arc::new(Builtins::new())),
            runtime: Runtime::new(),
            config,
        }
    }

    fn execute(&mut self, line: &str, input: &mut dyn Read) -> Result<(), ShellError> {
        let mut command = self.builder.build(line)?;
        let stdout = io::stdout();
        let mut output = stdout.lock();
        let result = command.evaluate(&mut self.runtime, input, &mut output);
        output.flush()?;
        result
    }

    fn report(&self, err: &ShellError) {
        eprintln!("{}", err.render(self.config.json_errors));
    }

    /// `-c`: one line, its outcome is the process status.
    fn run_command(&mut self, line: &str) -> i32 {
        let stdin = io::stdin();
        let mut input = stdin.lock();
        match self.execute(line, &mut input) {
            Ok(()) => 0,
            Err(ShellError::Exit(code)) => code,
            Err(err) => {
                self.report(&err);
                err.exit_code()
            }
        }
    }

    fn print_ast(&self, line: &str) -> Result<i32> {
        match Parser::parse_line(line) {
            Ok(ast) => {
                println!("{}", serde_json::to_string_pretty(&ast)?);
                Ok(0)
            }
            Err(err) => {
                self.report(&err);
                Ok(err.exit_code())
            }
        }
    }

    fn run_script(&mut self, path: &Path) -> Result<i32> {
        let file = fs::File::open(path)
            .with_context(|| format!("cannot open script {}", path.display()))?;
        self.run_lines(io::BufReader::new(file))
    }

    /// Evaluate lines until input ends or `exit` runs. Failures are reported
    /// and the next line still runs. Commands read an empty input, since
    /// the line source may itself be stdin.
    fn run_lines(&mut self, reader: impl BufRead) -> Result<i32> {
        let mut status = 0;
        for line in reader.lines() {
            let line = match line {
                Ok(line) => line,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            };
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            match self.execute(line, &mut io::empty()) {
                Ok(()) => status = 0,
                Err(ShellError::Exit(code)) => return Ok(code),
                Err(err) => {
                    self.report(&err);
                    status = err.exit_code();
                }
            }
        }
        Ok(status)
    }

    fn run_interactive(&mut self) -> Result<i32> {
        if !atty::is(atty::Stream::Stdin) {
            let stdin = io::stdin();
            return self.run_lines(stdin.lock());
        }

        let mut line_editor = Reedline::create();
        if let Some(path) = &self.config.history_path {
            match FileBackedHistory::with_file(self.config.history_size, path.clone()) {
                Ok(history) => line_editor = line_editor.with_history(Box::new(history)),
                Err(e) => tracing::warn!(path = %path.display(), error = %e, "history disabled"),
            }
        }

        loop {
            let prompt = TushPrompt::new(self.runtime.get_cwd().clone(), &self.config.prompt);
            match line_editor.read_line(&prompt) {
                Ok(Signal::Success(buffer)) => {
                    let line = buffer.trim();
                    if line.is_empty() {
                        continue;
                    }

                    let stdin = io::stdin();
                    let mut input = stdin.lock();
                    match self.execute(line, &mut input) {
                        Ok(()) => {}
                        Err(ShellError::Exit(code)) => return Ok(code),
                        Err(err) => self.report(&err),
                    }
                }
                Ok(Signal::CtrlC) => continue,
                Ok(Signal::CtrlD) => return Ok(0),
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e).context("error reading line"),
            }
        }
    }
}

/// Shows the session's current directory, home shortened to `~`.
struct TushPrompt {
    cwd: PathBuf,
    suffix: String,
}

impl TushPrompt {
    fn new(cwd: PathBuf, suffix: &str) -> Self {
        Self {
            cwd,
            suffix: suffix.to_string(),
        }
    }

    fn display_cwd(&self) -> String {
        if let Some(home) = dirs::home_dir() {
            if let Ok(suffix) = self.cwd.strip_prefix(&home) {
                if suffix.as_os_str().is_empty() {
                    return "~".to_string();
                }
                return format!("~/{}", suffix.display());
            }
        }
        self.cwd.display().to_string()
    }
}

impl Prompt for TushPrompt {
    fn render_prompt_left(&self) -> Cow<str> {
        Cow::Owned(Color::Cyan.bold().paint(self.display_cwd()).to_string())
    }

    fn render_prompt_right(&self) -> Cow<str> {
        Cow::Borrowed("")
    }

    fn render_prompt_indicator(&self, _prompt_mode: PromptEditMode) -> Cow<str> {
        Cow::Borrowed(&self.suffix)
    }

    fn render_prompt_multiline_indicator(&self) -> Cow<str> {
        Cow::Borrowed("> ")
    }

    fn render_prompt_history_search_indicator(
        &self,
        history_search: PromptHistorySearch,
    ) -> Cow<str> {
        let prefix = match history_search.status {
            PromptHistorySearchStatus::Passing => "",
            PromptHistorySearchStatus::Failing => "failing ",
        };

        Cow::Owned(format!(
            "({}reverse-search: {}) ",
            prefix, history_search.term
        ))
    }
}
