use crate::error::{Result, ShellError};
use crate::executor::suggestions;
use crate::runtime::Runtime;
use std::collections::HashMap;
use std::fs;
use std::io::{Read, Write};
use std::sync::Arc;

mod cat;
mod cut;
pub mod exit_builtin;
mod find;
mod grep;
mod lines;
mod ls;
mod mv;
mod sort;
mod uniq;
mod wc;

/// The uniform invocation contract every application implements.
///
/// `args` excludes the application name. An application reports its own
/// failures as [`ShellError::Application`]; the engine only relays them.
pub trait Application {
    fn run(
        &self,
        args: &[String],
        runtime: &mut Runtime,
        input: &mut dyn Read,
        output: &mut dyn Write,
    ) -> Result<()>;
}

impl<F> Application for F
where
    F: Fn(&[String], &mut Runtime, &mut dyn Read, &mut dyn Write) -> Result<()>,
{
    fn run(
        &self,
        args: &[String],
        runtime: &mut Runtime,
        input: &mut dyn Read,
        output: &mut dyn Write,
    ) -> Result<()> {
        self(args, runtime, input, output)
    }
}

type BuiltinFn = fn(&[String], &mut Runtime, &mut dyn Read, &mut dyn Write) -> Result<()>;

/// Prefix that selects the unsafe variant of an application.
const UNSAFE_PREFIX: char = '_';

/// Registry mapping application names to handlers.
#[derive(Clone)]
pub struct Builtins {
    commands: HashMap<String, Arc<dyn Application>>,
}

impl Default for Builtins {
    fn default() -> Self {
        Self::new()
    }
}

impl Builtins {
    pub fn new() -> Self {
        let mut builtins = Self::empty();

        let table: [(&str, BuiltinFn); 17] = [
            ("cd", builtin_cd),
            ("pwd", builtin_pwd),
            ("echo", builtin_echo),
            ("exit", exit_builtin::builtin_exit),
            ("cat", cat::builtin_cat),
            ("ls", ls::builtin_ls),
            ("head", lines::builtin_head),
            ("tail", lines::builtin_tail),
            ("grep", grep::builtin_grep),
            ("cut", cut::builtin_cut),
            ("find", find::builtin_find),
            ("uniq", uniq::builtin_uniq),
            ("sort", sort::builtin_sort),
            ("wc", wc::builtin_wc),
            ("mv", mv::builtin_mv),
            ("mkdir", builtin_mkdir),
            ("true", builtin_true),
        ];
        for (name, func) in table {
            builtins.register(name, func);
        }

        builtins
    }

    /// A registry with no applications at all.
    pub fn empty() -> Self {
        Self {
            commands: HashMap::new(),
        }
    }

    pub fn register(&mut self, name: impl Into<String>, app: impl Application + 'static) {
        self.commands.insert(name.into(), Arc::new(app));
    }

    pub fn is_builtin(&self, name: &str) -> bool {
        self.commands.contains_key(name)
            || name
                .strip_prefix(UNSAFE_PREFIX)
                .is_some_and(|safe| self.commands.contains_key(safe))
    }

    pub fn builtin_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.commands.keys().cloned().collect();
        names.sort();
        names
    }

    /// Look up an application by name.
    ///
    /// `_name` yields the unsafe variant of `name`, which prints its
    /// failures to the output stream instead of raising them.
    pub fn get(&self, name: &str) -> Result<Arc<dyn Application>> {
        if let Some(app) = self.commands.get(name) {
            return Ok(app.clone());
        }

        if let Some(safe) = name.strip_prefix(UNSAFE_PREFIX) {
            if let Some(app) = self.commands.get(safe) {
                return Ok(Arc::new(Unsafe { inner: app.clone() }));
            }
        }

        let mut err = ShellError::unknown_application(name);
        if let Some(suggestion) = suggestions::suggest_application(name, &self.builtin_names()) {
            if let ShellError::Shell(message) = &mut err {
                message.push_str(&format!(" (did you mean '{}'?)", suggestion));
            }
        }
        Err(err)
    }
}

struct Unsafe {
    inner: Arc<dyn Application>,
}

impl Application for Unsafe {
    fn run(
        &self,
        args: &[String],
        runtime: &mut Runtime,
        input: &mut dyn Read,
        output: &mut dyn Write,
    ) -> Result<()> {
        match self.inner.run(args, runtime, input, output) {
            Err(err @ ShellError::Application { .. }) => {
                writeln!(output, "{}", err)?;
                Ok(())
            }
            other => other,
        }
    }
}

/// Read a named file for an application, or all of `input` when `path`
/// is `None`.
pub(crate) fn read_source(
    app: &str,
    path: Option<&str>,
    runtime: &Runtime,
    input: &mut dyn Read,
) -> Result<String> {
    match path {
        Some(path) => read_file(app, path, runtime),
        None => {
            let mut buf = String::new();
            input.read_to_string(&mut buf)?;
            Ok(buf)
        }
    }
}

pub(crate) fn read_file(app: &str, path: &str, runtime: &Runtime) -> Result<String> {
    let full = runtime.resolve(path);
    if !full.exists() {
        return Err(ShellError::app(app, format!("{}: No such file or directory", path)));
    }
    if full.is_dir() {
        return Err(ShellError::app(app, format!("{}: Is a directory", path)));
    }
    fs::read_to_string(&full).map_err(|e| ShellError::app(app, format!("{}: {}", path, e)))
}

pub(crate) fn write_lines<'a>(
    output: &mut dyn Write,
    lines: impl IntoIterator<Item = &'a str>,
) -> Result<()> {
    for line in lines {
        writeln!(output, "{}", line)?;
    }
    Ok(())
}

fn builtin_cd(
    args: &[String],
    runtime: &mut Runtime,
    _input: &mut dyn Read,
    _output: &mut dyn Write,
) -> Result<()> {
    let target = match args {
        [target] => target,
        [] => return Err(ShellError::app("cd", "missing argument")),
        _ => return Err(ShellError::app("cd", "too many arguments")),
    };

    let absolute = runtime.resolve(target);
    if !absolute.exists() {
        return Err(ShellError::app("cd", format!("{}: No such file or directory", target)));
    }
    if !absolute.is_dir() {
        return Err(ShellError::app("cd", format!("{}: Not a directory", target)));
    }

    let absolute = absolute.canonicalize().unwrap_or(absolute);
    runtime.set_cwd(absolute);
    Ok(())
}

fn builtin_pwd(
    args: &[String],
    runtime: &mut Runtime,
    _input: &mut dyn Read,
    output: &mut dyn Write,
) -> Result<()> {
    if !args.is_empty() {
        return Err(ShellError::app("pwd", "too many arguments"));
    }
    writeln!(output, "{}", runtime.get_cwd().display())?;
    Ok(())
}

fn builtin_echo(
    args: &[String],
    _runtime: &mut Runtime,
    _input: &mut dyn Read,
    output: &mut dyn Write,
) -> Result<()> {
    writeln!(output, "{}", args.join(" "))?;
    Ok(())
}

fn builtin_mkdir(
    args: &[String],
    runtime: &mut Runtime,
    _input: &mut dyn Read,
    _output: &mut dyn Write,
) -> Result<()> {
    if args.is_empty() {
        return Err(ShellError::app("mkdir", "missing operand"));
    }
    for dir in args {
        let path = runtime.resolve(dir);
        if path.exists() {
            return Err(ShellError::app("mkdir", format!("{}: File exists", dir)));
        }
        fs::create_dir_all(&path).map_err(|e| ShellError::app("mkdir", format!("{}: {}", dir, e)))?;
    }
    Ok(())
}

fn builtin_true(
    _args: &[String],
    _runtime: &mut Runtime,
    _input: &mut dyn Read,
    _output: &mut dyn Write,
) -> Result<()> {
    Ok(())
}
