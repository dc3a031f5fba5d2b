//! Meta-command classification.
//!
//! A line starting with `\` is matched against an ordered rule list. Each
//! rule names its spellings (longest first) and what may follow them. The
//! first rule that matches wins; anything else is an unknown command.

/// A parsed meta-command.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MetaCommand {
    /// `\q[uit]`
    Quit,
    /// `\h[elp]`
    Help,
    /// `\t[ables]`
    ListTables,
    /// `\dt table`
    DescribeTable(String),
    /// `\s[elect] table`
    Select(String),
    /// `\rb code`
    RubyEval(String),
    /// `\irb`
    Subshell,
    /// `\c[ommit]`
    Commit,
    /// `\r[ollback]`
    Rollback,
    /// `\a[utocommit] [on|off]`, with the argument as typed.
    Autocommit(String),
    /// `\i[nput] file`
    Input(String),
    /// `\o[utput] [file]`
    Output(String),
    /// `\pl n`
    PageLength(String),
    /// Anything else.
    Unknown(String),
}

/// What a rule accepts after its spelling.
#[derive(Clone, Copy, Debug)]
enum Tail {
    /// Nothing but whitespace.
    Empty,
    /// Nothing, or whitespace followed by an argument.
    Argument,
    /// Anything; the trimmed remainder is the argument.
    Rest,
}

#[derive(Clone, Copy, Debug)]
enum Kind {
    Quit,
    Help,
    ListTables,
    DescribeTable,
    Select,
    RubyEval,
    Subshell,
    Commit,
    Rollback,
    Autocommit,
    Input,
    Output,
    PageLength,
}

const RULES: &[(&[&str], Tail, Kind)] = &[
    (&["\\quit", "\\q"], Tail::Empty, Kind::Quit),
    (&["\\help", "\\h"], Tail::Empty, Kind::Help),
    (&["\\tables", "\\t"], Tail::Rest, Kind::ListTables),
    (&["\\dt"], Tail::Rest, Kind::DescribeTable),
    (&["\\select", "\\s"], Tail::Rest, Kind::Select),
    (&["\\rb"], Tail::Rest, Kind::RubyEval),
    (&["\\irb"], Tail::Rest, Kind::Subshell),
    (&["\\commit", "\\c"], Tail::Empty, Kind::Commit),
    (&["\\rollback", "\\r"], Tail::Empty, Kind::Rollback),
    (&["\\autocommit", "\\a"], Tail::Argument, Kind::Autocommit),
    (&["\\input", "\\i"], Tail::Rest, Kind::Input),
    (&["\\output", "\\o"], Tail::Rest, Kind::Output),
    (&["\\pl"], Tail::Rest, Kind::PageLength),
];

/// Strips `name` from the front of `line`, ignoring ASCII case.
fn strip_name<'a>(line: &'a str, name: &str) -> Option<&'a str> {
    line.get(..name.len())
        .filter(|head| head.eq_ignore_ascii_case(name))
        .and_then(|_| line.get(name.len()..))
}

/// Checks `rest` against a tail rule and returns the argument.
fn accept(rest: &str, tail: Tail) -> Option<&str> {
    match tail {
        Tail::Empty => rest.trim().is_empty().then_some(""),
        Tail::Argument => {
            if rest.trim().is_empty() {
                Some("")
            } else if rest.starts_with(char::is_whitespace) {
                Some(rest.trim())
            } else {
                None
            }
        }
        Tail::Rest => Some(rest.trim()),
    }
}

impl MetaCommand {
    /// Classifies a line that starts with `\`.
    ///
    /// Leading whitespace is ignored. Lines that match no rule are
    /// [`MetaCommand::Unknown`].
    #[must_use]
    pub fn parse(line: &str) -> Self {
        let line = line.trim_start();
        for (names, tail, kind) in RULES {
            let matched = names
                .iter()
                .find_map(|name| strip_name(line, name).and_then(|rest| accept(rest, *tail)));
            if let Some(arg) = matched {
                return Self::build(*kind, arg.to_string());
            }
        }
        Self::Unknown(line.to_string())
    }

    fn build(kind: Kind, arg: String) -> Self {
        match kind {
            Kind::Quit => Self::Quit,
            Kind::Help => Self::Help,
            Kind::ListTables => Self::ListTables,
            Kind::DescribeTable => Self::DescribeTable(arg),
            Kind::Select => Self::Select(arg),
            Kind::RubyEval => Self::RubyEval(arg),
            Kind::Subshell => Self::Subshell,
            Kind::Commit => Self::Commit,
            Kind::Rollback => Self::Rollback,
            Kind::Autocommit => Self::Autocommit(arg),
            Kind::Input => Self::Input(arg),
            Kind::Output => Self::Output(arg),
            Kind::PageLength => Self::PageLength(arg),
        }
    }
}

/// Rows of the `\h` reference table: spelling and description.
pub const HELP: &[(&str, &str)] = &[
    ("\\h[elp]", "Display this help screen"),
    ("", ""),
    ("\\t[ables]", "Display all available tables"),
    ("\\dt table", "Describe columns of 'table'"),
    ("\\s[elect] table", "short for SELECT * FROM 'table'"),
    ("", ""),
    ("\\c[ommit]", "Commits the current transaction"),
    ("\\r[ollback]", "Rolls back the current transaction"),
    ("\\a[utocommit]", "Show current autocommit mode"),
    ("\\a[utocommit] on|off", "Switch autocommit mode on/off"),
    ("", ""),
    ("\\i[nput] filename", "Read and execute lines from 'filename'"),
    ("\\o[utput]", "Disable output"),
    (
        "\\o[utput] filename",
        "Store SQL statements the user inputs into 'filename'",
    ),
    ("", ""),
    ("\\pl n", "Set page length to 'n'"),
    ("", ""),
    ("\\q[uit]", "Quit this program"),
];
