//! Command-line handling for the nats-box tools
//!
//! One binary serves four tools. The tool is picked from the name the
//! executable was invoked as, so `nats-sub` (or a symlink named that way)
//! subscribes while `nats-pub` publishes. Flags follow the single-dash style
//! of the original tools: `-s`, `-creds`, `-q`, `-t`, `-h`, `-v`.

use crate::commands::Command;
use crate::config::{
    resolve_credentials, resolve_servers, ClientConfig, DEFAULT_QUEUE_GROUP, VERSION,
};
use crate::transport::nats::ReconnectPolicy;
use clap::{Arg, CommandFactory, Parser};
use std::path::Path;

/// Which tool the binary is acting as
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Publish,
    Subscribe,
    Request,
    Reply,
}

impl Mode {
    /// Pick the mode from the executable's invocation name.
    ///
    /// Only the lowercased base name counts. Names shorter than 7 bytes, or
    /// without one of the `-pub`, `-sub`, `-req`, `rply` suffixes, publish.
    pub fn from_exe_name(argv0: &str) -> Self {
        let name = Path::new(argv0)
            .file_name()
            .map(|name| name.to_string_lossy().to_lowercase())
            .unwrap_or_default();

        if name.len() < 7 {
            Mode::Publish
        } else if name.ends_with("-sub") {
            Mode::Subscribe
        } else if name.ends_with("-req") {
            Mode::Request
        } else if name.ends_with("rply") {
            Mode::Reply
        } else {
            Mode::Publish
        }
    }

    /// Connection name reported to the server
    pub fn tool_name(self) -> &'static str {
        match self {
            Mode::Publish => "NATS-PUB TOOL",
            Mode::Subscribe => "NATS-SUB TOOL",
            Mode::Request => "NATS-REQ TOOL",
            Mode::Reply => "NATS-RPLY TOOL",
        }
    }

    /// Usage line, without the `Usage: ` prefix
    pub fn usage(self) -> &'static str {
        match self {
            Mode::Publish => "nats-pub [-s server] [-creds file] [-t] <subject> <msg>",
            Mode::Subscribe => "nats-sub [-s server] [-creds file] [-t] <subject>",
            Mode::Request => "nats-req [-s server] [-creds file] [-t] <subject> <request>",
            Mode::Reply => {
                "nats-rply [-s server] [-creds file] [-t] [-q queue] <subject> <response>"
            }
        }
    }

    /// Number of positional arguments the tool takes
    pub fn positional_count(self) -> usize {
        match self {
            Mode::Subscribe => 1,
            Mode::Publish | Mode::Request | Mode::Reply => 2,
        }
    }

    /// Subscriber tools stay up until the connection goes away
    pub fn keeps_running(self) -> bool {
        matches!(self, Mode::Subscribe | Mode::Reply)
    }
}

/// Flags shared by all four tools
#[derive(Parser, Debug)]
#[command(
    name = "nats-box",
    no_binary_name = true,
    disable_help_flag = true,
    disable_version_flag = true,
    args_override_self = true
)]
pub struct Cli {
    /// The NATS System
    #[arg(short = 's', value_name = "URL")]
    pub server: Option<String>,

    /// User Credentials File
    #[arg(long = "creds", value_name = "FILE")]
    pub creds: Option<String>,

    /// Queue Group Name
    #[arg(short = 'q', value_name = "QUEUE", default_value = DEFAULT_QUEUE_GROUP)]
    pub queue: String,

    /// Display timestamps
    #[arg(short = 't')]
    pub timestamps: bool,

    /// Show help message
    #[arg(short = 'h')]
    pub help: bool,

    /// Show version
    #[arg(short = 'v')]
    pub version: bool,

    #[arg(value_name = "ARGS", hide = true)]
    pub args: Vec<String>,
}

/// Everything needed to run one tool invocation
#[derive(Debug, Clone, PartialEq)]
pub struct Invocation {
    pub mode: Mode,
    pub command: Command,
    pub client: ClientConfig,
    /// `-t`: timestamp log lines
    pub timestamps: bool,
}

/// What the process should do after parsing its arguments
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// `-h`: print usage, exit 0
    ShowHelp(String),
    /// `-v`: print the version banner, exit 0
    ShowVersion(String),
    /// Bad flags or wrong positional count: print usage, exit 1
    Usage(String),
    Run(Invocation),
}

impl Action {
    /// Exit status for actions that end the process without connecting
    pub fn exit_code(&self) -> Option<u8> {
        match self {
            Action::ShowHelp(_) | Action::ShowVersion(_) => Some(0),
            Action::Usage(_) => Some(1),
            Action::Run(_) => None,
        }
    }
}

/// `nats-box v0.3.0`
pub fn version_banner() -> String {
    format!("nats-box v{VERSION}")
}

/// Usage text for a mode, followed by the flag defaults
///
/// Flags are listed by name with their single-dash spelling, value flags as
/// `-creds string` with the description on the next line.
pub fn usage_text(mode: Mode) -> String {
    let command = Cli::command();
    let mut flags: Vec<&Arg> = command
        .get_arguments()
        .filter(|arg| !arg.is_positional() && !arg.is_hide_set())
        .collect();
    flags.sort_by_key(|arg| flag_name(arg));

    let mut text = format!("Usage: {}\n", mode.usage());
    for arg in flags {
        text.push_str(&describe_flag(arg));
    }
    text
}

fn flag_name(arg: &Arg) -> String {
    arg.get_long()
        .map(str::to_string)
        .or_else(|| arg.get_short().map(String::from))
        .unwrap_or_default()
}

fn describe_flag(arg: &Arg) -> String {
    let help = arg.get_help().map(ToString::to_string).unwrap_or_default();
    if !arg.get_action().takes_values() {
        return format!("  -{}\t{}\n", flag_name(arg), help);
    }

    let default = arg
        .get_default_values()
        .first()
        .map(|value| format!(" (default {:?})", value.to_string_lossy()))
        .unwrap_or_default();
    format!("  -{} string\n    \t{}{}\n", flag_name(arg), help, default)
}

/// Flags that take a value, as spelled after normalization
const VALUE_FLAGS: [&str; 3] = ["-s", "--creds", "-q"];

/// Rewrite Go-style flag spellings into ones clap understands.
///
/// `-creds` becomes `--creds`, and `--s`, `--q=x` style spellings of the
/// single-letter flags become `-s`, `-q=x`. A value flag is joined with its
/// value, so values may start with `-`. Flag parsing ends at `--` or at the
/// first positional argument; a `--` is inserted before that argument so
/// everything from there on is passed through untouched.
pub fn normalize_args<I, S>(args: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let mut args = args.into_iter().map(Into::<String>::into);
    let mut normalized: Vec<String> = Vec::new();

    while let Some(arg) = args.next() {
        if arg == "--" {
            normalized.push(arg);
            break;
        }
        if !is_flag(&arg) {
            normalized.push("--".to_string());
            normalized.push(arg);
            break;
        }

        let flag = normalize_flag(arg);
        if VALUE_FLAGS.contains(&flag.as_str()) {
            match args.next() {
                Some(value) => normalized.push(format!("{flag}={value}")),
                None => normalized.push(flag),
            }
        } else {
            normalized.push(flag);
        }
    }

    normalized.extend(args);
    normalized
}

fn is_flag(arg: &str) -> bool {
    arg.len() > 1 && arg.starts_with('-')
}

fn normalize_flag(arg: String) -> String {
    if arg == "-creds" || arg.starts_with("-creds=") {
        return format!("-{arg}");
    }
    if let Some(rest) = arg.strip_prefix("--") {
        let name = rest.split('=').next().unwrap_or_default();
        if matches!(name, "s" | "q" | "t" | "h" | "v") {
            return arg[1..].to_string();
        }
    }
    arg
}

fn wants_help(args: &[String]) -> bool {
    args.iter()
        .take_while(|arg| arg.as_str() != "--")
        .any(|arg| arg == "-h")
}

/// Parse the arguments after the program name into an [`Action`].
///
/// `env` looks up environment variables; `NATS_URL` and `NATS_CREDS` are
/// the ones consulted.
pub fn parse_action<I, S, F>(mode: Mode, args: I, env: F) -> Action
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
    F: Fn(&str) -> Option<String>,
{
    let args = normalize_args(args);

    let cli = match Cli::try_parse_from(&args) {
        Ok(cli) => cli,
        Err(err) => {
            if wants_help(&args) {
                return Action::ShowHelp(usage_text(mode));
            }
            let rendered = err.to_string();
            let reason = rendered.lines().next().unwrap_or_default();
            return Action::Usage(format!("{reason}\n{}", usage_text(mode)));
        }
    };

    if cli.help {
        return Action::ShowHelp(usage_text(mode));
    }
    if cli.version {
        return Action::ShowVersion(version_banner());
    }
    if cli.args.len() != mode.positional_count() {
        return Action::Usage(usage_text(mode));
    }

    let client = ClientConfig {
        servers: resolve_servers(cli.server.as_deref(), &env),
        credentials: resolve_credentials(cli.creds.as_deref(), &env),
        name: mode.tool_name().to_string(),
        reconnect: ReconnectPolicy::default(),
    };

    Action::Run(Invocation {
        mode,
        command: Command::from_args(mode, cli.args, cli.queue),
        client,
        timestamps: cli.timestamps,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;
    use std::path::PathBuf;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    fn run_action(mode: Mode, args: &[&str]) -> Invocation {
        match parse_action(mode, args.iter().copied(), no_env) {
            Action::Run(invocation) => invocation,
            other => panic!("expected a runnable invocation, got {other:?}"),
        }
    }

    #[test]
    fn test_mode_from_exe_name() {
        assert_eq!(Mode::from_exe_name("foo-pub"), Mode::Publish);
        assert_eq!(Mode::from_exe_name("foo-sub"), Mode::Subscribe);
        assert_eq!(Mode::from_exe_name("foo-req"), Mode::Request);
        assert_eq!(Mode::from_exe_name("foobarrply"), Mode::Reply);
        assert_eq!(Mode::from_exe_name("nats-rply"), Mode::Reply);
    }

    #[test]
    fn test_mode_uses_base_name() {
        assert_eq!(Mode::from_exe_name("/usr/local/bin/nats-sub"), Mode::Subscribe);
        assert_eq!(Mode::from_exe_name("./target/debug/nats-req"), Mode::Request);
        assert_eq!(Mode::from_exe_name("/opt/nats-sub/nats-box"), Mode::Publish);
    }

    #[test]
    fn test_mode_short_or_unknown_names_publish() {
        assert_eq!(Mode::from_exe_name("a-sub"), Mode::Publish);
        assert_eq!(Mode::from_exe_name("xx-sub"), Mode::Publish);
        assert_eq!(Mode::from_exe_name(""), Mode::Publish);
        assert_eq!(Mode::from_exe_name("nats-box"), Mode::Publish);
        assert_eq!(Mode::from_exe_name("nats-sub.exe"), Mode::Publish);
    }

    #[test]
    fn test_mode_is_case_insensitive() {
        assert_eq!(Mode::from_exe_name("NATS-SUB"), Mode::Subscribe);
        assert_eq!(Mode::from_exe_name("Nats-Rply"), Mode::Reply);
    }

    #[test]
    fn test_tool_names() {
        assert_eq!(Mode::Publish.tool_name(), "NATS-PUB TOOL");
        assert_eq!(Mode::Subscribe.tool_name(), "NATS-SUB TOOL");
        assert_eq!(Mode::Request.tool_name(), "NATS-REQ TOOL");
        assert_eq!(Mode::Reply.tool_name(), "NATS-RPLY TOOL");
    }

    #[test]
    fn test_normalize_go_style_flags() {
        assert_eq!(
            normalize_args(["-creds", "user.creds", "--s", "nats://x", "--q=grp"]),
            vec!["--creds=user.creds", "-s=nats://x", "-q=grp"]
        );
        assert_eq!(normalize_args(["-creds=a.creds"]), vec!["--creds=a.creds"]);
    }

    #[test]
    fn test_normalize_stops_at_first_positional() {
        assert_eq!(
            normalize_args(["-t", "foo", "-t", "--s", "-5"]),
            vec!["-t", "--", "foo", "-t", "--s", "-5"]
        );
    }

    #[test]
    fn test_normalize_joins_values_starting_with_dash() {
        assert_eq!(
            normalize_args(["-q", "-odd", "subj", "x"]),
            vec!["-q=-odd", "--", "subj", "x"]
        );
        assert_eq!(normalize_args(["-s"]), vec!["-s"]);
    }

    #[test]
    fn test_single_dash_is_positional() {
        assert_eq!(normalize_args(["-", "x"]), vec!["--", "-", "x"]);
    }

    #[test]
    fn test_normalize_stops_at_double_dash() {
        assert_eq!(
            normalize_args(["-t", "--", "-creds", "--s"]),
            vec!["-t", "--", "-creds", "--s"]
        );
    }

    #[test]
    fn test_publish_invocation() {
        let invocation = run_action(Mode::Publish, &["-s", "nats://localhost:4222", "foo", "hello"]);

        assert_eq!(invocation.client.servers, "nats://localhost:4222");
        assert_eq!(invocation.client.name, "NATS-PUB TOOL");
        assert_eq!(invocation.client.credentials, None);
        assert!(!invocation.timestamps);
        assert_eq!(
            invocation.command,
            Command::Publish {
                subject: "foo".to_string(),
                payload: Bytes::from("hello"),
            }
        );
    }

    #[test]
    fn test_reply_invocation_uses_default_queue() {
        let invocation = run_action(Mode::Reply, &["help.me", "ok"]);
        assert_eq!(
            invocation.command,
            Command::Reply {
                subject: "help.me".to_string(),
                queue: "NATS-RPLY-22".to_string(),
                response: Bytes::from("ok"),
            }
        );
    }

    #[test]
    fn test_reply_invocation_custom_queue() {
        let invocation = run_action(Mode::Reply, &["-q", "workers", "help.me", "ok"]);
        assert!(matches!(
            invocation.command,
            Command::Reply { ref queue, .. } if queue == "workers"
        ));
    }

    #[test]
    fn test_credentials_flag() {
        let invocation = run_action(Mode::Subscribe, &["-creds", "/tmp/u.creds", "-t", "foo"]);
        assert_eq!(
            invocation.client.credentials,
            Some(PathBuf::from("/tmp/u.creds"))
        );
        assert!(invocation.timestamps);
    }

    #[test]
    fn test_subscribe_positional_count() {
        assert!(matches!(
            parse_action(Mode::Subscribe, ["foo", "bar"], no_env),
            Action::Usage(_)
        ));
        assert!(matches!(
            parse_action(Mode::Subscribe, Vec::<String>::new(), no_env),
            Action::Usage(_)
        ));
        assert!(matches!(
            parse_action(Mode::Subscribe, ["foo"], no_env),
            Action::Run(_)
        ));
    }

    #[test]
    fn test_two_positional_modes() {
        for mode in [Mode::Publish, Mode::Request, Mode::Reply] {
            assert!(matches!(
                parse_action(mode, ["foo"], no_env),
                Action::Usage(_)
            ));
            assert!(matches!(
                parse_action(mode, ["foo", "bar", "baz"], no_env),
                Action::Usage(_)
            ));
            assert!(matches!(
                parse_action(mode, ["foo", "bar"], no_env),
                Action::Run(_)
            ));
        }
    }

    #[test]
    fn test_help_wins_over_positional_count() {
        let action = parse_action(Mode::Subscribe, ["-h", "a", "b", "c"], no_env);
        assert!(matches!(action, Action::ShowHelp(_)));
        assert_eq!(action.exit_code(), Some(0));
    }

    #[test]
    fn test_help_wins_over_bad_flag() {
        let action = parse_action(Mode::Publish, ["-x", "-h"], no_env);
        assert!(matches!(action, Action::ShowHelp(_)));
    }

    #[test]
    fn test_version() {
        let action = parse_action(Mode::Request, ["-v"], no_env);
        assert_eq!(action, Action::ShowVersion("nats-box v0.3.0".to_string()));
        assert_eq!(action.exit_code(), Some(0));
    }

    #[test]
    fn test_unknown_flag_is_usage_error() {
        let action = parse_action(Mode::Publish, ["-x", "foo", "bar"], no_env);
        assert!(matches!(action, Action::Usage(_)));
        assert_eq!(action.exit_code(), Some(1));
    }

    #[test]
    fn test_usage_text_mentions_mode_and_flags() {
        let text = usage_text(Mode::Reply);
        assert!(text.starts_with(
            "Usage: nats-rply [-s server] [-creds file] [-t] [-q queue] <subject> <response>\n"
        ));
        assert!(text.contains("NATS-RPLY-22"));
        assert!(text.contains("User Credentials File"));
        assert!(text.contains("Display timestamps"));
    }

    #[test]
    fn test_usage_text_lists_single_dash_flags() {
        let text = usage_text(Mode::Publish);
        let expected = concat!(
            "  -creds string\n",
            "    \tUser Credentials File\n",
            "  -h\tShow help message\n",
            "  -q string\n",
            "    \tQueue Group Name (default \"NATS-RPLY-22\")\n",
            "  -s string\n",
            "    \tThe NATS System\n",
            "  -t\tDisplay timestamps\n",
            "  -v\tShow version\n",
        );
        assert!(text.ends_with(expected), "{text}");
        assert!(!text.contains("--creds"));
    }

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }
}
