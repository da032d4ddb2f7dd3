//! Command-line interface of the plugin binary.
//!
//! The orchestrator launches the binary without arguments. The only option is
//! `debug`, accepted both Go-style (`-debug`, `-debug=false`) and GNU-style
//! (`--debug`, `--debug=false`).

use std::ffi::OsString;

use clap::builder::BoolishValueParser;
use clap::error::{ContextKind, ContextValue};
use clap::{ArgAction, Parser};

#[derive(Debug, Clone, PartialEq, Eq, Parser)]
#[command(name = "terraform-provider-dockhand")]
#[command(about = "Terraform provider plugin for Dockhand", long_about = None)]
pub struct Cli {
    /// set to true to run the provider with support for debuggers
    #[arg(
        long,
        action = ArgAction::Set,
        num_args = 0..=1,
        require_equals = true,
        default_value_t = false,
        default_missing_value = "true",
        value_parser = BoolishValueParser::new()
    )]
    pub debug: bool,
}

impl Cli {
    /// Parse process arguments (program name first) without exiting.
    pub fn try_parse_args<I, T>(args: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString>,
    {
        let (args, rewrites) = normalize_single_dash(args);
        Self::try_parse_from(args).map_err(|mut err| {
            restore_spelling(&mut err, &rewrites);
            err
        })
    }
}

/// An argument rewritten by [`normalize_single_dash`]: (as parsed, as typed).
type Rewrite = (String, String);

/// Rewrite single-dash long options (`-debug`) into `--debug`.
///
/// The program name and everything after a `--` terminator are left alone,
/// as are single-character options like `-h`.
fn normalize_single_dash<I, T>(args: I) -> (Vec<OsString>, Vec<Rewrite>)
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
{
    let mut terminated = false;
    let mut rewrites = Vec::new();
    let args = args
        .into_iter()
        .map(Into::into)
        .enumerate()
        .map(|(index, arg)| {
            if index == 0 || terminated {
                return arg;
            }
            let Some(text) = arg.to_str() else {
                return arg;
            };
            if text == "--" {
                terminated = true;
                return arg;
            }
            let name = text.split('=').next().unwrap_or(text);
            if !text.starts_with("--") && text.starts_with('-') && name.len() > 2 {
                let rewritten = format!("-{text}");
                rewrites.push((rewritten.clone(), text.to_string()));
                OsString::from(rewritten)
            } else {
                arg
            }
        })
        .collect();
    (args, rewrites)
}

/// Report a rewritten argument in the spelling the user typed.
fn restore_spelling(err: &mut clap::Error, rewrites: &[Rewrite]) {
    let Some(ContextValue::String(shown)) = err.get(ContextKind::InvalidArg) else {
        return;
    };
    let original = rewrites.iter().find_map(|(parsed, typed)| {
        if parsed == shown {
            Some(typed.clone())
        } else if parsed.split('=').next() == Some(shown.as_str()) {
            typed.split('=').next().map(str::to_string)
        } else {
            None
        }
    });
    if let Some(original) = original {
        err.insert(ContextKind::InvalidArg, ContextValue::String(original));
    }
}
