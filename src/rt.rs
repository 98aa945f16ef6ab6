//! Matching tokens against the declared tree.
use crate::{
    node::Node,
    opt::{Builtin, Opt, FLAG_VALUE},
    usage::{self, Palette},
    value::Kind,
    ParseError, Result,
};

/// How a parse call ended, when it didn't fail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// A command handler ran.
    Handled,
    /// The tokens ran out before a command was named; carries the usage text
    /// of the last node entered.
    Usage(String),
    /// `--help` was seen; carries the usage text of the node it belongs to.
    Help(String),
    /// `--version` was seen.
    Version(String),
}

pub(crate) struct Ctx<'a> {
    pub(crate) palette: &'a Palette,
    pub(crate) version: &'a str,
}

/// Forward-only view over the token list.
struct Tokens<'a> {
    args: &'a [String],
    pos: usize,
}

impl<'a> Tokens<'a> {
    fn new(args: &'a [String]) -> Self {
        Self { args, pos: 0 }
    }

    fn peek(&self) -> Option<&'a str> {
        self.args.get(self.pos).map(String::as_str)
    }

    fn next(&mut self) -> Option<&'a str> {
        let res = self.peek();
        if res.is_some() {
            self.pos += 1;
        }
        res
    }

    fn next_value(&mut self, flag: &str) -> Result<&'a str, ParseError> {
        self.next().ok_or_else(|| ParseError::MissingOptionValue(flag.to_string()))
    }

    fn rest(&self) -> &'a [String] {
        &self.args[self.pos..]
    }
}

pub(crate) fn dispatch(root: &mut Node, args: &[String], ctx: &Ctx<'_>) -> Result<Outcome> {
    let mut tokens = Tokens::new(args);
    let outcome = process(root, &mut tokens, true, ctx)?;
    Ok(outcome.unwrap_or(Outcome::Handled))
}

/// One scope of the scan. With `requires_arg` unset (a command's own options)
/// the scan stops at the first unknown token and returns `None`, leaving the
/// rest for the handler.
fn process(
    node: &mut Node,
    tokens: &mut Tokens<'_>,
    requires_arg: bool,
    ctx: &Ctx<'_>,
) -> Result<Option<Outcome>> {
    tracing::debug!(node = node.trigger(), requires_arg, "entering scope");

    while let Some(arg) = tokens.peek() {
        if let Some(idx) = node.option_index(arg) {
            tokens.next();
            match node.opts[idx].builtin() {
                Some(Builtin::Help) => {
                    return Ok(Some(Outcome::Help(usage::render(node, ctx.palette))));
                }
                Some(Builtin::Version) => {
                    return Ok(Some(Outcome::Version(usage::version(ctx.version, ctx.palette))));
                }
                None => {}
            }
            let opt = &mut node.opts[idx];
            let value = match opt.kind() {
                Kind::Flag => FLAG_VALUE,
                _ => tokens.next_value(arg)?,
            };
            tracing::trace!(option = opt.long(), value, "setting option");
            opt.set(value)?;
            continue;
        }

        if let Some(group) = node.groups.get_mut(arg) {
            check_required(&node.opts)?;
            tokens.next();
            return process(group, tokens, true, ctx);
        }

        if let Some(command) = node.commands.get_mut(arg) {
            check_required(&node.opts)?;
            tokens.next();
            if let Some(outcome) = process(command, tokens, false, ctx)? {
                return Ok(Some(outcome));
            }
            // `node` was checked before entering the command.
            check_required(&command.opts)?;
            let rest = tokens.rest();
            tracing::debug!(command = arg, args = rest.len(), "running handler");
            command.run(rest)?;
            return Ok(Some(Outcome::Handled));
        }

        if requires_arg {
            return Err(ParseError::UnknownArgument(arg.to_string()).into());
        }
        break;
    }

    if requires_arg {
        return Ok(Some(Outcome::Usage(usage::render(node, ctx.palette))));
    }
    Ok(None)
}

pub(crate) fn missing(opts: &[Opt]) -> impl Iterator<Item = &Opt> {
    opts.iter().filter(|opt| opt.is_required() && !opt.is_used())
}

fn check_required(opts: &[Opt]) -> Result<(), ParseError> {
    let missing = missing(opts).map(Opt::expects).collect::<Vec<_>>();
    if missing.is_empty() {
        return Ok(());
    }
    tracing::debug!(?missing, "required options not set");
    Err(ParseError::MissingRequiredOptions(missing))
}
