use std::{collections::HashMap, fmt, path::Path};

use indexmap::IndexMap;

use crate::{
    opt::Opt,
    rt::{self, Outcome},
    text::{escape, sentence},
    usage::{self, Palette},
    ConfigError, Error, ParseError, Result,
};

pub const DEFAULT_VERSION: &str = "v0.0.1";

type Handler = Box<dyn FnMut(&[String]) -> anyhow::Result<()>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum NodeKind {
    Root,
    Group,
    Command,
}

/// A declared positional argument of a command. Only used for usage text,
/// positional tokens reach the handler as they are.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Arg {
    desc: String,
    mandatory: bool,
}

impl Arg {
    pub fn optional(description: &str) -> Arg {
        Arg { desc: description.to_string(), mandatory: false }
    }

    pub fn mandatory(description: &str) -> Arg {
        Arg { desc: description.to_string(), mandatory: true }
    }

    pub fn is_mandatory(&self) -> bool {
        self.mandatory
    }
}

impl fmt::Display for Arg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.mandatory {
            write!(f, "<{}>", self.desc)
        } else {
            write!(f, "[{}]", self.desc)
        }
    }
}

/// What the root, groups and commands have in common.
///
/// Option long names, group names and command names share one namespace per
/// node; short names have their own.
pub struct Node {
    name: String,
    desc: String,
    kind: NodeKind,
    pub(crate) opts: Vec<Opt>,
    long: HashMap<String, usize>,
    short: HashMap<String, usize>,
    pub(crate) groups: IndexMap<String, Node>,
    pub(crate) commands: IndexMap<String, Node>,
    args: Vec<Arg>,
    handler: Option<Handler>,
}

impl fmt::Debug for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Node")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .field("opts", &self.opts)
            .field("groups", &self.groups)
            .field("commands", &self.commands)
            .field("args", &self.args)
            .finish_non_exhaustive()
    }
}

impl Node {
    fn new(kind: NodeKind, name: String, description: &str) -> Node {
        Node {
            name,
            desc: sentence(description),
            kind,
            opts: Vec::new(),
            long: HashMap::new(),
            short: HashMap::new(),
            groups: IndexMap::new(),
            commands: IndexMap::new(),
            args: Vec::new(),
            handler: None,
        }
    }

    pub fn trigger(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.desc
    }

    pub fn is_command(&self) -> bool {
        self.kind == NodeKind::Command
    }

    /// Options in declaration order.
    pub fn options(&self) -> impl Iterator<Item = &Opt> {
        self.opts.iter()
    }

    /// Options keyed by their short name.
    pub fn short_options(&self) -> impl Iterator<Item = (&str, &Opt)> {
        self.opts.iter().map(|opt| (opt.short(), opt))
    }

    /// Looks an option up by its `--long` name.
    pub fn option(&self, long: &str) -> Option<&Opt> {
        self.long.get(long).map(|&idx| &self.opts[idx])
    }

    /// Looks an option up by its `-s` name.
    pub fn short_option(&self, short: &str) -> Option<&Opt> {
        self.short.get(short).map(|&idx| &self.opts[idx])
    }

    pub fn groups(&self) -> impl Iterator<Item = &Node> {
        self.groups.values()
    }

    pub fn group(&self, name: &str) -> Option<&Node> {
        self.groups.get(name)
    }

    pub fn commands(&self) -> impl Iterator<Item = &Node> {
        self.commands.values()
    }

    pub fn command(&self, name: &str) -> Option<&Node> {
        self.commands.get(name)
    }

    pub fn arguments(&self) -> &[Arg] {
        &self.args
    }

    /// Required options that have not been set yet.
    pub fn missing_required(&self) -> impl Iterator<Item = &Opt> {
        rt::missing(&self.opts)
    }

    pub fn usage(&self, palette: &Palette) -> String {
        usage::render(self, palette)
    }

    /// Index of the option matching `token`, by long name first.
    pub(crate) fn option_index(&self, token: &str) -> Option<usize> {
        self.long.get(token).or_else(|| self.short.get(token)).copied()
    }

    pub(crate) fn run(&mut self, args: &[String]) -> Result<()> {
        match &mut self.handler {
            Some(handler) => handler(args).map_err(Error::Handler),
            None => Ok(()),
        }
    }

    fn duplicate(&self, name: &str) -> ConfigError {
        ConfigError::DuplicateName { name: name.to_string(), node: self.name.clone() }
    }

    fn is_taken(&self, name: &str) -> bool {
        self.long.contains_key(name)
            || self.groups.contains_key(name)
            || self.commands.contains_key(name)
    }

    fn push_option(&mut self, opt: Opt) {
        let idx = self.opts.len();
        self.long.insert(opt.long().to_string(), idx);
        self.short.insert(opt.short().to_string(), idx);
        self.opts.push(opt);
    }

    /// The whole batch is checked before anything is inserted, a failed call
    /// leaves the node as it was.
    fn add_options(&mut self, options: Vec<Opt>) -> Result<(), ConfigError> {
        let mut seen = Vec::new();
        for opt in &options {
            if let Some(err) = opt.bad_default() {
                return Err(err);
            }
            if self.is_taken(opt.long()) || seen.contains(&opt.long()) {
                return Err(self.duplicate(opt.long()));
            }
            if self.short.contains_key(opt.short()) || seen.contains(&opt.short()) {
                return Err(self.duplicate(opt.short()));
            }
            seen.push(opt.long());
            seen.push(opt.short());
        }
        for opt in options {
            self.push_option(opt);
        }
        Ok(())
    }

    fn check_names<'a>(&self, names: impl Iterator<Item = &'a str>) -> Result<(), ConfigError> {
        let mut seen = Vec::new();
        for name in names {
            if self.is_taken(name) || seen.contains(&name) {
                return Err(self.duplicate(name));
            }
            seen.push(name);
        }
        Ok(())
    }

    fn add_groups(&mut self, groups: Vec<Group>) -> Result<(), ConfigError> {
        self.check_names(groups.iter().map(|it| it.0.trigger()))?;
        for Group(group) in groups {
            self.groups.insert(group.name.clone(), group);
        }
        Ok(())
    }

    fn add_commands(&mut self, commands: Vec<Command>) -> Result<(), ConfigError> {
        self.check_names(commands.iter().map(|it| it.0.trigger()))?;
        for Command(command) in commands {
            self.commands.insert(command.name.clone(), command);
        }
        Ok(())
    }
}

/// The root of the tree. Its trigger is the name the process was started as.
#[derive(Debug)]
pub struct Cli {
    root: Node,
    version: String,
    palette: Palette,
}

impl Cli {
    /// A root with `--help` and `--version`.
    pub fn new(description: &str, version: &str) -> Cli {
        let mut cli = Cli::bare(description);
        cli.version = version.to_string();
        cli.root.push_option(Opt::help());
        cli.root.push_option(Opt::version());
        cli
    }

    /// A root without any built-in options.
    pub fn bare(description: &str) -> Cli {
        let bin = std::env::args_os()
            .next()
            .and_then(|arg0| Path::new(&arg0).file_name().map(|it| it.to_string_lossy().into_owned()))
            .unwrap_or_default();
        Cli {
            root: Node::new(NodeKind::Root, bin, description),
            version: DEFAULT_VERSION.to_string(),
            palette: Palette::default(),
        }
    }

    /// Overrides the trigger derived from the process name.
    pub fn bin(mut self, name: &str) -> Cli {
        self.root.name = name.to_string();
        self
    }

    pub fn palette(mut self, palette: Palette) -> Cli {
        self.palette = palette;
        self
    }

    pub fn add_help(&mut self) -> Result<&mut Cli, ConfigError> {
        self.root.add_options(vec![Opt::help()])?;
        Ok(self)
    }

    pub fn add_version(&mut self, version: &str) -> Result<&mut Cli, ConfigError> {
        self.root.add_options(vec![Opt::version()])?;
        self.version = version.to_string();
        Ok(self)
    }

    pub fn add_options(
        &mut self,
        options: impl IntoIterator<Item = Opt>,
    ) -> Result<&mut Cli, ConfigError> {
        self.root.add_options(options.into_iter().collect())?;
        Ok(self)
    }

    pub fn add_groups(
        &mut self,
        groups: impl IntoIterator<Item = Group>,
    ) -> Result<&mut Cli, ConfigError> {
        self.root.add_groups(groups.into_iter().collect())?;
        Ok(self)
    }

    pub fn add_commands(
        &mut self,
        commands: impl IntoIterator<Item = Command>,
    ) -> Result<&mut Cli, ConfigError> {
        self.root.add_commands(commands.into_iter().collect())?;
        Ok(self)
    }

    pub fn node(&self) -> &Node {
        &self.root
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn usage(&self) -> String {
        self.root.usage(&self.palette)
    }

    /// Matches `args` against the tree and runs at most one handler. Never
    /// prints and never exits, see [`Cli::handle`] for that.
    pub fn try_handle<I, S>(&mut self, args: I) -> Result<Outcome>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let args = args.into_iter().map(Into::into).collect::<Vec<String>>();
        let ctx = rt::Ctx { palette: &self.palette, version: &self.version };
        rt::dispatch(&mut self.root, &args, &ctx)
    }

    /// Like [`Cli::try_handle`], but prints usage when no command was given
    /// and exits the process after `--help` or `--version`.
    pub fn handle<I, S>(&mut self, args: I) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        match self.try_handle(args)? {
            Outcome::Handled => {}
            Outcome::Usage(text) => print!("{}", text),
            Outcome::Help(text) | Outcome::Version(text) => {
                print!("{}", text);
                std::process::exit(0)
            }
        }
        Ok(())
    }

    /// Handles the arguments of the current process, without the program
    /// name.
    pub fn handle_env(&mut self) -> Result<()> {
        let args = std::env::args_os()
            .skip(1)
            .map(|arg| arg.into_string().map_err(ParseError::NotUnicode))
            .collect::<Result<Vec<_>, _>>()?;
        self.handle(args)
    }

    /// Reports `errors` on stderr and terminates the process.
    pub fn exit(&self, code: i32, errors: &[&dyn fmt::Display]) -> ! {
        for err in errors {
            eprintln!("{}", self.palette.error(&err.to_string()));
        }
        std::process::exit(code)
    }
}

/// A named scope of options, nested groups and commands.
#[derive(Debug)]
pub struct Group(Node);

impl Group {
    /// A group with `--help`.
    pub fn new(name: &str, description: &str) -> Group {
        let mut group = Group::bare(name, description);
        group.0.push_option(Opt::help());
        group
    }

    pub fn bare(name: &str, description: &str) -> Group {
        Group(Node::new(NodeKind::Group, escape(name), description))
    }

    pub fn add_help(&mut self) -> Result<&mut Group, ConfigError> {
        self.0.add_options(vec![Opt::help()])?;
        Ok(self)
    }

    pub fn add_options(
        &mut self,
        options: impl IntoIterator<Item = Opt>,
    ) -> Result<&mut Group, ConfigError> {
        self.0.add_options(options.into_iter().collect())?;
        Ok(self)
    }

    pub fn add_groups(
        &mut self,
        groups: impl IntoIterator<Item = Group>,
    ) -> Result<&mut Group, ConfigError> {
        self.0.add_groups(groups.into_iter().collect())?;
        Ok(self)
    }

    pub fn add_commands(
        &mut self,
        commands: impl IntoIterator<Item = Command>,
    ) -> Result<&mut Group, ConfigError> {
        self.0.add_commands(commands.into_iter().collect())?;
        Ok(self)
    }

    pub fn node(&self) -> &Node {
        &self.0
    }
}

/// A leaf: options, positional arguments and the handler that receives the
/// tokens left after the command's own options.
#[derive(Debug)]
pub struct Command(Node);

impl Command {
    /// A command with `--help`.
    pub fn new(
        name: &str,
        description: &str,
        handler: impl FnMut(&[String]) -> anyhow::Result<()> + 'static,
    ) -> Command {
        let mut command = Command::bare(name, description, handler);
        command.0.push_option(Opt::help());
        command
    }

    pub fn bare(
        name: &str,
        description: &str,
        handler: impl FnMut(&[String]) -> anyhow::Result<()> + 'static,
    ) -> Command {
        let mut node = Node::new(NodeKind::Command, escape(name), description);
        node.handler = Some(Box::new(handler));
        Command(node)
    }

    pub fn add_help(&mut self) -> Result<&mut Command, ConfigError> {
        self.0.add_options(vec![Opt::help()])?;
        Ok(self)
    }

    pub fn add_options(
        &mut self,
        options: impl IntoIterator<Item = Opt>,
    ) -> Result<&mut Command, ConfigError> {
        self.0.add_options(options.into_iter().collect())?;
        Ok(self)
    }

    pub fn add_arguments(&mut self, arguments: impl IntoIterator<Item = Arg>) -> &mut Command {
        self.0.args.extend(arguments);
        self
    }

    pub fn node(&self) -> &Node {
        &self.0
    }
}
