use std::{cell::RefCell, fmt, rc::Rc};

use crate::{
    text::{escape, sentence},
    value::{Kind, Value},
    ConfigError, Error, ParseError, Result,
};

const LONG_PREFIX: &str = "--";
const SHORT_PREFIX: &str = "-";

/// Value passed to flag setters.
pub(crate) const FLAG_VALUE: &str = "true";

/// Caller-owned storage an option writes into.
///
/// Cloning a slot clones the handle, not the value: setters and command
/// handlers hold clones of the same slot.
pub struct Slot<T>(Rc<RefCell<T>>);

impl<T> Slot<T> {
    pub fn new(value: T) -> Slot<T> {
        Slot(Rc::new(RefCell::new(value)))
    }

    pub fn set(&self, value: T) {
        *self.0.borrow_mut() = value;
    }

    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.0.borrow())
    }
}

impl<T: Clone> Slot<T> {
    pub fn get(&self) -> T {
        self.0.borrow().clone()
    }
}

impl<T> Clone for Slot<T> {
    fn clone(&self) -> Self {
        Slot(Rc::clone(&self.0))
    }
}

impl<T: Default> Default for Slot<T> {
    fn default() -> Self {
        Slot::new(T::default())
    }
}

impl<T: fmt::Debug> fmt::Debug for Slot<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Slot").field(&self.0.borrow()).finish()
    }
}

pub(crate) enum SetError {
    Format(String),
    Handler(anyhow::Error),
}

type Setter = Box<dyn FnMut(&str) -> Result<(), SetError>>;

pub(crate) enum Action {
    Set(Setter),
    Help,
    Version,
}

/// Built-in side-effecting options, resolved by the dispatcher itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Builtin {
    Help,
    Version,
}

/// A single declared option.
pub struct Opt {
    long: String,
    short: String,
    desc: String,
    kind: Kind,
    required: bool,
    used: bool,
    default: Option<String>,
    action: Action,
    bad_default: Option<ConfigError>,
}

impl Opt {
    fn new(kind: Kind, long: &str, short: char, description: &str, action: Action) -> Opt {
        Opt {
            long: format!("{}{}", LONG_PREFIX, escape(long)),
            short: format!("{}{}", SHORT_PREFIX, short),
            desc: sentence(description),
            kind,
            required: false,
            used: false,
            default: None,
            action,
            bad_default: None,
        }
    }

    /// Sets `slot` to `true` when the flag is present.
    pub fn flag(slot: &Slot<bool>, long: &str, short: char, description: &str) -> Opt {
        let slot = slot.clone();
        Opt::flag_fn(
            move || {
                slot.set(true);
                Ok(())
            },
            long,
            short,
            description,
        )
    }

    /// Runs `f` when the flag is present. `f` may terminate the process.
    pub fn flag_fn(
        mut f: impl FnMut() -> anyhow::Result<()> + 'static,
        long: &str,
        short: char,
        description: &str,
    ) -> Opt {
        let setter = move |_: &str| f().map_err(SetError::Handler);
        Opt::new(Kind::Flag, long, short, description, Action::Set(Box::new(setter)))
    }

    /// Passes the coerced value to `f`.
    pub fn value_fn<T: Value>(
        mut f: impl FnMut(T) -> anyhow::Result<()> + 'static,
        long: &str,
        short: char,
        description: &str,
    ) -> Opt {
        let setter = move |raw: &str| {
            let value = T::parse(raw).map_err(SetError::Format)?;
            f(value).map_err(SetError::Handler)
        };
        Opt::new(T::KIND, long, short, description, Action::Set(Box::new(setter)))
    }

    /// Stores `Some(value)` into `slot`.
    pub fn value<T: Value>(slot: &Slot<Option<T>>, long: &str, short: char, description: &str) -> Opt {
        let slot = slot.clone();
        Opt::value_fn(
            move |value| {
                slot.set(Some(value));
                Ok(())
            },
            long,
            short,
            description,
        )
    }

    /// Stores the value into `slot`; the option must be supplied.
    pub fn required_value<T: Value>(
        slot: &Slot<T>,
        long: &str,
        short: char,
        description: &str,
    ) -> Opt {
        let slot = slot.clone();
        Opt::value_fn(
            move |value| {
                slot.set(value);
                Ok(())
            },
            long,
            short,
            description,
        )
        .required()
    }

    pub fn required(mut self) -> Opt {
        self.required = true;
        self
    }

    /// Applies `value` right away, as if it had been passed on the command
    /// line. The option counts as used from then on, which also satisfies
    /// `required`.
    pub fn with_default(mut self, value: impl fmt::Display) -> Opt {
        let raw = value.to_string();
        let res = match self.kind {
            Kind::Flag => Err("flags take no value".to_string()),
            _ => self.set(&raw).map_err(|err| err.to_string()),
        };
        if let Err(reason) = res {
            self.bad_default =
                Some(ConfigError::InvalidDefault { option: self.long.clone(), value: raw.clone(), reason });
        }
        self.default = Some(raw);
        self
    }

    pub(crate) fn help() -> Opt {
        Opt::new(Kind::Flag, "help", 'h', "Show help and exit", Action::Help)
    }

    pub(crate) fn version() -> Opt {
        Opt::new(Kind::Flag, "version", 'v', "Show version and exit", Action::Version)
    }

    /// Long name, with the `--` prefix.
    pub fn long(&self) -> &str {
        &self.long
    }

    /// Short name, with the `-` prefix.
    pub fn short(&self) -> &str {
        &self.short
    }

    pub fn kind(&self) -> Kind {
        self.kind
    }

    pub fn is_required(&self) -> bool {
        self.required
    }

    /// Whether the setter has run successfully, from a default or a token.
    pub fn is_used(&self) -> bool {
        self.used
    }

    pub fn default_value(&self) -> Option<&str> {
        self.default.as_deref()
    }

    /// `--long, -s <hint>`, as shown in usage.
    pub fn trigger(&self) -> String {
        format!("{}, {} {}", self.long, self.short, self.kind.hint()).trim_end().to_string()
    }

    pub fn description(&self) -> String {
        match &self.default {
            Some(default) => format!("{} (default {})", self.desc, default),
            None => self.desc.clone(),
        }
    }

    /// `--long <hint>`, as listed in missing-option errors.
    pub(crate) fn expects(&self) -> String {
        format!("{} {}", self.long, self.kind.hint()).trim_end().to_string()
    }

    pub(crate) fn builtin(&self) -> Option<Builtin> {
        match self.action {
            Action::Set(_) => None,
            Action::Help => Some(Builtin::Help),
            Action::Version => Some(Builtin::Version),
        }
    }

    pub(crate) fn bad_default(&self) -> Option<ConfigError> {
        self.bad_default.clone()
    }

    /// Runs the setter with a raw token. Storage is only written when
    /// coercion succeeds.
    pub(crate) fn set(&mut self, raw: &str) -> Result<()> {
        let setter = match &mut self.action {
            Action::Set(setter) => setter,
            Action::Help | Action::Version => return Ok(()),
        };
        setter(raw).map_err(|err| match err {
            SetError::Format(reason) => Error::Parse(ParseError::InvalidValueFormat {
                option: self.long.clone(),
                value: raw.to_string(),
                kind: self.kind,
                reason,
            }),
            SetError::Handler(err) => Error::Handler(err),
        })?;
        self.used = true;
        Ok(())
    }
}

impl fmt::Debug for Opt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Opt")
            .field("long", &self.long)
            .field("short", &self.short)
            .field("kind", &self.kind)
            .field("required", &self.required)
            .field("used", &self.used)
            .field("default", &self.default)
            .finish_non_exhaustive()
    }
}
