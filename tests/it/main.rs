mod usage;

use cmdtree::{Arg, Cli, Command, Opt, Outcome, Palette, Slot};
use expect_test::{expect, Expect};

/// A root with a required `--name`, a `--uppercase` flag and a `greetings`
/// command that records the tokens it receives.
struct Greeter {
    cli: Cli,
    name: Slot<String>,
    uppercase: Slot<bool>,
    seen: Slot<Option<Vec<String>>>,
}

fn greeter() -> Greeter {
    let name = Slot::new(String::new());
    let uppercase = Slot::new(false);
    let seen = Slot::new(None);

    let mut cli = Cli::new("my CLI", "x.y").bin("demo").palette(Palette::plain());
    cli.add_options([
        Opt::flag(&uppercase, "uppercase", 'U', "sets uppercase"),
        Opt::required_value(&name, "name", 'n', "sets name"),
    ])
    .unwrap();

    let record = seen.clone();
    let mut greetings = Command::new("greetings", "command description", move |args| {
        record.set(Some(args.to_vec()));
        Ok(())
    });
    greetings.add_arguments([Arg::mandatory("first"), Arg::optional("rest")]);
    cli.add_commands([greetings]).unwrap();

    Greeter { cli, name, uppercase, seen }
}

fn summary(res: cmdtree::Result<Outcome>) -> String {
    match res {
        Ok(Outcome::Handled) => "handled".to_string(),
        Ok(Outcome::Usage(_)) => "usage".to_string(),
        Ok(Outcome::Help(text)) => format!("help: {}", text.lines().next().unwrap_or("")),
        Ok(Outcome::Version(text)) => text.trim_end().to_string(),
        Err(err) => format!("error: {}", err),
    }
}

fn check(args: &str, expect: Expect) {
    let mut g = greeter();
    let res = g.cli.try_handle(args.split_ascii_whitespace());
    let actual = format!(
        "{}\nname: {:?}\nuppercase: {}\nhandler: {:?}\n",
        summary(res),
        g.name.get(),
        g.uppercase.get(),
        g.seen.get(),
    );
    expect.assert_eq(&actual);
}

#[test]
fn passes_trailing_tokens_to_handler() {
    check(
        "--name sir greetings arg1 arg2",
        expect![[r#"
            handled
            name: "sir"
            uppercase: false
            handler: Some(["arg1", "arg2"])
        "#]],
    );
}

#[test]
fn short_flag_before_command() {
    check(
        "--name madam -U greetings",
        expect![[r#"
            handled
            name: "madam"
            uppercase: true
            handler: Some([])
        "#]],
    );
    check(
        "-n madam --uppercase greetings",
        expect![[r#"
            handled
            name: "madam"
            uppercase: true
            handler: Some([])
        "#]],
    );
}

#[test]
fn missing_required_option_blocks_handler() {
    check(
        "greetings",
        expect![[r#"
            error: missing required options: --name <value>
            name: ""
            uppercase: false
            handler: None
        "#]],
    );
    check(
        "-U greetings arg1",
        expect![[r#"
            error: missing required options: --name <value>
            name: ""
            uppercase: true
            handler: None
        "#]],
    );
}

#[test]
fn unknown_argument() {
    check(
        "--name x --bogus",
        expect![[r#"
            error: unknown argument: `--bogus`
            name: "x"
            uppercase: false
            handler: None
        "#]],
    );
    check(
        "--name x hello",
        expect![[r#"
            error: unknown argument: `hello`
            name: "x"
            uppercase: false
            handler: None
        "#]],
    );
}

#[test]
fn no_command_shows_usage() {
    check(
        "",
        expect![[r#"
            usage
            name: ""
            uppercase: false
            handler: None
        "#]],
    );
    check(
        "--name x -U",
        expect![[r#"
            usage
            name: "x"
            uppercase: true
            handler: None
        "#]],
    );
}

#[test]
fn missing_option_value() {
    check(
        "-U --name",
        expect![[r#"
            error: missing `--name` value
            name: ""
            uppercase: true
            handler: None
        "#]],
    );
}

#[test]
fn option_values_may_look_like_options() {
    check(
        "--name -U greetings",
        expect![[r#"
            handled
            name: "-U"
            uppercase: false
            handler: Some([])
        "#]],
    );
}

#[test]
fn command_does_not_see_enclosing_options() {
    check(
        "--name a greetings -U x",
        expect![[r#"
            handled
            name: "a"
            uppercase: false
            handler: Some(["-U", "x"])
        "#]],
    );
}

#[test]
fn help_and_version_short_circuit() {
    check(
        "--help greetings",
        expect![[r#"
            help: Usage: demo [OPTIONS] <COMMAND> [ARGS]...
            name: ""
            uppercase: false
            handler: None
        "#]],
    );
    check(
        "--name a greetings -h arg",
        expect![[r#"
            help: Usage: greetings [OPTIONS] <first> [rest]
            name: "a"
            uppercase: false
            handler: None
        "#]],
    );
    check(
        "-v --bogus",
        expect![[r#"
            version: x.y
            name: ""
            uppercase: false
            handler: None
        "#]],
    );
}

#[test]
fn failing_handler_is_reported() {
    let mut cli = Cli::bare("failing").bin("demo");
    cli.add_commands([Command::bare("boom", "fails", |args| {
        anyhow::bail!("boom with {} args", args.len())
    })])
    .unwrap();

    let err = cli.try_handle(["boom", "a", "b"]).unwrap_err();
    assert!(matches!(err, cmdtree::Error::Handler(_)));
    expect![[r#"boom with 2 args"#]].assert_eq(&err.to_string());
}
