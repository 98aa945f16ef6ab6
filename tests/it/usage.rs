use cmdtree::{Command, Group, Palette};
use expect_test::expect;

use crate::greeter;

#[test]
fn root_usage() {
    let g = greeter();
    expect![[r#"
        Usage: demo [OPTIONS] <COMMAND> [ARGS]...

        My CLI.

        Options:
            --help, -h          Show help and exit.
            --version, -v       Show version and exit.
            --uppercase, -U     Sets uppercase.
            --name, -n <value>  Sets name.

        Commands:
            greetings         Command description.
    "#]]
    .assert_eq(&g.cli.usage());
}

#[test]
fn command_usage_lists_arguments() {
    let g = greeter();
    let greetings = g.cli.node().command("greetings").unwrap();
    expect![[r#"
        Usage: greetings [OPTIONS] <first> [rest]

        Command description.

        Options:
            --help, -h        Show help and exit.
    "#]]
    .assert_eq(&greetings.usage(&Palette::plain()));
}

#[test]
fn usage_is_what_an_empty_invocation_returns() {
    let mut g = greeter();
    let expected = g.cli.usage();
    assert_eq!(g.cli.try_handle(Vec::<String>::new()).unwrap(), cmdtree::Outcome::Usage(expected));
}

#[test]
fn bare_nodes_have_no_builtin_options() {
    let mut group = Group::bare("tools", "");
    group.add_commands([Command::bare("fmt", "format sources", |_| Ok(()))]).unwrap();
    expect![[r#"
        Usage: tools [OPTIONS] <COMMAND> [ARGS]...

        Commands:
            fmt               Format sources.
    "#]]
    .assert_eq(&group.node().usage(&Palette::plain()));
}

#[test]
fn long_descriptions_wrap() {
    let words = "lorem ipsum dolor sit amet ".repeat(4);
    let mut group = Group::bare("tools", "");
    group.add_commands([Command::bare("fmt", &words, |_| Ok(()))]).unwrap();
    let usage = group.node().usage(&Palette::plain());
    let lines = usage.lines().skip_while(|it| *it != "Commands:").skip(1).collect::<Vec<_>>();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].starts_with("    fmt               Lorem ipsum"));
    assert!(lines[1].starts_with("                      "));
    assert!(lines.iter().all(|it| it.len() <= 96));
}

#[test]
fn colored_palette_marks_headings() {
    colored::control::set_override(true);
    let palette = Palette::default();
    let g = greeter();
    let usage = g.cli.node().usage(&palette);
    assert!(usage.starts_with(&palette.info("Usage: ")));
    assert!(usage.contains(&palette.important("My CLI.")));
    assert_ne!(palette.info("Usage: "), "Usage: ");
}
