use cmdtree::{Arg, Cli, Command, Opt, Slot};

fn main() {
    let name = Slot::new(String::new());
    let uppercase = Slot::new(false);

    let mut cli = Cli::new("greets people", "v0.1.0");
    let (who, loud) = (name.clone(), uppercase.clone());
    let mut greetings = Command::new("greetings", "print a greeting", move |args| {
        let who = if loud.get() { who.get().to_uppercase() } else { who.get() };
        println!("Hello {}", who);
        for (i, arg) in args.iter().enumerate() {
            println!("\t[{}] {}", i, arg);
        }
        Ok(())
    });
    greetings.add_arguments([Arg::optional("extra")]);

    let declared = cli
        .add_options([
            Opt::flag(&uppercase, "uppercase", 'U', "shout the name"),
            Opt::required_value(&name, "name", 'n', "who to greet"),
        ])
        .and_then(|cli| cli.add_commands([greetings]))
        .map(|_| ());
    if let Err(err) = declared {
        cli.exit(2, &[&err]);
    }

    if let Err(err) = cli.handle_env() {
        cli.exit(1, &[&err]);
    }
}
