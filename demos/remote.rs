use std::{path::PathBuf, time::Duration};

use cmdtree::{Arg, Cli, Command, ConfigError, Group, Opt, Slot};

fn declare(cli: &mut Cli) -> Result<(), ConfigError> {
    let url = Slot::new(PathBuf::new());
    let timeout = Slot::new(Duration::ZERO);
    let retries = Slot::new(None);

    let (u, t, r) = (url.clone(), timeout.clone(), retries.clone());
    let mut add = Command::new("add", "register a remote", move |args| {
        let name = args.first().ok_or_else(|| anyhow::anyhow!("remote name is required"))?;
        println!(
            "adding {} at {} (timeout {:?}, retries {:?})",
            name,
            u.get().display(),
            t.get(),
            r.get()
        );
        Ok(())
    });
    add.add_options([
        Opt::required_value(&timeout, "timeout", 't', "give up after this long").with_default("30s"),
        Opt::value::<i64>(&retries, "retries", 'r', "how many times to retry"),
    ])?
    .add_arguments([Arg::mandatory("name")]);

    let mut remote = Group::new("remote", "manage remotes");
    remote
        .add_options([Opt::required_value(&url, "url", 'u', "remote location")])?
        .add_commands([add])?;

    cli.add_groups([remote])?;
    Ok(())
}

fn main() {
    tracing_subscriber::fmt().with_writer(std::io::stderr).init();

    let mut cli = Cli::new("manages remotes", "v0.1.0");
    if let Err(err) = declare(&mut cli) {
        cli.exit(2, &[&err]);
    }
    if let Err(err) = cli.handle_env() {
        cli.exit(1, &[&err]);
    }
}
