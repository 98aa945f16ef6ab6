
use std::time::Instant;

use xshell::{cmd, Shell};

fn main() -> xshell::Result<()> {
    let sh = Shell::new()?;
    let _e = sh.push_env("RUSTUP_TOOLCHAIN", "stable");
    cmd!(sh, "rustc --version").run()?;

    step("BUILD", || cmd!(sh, "cargo test --workspace --no-run").run())?;
    step("TEST", || cmd!(sh, "cargo test --workspace -- --nocapture").run())?;
    step("DEMOS", || {
        cmd!(sh, "cargo build --examples").run()?;
        cmd!(sh, "cargo run -q --example hello -- --name ci greetings").run()?;
        cmd!(sh, "cargo run -q --example hello -- --version").run()?;
        cmd!(sh, "cargo run -q --example remote -- --help").run()
    })?;

    Ok(())
}

/// Runs `f` inside a collapsible CI log group and reports how long it took.
fn step(name: &str, f: impl FnOnce() -> xshell::Result<()>) -> xshell::Result<()> {
    println!("::group::{name}");
    let start = Instant::now();
    let res = f();
    eprintln!("{name}: {:.2?}", start.elapsed());
    println!("::endgroup::");
    res
}
