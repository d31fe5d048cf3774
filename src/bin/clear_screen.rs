use anyhow::Context;

fn main() -> anyhow::Result<()> {
    learn_dx::logging::init("info");

    run().context("clear_screen failed")
}

#[cfg(windows)]
fn run() -> anyhow::Result<()> {
    learn_dx::samples::run::<learn_dx::samples::ClearScreen>()?;
    Ok(())
}

#[cfg(not(windows))]
fn run() -> anyhow::Result<()> {
    Err(learn_dx::Error::UnsupportedPlatform.into())
}
